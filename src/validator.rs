//! Shape validation over a (usually inferred) fact store.
//!
//! Validation never short-circuits: every shape is checked against every
//! instance of its target class, and every violation lands in the report.
//! A failing store is an `Ok` result carrying a failing report; errors are
//! reserved for malformed shape configurations and store faults.

use crate::{EntityRef, Error, FactStore, RelationRef, Result, Shape, StatementPattern, Value};
use log::debug;
use serde::Serialize;

/// One constraint failure on one instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    /// The instance that failed.
    pub instance: EntityRef,
    /// The name of the shape that was violated.
    pub shape: String,
    /// A human-readable description of the failure.
    pub message: String,
}

/// The outcome of validating a store against a set of shapes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    /// `true` when no violations were found.
    pub valid: bool,
    /// Every violation found, in shape order then instance order.
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Serializes the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))
    }
}

/// Validates fact stores against a fixed set of shapes.
///
/// # Examples
///
/// ```
/// use lintel::{EntityRef, FactStore, RelationRef, Shape, ShapeValidator, Statement};
///
/// let shapes = vec![Shape::new(
///     "meter-has-substance",
///     EntityRef::new("brick:Meter"),
///     RelationRef::has_substance(),
/// )
/// .with_min_count(1)];
///
/// let validator = ShapeValidator::new(shapes).unwrap();
/// let store = FactStore::new();
/// store
///     .add(Statement::typed(
///         EntityRef::new("bldg:M1"),
///         EntityRef::new("brick:Meter"),
///     ))
///     .unwrap();
///
/// let report = validator.validate(&store).unwrap();
/// assert!(!report.valid); // M1 has no substance yet
/// ```
pub struct ShapeValidator {
    shapes: Vec<Shape>,
}

impl ShapeValidator {
    /// Creates a validator, rejecting malformed shapes up front.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidShape`] when a shape's `min_count` exceeds its
    /// `max_count`, or a `OneOf` rule allows nothing.
    pub fn new(shapes: Vec<Shape>) -> Result<Self> {
        for shape in &shapes {
            if let (Some(min), Some(max)) = (shape.min_count, shape.max_count) {
                if min > max {
                    return Err(Error::InvalidShape(format!(
                        "{}: min_count {} exceeds max_count {}",
                        shape.name, min, max
                    )));
                }
            }
            if let Some(crate::ValueRule::OneOf(allowed)) = &shape.values {
                if allowed.is_empty() {
                    return Err(Error::InvalidShape(format!(
                        "{}: OneOf rule allows no values",
                        shape.name
                    )));
                }
            }
        }
        Ok(Self { shapes })
    }

    /// The shapes this validator applies.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Checks every shape against every instance of its target class.
    pub fn validate(&self, store: &FactStore) -> Result<ValidationReport> {
        let mut violations = Vec::new();
        for shape in &self.shapes {
            let targets = store.find(
                &StatementPattern::relation(RelationRef::rdf_type())
                    .with_object(Value::entity(shape.target.clone())),
            )?;
            for statement in targets {
                self.check(store, shape, &statement.subject, &mut violations)?;
            }
        }
        debug!(
            "validated {} shapes, {} violations",
            self.shapes.len(),
            violations.len()
        );
        Ok(ValidationReport {
            valid: violations.is_empty(),
            violations,
        })
    }

    fn check(
        &self,
        store: &FactStore,
        shape: &Shape,
        instance: &EntityRef,
        violations: &mut Vec<Violation>,
    ) -> Result<()> {
        let values = store.objects_of(instance, &shape.path)?;

        if let Some(min) = shape.min_count {
            if values.len() < min {
                violations.push(Violation {
                    instance: instance.clone(),
                    shape: shape.name.clone(),
                    message: format!(
                        "expected at least {} value(s) on {}, found {}",
                        min,
                        shape.path.as_str(),
                        values.len()
                    ),
                });
            }
        }

        if let Some(max) = shape.max_count {
            if values.len() > max {
                violations.push(Violation {
                    instance: instance.clone(),
                    shape: shape.name.clone(),
                    message: format!(
                        "expected at most {} value(s) on {}, found {}",
                        max,
                        shape.path.as_str(),
                        values.len()
                    ),
                });
            }
        }

        if let Some(rule) = &shape.values {
            for value in &values {
                if !rule.allows(value) {
                    violations.push(Violation {
                        instance: instance.clone(),
                        shape: shape.name.clone(),
                        message: format!("value {} not allowed on {}", value, shape.path.as_str()),
                    });
                }
            }
        }

        Ok(())
    }
}
