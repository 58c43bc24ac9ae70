//! Shape definitions for constraint validation.
//!
//! A shape targets a class and constrains one property path on its instances:
//! how many values may appear, and which values are allowed. Shapes are plain
//! data; the [`crate::ShapeValidator`] interprets them against a store.

use crate::{EntityRef, RelationRef, Value};
use serde::{Deserialize, Serialize};

/// A constraint on which values a property may hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValueRule {
    /// Every value must equal this one exactly.
    Equals(Value),
    /// Every value must be one of these.
    OneOf(Vec<Value>),
}

impl ValueRule {
    /// Returns `true` if the value satisfies the rule.
    pub fn allows(&self, value: &Value) -> bool {
        match self {
            Self::Equals(expected) => value == expected,
            Self::OneOf(allowed) => allowed.contains(value),
        }
    }
}

/// A named constraint on one property of a target class.
///
/// # Examples
///
/// A marker property that must be present and must be `false`:
///
/// ```
/// use lintel::{EntityRef, RelationRef, Shape, Value, ValueRule};
///
/// let shape = Shape::new(
///     "building-meters-are-physical",
///     EntityRef::new("brick:Building"),
///     RelationRef::new("brick:isVirtualMeter"),
/// )
/// .with_values(ValueRule::OneOf(vec![Value::boolean(false)]));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// A stable name, used in violation messages.
    pub name: String,
    /// The class whose instances this shape constrains.
    pub target: EntityRef,
    /// The property path being constrained.
    pub path: RelationRef,
    /// Minimum number of values, if constrained.
    pub min_count: Option<usize>,
    /// Maximum number of values, if constrained.
    pub max_count: Option<usize>,
    /// The allowed values, if constrained.
    pub values: Option<ValueRule>,
}

impl Shape {
    /// Creates a shape with no constraints yet.
    pub fn new(name: impl Into<String>, target: EntityRef, path: RelationRef) -> Self {
        Self {
            name: name.into(),
            target,
            path,
            min_count: None,
            max_count: None,
            values: None,
        }
    }

    /// Requires at least `n` values on the path.
    pub fn with_min_count(mut self, n: usize) -> Self {
        self.min_count = Some(n);
        self
    }

    /// Allows at most `n` values on the path.
    pub fn with_max_count(mut self, n: usize) -> Self {
        self.max_count = Some(n);
        self
    }

    /// Constrains which values the path may hold.
    pub fn with_values(mut self, rule: ValueRule) -> Self {
        self.values = Some(rule);
        self
    }

    /// Returns `true` if the shape constrains anything at all.
    pub fn is_constraining(&self) -> bool {
        self.min_count.is_some() || self.max_count.is_some() || self.values.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_rules() {
        let equals = ValueRule::Equals(Value::boolean(false));
        assert!(equals.allows(&Value::boolean(false)));
        assert!(!equals.allows(&Value::boolean(true)));

        let one_of = ValueRule::OneOf(vec![Value::integer(1), Value::integer(2)]);
        assert!(one_of.allows(&Value::integer(2)));
        assert!(!one_of.allows(&Value::integer(3)));
    }

    #[test]
    fn test_builder() {
        let shape = Shape::new(
            "one-substance",
            EntityRef::new("brick:Meter"),
            RelationRef::has_substance(),
        )
        .with_min_count(1)
        .with_max_count(1);

        assert_eq!(shape.min_count, Some(1));
        assert_eq!(shape.max_count, Some(1));
        assert!(shape.is_constraining());
    }
}
