//! Lintel - Building-Metadata Inference & Validation
//!
//! An inference and validation engine for building-metadata knowledge bases.
//! Facts about a building (its equipment, sensors, meters, and the relations
//! between them) are stored as `(subject, relation, object)` statements; a
//! class taxonomy drives a forward-chaining rule battery that enriches the
//! facts to a fixpoint, and declarative shapes validate the result.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Lintel                              │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                             │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │                 Inference Engine                     │   │
//! │  │  Inheritance │ Tags │ Implied │ Inverses │ Refinement│   │
//! │  └──────────────────────────────────────────────────────┘   │
//! │            │                              │                 │
//! │  ┌───────────────────┐        ┌───────────────────────┐     │
//! │  │     Taxonomy      │        │    Shape Validator    │     │
//! │  │  hierarchy, tags, │        │  cardinality + value  │     │
//! │  │  equivalences     │        │  constraints          │     │
//! │  └───────────────────┘        └───────────────────────┘     │
//! │            │                              │                 │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │                    Fact Store                        │   │
//! │  │  ┌─────────┐  ┌─────────┐  ┌─────────┐               │   │
//! │  │  │   SPO   │  │   POS   │  │   OSP   │  Indexes      │   │
//! │  │  └─────────┘  └─────────┘  └─────────┘               │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! │                                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```
//! use lintel::{EntityRef, KnowledgeBase, Statement, Taxonomy};
//!
//! # fn main() -> Result<(), lintel::Error> {
//! let taxonomy = Taxonomy::builder()
//!     .class("brick:Equipment")
//!     .class("brick:AHU")
//!     .parent("brick:Equipment")
//!     .build()?;
//!
//! let kb = KnowledgeBase::new(taxonomy);
//! kb.assert_type(EntityRef::new("bldg:AHU1"), EntityRef::new("brick:AHU"))?;
//! kb.infer()?;
//!
//! // The superclass assertion was materialized.
//! assert!(kb.store().contains(&Statement::typed(
//!     EntityRef::new("bldg:AHU1"),
//!     EntityRef::new("brick:Equipment"),
//! ))?);
//! # Ok(())
//! # }
//! ```
//!
//! # Statements
//!
//! A statement represents a fact in the form:
//! ```text
//! [Subject] --[Relation]--> [Object]
//!
//! Example:
//! [bldg:AHU1] --[rdf:type]--> [brick:AHU]
//! [bldg:AHU1] --[brick:hasPoint]--> [bldg:TS1]
//! [bldg:TS1]  --[brick:hasTag]--> [tag:Temperature]
//! ```

pub mod engine;
pub mod entity;
pub mod equivalence;
pub mod error;
pub mod index;
pub mod pattern;
pub mod relation;
pub mod shape;
pub mod statement;
pub mod store;
pub mod taxonomy;
pub mod validator;
pub mod value;

// Re-exports
pub use engine::{InferenceEngine, InferenceSummary, RuleKind, RuleProfile};
pub use entity::EntityRef;
pub use equivalence::EquivalenceResolver;
pub use error::{Error, Result};
pub use index::StatementIndex;
pub use pattern::StatementPattern;
pub use relation::RelationRef;
pub use shape::{Shape, ValueRule};
pub use statement::{Statement, StatementId};
pub use store::{FactStore, StoreStats};
pub use taxonomy::{ClassDef, Requirement, TagRule, Taxonomy, TaxonomyBuilder};
pub use validator::{ShapeValidator, ValidationReport, Violation};
pub use value::Value;

/// The main entry point: a fact store bound to a taxonomy.
///
/// `KnowledgeBase` wires the pieces together for the common workflow of
/// asserting facts, running inference to fixpoint, and validating the
/// enriched store against shapes. Each piece remains usable on its own.
///
/// # Examples
///
/// ```
/// use lintel::{EntityRef, KnowledgeBase, RelationRef, Shape, Taxonomy};
///
/// # fn main() -> Result<(), lintel::Error> {
/// let taxonomy = Taxonomy::builder()
///     .class("brick:Meter")
///     .build()?;
///
/// let kb = KnowledgeBase::new(taxonomy);
/// kb.assert_type(EntityRef::new("bldg:M1"), EntityRef::new("brick:Meter"))?;
/// kb.infer()?;
///
/// let shapes = vec![Shape::new(
///     "meter-has-substance",
///     EntityRef::new("brick:Meter"),
///     RelationRef::has_substance(),
/// )
/// .with_min_count(1)];
///
/// let report = kb.validate(shapes)?;
/// assert!(!report.valid); // M1 measures nothing yet
/// # Ok(())
/// # }
/// ```
pub struct KnowledgeBase {
    taxonomy: Taxonomy,
    store: FactStore,
}

impl KnowledgeBase {
    /// Creates an empty knowledge base over a taxonomy.
    pub fn new(taxonomy: Taxonomy) -> Self {
        Self {
            taxonomy,
            store: FactStore::new(),
        }
    }

    /// The underlying fact store.
    pub fn store(&self) -> &FactStore {
        &self.store
    }

    /// The taxonomy this knowledge base was built over.
    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Asserts a statement, returning `true` if it was new.
    pub fn assert(&self, statement: Statement) -> Result<bool> {
        self.store.add(statement)
    }

    /// Asserts that an instance has a type.
    pub fn assert_type(&self, instance: EntityRef, class: EntityRef) -> Result<bool> {
        self.store.add(Statement::typed(instance, class))
    }

    /// Asserts a relation between two entities.
    pub fn assert_link(
        &self,
        subject: EntityRef,
        relation: RelationRef,
        object: EntityRef,
    ) -> Result<bool> {
        self.store.add(Statement::link(subject, relation, object))
    }

    /// Runs the full rule battery to fixpoint.
    pub fn infer(&self) -> Result<InferenceSummary> {
        InferenceEngine::new(&self.taxonomy).infer(&self.store)
    }

    /// Runs a restricted or reordered rule battery to fixpoint.
    pub fn infer_with(&self, profile: RuleProfile) -> Result<InferenceSummary> {
        InferenceEngine::new(&self.taxonomy)
            .with_profile(profile)
            .infer(&self.store)
    }

    /// Validates the current store against a set of shapes.
    ///
    /// A failed validation is an `Ok` result with `report.valid == false`;
    /// only malformed shapes and store faults produce errors.
    pub fn validate(&self, shapes: Vec<Shape>) -> Result<ValidationReport> {
        ShapeValidator::new(shapes)?.validate(&self.store)
    }
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constant() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_knowledge_base_roundtrip() {
        let taxonomy = Taxonomy::builder()
            .class("brick:Equipment")
            .class("brick:Chiller")
            .parent("brick:Equipment")
            .build()
            .unwrap();

        let kb = KnowledgeBase::new(taxonomy);
        kb.assert_type(EntityRef::new("bldg:CH1"), EntityRef::new("brick:Chiller"))
            .unwrap();
        let summary = kb.infer().unwrap();
        assert_eq!(summary.added, 1);

        assert!(kb
            .store()
            .contains(&Statement::typed(
                EntityRef::new("bldg:CH1"),
                EntityRef::new("brick:Equipment"),
            ))
            .unwrap());
    }

    #[test]
    fn test_validate_empty_is_valid() {
        let kb = KnowledgeBase::new(Taxonomy::builder().build().unwrap());
        let report = kb.validate(Vec::new()).unwrap();
        assert!(report.valid);
    }
}
