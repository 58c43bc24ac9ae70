//! Statements, the facts of the knowledge graph.
//!
//! A `Statement` is an ordered `(subject, relation, object)` triple. The fact
//! store treats statements as a set: identical content means the same fact,
//! which is why the id is a content hash rather than an insertion counter.

use crate::{EntityRef, RelationRef, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single `(subject, relation, object)` fact.
///
/// # Examples
///
/// ```
/// use lintel::{EntityRef, RelationRef, Statement, Value};
///
/// let st = Statement::new(
///     EntityRef::new("bldg:AHU1"),
///     RelationRef::rdf_type(),
///     Value::entity(EntityRef::new("brick:AHU")),
/// );
/// assert_eq!(st.subject.as_str(), "bldg:AHU1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Statement {
    /// The entity the statement is about.
    pub subject: EntityRef,
    /// The relationship between subject and object.
    pub relation: RelationRef,
    /// The object: another entity or a literal.
    pub object: Value,
}

impl Statement {
    /// Creates a new statement.
    pub fn new(subject: EntityRef, relation: RelationRef, object: Value) -> Self {
        Self {
            subject,
            relation,
            object,
        }
    }

    /// Convenience constructor for a statement linking two entities.
    pub fn link(subject: EntityRef, relation: RelationRef, object: EntityRef) -> Self {
        Self::new(subject, relation, Value::Entity(object))
    }

    /// Convenience constructor for an `rdf:type` assertion.
    pub fn typed(instance: EntityRef, class: EntityRef) -> Self {
        Self::link(instance, RelationRef::rdf_type(), class)
    }

    /// Returns the content-addressed id of this statement.
    ///
    /// Identical triples always produce the same id, so the id doubles as the
    /// deduplication key in the fact store.
    pub fn id(&self) -> StatementId {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.subject.as_str().as_bytes());
        hasher.update(&[0]);
        hasher.update(self.relation.as_str().as_bytes());
        hasher.update(&[0]);
        hasher.update(&self.object.sort_key());
        StatementId(*hasher.finalize().as_bytes())
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.relation, self.object)
    }
}

/// A content hash uniquely identifying a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StatementId([u8; 32]);

impl StatementId {
    /// Returns the raw hash bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for StatementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0[..8] {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}
