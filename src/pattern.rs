//! Pattern queries over statements.
//!
//! A `StatementPattern` constrains any combination of subject, relation, and
//! object; unset positions act as wildcards. The fact store picks the index
//! to serve a pattern from the positions that are bound.

use crate::{EntityRef, RelationRef, Statement, Value};

/// A pattern for matching `(subject, relation, object)` statements.
///
/// # Examples
///
/// Match everything said about one entity:
///
/// ```
/// use lintel::{EntityRef, StatementPattern};
///
/// let pattern = StatementPattern::subject(EntityRef::new("bldg:AHU1"));
/// ```
///
/// Match all type assertions:
///
/// ```
/// use lintel::{RelationRef, StatementPattern};
///
/// let pattern = StatementPattern::relation(RelationRef::rdf_type());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StatementPattern {
    /// An optional constraint on the subject.
    pub subject: Option<EntityRef>,
    /// An optional constraint on the relation.
    pub relation: Option<RelationRef>,
    /// An optional constraint on the object.
    pub object: Option<Value>,
}

impl StatementPattern {
    /// Creates a pattern that matches any statement.
    pub fn any() -> Self {
        Self::default()
    }

    /// Creates a pattern constrained to a specific subject.
    pub fn subject(subject: EntityRef) -> Self {
        Self {
            subject: Some(subject),
            ..Default::default()
        }
    }

    /// Creates a pattern constrained to a specific relation.
    pub fn relation(relation: RelationRef) -> Self {
        Self {
            relation: Some(relation),
            ..Default::default()
        }
    }

    /// Creates a pattern constrained to a specific object.
    pub fn object(object: Value) -> Self {
        Self {
            object: Some(object),
            ..Default::default()
        }
    }

    /// Adds a subject constraint.
    pub fn with_subject(mut self, subject: EntityRef) -> Self {
        self.subject = Some(subject);
        self
    }

    /// Adds a relation constraint.
    pub fn with_relation(mut self, relation: RelationRef) -> Self {
        self.relation = Some(relation);
        self
    }

    /// Adds an object constraint.
    pub fn with_object(mut self, object: Value) -> Self {
        self.object = Some(object);
        self
    }

    /// Returns `true` if the statement satisfies every bound position.
    pub fn matches(&self, statement: &Statement) -> bool {
        if let Some(ref s) = self.subject {
            if &statement.subject != s {
                return false;
            }
        }
        if let Some(ref r) = self.relation {
            if &statement.relation != r {
                return false;
            }
        }
        if let Some(ref o) = self.object {
            if &statement.object != o {
                return false;
            }
        }
        true
    }

    /// Returns `true` if all three positions are bound.
    pub fn is_exact(&self) -> bool {
        self.subject.is_some() && self.relation.is_some() && self.object.is_some()
    }

    /// Returns `true` if no position is bound.
    pub fn is_wildcard(&self) -> bool {
        self.subject.is_none() && self.relation.is_none() && self.object.is_none()
    }
}
