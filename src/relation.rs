//! Relations between subjects and objects.
//!
//! A `RelationRef` is the middle position of a `(subject, relation, object)`
//! statement. Like entities, relations are URI-like strings with value
//! equality; the constructors below name the relations the building-metadata
//! vocabulary leans on.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies the relationship (the "verb") in a statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationRef {
    uri: String,
}

impl RelationRef {
    /// Creates a new relation from a URI-like string.
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }

    /// Returns the full identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.uri
    }

    /// Returns the namespace prefix (the part before the last colon), if any.
    pub fn namespace(&self) -> Option<&str> {
        self.uri.rsplit_once(':').map(|(ns, _)| ns)
    }

    /// Returns the local name (the part after the last colon).
    pub fn local_name(&self) -> &str {
        self.uri.rsplit(':').next().unwrap_or(&self.uri)
    }

    // ========== Well-known relations ==========

    /// `rdf:type`: the subject is an instance of the object class.
    pub fn rdf_type() -> Self {
        Self::new("rdf:type")
    }

    /// `brick:hasTag`: the subject carries a controlled-vocabulary tag.
    pub fn has_tag() -> Self {
        Self::new("brick:hasTag")
    }

    /// `brick:hasSubstance`: the substance a point or meter measures.
    pub fn has_substance() -> Self {
        Self::new("brick:hasSubstance")
    }

    /// `brick:hasQuantity`: the physical quantity a point measures.
    pub fn has_quantity() -> Self {
        Self::new("brick:hasQuantity")
    }

    /// `brick:hasPoint`: equipment exposes a point.
    pub fn has_point() -> Self {
        Self::new("brick:hasPoint")
    }

    /// `brick:isPointOf`: inverse of `hasPoint`.
    pub fn is_point_of() -> Self {
        Self::new("brick:isPointOf")
    }

    /// `brick:meters`: a meter measures a piece of equipment or a location.
    pub fn meters() -> Self {
        Self::new("brick:meters")
    }

    /// `brick:isMeteredBy`: inverse of `meters`.
    pub fn is_metered_by() -> Self {
        Self::new("brick:isMeteredBy")
    }
}

impl fmt::Display for RelationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.uri)
    }
}

impl From<String> for RelationRef {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for RelationRef {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for RelationRef {
    fn as_ref(&self) -> &str {
        &self.uri
    }
}
