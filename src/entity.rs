//! Entity identifiers for graph subjects and objects.
//!
//! An `EntityRef` names an instance, a class, or any other resource in the
//! knowledge graph. It is an opaque URI-like string: the engine assumes no
//! structure beyond value equality, so statements about entities the
//! taxonomy has never heard of are legal.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque, URI-like identifier for an entity in the graph.
///
/// Entities name both instances (`"bldg:AHU1"`) and classes
/// (`"brick:Air_Flow_Sensor"`); nothing in the identifier distinguishes the
/// two. Equality is plain string equality.
///
/// # Examples
///
/// ```
/// use lintel::EntityRef;
///
/// let e = EntityRef::new("bldg:AHU1");
/// assert_eq!(e.as_str(), "bldg:AHU1");
/// assert_eq!(e.namespace(), Some("bldg"));
/// assert_eq!(e.local_name(), "AHU1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityRef {
    uri: String,
}

impl EntityRef {
    /// Creates a new entity reference from a URI-like string.
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
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.uri)
    }
}

impl From<String> for EntityRef {
    fn from(s: String) -> Self {
        Self { uri: s }
    }
}

impl From<&str> for EntityRef {
    fn from(s: &str) -> Self {
        Self { uri: s.to_string() }
    }
}

impl AsRef<str> for EntityRef {
    fn as_ref(&self) -> &str {
        &self.uri
    }
}
