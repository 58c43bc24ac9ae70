//! The `Value` type for the object position of a statement.
//!
//! An object is either a reference to another entity (creating an edge in the
//! graph) or a literal. The literal variants cover what the building-metadata
//! domain actually stores: strings, numbers, and boolean markers.

use crate::EntityRef;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The object of a `(subject, relation, object)` statement.
///
/// # Examples
///
/// ```
/// use lintel::{EntityRef, Value};
///
/// let link = Value::entity(EntityRef::new("bldg:VAV1"));
/// assert!(link.is_entity());
///
/// let marker = Value::boolean(true);
/// assert_eq!(marker.as_boolean(), Some(true));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// A reference to another entity, linking two nodes in the graph.
    Entity(EntityRef),

    /// A UTF-8 string literal.
    String(String),

    /// A 64-bit signed integer literal.
    Integer(i64),

    /// A 64-bit floating-point literal.
    Float(f64),

    /// A boolean literal, used for marker properties.
    Boolean(bool),
}

impl Value {
    /// Creates a `Value` that references another entity.
    pub fn entity(e: EntityRef) -> Self {
        Self::Entity(e)
    }

    /// Creates a new string literal.
    pub fn literal(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    /// Creates a new integer literal.
    pub fn integer(n: i64) -> Self {
        Self::Integer(n)
    }

    /// Creates a new float literal.
    pub fn float(f: f64) -> Self {
        Self::Float(f)
    }

    /// Creates a new boolean literal.
    pub fn boolean(b: bool) -> Self {
        Self::Boolean(b)
    }

    /// Returns `true` if the value is an entity reference.
    pub fn is_entity(&self) -> bool {
        matches!(self, Self::Entity(_))
    }

    /// Returns `true` if the value is a literal.
    pub fn is_literal(&self) -> bool {
        !self.is_entity()
    }

    /// Returns the referenced entity, if the value is one.
    pub fn as_entity(&self) -> Option<&EntityRef> {
        match self {
            Self::Entity(e) => Some(e),
            _ => None,
        }
    }

    /// Returns a string slice if the value is a string literal.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the `i64` if the value is an integer literal.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the `f64` if the value is a float literal.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the `bool` if the value is a boolean literal.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns a byte encoding suitable for lexicographic ordering in indexes.
    ///
    /// Each variant is prefixed with a type tag so cross-type ordering is
    /// total and stable. Floats are bit-twiddled into a sortable integer form.
    pub fn sort_key(&self) -> Vec<u8> {
        match self {
            Self::Entity(e) => {
                let mut key = vec![0u8];
                key.extend(e.as_str().as_bytes());
                key
            }
            Self::String(s) => {
                let mut key = vec![1u8];
                key.extend(s.as_bytes());
                key
            }
            Self::Integer(n) => {
                let mut key = vec![2u8];
                // Big-endian, XOR the sign bit so negatives sort first.
                key.extend(&((*n as u64) ^ (1u64 << 63)).to_be_bytes());
                key
            }
            Self::Float(f) => {
                let mut key = vec![3u8];
                let bits = f.to_bits();
                let sortable = if *f >= 0.0 { bits ^ (1u64 << 63) } else { !bits };
                key.extend(&sortable.to_be_bytes());
                key
            }
            Self::Boolean(b) => vec![4u8, u8::from(*b)],
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entity(e) => write!(f, "{}", e),
            Self::String(s) => write!(f, "\"{}\"", s),
            Self::Integer(n) => write!(f, "{}", n),
            Self::Float(x) => write!(f, "{}", x),
            Self::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl Eq for Value {}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.sort_key().hash(state);
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl From<EntityRef> for Value {
    fn from(e: EntityRef) -> Self {
        Self::Entity(e)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}
