//! The fact store: a deduplicating, monotonic set of statements.
//!
//! Facts are only ever added. Inference runs over a snapshot of the store and
//! writes its conclusions back, so removal would invalidate conclusions the
//! engine has already drawn; the API simply does not offer it.

use crate::{
    EntityRef, Error, RelationRef, Result, Statement, StatementId, StatementIndex,
    StatementPattern, Value,
};
use indexmap::IndexMap;
use serde::Serialize;
use std::sync::RwLock;

/// Summary counts for a fact store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Total number of distinct statements.
    pub statements: usize,
    /// Number of distinct subjects.
    pub subjects: usize,
    /// Number of distinct relations.
    pub relations: usize,
    /// Number of distinct objects.
    pub objects: usize,
}

struct StoreInner {
    /// Insertion-ordered statements keyed by content hash.
    statements: IndexMap<StatementId, Statement>,
    index: StatementIndex,
}

/// An in-memory statement set with SPO/POS/OSP indexes.
///
/// The store is internally synchronized: `add` takes `&self`, so a store
/// shared between threads needs no external locking.
///
/// # Examples
///
/// ```
/// use lintel::{EntityRef, FactStore, Statement};
///
/// let store = FactStore::new();
/// let st = Statement::typed(EntityRef::new("bldg:AHU1"), EntityRef::new("brick:AHU"));
///
/// assert!(store.add(st.clone()).unwrap());
/// assert!(!store.add(st).unwrap()); // second add is a no-op
/// assert_eq!(store.len().unwrap(), 1);
/// ```
pub struct FactStore {
    inner: RwLock<StoreInner>,
}

impl FactStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreInner {
                statements: IndexMap::new(),
                index: StatementIndex::new(),
            }),
        }
    }

    /// Adds a statement, returning `true` if it was not already present.
    pub fn add(&self, statement: Statement) -> Result<bool> {
        let id = statement.id();
        let mut inner = self.write()?;
        if inner.statements.contains_key(&id) {
            return Ok(false);
        }
        inner.index.insert(&statement, id);
        inner.statements.insert(id, statement);
        Ok(true)
    }

    /// Adds every statement from an iterator, returning how many were new.
    pub fn add_all(&self, statements: impl IntoIterator<Item = Statement>) -> Result<usize> {
        let mut added = 0;
        for st in statements {
            if self.add(st)? {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Returns `true` if the exact statement is present.
    pub fn contains(&self, statement: &Statement) -> Result<bool> {
        Ok(self.read()?.statements.contains_key(&statement.id()))
    }

    /// Returns `true` if any statement matches the pattern.
    pub fn matches(&self, pattern: &StatementPattern) -> Result<bool> {
        Ok(!self.find(pattern)?.is_empty())
    }

    /// Returns all statements matching the pattern.
    ///
    /// The bound positions pick the index; a fully wildcard pattern walks the
    /// whole store in insertion order.
    pub fn find(&self, pattern: &StatementPattern) -> Result<Vec<Statement>> {
        let inner = self.read()?;
        let candidates: Vec<StatementId> = match (&pattern.subject, &pattern.relation, &pattern.object)
        {
            (Some(s), Some(r), _) => inner.index.by_subject_relation(s, r),
            (Some(s), None, Some(o)) => inner.index.by_object_subject(o, s),
            (Some(s), None, None) => inner.index.by_subject(s),
            (None, Some(r), Some(o)) => inner.index.by_relation_object(r, o),
            (None, Some(r), None) => inner.index.by_relation(r),
            (None, None, Some(o)) => inner.index.by_object(o),
            (None, None, None) => inner.statements.keys().copied().collect(),
        };

        Ok(candidates
            .into_iter()
            .filter_map(|id| inner.statements.get(&id))
            .filter(|st| pattern.matches(st))
            .cloned()
            .collect())
    }

    /// All classes an entity is typed as.
    pub fn types_of(&self, entity: &EntityRef) -> Result<Vec<EntityRef>> {
        let typed = self.find(
            &StatementPattern::subject(entity.clone()).with_relation(RelationRef::rdf_type()),
        )?;
        Ok(typed
            .into_iter()
            .filter_map(|st| st.object.as_entity().cloned())
            .collect())
    }

    /// All objects related to an entity through a given relation.
    pub fn objects_of(&self, subject: &EntityRef, relation: &RelationRef) -> Result<Vec<Value>> {
        let found = self
            .find(&StatementPattern::subject(subject.clone()).with_relation(relation.clone()))?;
        Ok(found.into_iter().map(|st| st.object).collect())
    }

    /// The distinct subjects that appear with a given relation.
    pub fn subjects_with(&self, relation: &RelationRef) -> Result<Vec<EntityRef>> {
        let found = self.find(&StatementPattern::relation(relation.clone()))?;
        let mut seen = indexmap::IndexSet::new();
        for st in found {
            seen.insert(st.subject);
        }
        Ok(seen.into_iter().collect())
    }

    /// The distinct subjects appearing anywhere in the store, in first-seen order.
    pub fn subjects(&self) -> Result<Vec<EntityRef>> {
        let inner = self.read()?;
        let mut seen = indexmap::IndexSet::new();
        for st in inner.statements.values() {
            seen.insert(st.subject.clone());
        }
        Ok(seen.into_iter().collect())
    }

    /// A snapshot of every statement, in insertion order.
    pub fn statements(&self) -> Result<Vec<Statement>> {
        Ok(self.read()?.statements.values().cloned().collect())
    }

    /// The number of statements in the store.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.statements.len())
    }

    /// Returns `true` if the store holds no statements.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.statements.is_empty())
    }

    /// Summary counts over the store.
    pub fn stats(&self) -> Result<StoreStats> {
        let inner = self.read()?;
        Ok(StoreStats {
            statements: inner.statements.len(),
            subjects: inner.index.subject_count(),
            relations: inner.index.relation_count(),
            objects: inner.index.object_count(),
        })
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, StoreInner>> {
        self.inner
            .read()
            .map_err(|e| Error::Store(format!("lock poisoned: {}", e)))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, StoreInner>> {
        self.inner
            .write()
            .map_err(|e| Error::Store(format!("lock poisoned: {}", e)))
    }
}

impl Default for FactStore {
    fn default() -> Self {
        Self::new()
    }
}
