//! Statement indexes for efficient pattern queries.
//!
//! Three orderings cover every bound-position combination:
//! - SPO: everything about a subject, or a subject + relation
//! - POS: everything using a relation, or a relation + object
//! - OSP: everything pointing at an object

use crate::{EntityRef, RelationRef, Statement, StatementId, Value};
use std::collections::{BTreeMap, BTreeSet};

/// In-memory SPO/POS/OSP indexes over statement ids.
#[derive(Debug, Default)]
pub struct StatementIndex {
    /// subject -> relation -> statement ids
    spo: BTreeMap<EntityRef, BTreeMap<RelationRef, BTreeSet<StatementId>>>,
    /// relation -> object -> statement ids
    pos: BTreeMap<RelationRef, BTreeMap<Value, BTreeSet<StatementId>>>,
    /// object -> subject -> statement ids
    osp: BTreeMap<Value, BTreeMap<EntityRef, BTreeSet<StatementId>>>,
}

impl StatementIndex {
    /// Creates a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a statement into all three orderings.
    pub fn insert(&mut self, statement: &Statement, id: StatementId) {
        self.spo
            .entry(statement.subject.clone())
            .or_default()
            .entry(statement.relation.clone())
            .or_default()
            .insert(id);

        self.pos
            .entry(statement.relation.clone())
            .or_default()
            .entry(statement.object.clone())
            .or_default()
            .insert(id);

        self.osp
            .entry(statement.object.clone())
            .or_default()
            .entry(statement.subject.clone())
            .or_default()
            .insert(id);
    }

    /// All statement ids for a subject.
    pub fn by_subject(&self, subject: &EntityRef) -> Vec<StatementId> {
        self.spo
            .get(subject)
            .map(|rels| rels.values().flat_map(|ids| ids.iter().copied()).collect())
            .unwrap_or_default()
    }

    /// All statement ids for a relation.
    pub fn by_relation(&self, relation: &RelationRef) -> Vec<StatementId> {
        self.pos
            .get(relation)
            .map(|objs| objs.values().flat_map(|ids| ids.iter().copied()).collect())
            .unwrap_or_default()
    }

    /// All statement ids for an object.
    pub fn by_object(&self, object: &Value) -> Vec<StatementId> {
        self.osp
            .get(object)
            .map(|subs| subs.values().flat_map(|ids| ids.iter().copied()).collect())
            .unwrap_or_default()
    }

    /// Statement ids for a subject + relation.
    pub fn by_subject_relation(
        &self,
        subject: &EntityRef,
        relation: &RelationRef,
    ) -> Vec<StatementId> {
        self.spo
            .get(subject)
            .and_then(|rels| rels.get(relation))
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Statement ids for a relation + object.
    pub fn by_relation_object(&self, relation: &RelationRef, object: &Value) -> Vec<StatementId> {
        self.pos
            .get(relation)
            .and_then(|objs| objs.get(object))
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Statement ids for an object + subject.
    pub fn by_object_subject(&self, object: &Value, subject: &EntityRef) -> Vec<StatementId> {
        self.osp
            .get(object)
            .and_then(|subs| subs.get(subject))
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Count of distinct subjects.
    pub fn subject_count(&self) -> usize {
        self.spo.len()
    }

    /// Count of distinct relations.
    pub fn relation_count(&self) -> usize {
        self.pos.len()
    }

    /// Count of distinct objects.
    pub fn object_count(&self) -> usize {
        self.osp.len()
    }
}
