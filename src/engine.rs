//! Forward-chaining inference over a fact store.
//!
//! The engine sweeps a battery of rules over the store until a full pass adds
//! nothing new. Every rule is purely additive, so the closure is a fixpoint:
//! re-running inference on an already-closed store is a no-op, and the final
//! closure does not depend on the order rules run within a pass.

use crate::{
    EntityRef, Error, FactStore, RelationRef, Result, Statement, StatementPattern, Taxonomy, Value,
};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The kinds of rules the engine can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleKind {
    /// `(x, type, C)` implies `(x, type, C')` for every ancestor `C'`.
    TypeInheritance,
    /// `(x, type, C)` implies `(x, type, C2)` for every equivalent `C2`.
    EquivalenceExpansion,
    /// An instance's collected tag set resolves to its most specific class.
    TagClassification,
    /// A typed instance acquires its class's full tag set.
    TagExpansion,
    /// A typed instance acquires the relations its class implies.
    ImpliedRelations,
    /// `(x, P, y)` implies `(y, Q, x)` for declared inverse pairs.
    InverseRelations,
    /// A typed instance whose asserted facts satisfy a direct subclass's
    /// declarations is retyped to that subclass.
    Refinement,
}

/// The ordered set of rules a run applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleProfile {
    kinds: Vec<RuleKind>,
}

impl RuleProfile {
    /// Every rule kind, in the default order.
    pub fn all() -> Self {
        Self {
            kinds: vec![
                RuleKind::TypeInheritance,
                RuleKind::EquivalenceExpansion,
                RuleKind::TagClassification,
                RuleKind::TagExpansion,
                RuleKind::ImpliedRelations,
                RuleKind::InverseRelations,
                RuleKind::Refinement,
            ],
        }
    }

    /// A profile restricted to (or reordered as) the given kinds.
    pub fn only(kinds: impl IntoIterator<Item = RuleKind>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
        }
    }

    /// The kinds this profile applies, in application order.
    pub fn kinds(&self) -> &[RuleKind] {
        &self.kinds
    }
}

impl Default for RuleProfile {
    fn default() -> Self {
        Self::all()
    }
}

/// Counters describing a completed inference run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InferenceSummary {
    /// Number of full passes, including the final pass that added nothing.
    pub passes: usize,
    /// Statements in the store before the run.
    pub initial: usize,
    /// Statements added by the run.
    pub added: usize,
    /// Statements in the store after the run.
    pub total: usize,
}

/// Applies a rule battery to a [`FactStore`] until fixpoint.
///
/// # Examples
///
/// ```
/// use lintel::{EntityRef, FactStore, InferenceEngine, Statement, Taxonomy};
///
/// let taxonomy = Taxonomy::builder()
///     .class("brick:Equipment")
///     .class("brick:AHU")
///     .parent("brick:Equipment")
///     .build()
///     .unwrap();
///
/// let store = FactStore::new();
/// store
///     .add(Statement::typed(
///         EntityRef::new("bldg:AHU1"),
///         EntityRef::new("brick:AHU"),
///     ))
///     .unwrap();
///
/// let engine = InferenceEngine::new(&taxonomy);
/// engine.infer(&store).unwrap();
///
/// assert!(store
///     .contains(&Statement::typed(
///         EntityRef::new("bldg:AHU1"),
///         EntityRef::new("brick:Equipment"),
///     ))
///     .unwrap());
/// ```
pub struct InferenceEngine<'a> {
    taxonomy: &'a Taxonomy,
    profile: RuleProfile,
    pass_limit: Option<usize>,
}

impl<'a> InferenceEngine<'a> {
    /// Creates an engine over a taxonomy, applying the full rule battery.
    pub fn new(taxonomy: &'a Taxonomy) -> Self {
        Self {
            taxonomy,
            profile: RuleProfile::all(),
            pass_limit: None,
        }
    }

    /// Restricts or reorders the rules this engine applies.
    pub fn with_profile(mut self, profile: RuleProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Caps the number of passes. Exceeding the cap is an error, never a
    /// silently truncated closure. Without a cap the engine runs to fixpoint,
    /// which always terminates because rules only add statements drawn from a
    /// finite taxonomy.
    pub fn with_pass_limit(mut self, limit: usize) -> Self {
        self.pass_limit = Some(limit);
        self
    }

    /// Runs the rule battery to fixpoint.
    pub fn infer(&self, store: &FactStore) -> Result<InferenceSummary> {
        let initial = store.len()?;
        let mut passes = 0;

        loop {
            if let Some(limit) = self.pass_limit {
                if passes >= limit {
                    return Err(Error::PassLimitExceeded { limit });
                }
            }
            passes += 1;

            let mut added = 0;
            for kind in self.profile.kinds() {
                let n = self.apply(*kind, store)?;
                if n > 0 {
                    trace!("pass {}: {:?} added {}", passes, kind, n);
                }
                added += n;
            }
            debug!("pass {} added {} statements", passes, added);

            if added == 0 {
                break;
            }
        }

        let total = store.len()?;
        Ok(InferenceSummary {
            passes,
            initial,
            added: total - initial,
            total,
        })
    }

    fn apply(&self, kind: RuleKind, store: &FactStore) -> Result<usize> {
        match kind {
            RuleKind::TypeInheritance => self.type_inheritance(store),
            RuleKind::EquivalenceExpansion => self.equivalence_expansion(store),
            RuleKind::TagClassification => self.tag_classification(store),
            RuleKind::TagExpansion => self.tag_expansion(store),
            RuleKind::ImpliedRelations => self.implied_relations(store),
            RuleKind::InverseRelations => self.inverse_relations(store),
            RuleKind::Refinement => self.refinement(store),
        }
    }

    /// A snapshot of all `(x, type, C)` pairs with an entity-valued class.
    fn type_assertions(&self, store: &FactStore) -> Result<Vec<(EntityRef, EntityRef)>> {
        let typed = store.find(&StatementPattern::relation(RelationRef::rdf_type()))?;
        Ok(typed
            .into_iter()
            .filter_map(|st| st.object.as_entity().cloned().map(|c| (st.subject, c)))
            .collect())
    }

    fn type_inheritance(&self, store: &FactStore) -> Result<usize> {
        let mut added = 0;
        for (x, class) in self.type_assertions(store)? {
            for ancestor in self.taxonomy.superclasses_of(&class) {
                if store.add(Statement::typed(x.clone(), ancestor))? {
                    added += 1;
                }
            }
        }
        Ok(added)
    }

    fn equivalence_expansion(&self, store: &FactStore) -> Result<usize> {
        let mut added = 0;
        for (x, class) in self.type_assertions(store)? {
            for member in self.taxonomy.equivalence_group(&class) {
                if member != class && store.add(Statement::typed(x.clone(), member))? {
                    added += 1;
                }
            }
        }
        Ok(added)
    }

    fn tag_classification(&self, store: &FactStore) -> Result<usize> {
        let mut added = 0;
        for subject in store.subjects_with(&RelationRef::has_tag())? {
            let tags: BTreeSet<EntityRef> = store
                .objects_of(&subject, &RelationRef::has_tag())?
                .into_iter()
                .filter_map(|v| v.as_entity().cloned())
                .collect();
            if tags.is_empty() {
                continue;
            }
            if let Some(class) = self.taxonomy.classes_for_tagset(&tags)? {
                if store.add(Statement::typed(subject, class))? {
                    added += 1;
                }
            }
        }
        Ok(added)
    }

    fn tag_expansion(&self, store: &FactStore) -> Result<usize> {
        let mut added = 0;
        for (x, class) in self.type_assertions(store)? {
            for t in self.taxonomy.tags_of(&class) {
                let st = Statement::new(x.clone(), RelationRef::has_tag(), Value::entity(t));
                if store.add(st)? {
                    added += 1;
                }
            }
        }
        Ok(added)
    }

    fn implied_relations(&self, store: &FactStore) -> Result<usize> {
        let mut added = 0;
        for (x, class) in self.type_assertions(store)? {
            for (relation, value) in self.taxonomy.implied_relations(&class) {
                if store.add(Statement::new(x.clone(), relation, value))? {
                    added += 1;
                }
            }
        }
        Ok(added)
    }

    fn inverse_relations(&self, store: &FactStore) -> Result<usize> {
        let mut added = 0;
        // The pair table holds both directions, so one sweep covers them.
        let pairs: Vec<(RelationRef, RelationRef)> = self
            .taxonomy
            .inverse_pairs()
            .map(|(p, q)| (p.clone(), q.clone()))
            .collect();
        for (p, q) in pairs {
            for st in store.find(&StatementPattern::relation(p))? {
                if let Some(y) = st.object.as_entity() {
                    let inverse = Statement::link(y.clone(), q.clone(), st.subject);
                    if store.add(inverse)? {
                        added += 1;
                    }
                }
            }
        }
        Ok(added)
    }

    /// Retypes instances to a direct subclass when the subclass's own
    /// declarations all hold as asserted facts. A subclass declaring nothing
    /// of its own never captures instances this way.
    fn refinement(&self, store: &FactStore) -> Result<usize> {
        let mut added = 0;
        for (x, class) in self.type_assertions(store)? {
            for candidate in self.taxonomy.direct_subclasses_of(&class) {
                let own = self.taxonomy.own_implied_relations(&candidate);
                let requirements = self.taxonomy.requirements_of(&candidate);
                if own.is_empty() && requirements.is_empty() {
                    continue;
                }
                if !self.satisfies(store, &x, &own, &requirements)? {
                    continue;
                }
                if store.add(Statement::typed(x.clone(), candidate))? {
                    added += 1;
                }
            }
        }
        Ok(added)
    }

    fn satisfies(
        &self,
        store: &FactStore,
        x: &EntityRef,
        own: &[(RelationRef, Value)],
        requirements: &[crate::Requirement],
    ) -> Result<bool> {
        for (relation, value) in own {
            let expected = Statement::new(x.clone(), relation.clone(), value.clone());
            if !store.contains(&expected)? {
                return Ok(false);
            }
        }
        for requirement in requirements {
            let crate::Requirement::RelatedToClass { relation, class } = requirement;
            let mut found = false;
            for object in store.objects_of(x, relation)? {
                if let Some(y) = object.as_entity() {
                    if store.contains(&Statement::typed(y.clone(), class.clone()))? {
                        found = true;
                        break;
                    }
                }
            }
            if !found {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hierarchy() -> Taxonomy {
        Taxonomy::builder()
            .class("brick:Equipment")
            .class("brick:HVAC_Equipment")
            .parent("brick:Equipment")
            .class("brick:AHU")
            .parent("brick:HVAC_Equipment")
            .build()
            .unwrap()
    }

    fn store_with(statements: impl IntoIterator<Item = Statement>) -> FactStore {
        let store = FactStore::new();
        store.add_all(statements).unwrap();
        store
    }

    #[test]
    fn test_inheritance_to_fixpoint() {
        let taxonomy = hierarchy();
        let store = store_with([Statement::typed(
            EntityRef::new("bldg:AHU1"),
            EntityRef::new("brick:AHU"),
        )]);

        let summary = InferenceEngine::new(&taxonomy).infer(&store).unwrap();
        assert_eq!(summary.added, 2);
        assert_eq!(summary.total, 3);

        for class in ["brick:HVAC_Equipment", "brick:Equipment"] {
            assert!(store
                .contains(&Statement::typed(
                    EntityRef::new("bldg:AHU1"),
                    EntityRef::new(class),
                ))
                .unwrap());
        }
    }

    #[test]
    fn test_idempotent() {
        let taxonomy = hierarchy();
        let store = store_with([Statement::typed(
            EntityRef::new("bldg:AHU1"),
            EntityRef::new("brick:AHU"),
        )]);

        let engine = InferenceEngine::new(&taxonomy);
        engine.infer(&store).unwrap();
        let len = store.len().unwrap();

        let again = engine.infer(&store).unwrap();
        assert_eq!(again.added, 0);
        assert_eq!(store.len().unwrap(), len);
    }

    #[test]
    fn test_pass_limit_exceeded() {
        let taxonomy = hierarchy();
        let store = store_with([Statement::typed(
            EntityRef::new("bldg:AHU1"),
            EntityRef::new("brick:AHU"),
        )]);

        let err = InferenceEngine::new(&taxonomy)
            .with_pass_limit(1)
            .infer(&store)
            .unwrap_err();
        assert!(matches!(err, Error::PassLimitExceeded { limit: 1 }));
    }

    #[test]
    fn test_pass_limit_generous_enough() {
        let taxonomy = hierarchy();
        let store = store_with([Statement::typed(
            EntityRef::new("bldg:AHU1"),
            EntityRef::new("brick:AHU"),
        )]);

        let summary = InferenceEngine::new(&taxonomy)
            .with_pass_limit(10)
            .infer(&store)
            .unwrap();
        assert!(summary.passes <= 10);
    }

    #[test]
    fn test_profile_restricts_rules() {
        let taxonomy = Taxonomy::builder()
            .class("brick:Sensor")
            .tag("tag:Sensor")
            .build()
            .unwrap();
        let store = store_with([Statement::typed(
            EntityRef::new("bldg:S1"),
            EntityRef::new("brick:Sensor"),
        )]);

        // Inheritance alone never expands tags.
        InferenceEngine::new(&taxonomy)
            .with_profile(RuleProfile::only([RuleKind::TypeInheritance]))
            .infer(&store)
            .unwrap();
        assert_eq!(store.len().unwrap(), 1);

        InferenceEngine::new(&taxonomy)
            .with_profile(RuleProfile::only([RuleKind::TagExpansion]))
            .infer(&store)
            .unwrap();
        assert!(store
            .contains(&Statement::new(
                EntityRef::new("bldg:S1"),
                RelationRef::has_tag(),
                Value::entity(EntityRef::new("tag:Sensor")),
            ))
            .unwrap());
    }

    #[test]
    fn test_inverse_both_directions() {
        let taxonomy = Taxonomy::builder()
            .inverse(RelationRef::has_point(), RelationRef::is_point_of())
            .build()
            .unwrap();
        let store = store_with([Statement::link(
            EntityRef::new("bldg:AHU1"),
            RelationRef::has_point(),
            EntityRef::new("bldg:TS1"),
        )]);

        InferenceEngine::new(&taxonomy).infer(&store).unwrap();
        assert!(store
            .contains(&Statement::link(
                EntityRef::new("bldg:TS1"),
                RelationRef::is_point_of(),
                EntityRef::new("bldg:AHU1"),
            ))
            .unwrap());
        // Exactly the inverse, nothing else.
        assert_eq!(store.len().unwrap(), 2);
    }
}
