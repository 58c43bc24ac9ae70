//! The class taxonomy: hierarchy, tags, implied relations, equivalences.
//!
//! A `Taxonomy` is built once from class declarations and is immutable
//! afterwards. Build time is where configuration errors surface: hierarchy
//! cycles, duplicate class declarations, and colliding tag vocabularies are
//! all rejected before any inference can run against the taxonomy.

use crate::{EntityRef, EquivalenceResolver, Error, RelationRef, Result, Value};
use indexmap::IndexMap;
use std::collections::{BTreeMap, BTreeSet};

/// A condition a subclass imposes beyond its implied relations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// The instance must be related through `relation` to some entity typed
    /// as `class`.
    RelatedToClass {
        relation: RelationRef,
        class: EntityRef,
    },
}

/// A single class declaration.
#[derive(Debug, Clone, Default)]
pub struct ClassDef {
    parents: Vec<EntityRef>,
    tags: BTreeSet<EntityRef>,
    implied: Vec<(RelationRef, Value)>,
    requirements: Vec<Requirement>,
    equivalents: Vec<EntityRef>,
}

/// An entry in the tag-resolution table: a tag set and the class it names.
#[derive(Debug, Clone)]
pub struct TagRule {
    /// The full (inherited) tag set of the class.
    pub tags: BTreeSet<EntityRef>,
    /// The class the tag set resolves to.
    pub class: EntityRef,
}

/// Builds a [`Taxonomy`] from fluent class declarations.
///
/// # Examples
///
/// ```
/// use lintel::Taxonomy;
///
/// let taxonomy = Taxonomy::builder()
///     .class("brick:Equipment")
///     .class("brick:Meter")
///     .parent("brick:Equipment")
///     .tag("tag:Meter")
///     .build()
///     .unwrap();
///
/// assert!(taxonomy
///     .superclasses_of(&"brick:Meter".into())
///     .contains(&"brick:Equipment".into()));
/// ```
#[derive(Debug, Default)]
pub struct TaxonomyBuilder {
    classes: IndexMap<EntityRef, ClassDef>,
    inverses: Vec<(RelationRef, RelationRef)>,
    current: Option<(EntityRef, ClassDef)>,
    duplicate: Option<EntityRef>,
}

impl TaxonomyBuilder {
    /// Opens a new class declaration; subsequent `parent`/`tag`/`implies`/
    /// `requires_related`/`equivalent_to` calls apply to it until the next
    /// `class` call.
    pub fn class(mut self, id: impl Into<EntityRef>) -> Self {
        self.commit_current();
        let id = id.into();
        if self.classes.contains_key(&id) {
            self.duplicate.get_or_insert(id.clone());
        }
        self.current = Some((id, ClassDef::default()));
        self
    }

    /// Declares a direct superclass of the current class.
    pub fn parent(mut self, parent: impl Into<EntityRef>) -> Self {
        if let Some((_, def)) = self.current.as_mut() {
            def.parents.push(parent.into());
        }
        self
    }

    /// Adds a tag to the current class's own tag set.
    pub fn tag(mut self, tag: impl Into<EntityRef>) -> Self {
        if let Some((_, def)) = self.current.as_mut() {
            def.tags.insert(tag.into());
        }
        self
    }

    /// Declares a relation every instance of the current class carries.
    pub fn implies(mut self, relation: RelationRef, value: impl Into<Value>) -> Self {
        if let Some((_, def)) = self.current.as_mut() {
            def.implied.push((relation, value.into()));
        }
        self
    }

    /// Requires instances to be related to some entity of the given class.
    pub fn requires_related(mut self, relation: RelationRef, class: impl Into<EntityRef>) -> Self {
        if let Some((_, def)) = self.current.as_mut() {
            def.requirements.push(Requirement::RelatedToClass {
                relation,
                class: class.into(),
            });
        }
        self
    }

    /// Declares the current class equivalent to another.
    pub fn equivalent_to(mut self, other: impl Into<EntityRef>) -> Self {
        if let Some((_, def)) = self.current.as_mut() {
            def.equivalents.push(other.into());
        }
        self
    }

    /// Declares an inverse relation pair, applying in both directions.
    pub fn inverse(mut self, p: RelationRef, q: RelationRef) -> Self {
        self.commit_current();
        self.inverses.push((p, q));
        self
    }

    /// Validates the declarations and produces an immutable [`Taxonomy`].
    ///
    /// # Errors
    ///
    /// - [`Error::DuplicateClass`] if a class was declared twice.
    /// - [`Error::CyclicHierarchy`] if the parent edges contain a cycle.
    /// - [`Error::AmbiguousTagSet`] if two non-equivalent classes end up with
    ///   the identical effective tag set.
    pub fn build(mut self) -> Result<Taxonomy> {
        self.commit_current();
        if let Some(dup) = self.duplicate {
            return Err(Error::DuplicateClass(dup.as_str().to_string()));
        }

        // Equivalence closure first: tag and subclass bookkeeping resolve
        // through canonical representatives.
        let mut equivalences = EquivalenceResolver::new();
        for (id, def) in &self.classes {
            for other in &def.equivalents {
                equivalences.declare(id.clone(), other.clone());
            }
        }

        Self::check_acyclic(&self.classes)?;

        let ancestors = Self::close_ancestors(&self.classes);

        let mut children: BTreeMap<EntityRef, BTreeSet<EntityRef>> = BTreeMap::new();
        for (id, def) in &self.classes {
            for parent in &def.parents {
                children
                    .entry(equivalences.canonical(parent))
                    .or_default()
                    .insert(id.clone());
            }
        }

        let tag_rules = Self::build_tag_rules(&self.classes, &ancestors, &equivalences)?;

        let mut inverse_of: BTreeMap<RelationRef, RelationRef> = BTreeMap::new();
        for (p, q) in &self.inverses {
            inverse_of.insert(p.clone(), q.clone());
            inverse_of.insert(q.clone(), p.clone());
        }

        Ok(Taxonomy {
            classes: self.classes,
            ancestors,
            children,
            tag_rules,
            inverse_of,
            equivalences,
        })
    }

    fn commit_current(&mut self) {
        if let Some((id, def)) = self.current.take() {
            // First declaration wins; the duplicate is reported at build.
            self.classes.entry(id).or_insert(def);
        }
    }

    fn check_acyclic(classes: &IndexMap<EntityRef, ClassDef>) -> Result<()> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            InProgress,
            Done,
        }

        fn visit(
            class: &EntityRef,
            classes: &IndexMap<EntityRef, ClassDef>,
            marks: &mut BTreeMap<EntityRef, Mark>,
        ) -> Result<()> {
            match marks.get(class) {
                Some(Mark::Done) => return Ok(()),
                Some(Mark::InProgress) => {
                    return Err(Error::CyclicHierarchy(class.as_str().to_string()));
                }
                None => {}
            }
            marks.insert(class.clone(), Mark::InProgress);
            if let Some(def) = classes.get(class) {
                for parent in &def.parents {
                    visit(parent, classes, marks)?;
                }
            }
            marks.insert(class.clone(), Mark::Done);
            Ok(())
        }

        let mut marks = BTreeMap::new();
        for class in classes.keys() {
            visit(class, classes, &mut marks)?;
        }
        Ok(())
    }

    /// Reflexive-transitive closure over parent edges, cached flat per class.
    fn close_ancestors(
        classes: &IndexMap<EntityRef, ClassDef>,
    ) -> BTreeMap<EntityRef, BTreeSet<EntityRef>> {
        fn collect(
            class: &EntityRef,
            classes: &IndexMap<EntityRef, ClassDef>,
            cache: &mut BTreeMap<EntityRef, BTreeSet<EntityRef>>,
        ) -> BTreeSet<EntityRef> {
            if let Some(done) = cache.get(class) {
                return done.clone();
            }
            let mut set = BTreeSet::new();
            set.insert(class.clone());
            if let Some(def) = classes.get(class) {
                for parent in &def.parents {
                    set.extend(collect(parent, classes, cache));
                }
            }
            cache.insert(class.clone(), set.clone());
            set
        }

        let mut cache = BTreeMap::new();
        for class in classes.keys() {
            collect(class, classes, &mut cache);
        }
        cache
    }

    fn build_tag_rules(
        classes: &IndexMap<EntityRef, ClassDef>,
        ancestors: &BTreeMap<EntityRef, BTreeSet<EntityRef>>,
        equivalences: &EquivalenceResolver,
    ) -> Result<Vec<TagRule>> {
        // Effective tag set: own tags plus everything inherited.
        let mut by_set: BTreeMap<BTreeSet<EntityRef>, EntityRef> = BTreeMap::new();
        for class in classes.keys() {
            let canonical = equivalences.canonical(class);
            let mut tags = BTreeSet::new();
            if let Some(chain) = ancestors.get(class) {
                for ancestor in chain {
                    if let Some(def) = classes.get(ancestor) {
                        tags.extend(def.tags.iter().cloned());
                    }
                }
            }
            if tags.is_empty() {
                continue;
            }
            if let Some(existing) = by_set.get(&tags) {
                // Equivalent classes legitimately share a tag set.
                if *existing != canonical {
                    return Err(Error::AmbiguousTagSet(format!(
                        "{} and {} declare the same tag set",
                        existing.as_str(),
                        class.as_str()
                    )));
                }
                continue;
            }
            by_set.insert(tags, canonical);
        }

        let mut rules: Vec<TagRule> = by_set
            .into_iter()
            .map(|(tags, class)| TagRule { tags, class })
            .collect();
        // Most specific first.
        rules.sort_by(|a, b| b.tags.len().cmp(&a.tags.len()));
        Ok(rules)
    }
}

/// An immutable class taxonomy with precomputed lookups.
///
/// All lookups are open world: an unknown class simply has no superclasses,
/// no tags, and no subclasses.
#[derive(Debug)]
pub struct Taxonomy {
    classes: IndexMap<EntityRef, ClassDef>,
    /// Reflexive-transitive ancestor sets.
    ancestors: BTreeMap<EntityRef, BTreeSet<EntityRef>>,
    /// Direct subclasses, keyed by canonical parent.
    children: BTreeMap<EntityRef, BTreeSet<EntityRef>>,
    /// Tag-resolution table, most specific (largest set) first.
    tag_rules: Vec<TagRule>,
    inverse_of: BTreeMap<RelationRef, RelationRef>,
    equivalences: EquivalenceResolver,
}

impl Taxonomy {
    /// Starts a fluent builder.
    pub fn builder() -> TaxonomyBuilder {
        TaxonomyBuilder::default()
    }

    /// Returns `true` if the class was declared.
    pub fn contains_class(&self, class: &EntityRef) -> bool {
        self.classes.contains_key(class)
    }

    /// The declared classes, in declaration order.
    pub fn classes(&self) -> impl Iterator<Item = &EntityRef> {
        self.classes.keys()
    }

    /// The strict superclasses of a class (ancestors, excluding the class).
    pub fn superclasses_of(&self, class: &EntityRef) -> Vec<EntityRef> {
        self.ancestors
            .get(class)
            .map(|set| set.iter().filter(|c| *c != class).cloned().collect())
            .unwrap_or_default()
    }

    /// Returns `true` if `sub` is `sup` or a descendant of it.
    pub fn is_subclass_of(&self, sub: &EntityRef, sup: &EntityRef) -> bool {
        self.ancestors
            .get(sub)
            .map(|set| set.contains(sup))
            .unwrap_or(sub == sup)
    }

    /// The direct subclasses of a class.
    pub fn direct_subclasses_of(&self, class: &EntityRef) -> Vec<EntityRef> {
        self.children
            .get(&self.canonical(class))
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Implied relations of a class and all of its ancestors, deduplicated.
    pub fn implied_relations(&self, class: &EntityRef) -> Vec<(RelationRef, Value)> {
        let mut out = Vec::new();
        let chain = match self.ancestors.get(class) {
            Some(chain) => chain,
            None => return out,
        };
        for ancestor in chain {
            if let Some(def) = self.classes.get(ancestor) {
                for pair in &def.implied {
                    if !out.contains(pair) {
                        out.push(pair.clone());
                    }
                }
            }
        }
        out
    }

    /// Only the relations the class itself declares, not inherited ones.
    pub fn own_implied_relations(&self, class: &EntityRef) -> Vec<(RelationRef, Value)> {
        self.classes
            .get(class)
            .map(|def| def.implied.clone())
            .unwrap_or_default()
    }

    /// The requirements the class itself declares.
    pub fn requirements_of(&self, class: &EntityRef) -> Vec<Requirement> {
        self.classes
            .get(class)
            .map(|def| def.requirements.clone())
            .unwrap_or_default()
    }

    /// The effective tag set of a class: own tags plus inherited ones.
    pub fn tags_of(&self, class: &EntityRef) -> BTreeSet<EntityRef> {
        let mut tags = BTreeSet::new();
        if let Some(chain) = self.ancestors.get(class) {
            for ancestor in chain {
                if let Some(def) = self.classes.get(ancestor) {
                    tags.extend(def.tags.iter().cloned());
                }
            }
        }
        tags
    }

    /// Resolves a tag set to the most specific class whose tag set it covers.
    ///
    /// Returns `Ok(None)` when no rule matches. The winner must dominate:
    /// every other matching rule's tag set has to be a subset of the
    /// winner's. A match that is neither a subset nor a superset of the
    /// winner means the vocabulary cannot decide, which is a configuration
    /// error.
    pub fn classes_for_tagset(&self, tags: &BTreeSet<EntityRef>) -> Result<Option<EntityRef>> {
        let matching: Vec<&TagRule> = self
            .tag_rules
            .iter()
            .filter(|rule| rule.tags.is_subset(tags))
            .collect();
        // Rules are sorted largest-first, so the head is a maximal match.
        let best = match matching.first() {
            Some(best) => best,
            None => return Ok(None),
        };
        for other in &matching[1..] {
            if other.class != best.class && !other.tags.is_subset(&best.tags) {
                return Err(Error::AmbiguousTagSet(format!(
                    "tag set matches both {} and {}",
                    best.class.as_str(),
                    other.class.as_str()
                )));
            }
        }
        Ok(Some(best.class.clone()))
    }

    /// The declared inverse of a relation, in either direction.
    pub fn inverse_of(&self, relation: &RelationRef) -> Option<RelationRef> {
        self.inverse_of.get(relation).cloned()
    }

    /// The declared inverse pairs.
    pub fn inverse_pairs(&self) -> impl Iterator<Item = (&RelationRef, &RelationRef)> {
        self.inverse_of.iter()
    }

    /// The canonical representative of a class's equivalence group.
    pub fn canonical(&self, class: &EntityRef) -> EntityRef {
        self.equivalences.canonical(class)
    }

    /// Every member of a class's equivalence group, including itself.
    pub fn equivalence_group(&self, class: &EntityRef) -> Vec<EntityRef> {
        self.equivalences.group(class)
    }
}
