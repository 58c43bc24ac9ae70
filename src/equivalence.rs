//! Equivalence classes over taxonomy classes.
//!
//! Some vocabularies name the same concept twice (`VAV` and
//! `Variable_Air_Volume_Box`). Declared equivalences are closed under a
//! union-find, and every inference that checks class membership resolves
//! through the canonical representative first.

use crate::EntityRef;
use indexmap::IndexMap;

/// Union-find over class identifiers.
///
/// The canonical representative of a group is its lexicographically smallest
/// member, so the choice is stable across runs and declaration orders.
///
/// # Examples
///
/// ```
/// use lintel::{EntityRef, EquivalenceResolver};
///
/// let mut resolver = EquivalenceResolver::new();
/// resolver.declare(
///     EntityRef::new("brick:VAV"),
///     EntityRef::new("brick:Variable_Air_Volume_Box"),
/// );
///
/// assert_eq!(
///     resolver.canonical(&EntityRef::new("brick:Variable_Air_Volume_Box")),
///     EntityRef::new("brick:VAV"),
/// );
/// ```
#[derive(Debug, Default)]
pub struct EquivalenceResolver {
    ids: IndexMap<EntityRef, usize>,
    parent: Vec<usize>,
    /// Index of the lexicographically smallest member under each root.
    smallest: Vec<usize>,
}

impl EquivalenceResolver {
    /// Creates an empty resolver in which every class is its own group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares two classes equivalent, merging their groups.
    pub fn declare(&mut self, a: EntityRef, b: EntityRef) {
        let ia = self.intern(a);
        let ib = self.intern(b);
        self.union(ia, ib);
    }

    /// Returns the canonical representative of a class's group.
    ///
    /// Classes with no declared equivalences are their own canonical form.
    pub fn canonical(&self, class: &EntityRef) -> EntityRef {
        match self.ids.get(class) {
            Some(&i) => {
                let root = self.find(i);
                self.ids
                    .get_index(self.smallest[root])
                    .map(|(e, _)| e.clone())
                    .unwrap_or_else(|| class.clone())
            }
            None => class.clone(),
        }
    }

    /// Returns every member of a class's group, including the class itself.
    pub fn group(&self, class: &EntityRef) -> Vec<EntityRef> {
        match self.ids.get(class) {
            Some(&i) => {
                let root = self.find(i);
                let mut members: Vec<EntityRef> = self
                    .ids
                    .iter()
                    .filter(|(_, &j)| self.find(j) == root)
                    .map(|(e, _)| e.clone())
                    .collect();
                members.sort();
                members
            }
            None => vec![class.clone()],
        }
    }

    /// Returns `true` if the two classes are in the same group.
    pub fn equivalent(&self, a: &EntityRef, b: &EntityRef) -> bool {
        if a == b {
            return true;
        }
        match (self.ids.get(a), self.ids.get(b)) {
            (Some(&ia), Some(&ib)) => self.find(ia) == self.find(ib),
            _ => false,
        }
    }

    /// The number of classes with at least one declared equivalence.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if no equivalences have been declared.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn intern(&mut self, class: EntityRef) -> usize {
        if let Some(&i) = self.ids.get(&class) {
            return i;
        }
        let i = self.parent.len();
        self.ids.insert(class, i);
        self.parent.push(i);
        self.smallest.push(i);
        i
    }

    fn find(&self, mut i: usize) -> usize {
        while self.parent[i] != i {
            i = self.parent[i];
        }
        i
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        let sa = self.smallest[ra];
        let sb = self.smallest[rb];
        let keep = match (self.ids.get_index(sa), self.ids.get_index(sb)) {
            (Some((ea, _)), Some((eb, _))) if eb < ea => sb,
            _ => sa,
        };
        self.parent[rb] = ra;
        self.smallest[ra] = keep;
    }
}
