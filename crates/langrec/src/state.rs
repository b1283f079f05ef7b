//! State identifiers, bitset-backed state sets, and the name registry.

use fixedbitset::FixedBitSet;
use indexmap::IndexMap;
use std::fmt;

/// A state identifier represented as a u32.
pub type StateId = u32;

/// A set of states implemented using a fixed-size bit set for efficiency.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StateSet {
    bits: FixedBitSet,
}

impl StateSet {
    /// Create a new empty state set with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: FixedBitSet::with_capacity(capacity),
        }
    }

    /// Create a state set containing a single state.
    pub fn singleton(state: StateId, capacity: usize) -> Self {
        let mut set = Self::with_capacity(capacity);
        set.insert(state);
        set
    }

    /// Insert a state into the set.
    pub fn insert(&mut self, state: StateId) {
        let idx = state as usize;
        if idx >= self.bits.len() {
            self.bits.grow(idx + 1);
        }
        self.bits.insert(idx);
    }

    /// Check if the set contains a state.
    pub fn contains(&self, state: StateId) -> bool {
        let idx = state as usize;
        idx < self.bits.len() && self.bits.contains(idx)
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.bits.is_clear()
    }

    /// Get the number of states in the set.
    pub fn len(&self) -> usize {
        self.bits.count_ones(..)
    }

    /// Iterate over all states in the set in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = StateId> + '_ {
        self.bits.ones().map(|i| i as StateId)
    }

    /// Union this set with another, modifying self in place.
    pub fn union_with(&mut self, other: &StateSet) {
        if other.bits.len() > self.bits.len() {
            self.bits.grow(other.bits.len());
        }
        self.bits.union_with(&other.bits);
    }

    /// Check if this set intersects with another.
    pub fn intersects(&self, other: &StateSet) -> bool {
        self.bits.intersection(&other.bits).next().is_some()
    }

    /// The members as a sorted vec, usable as a canonical hash key.
    pub fn to_vec(&self) -> Vec<StateId> {
        self.iter().collect()
    }
}

impl fmt::Debug for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<StateId> for StateSet {
    fn from_iter<I: IntoIterator<Item = StateId>>(iter: I) -> Self {
        let items: Vec<StateId> = iter.into_iter().collect();
        let capacity = items.iter().copied().max().map_or(0, |m| m as usize + 1);
        let mut set = Self::with_capacity(capacity);
        for state in items {
            set.insert(state);
        }
        set
    }
}

/// Interns state names to dense [`StateId`]s.
///
/// Insertion order is preserved, so ids are assigned 0, 1, 2, ... in
/// registration order. Every automaton owns one registry; transitions and
/// accept/reject sets may only reference registered states.
#[derive(Debug, Clone, Default)]
pub struct StateRegistry {
    names: IndexMap<String, StateId>,
}

impl StateRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a state name, returning its id. Re-registering an existing
    /// name returns the original id.
    pub fn insert(&mut self, name: &str) -> StateId {
        if let Some(&id) = self.names.get(name) {
            return id;
        }
        let id = self.names.len() as StateId;
        self.names.insert(name.to_owned(), id);
        id
    }

    /// Look up the id of a registered name.
    pub fn resolve(&self, name: &str) -> Option<StateId> {
        self.names.get(name).copied()
    }

    /// The name behind an id.
    ///
    /// # Panics
    ///
    /// Panics if the id was not produced by this registry.
    pub fn name(&self, id: StateId) -> &str {
        self.names
            .get_index(id as usize)
            .map(|(name, _)| name.as_str())
            .unwrap_or_else(|| panic!("state id {id} is not registered"))
    }

    /// Check whether a name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// The number of registered states.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate over (id, name) pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (StateId, &str)> + '_ {
        self.names
            .iter()
            .map(|(name, &id)| (id, name.as_str()))
    }

    /// Canonical display name for a set of states: member names sorted and
    /// joined, e.g. `{q0,q1}`. Structurally identical sets always map to the
    /// same string, which is what makes subset-construction de-duplication
    /// work. The empty set renders as `Ø`.
    pub fn canonical_name(&self, set: &StateSet) -> String {
        if set.is_empty() {
            return "Ø".to_owned();
        }
        let mut members: Vec<&str> = set.iter().map(|id| self.name(id)).collect();
        members.sort_unstable();
        format!("{{{}}}", members.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_set_basic() {
        let mut set = StateSet::with_capacity(10);
        assert!(set.is_empty());

        set.insert(3);
        set.insert(7);
        assert!(!set.is_empty());
        assert_eq!(set.len(), 2);
        assert!(set.contains(3));
        assert!(set.contains(7));
        assert!(!set.contains(5));
    }

    #[test]
    fn test_state_set_union() {
        let mut set1 = StateSet::with_capacity(10);
        set1.insert(1);
        set1.insert(3);

        let mut set2 = StateSet::with_capacity(10);
        set2.insert(2);
        set2.insert(3);

        set1.union_with(&set2);
        assert_eq!(set1.len(), 3);
        assert!(set1.contains(1));
        assert!(set1.contains(2));
        assert!(set1.contains(3));
    }

    #[test]
    fn test_state_set_intersects() {
        let set1: StateSet = [1, 3, 5].into_iter().collect();
        let set2: StateSet = [2, 4].into_iter().collect();
        let set3: StateSet = [4, 5].into_iter().collect();

        assert!(!set1.intersects(&set2));
        assert!(set1.intersects(&set3));
        assert!(set2.intersects(&set3));
    }

    #[test]
    fn test_registry_interning() {
        let mut reg = StateRegistry::new();
        let q0 = reg.insert("q0");
        let q1 = reg.insert("q1");
        assert_eq!(q0, 0);
        assert_eq!(q1, 1);
        assert_eq!(reg.insert("q0"), q0);
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.name(q1), "q1");
        assert_eq!(reg.resolve("q1"), Some(q1));
        assert_eq!(reg.resolve("q9"), None);
    }

    #[test]
    fn test_canonical_name_sorted() {
        let mut reg = StateRegistry::new();
        let q2 = reg.insert("q2");
        let q0 = reg.insert("q0");
        let q1 = reg.insert("q1");

        let set: StateSet = [q2, q0, q1].into_iter().collect();
        assert_eq!(reg.canonical_name(&set), "{q0,q1,q2}");

        let empty = StateSet::with_capacity(4);
        assert_eq!(reg.canonical_name(&empty), "Ø");
    }
}
