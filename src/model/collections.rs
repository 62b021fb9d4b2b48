//! Insertion-ordered collections backing the correlation model.
//!
//! Report output must be deterministic, so every relation remembers the
//! order in which keys and values were first seen. Lookups stay O(1).

use std::collections::HashMap;

/// A set of strings iterated in first-insertion order.
#[derive(Debug, Clone, Default)]
pub struct OrderedSet {
    items: Vec<String>,
    ranks: HashMap<String, u64>,
    next_rank: u64,
}

impl OrderedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `value`; returns false if it was already present.
    pub fn insert(&mut self, value: &str) -> bool {
        if self.ranks.contains_key(value) {
            return false;
        }
        self.ranks.insert(value.to_string(), self.next_rank);
        self.next_rank += 1;
        self.items.push(value.to_string());
        true
    }

    pub fn remove(&mut self, value: &str) -> bool {
        if self.ranks.remove(value).is_none() {
            return false;
        }
        self.items.retain(|item| item != value);
        true
    }

    pub fn contains(&self, value: &str) -> bool {
        self.ranks.contains_key(value)
    }

    /// Position key of `value` in iteration order. Ranks stay stable across removals.
    pub fn rank(&self, value: &str) -> Option<u64> {
        self.ranks.get(value).copied()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn first(&self) -> Option<&str> {
        self.items.first().map(String::as_str)
    }
}

/// A string-keyed map iterated in first-insertion order.
#[derive(Debug, Clone)]
pub struct OrderedMap<V> {
    keys: Vec<String>,
    entries: HashMap<String, V>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            entries: HashMap::new(),
        }
    }
}

impl<V> OrderedMap<V> {
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        let value = self.entries.remove(key)?;
        self.keys.retain(|k| k != key);
        Some(value)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.keys
            .iter()
            .filter_map(|k| self.entries.get(k).map(|v| (k.as_str(), v)))
    }
}

impl<V: Default> OrderedMap<V> {
    /// The single get-or-create entry point for nested relations.
    pub fn entry_or_default(&mut self, key: &str) -> &mut V {
        if !self.entries.contains_key(key) {
            self.keys.push(key.to_string());
        }
        self.entries.entry(key.to_string()).or_default()
    }
}

/// `key -> {values}`, e.g. component id to its simpledoc ids.
pub type Relation = OrderedMap<OrderedSet>;

impl Relation {
    /// Adds `value` under `key`, creating the key if needed.
    pub fn put(&mut self, key: &str, value: &str) -> bool {
        self.entry_or_default(key).insert(value)
    }

    pub fn values_of(&self, key: &str) -> Option<&OrderedSet> {
        self.get(key)
    }
}

/// `component -> description -> {values}` for one transition kind.
pub type TransitionTable = OrderedMap<Relation>;

impl TransitionTable {
    pub fn record(&mut self, component: &str, description: &str, value: &str) -> bool {
        self.entry_or_default(component).put(description, value)
    }

    /// Number of distinct descriptions across every component.
    pub fn description_count(&self) -> usize {
        self.iter().map(|(_, relation)| relation.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_set_keeps_first_insertion_order() {
        let mut set = OrderedSet::new();
        assert!(set.insert("b"));
        assert!(set.insert("a"));
        assert!(!set.insert("b"));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(set.first(), Some("b"));
    }

    #[test]
    fn ranks_survive_removal() {
        let mut set = OrderedSet::new();
        set.insert("x");
        set.insert("y");
        set.insert("z");
        assert!(set.remove("y"));
        assert!(!set.remove("y"));
        assert!(set.rank("x") < set.rank("z"));
        assert_eq!(set.rank("y"), None);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn relation_creates_keys_lazily_in_order() {
        let mut rel = Relation::default();
        rel.put("kw2", "simpledoc_1");
        rel.put("kw1", "simpledoc_2");
        rel.put("kw2", "simpledoc_3");
        let keys: Vec<_> = rel.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["kw2", "kw1"]);
        assert_eq!(rel.values_of("kw2").map(OrderedSet::len), Some(2));

        assert!(rel.remove("kw2").is_some());
        assert_eq!(rel.iter().count(), 1);
    }

    #[test]
    fn transition_table_counts_descriptions() {
        let mut table = TransitionTable::default();
        table.record("kw1", "a to b", "simpledoc_1 -> simpledoc_2");
        table.record("kw1", "a to b", "simpledoc_3 -> simpledoc_4");
        table.record("kw1", "c to d", "simpledoc_5 -> simpledoc_6");
        table.record("kw2", "e to f", "simpledoc_7 -> simpledoc_8");
        assert_eq!(table.len(), 2);
        assert_eq!(table.description_count(), 3);
    }
}
