#![allow(dead_code)]

//! Insertion-ordered mapping from dimension key to value.
//!
//! Dimension results stream in arbitrary order and the ranked improvement list
//! breaks ties by input order, so a hash map is not enough here.

use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DimensionMap<T> {
    entries: IndexMap<String, T>,
}

impl<T> Default for DimensionMap<T> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<T> DimensionMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the value for `key`.
    /// A replaced key keeps its original position; last write wins.
    pub fn insert(&mut self, key: impl Into<String>, value: T) -> Option<T> {
        self.entries.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Removes `key`, keeping the relative order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<T> {
        self.entries.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    /// Builds a new map with the same keys, in the same order.
    pub fn map_values<U>(&self, mut f: impl FnMut(&T) -> U) -> DimensionMap<U> {
        DimensionMap {
            entries: self.entries.iter().map(|(k, v)| (k.clone(), f(v))).collect(),
        }
    }
}

impl<K: Into<String>, T> FromIterator<(K, T)> for DimensionMap<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        DimensionMap {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_preserves_first_position() {
        let mut map = DimensionMap::new();
        map.insert("skills", 10);
        map.insert("tasks", 20);
        let replaced = map.insert("skills", 30);

        assert_eq!(replaced, Some(10));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["skills", "tasks"]);
        assert_eq!(map.get("skills"), Some(&30));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_remove_and_lookup() {
        let mut map: DimensionMap<i32> = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        assert_eq!(map.remove("a"), Some(1));
        assert!(!map.contains_key("a"));
        assert_eq!(map.remove("missing"), None);
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["b", "c"]);
    }

    #[test]
    fn test_collect_duplicate_keys_last_write_wins() {
        let map: DimensionMap<i32> = [("tasks", 1), ("skills", 2), ("tasks", 3)]
            .into_iter()
            .collect();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["tasks", "skills"]);
        assert_eq!(map.get("tasks"), Some(&3));
    }

    #[test]
    fn test_map_values_keeps_order() {
        let map: DimensionMap<i32> = [("z", 1), ("a", 2)].into_iter().collect();
        let doubled = map.map_values(|v| v * 2);
        assert_eq!(
            doubled.iter().collect::<Vec<_>>(),
            vec![("z", &2), ("a", &4)]
        );
    }

    #[test]
    fn test_serializes_in_insertion_order() {
        let map: DimensionMap<i32> = [("tools", 1), ("abilities", 2)].into_iter().collect();
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"tools":1,"abilities":2}"#);
    }
}
