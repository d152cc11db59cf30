//! Ordered, deduplicating table of translation keys.
//!
//! A [`TranslationCollection`] maps each key to an optional value. Every
//! operation takes `&self` and returns a fresh collection, so a collection
//! handed out by a parser can be shared freely between threads.

use std::collections::{HashMap, HashSet};

/// A translation value. `None` means "not translated yet".
pub type TranslationValue = Option<String>;

#[derive(Debug, Clone, Default)]
pub struct TranslationCollection {
    entries: Vec<(String, TranslationValue)>,
    index: HashMap<String, usize>,
}

impl PartialEq for TranslationCollection {
    /// Two collections are equal when they hold the same entries in the same order.
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for TranslationCollection {}

impl TranslationCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a collection containing `key`, mapped to `None` if it was absent.
    pub fn add_key(&self, key: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.insert_key(key.into());
        next
    }

    /// Adds every key in order. Keys already present keep their value and position.
    pub fn add_keys<I, S>(&self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut next = self.clone();
        for key in keys {
            next.insert_key(key.into());
        }
        next
    }

    /// Sets the value of `key`, inserting the key at the end if needed.
    pub fn add_value(&self, key: impl Into<String>, value: TranslationValue) -> Self {
        let mut next = self.clone();
        next.set(key.into(), value);
        next
    }

    /// Union of both collections.
    ///
    /// Keys of `self` come first, followed by keys only found in `other`.
    /// On conflict the first non-null value wins: a `None` never replaces a
    /// value, and a value only replaces a `None`.
    pub fn merge(&self, other: &TranslationCollection) -> Self {
        let mut next = self.clone();
        for (key, value) in &other.entries {
            match next.index.get(key) {
                Some(&i) => {
                    if next.entries[i].1.is_none() && value.is_some() {
                        next.entries[i].1 = value.clone();
                    }
                }
                None => next.push(key.clone(), value.clone()),
            }
        }
        next
    }

    /// Returns a collection without the given keys.
    pub fn remove_keys<I, S>(&self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let removed: HashSet<String> = keys.into_iter().map(|k| k.as_ref().to_string()).collect();
        self.filter(|key, _| !removed.contains(key))
    }

    /// Keeps only the keys that are also present in `other`. Values come from `self`.
    pub fn intersect(&self, other: &TranslationCollection) -> Self {
        self.filter(|key, _| other.contains_key(key))
    }

    /// Keeps the entries for which `predicate` returns true.
    pub fn filter(&self, mut predicate: impl FnMut(&str, &TranslationValue) -> bool) -> Self {
        self.entries
            .iter()
            .filter(|(key, value)| predicate(key, value))
            .cloned()
            .collect()
    }

    /// Replaces every value with the result of `f`, keeping key order.
    pub fn map_values(&self, mut f: impl FnMut(&str, &TranslationValue) -> TranslationValue) -> Self {
        self.entries
            .iter()
            .map(|(key, value)| (key.clone(), f(key, value)))
            .collect()
    }

    /// Returns a copy ordered by key, comparing keys byte-wise.
    pub fn sorted(&self) -> Self {
        let mut entries = self.entries.clone();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        entries.into_iter().collect()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TranslationValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn for_each(&self, mut f: impl FnMut(&str, &TranslationValue)) {
        for (key, value) in &self.entries {
            f(key, value);
        }
    }

    /// Looks up a key. The outer `Option` tells whether the key exists.
    pub fn get(&self, key: &str) -> Option<&TranslationValue> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert_key(&mut self, key: String) {
        if !self.index.contains_key(&key) {
            self.push(key, None);
        }
    }

    fn set(&mut self, key: String, value: TranslationValue) {
        match self.index.get(&key) {
            Some(&i) => self.entries[i].1 = value,
            None => self.push(key, value),
        }
    }

    fn push(&mut self, key: String, value: TranslationValue) {
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
    }
}

impl FromIterator<(String, TranslationValue)> for TranslationCollection {
    /// Later duplicates overwrite earlier values but keep the first position.
    fn from_iter<T: IntoIterator<Item = (String, TranslationValue)>>(iter: T) -> Self {
        let mut collection = Self::new();
        for (key, value) in iter {
            collection.set(key, value);
        }
        collection
    }
}

impl FromIterator<String> for TranslationCollection {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self::new().add_keys(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn collection(entries: &[(&str, Option<&str>)]) -> TranslationCollection {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
            .collect()
    }

    #[test]
    fn test_add_key_is_unique() {
        let c = TranslationCollection::new()
            .add_key("a")
            .add_key("b")
            .add_key("a")
            .add_keys(["b", "c", "a"]);

        assert_eq!(c.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_add_key_keeps_existing_value() {
        let c = collection(&[("a", Some("x"))]).add_key("a");
        assert_eq!(c.get("a"), Some(&Some("x".to_string())));
    }

    #[test]
    fn test_mutators_leave_original_untouched() {
        let original = collection(&[("a", None)]);
        let _ = original.add_key("b");
        let _ = original.add_value("a", Some("x".into()));
        let _ = original.remove_keys(["a"]);
        let _ = original.merge(&collection(&[("c", Some("y"))]));

        assert_eq!(original, collection(&[("a", None)]));
    }

    #[test]
    fn test_add_value_overwrites_only_target() {
        let c = collection(&[("a", Some("1")), ("b", None)]).add_value("b", Some("2".into()));
        assert_eq!(c, collection(&[("a", Some("1")), ("b", Some("2"))]));
    }

    #[test]
    fn test_merge_null_never_overwrites() {
        let a = collection(&[("k", None)]);
        let b = collection(&[("k", Some("v"))]);

        assert_eq!(a.merge(&b), collection(&[("k", Some("v"))]));
        assert_eq!(b.merge(&a), collection(&[("k", Some("v"))]));
    }

    #[test]
    fn test_merge_first_non_null_wins() {
        let a = collection(&[("k", Some("v1"))]);
        let b = collection(&[("k", Some("v2"))]);

        assert_eq!(a.merge(&b), collection(&[("k", Some("v1"))]));
        assert_eq!(b.merge(&a), collection(&[("k", Some("v2"))]));
    }

    #[test]
    fn test_merge_preserves_order() {
        let a = collection(&[("b", None), ("a", None)]);
        let b = collection(&[("c", None), ("a", Some("x")), ("d", None)]);

        assert_eq!(
            a.merge(&b).keys().collect::<Vec<_>>(),
            vec!["b", "a", "c", "d"]
        );
    }

    #[test]
    fn test_remove_keys() {
        let c = collection(&[("a", None), ("b", Some("x")), ("c", None)]).remove_keys(["b", "z"]);

        assert_eq!(c, collection(&[("a", None), ("c", None)]));
        assert!(!c.contains_key("b"));
        assert_eq!(c.get("c"), Some(&None));
    }

    #[test]
    fn test_intersect_keeps_own_values() {
        let c = collection(&[("old", Some("x")), ("new", Some("y"))]);
        let fresh = collection(&[("new", None)]);

        assert_eq!(c.intersect(&fresh), collection(&[("new", Some("y"))]));
    }

    #[test]
    fn test_sorted_is_bytewise() {
        let c = collection(&[("b", None), ("B", None), ("a", None), ("_", None)]).sorted();
        assert_eq!(c.keys().collect::<Vec<_>>(), vec!["B", "_", "a", "b"]);
    }

    #[test]
    fn test_map_values() {
        let c = collection(&[("a", None), ("b", Some("x"))])
            .map_values(|key, value| value.clone().or_else(|| Some(key.to_uppercase())));

        assert_eq!(c, collection(&[("a", Some("A")), ("b", Some("x"))]));
    }

    #[test]
    fn test_for_each_visits_in_order() {
        let c = collection(&[("z", None), ("y", Some("1"))]);
        let mut seen = Vec::new();
        c.for_each(|key, value| seen.push(format!("{}={:?}", key, value)));

        assert_eq!(seen, vec!["z=None", "y=Some(\"1\")"]);
    }
}
