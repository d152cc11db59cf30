use anyhow::{Result, bail};
use serde_json::{Map, Value};

use super::Compile;
use super::json::{parse_json_collection, to_json_string, value_to_json};
use crate::core::collection::TranslationCollection;

/// Keys split on `.` into nested objects: `HOME.TITLE` becomes
/// `{ "HOME": { "TITLE": null } }`.
#[derive(Debug, Clone)]
pub struct NamespacedJsonCompiler {
    indentation: String,
}

impl NamespacedJsonCompiler {
    pub fn new(indentation: &str) -> Self {
        Self {
            indentation: indentation.to_string(),
        }
    }
}

impl Compile for NamespacedJsonCompiler {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn compile(&self, collection: &TranslationCollection) -> Result<String> {
        if let Some((key, namespace)) = namespace_conflict(collection) {
            bail!(
                "Key '{}' conflicts with '{}': a key can't hold both a value and nested keys",
                key,
                namespace
            );
        }

        let mut root = Map::new();
        for (key, value) in collection.iter() {
            let parts: Vec<&str> = key.split('.').collect();
            insert_nested(&mut root, &parts, value_to_json(value));
        }
        to_json_string(&Value::Object(root), &self.indentation)
    }

    fn parse(&self, contents: &str) -> Result<TranslationCollection> {
        parse_json_collection(contents)
    }
}

/// A key that is also the namespace of another key, e.g. `A` for `A.B`.
fn namespace_conflict(collection: &TranslationCollection) -> Option<(String, String)> {
    collection.keys().find_map(|key| {
        key.match_indices('.')
            .map(|(index, _)| &key[..index])
            .find(|namespace| collection.contains_key(namespace))
            .map(|namespace| (key.to_string(), namespace.to_string()))
    })
}

/// Insert a value at a nested path, creating intermediate objects as needed.
fn insert_nested(root: &mut Map<String, Value>, path: &[&str], value: Value) {
    match path {
        [] => {}
        [key] => {
            root.insert(key.to_string(), value);
        }
        [key, rest @ ..] => {
            let next_level = root
                .entry(key.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(inner) = next_level {
                insert_nested(inner, rest, value);
            }
        }
    }
}
