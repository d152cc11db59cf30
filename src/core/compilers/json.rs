use anyhow::{Context, Result, bail};
use serde::Serialize;
use serde_json::{Map, Value, ser::PrettyFormatter};

use super::Compile;
use crate::core::collection::{TranslationCollection, TranslationValue};

/// Flat `{ "KEY": "value" }` object. Unset values are written as `null`;
/// reading treats `null` and `""` as unset.
#[derive(Debug, Clone)]
pub struct JsonCompiler {
    indentation: String,
}

impl JsonCompiler {
    pub fn new(indentation: &str) -> Self {
        Self {
            indentation: indentation.to_string(),
        }
    }
}

impl Compile for JsonCompiler {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn compile(&self, collection: &TranslationCollection) -> Result<String> {
        let map: Map<String, Value> = collection
            .iter()
            .map(|(key, value)| (key.to_string(), value_to_json(value)))
            .collect();
        to_json_string(&Value::Object(map), &self.indentation)
    }

    fn parse(&self, contents: &str) -> Result<TranslationCollection> {
        parse_json_collection(contents)
    }
}

pub(super) fn value_to_json(value: &TranslationValue) -> Value {
    value.clone().map_or(Value::Null, Value::String)
}

/// Pretty-print with the given indentation and a trailing newline.
pub(super) fn to_json_string(value: &Value, indentation: &str) -> Result<String> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(indentation.as_bytes());
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value
        .serialize(&mut serializer)
        .context("Failed to serialize JSON")?;

    let mut content = String::from_utf8(buffer).context("Serialized JSON is not UTF-8")?;
    content.push('\n');
    Ok(content)
}

/// Read a flat or nested JSON object. Nested objects are flattened with `.`.
pub(super) fn parse_json_collection(contents: &str) -> Result<TranslationCollection> {
    if contents.trim().is_empty() {
        return Ok(TranslationCollection::new());
    }

    let value: Value = serde_json::from_str(contents).context("Failed to parse JSON")?;
    let Value::Object(map) = value else {
        bail!("Root of JSON file must be an object");
    };

    let mut entries = Vec::new();
    flatten_json(&map, String::new(), &mut entries)?;
    Ok(entries.into_iter().collect())
}

fn flatten_json(
    map: &Map<String, Value>,
    prefix: String,
    entries: &mut Vec<(String, TranslationValue)>,
) -> Result<()> {
    for (key, value) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            Value::Object(inner) => flatten_json(inner, path, entries)?,
            Value::String(s) if s.is_empty() => entries.push((path, None)),
            Value::String(s) => entries.push((path, Some(s.clone()))),
            Value::Null => entries.push((path, None)),
            other => bail!(
                "Unsupported value for key '{}': expected a string, found {}",
                path,
                other
            ),
        }
    }
    Ok(())
}
