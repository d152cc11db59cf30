use anyhow::Result;

use super::{Extract, ExtractOptions};
use crate::core::collection::TranslationCollection;
use crate::core::source::ParsedFile;
use crate::core::template::TemplateElement;

const DIRECTIVE_NAMES: &[&str] = &["translate", "ng2-translate"];

/// Finds keys supplied through the translate directive:
///
/// - `<p translate="KEY"></p>`: the attribute value
/// - `<p [translate]="'KEY'"></p>`: a quoted literal in the binding
/// - `<p translate>KEY</p>`: each direct text child
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectiveParser;

impl DirectiveParser {
    fn keys_of(element: &TemplateElement) -> Vec<String> {
        let plain = DIRECTIVE_NAMES
            .iter()
            .find_map(|name| element.attribute(name));
        if let Some(value) = plain.and_then(|attr| attr.value.as_deref())
            && !value.trim().is_empty()
        {
            // `translate="{{ expr }}"` is dynamic.
            if value.contains("{{") {
                return Vec::new();
            }
            return vec![value.to_string()];
        }

        let bound = DIRECTIVE_NAMES
            .iter()
            .find_map(|name| element.attribute(&format!("[{}]", name)));
        if let Some(attr) = bound {
            return attr
                .value
                .as_deref()
                .and_then(quoted_literal)
                .into_iter()
                .collect();
        }

        if plain.is_some() {
            return element
                .texts
                .iter()
                .filter(|text| !text.contains("{{"))
                .cloned()
                .collect();
        }

        Vec::new()
    }
}

impl Extract for DirectiveParser {
    fn extract(
        &self,
        file: &ParsedFile,
        _options: &ExtractOptions,
    ) -> Result<Option<TranslationCollection>> {
        let Some(templates) = &file.templates else {
            return Ok(None);
        };

        let collection = templates
            .iter()
            .flat_map(|template| &template.elements)
            .fold(TranslationCollection::new(), |collection, element| {
                collection.add_keys(Self::keys_of(element))
            });
        Ok(Some(collection))
    }
}

/// `'KEY'` or `"KEY"` as the whole binding expression.
fn quoted_literal(expression: &str) -> Option<String> {
    let expression = expression.trim();
    let quote = expression.chars().next().filter(|c| *c == '\'' || *c == '"')?;
    let body = expression.strip_prefix(quote)?.strip_suffix(quote)?;

    let mut key = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => key.push(chars.next()?),
            c if c == quote => return None,
            c => key.push(c),
        }
    }
    (!key.is_empty()).then_some(key)
}
