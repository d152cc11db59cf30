use anyhow::Result;

use super::{Extract, ExtractOptions};
use crate::core::ast::{
    find_class_declarations, find_class_property_by_type, find_method_call_expressions,
    strings_from_expression,
};
use crate::core::collection::TranslationCollection;
use crate::core::source::ParsedFile;

pub const TRANSLATE_SERVICE_TYPE_REFERENCE: &str = "TranslateService";
pub const TRANSLATE_SERVICE_METHOD_NAMES: &[&str] = &["get", "instant", "stream"];

/// Finds `this.translate.get('KEY')` style calls inside classes that hold a
/// translation service.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceParser;

/// Default method names plus the optional custom one, built fresh for every call.
fn method_names(custom: Option<&str>) -> Vec<String> {
    let mut names: Vec<String> = TRANSLATE_SERVICE_METHOD_NAMES
        .iter()
        .map(|name| name.to_string())
        .collect();
    if let Some(custom) = custom
        && !names.iter().any(|name| name == custom)
    {
        names.push(custom.to_string());
    }
    names
}

impl Extract for ServiceParser {
    fn extract(
        &self,
        file: &ParsedFile,
        options: &ExtractOptions,
    ) -> Result<Option<TranslationCollection>> {
        let Some(module) = &file.module else {
            return Ok(None);
        };

        let classes = find_class_declarations(module);
        if classes.is_empty() {
            return Ok(None);
        }

        let service_name = options
            .service_name
            .as_deref()
            .unwrap_or(TRANSLATE_SERVICE_TYPE_REFERENCE);
        let methods = method_names(options.method_name.as_deref());

        let mut collection = TranslationCollection::new();
        for class in &classes {
            let Some(property) = find_class_property_by_type(class, service_name) else {
                continue;
            };
            for call in find_method_call_expressions(class, &property, &methods) {
                let Some(first_arg) = call.args.first().filter(|arg| arg.spread.is_none()) else {
                    continue;
                };
                collection = collection.add_keys(strings_from_expression(&first_arg.expr));
            }
        }
        Ok(Some(collection))
    }
}
