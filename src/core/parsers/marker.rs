use anyhow::Result;

use super::{Extract, ExtractOptions};
use crate::core::ast::{
    find_function_call_expressions, find_named_import_aliases, strings_from_expression,
};
use crate::core::collection::TranslationCollection;
use crate::core::source::ParsedFile;

pub const DEFAULT_MARKER_NAME: &str = "marker";

/// Finds calls to the no-op marker function, e.g. `marker('KEY')`, including
/// aliased imports such as `import { marker as _ } from '...'`.
#[derive(Debug, Clone)]
pub struct MarkerParser {
    name: String,
}

impl Default for MarkerParser {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER_NAME)
    }
}

impl MarkerParser {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl Extract for MarkerParser {
    fn extract(
        &self,
        file: &ParsedFile,
        _options: &ExtractOptions,
    ) -> Result<Option<TranslationCollection>> {
        let Some(module) = &file.module else {
            return Ok(None);
        };

        let mut names = vec![self.name.clone()];
        for alias in find_named_import_aliases(module, &self.name) {
            if !names.contains(&alias) {
                names.push(alias);
            }
        }

        let collection = find_function_call_expressions(module, &names)
            .iter()
            .filter_map(|call| call.args.first().filter(|arg| arg.spread.is_none()))
            .fold(TranslationCollection::new(), |collection, arg| {
                collection.add_keys(strings_from_expression(&arg.expr))
            });
        Ok(Some(collection))
    }
}
