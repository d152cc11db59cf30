use anyhow::Result;

use super::{Extract, ExtractOptions};
use crate::core::ast::{parse_expression, strings_from_expression};
use crate::core::collection::TranslationCollection;
use crate::core::source::ParsedFile;

pub const DEFAULT_PIPE_NAME: &str = "translate";

/// Finds `'KEY' | translate` in template expressions (interpolations and
/// bindings), including pipe arguments and chained pipes
/// (`'KEY' | translate:params | uppercase`).
///
/// The piped operand follows the literal rules of [`strings_from_expression`],
/// so `'A' + 'B' | translate` gives `AB` and `(ok ? 'YES' : 'NO') | translate`
/// gives both.
#[derive(Debug, Clone)]
pub struct PipeParser {
    pipe_name: String,
}

impl Default for PipeParser {
    fn default() -> Self {
        Self::new(DEFAULT_PIPE_NAME)
    }
}

impl PipeParser {
    pub fn new(pipe_name: &str) -> Self {
        Self {
            pipe_name: pipe_name.to_string(),
        }
    }

    fn keys_in(&self, expression: &str) -> Vec<String> {
        piped_operands(expression, &self.pipe_name)
            .into_iter()
            .filter_map(parse_expression)
            .flat_map(|operand| strings_from_expression(&operand))
            .filter(|key| !key.is_empty())
            .collect()
    }
}

impl Extract for PipeParser {
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
            .flat_map(|template| &template.expressions)
            .fold(TranslationCollection::new(), |collection, expression| {
                collection.add_keys(self.keys_in(expression))
            });
        Ok(Some(collection))
    }
}

/// A pipe chain inside one group: where its operand starts and the offsets of
/// its top-level `|`.
struct Chain {
    start: usize,
    pipes: Vec<usize>,
}

impl Chain {
    fn at(start: usize) -> Self {
        Self {
            start,
            pipes: Vec::new(),
        }
    }
}

/// Operands piped into `pipe_name` first in their chain, in source order.
///
/// A pipe binds looser than any other operator, so its operand runs from the
/// start of the enclosing group (bracket, `,` or `;`) up to the first `|`.
fn piped_operands<'a>(expression: &'a str, pipe_name: &str) -> Vec<&'a str> {
    let bytes = expression.as_bytes();
    let mut stack = vec![Chain::at(0)];
    let mut found = Vec::new();
    let mut quote = None;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' {
                i += 1;
            } else if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }

        match b {
            b'\'' | b'"' | b'`' => quote = Some(b),
            b'(' | b'[' | b'{' => stack.push(Chain::at(i + 1)),
            b')' | b']' | b'}' if stack.len() > 1 => {
                if let Some(chain) = stack.pop() {
                    finish_chain(expression, &chain, i, pipe_name, &mut found);
                }
            }
            b',' | b';' => {
                if let Some(chain) = stack.last_mut() {
                    finish_chain(expression, chain, i, pipe_name, &mut found);
                    *chain = Chain::at(i + 1);
                }
            }
            // `||`
            b'|' if bytes.get(i + 1) == Some(&b'|') => i += 1,
            b'|' => {
                if let Some(chain) = stack.last_mut() {
                    chain.pipes.push(i);
                }
            }
            _ => {}
        }
        i += 1;
    }

    while let Some(chain) = stack.pop() {
        finish_chain(expression, &chain, bytes.len(), pipe_name, &mut found);
    }

    found.sort_by_key(|(start, _)| *start);
    found.into_iter().map(|(_, operand)| operand).collect()
}

fn finish_chain<'a>(
    expression: &'a str,
    chain: &Chain,
    end: usize,
    pipe_name: &str,
    found: &mut Vec<(usize, &'a str)>,
) {
    let Some(&first_pipe) = chain.pipes.first() else {
        return;
    };
    let pipe_end = chain.pipes.get(1).copied().unwrap_or(end);
    // `translate:arg1:arg2`
    let name = expression[first_pipe + 1..pipe_end]
        .split(':')
        .next()
        .unwrap_or_default()
        .trim();
    if name == pipe_name {
        found.push((chain.start, &expression[chain.start..first_pipe]));
    }
}
