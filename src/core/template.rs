//! Template (HTML) helpers.
//!
//! Templates are read with tree-sitter's HTML grammar, which tolerates the
//! Angular-specific attribute syntax (`[prop]`, `(event)`, `*ngIf`) and never
//! fails on malformed markup.

use std::ops::Range;

use anyhow::{Result, anyhow};
use tree_sitter::{Node, Parser};

/// Attribute on a template element. `value` is `None` for bare attributes (`<p translate>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateAttribute {
    pub name: String,
    pub value: Option<String>,
}

impl TemplateAttribute {
    /// `[prop]`, `*directive` and `bind-prop` take an expression as their value.
    pub fn is_binding(&self) -> bool {
        (self.name.starts_with('[') && self.name.ends_with(']'))
            || self.name.starts_with('*')
            || self.name.starts_with("bind-")
    }
}

/// An element with its attributes and the trimmed, non-empty text nodes that
/// are its direct children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateElement {
    pub tag_name: String,
    pub attributes: Vec<TemplateAttribute>,
    pub texts: Vec<String>,
}

impl TemplateElement {
    pub fn attribute(&self, name: &str) -> Option<&TemplateAttribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }
}

/// A parsed template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateDocument {
    /// Every element, in document order.
    pub elements: Vec<TemplateElement>,
    /// Angular expressions in document order: `{{ }}` bodies and binding
    /// attribute values. Comments are skipped.
    pub expressions: Vec<String>,
}

#[derive(Default)]
struct Collected {
    elements: Vec<TemplateElement>,
    bindings: Vec<(usize, String)>,
    skipped: Vec<Range<usize>>,
}

/// Parse a template into its elements and expressions.
pub fn parse_template(template: &str) -> Result<TemplateDocument> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_html::LANGUAGE.into())
        .map_err(|e| anyhow!("Failed to load HTML grammar: {}", e))?;
    let tree = parser
        .parse(template, None)
        .ok_or_else(|| anyhow!("Failed to parse template"))?;

    let mut collected = Collected::default();
    collect(tree.root_node(), template.as_bytes(), &mut collected);

    let mut expressions = find_interpolations(template, &collected.skipped);
    expressions.extend(collected.bindings);
    expressions.sort_by_key(|(offset, _)| *offset);

    Ok(TemplateDocument {
        elements: collected.elements,
        expressions: expressions.into_iter().map(|(_, expr)| expr).collect(),
    })
}

fn collect(node: Node, source: &[u8], collected: &mut Collected) {
    match node.kind() {
        "element" => collected.elements.push(read_element(node, source)),
        "attribute" => {
            if let Some((attr, offset)) = read_attribute(node, source)
                && attr.is_binding()
                && let Some(value) = attr.value
            {
                collected.bindings.push((offset, value));
            }
        }
        "comment" | "raw_text" => {
            collected.skipped.push(node.byte_range());
            return;
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect(child, source, collected);
    }
}

/// `{{ ... }}` bodies with the offset they start at. A `}}` inside a quoted
/// string doesn't close the interpolation.
fn find_interpolations(template: &str, skipped: &[Range<usize>]) -> Vec<(usize, String)> {
    let mut found = Vec::new();
    let mut position = 0;

    while let Some(open) = template[position..].find("{{").map(|i| position + i) {
        if let Some(range) = skipped.iter().find(|range| range.contains(&open)) {
            position = range.end.max(open + 2);
            continue;
        }

        let start = open + 2;
        let Some(end) = closing_braces(&template[start..]).map(|i| start + i) else {
            break;
        };
        found.push((start, template[start..end].to_string()));
        position = end + 2;
    }
    found
}

fn closing_braces(body: &str) -> Option<usize> {
    let bytes = body.as_bytes();
    let mut quote = None;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(_) if b == b'\\' => i += 1,
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if matches!(b, b'\'' | b'"' | b'`') => quote = Some(b),
            None if b == b'}' && bytes.get(i + 1) == Some(&b'}') => return Some(i),
            None => {}
        }
        i += 1;
    }
    None
}

fn read_element(node: Node, source: &[u8]) -> TemplateElement {
    let mut tag_name = String::new();
    let mut attributes = Vec::new();
    let mut texts = Vec::new();

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "start_tag" | "self_closing_tag" => {
                let mut tag_cursor = child.walk();
                for part in child.children(&mut tag_cursor) {
                    match part.kind() {
                        "tag_name" => tag_name = node_text(part, source).to_string(),
                        "attribute" => {
                            attributes.extend(read_attribute(part, source).map(|(attr, _)| attr))
                        }
                        _ => {}
                    }
                }
            }
            "text" => {
                let text = node_text(child, source).trim();
                if !text.is_empty() {
                    texts.push(text.to_string());
                }
            }
            _ => {}
        }
    }

    TemplateElement {
        tag_name,
        attributes,
        texts,
    }
}

/// The attribute and the byte offset its value starts at.
fn read_attribute(node: Node, source: &[u8]) -> Option<(TemplateAttribute, usize)> {
    let mut name = None;
    let mut value = None;
    let mut offset = node.start_byte();

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "attribute_name" => name = Some(node_text(child, source).to_string()),
            "attribute_value" => {
                value = Some(node_text(child, source).to_string());
                offset = child.start_byte();
            }
            "quoted_attribute_value" => {
                // The inner attribute_value node is missing for `attr=""`.
                let mut inner_cursor = child.walk();
                let inner = child
                    .children(&mut inner_cursor)
                    .find(|inner| inner.kind() == "attribute_value");
                offset = inner.map_or(child.start_byte(), |inner| inner.start_byte());
                value = Some(
                    inner
                        .map(|inner| node_text(inner, source).to_string())
                        .unwrap_or_default(),
                );
            }
            _ => {}
        }
    }

    name.map(|name| (TemplateAttribute { name, value }, offset))
}

fn node_text<'a>(node: Node, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or_default()
}
