//! A source file parsed once, shared by every parser strategy.

use anyhow::Result;
use swc_ecma_ast::Module;

use super::ast::{find_component_templates, parse_program_source};
use super::parsers::{is_program_file, is_template_file};
use super::template::{TemplateDocument, parse_template};

#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub path: String,
    /// Syntax tree of a program file.
    pub module: Option<Module>,
    /// The file itself for template files, inline `@Component` templates for
    /// program files. `None` when the file holds no template.
    pub templates: Option<Vec<TemplateDocument>>,
}

impl ParsedFile {
    /// Parse `source` according to the kind of file `path` names. Program
    /// files with syntax errors fail here, naming the path.
    pub fn parse(source: &str, path: &str) -> Result<Self> {
        if is_template_file(path) {
            return Ok(Self {
                path: path.to_string(),
                module: None,
                templates: Some(vec![parse_template(source)?]),
            });
        }
        if !is_program_file(path) {
            return Ok(Self {
                path: path.to_string(),
                module: None,
                templates: None,
            });
        }

        let module = parse_program_source(source, path)?;
        let templates = find_component_templates(&module)
            .iter()
            .map(|template| parse_template(template))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            path: path.to_string(),
            module: Some(module),
            templates: (!templates.is_empty()).then_some(templates),
        })
    }
}
