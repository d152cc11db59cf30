use anyhow::{Result, bail};

use super::Compile;
use crate::core::collection::{TranslationCollection, TranslationValue};

const HEADER: &str = concat!(
    "msgid \"\"\n",
    "msgstr \"\"\n",
    "\"Content-Type: text/plain; charset=utf-8\\n\"\n",
    "\"Content-Transfer-Encoding: 8bit\\n\"\n",
);

/// Gettext template: one `msgid`/`msgstr` pair per key.
#[derive(Debug, Clone, Copy, Default)]
pub struct PotCompiler;

impl Compile for PotCompiler {
    fn extension(&self) -> &'static str {
        "pot"
    }

    fn compile(&self, collection: &TranslationCollection) -> Result<String> {
        let mut content = String::from(HEADER);
        for (key, value) in collection.iter() {
            content.push('\n');
            content.push_str(&format!("msgid \"{}\"\n", escape(key)));
            content.push_str(&format!(
                "msgstr \"{}\"\n",
                escape(value.as_deref().unwrap_or_default())
            ));
        }
        Ok(content)
    }

    fn parse(&self, contents: &str) -> Result<TranslationCollection> {
        let mut entries: Vec<(String, TranslationValue)> = Vec::new();
        let mut current: Option<PotEntry> = None;

        for (index, line) in contents.lines().enumerate() {
            let line_number = index + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(rest) = line.strip_prefix("msgid ") {
                if let Some(entry) = current.take() {
                    entries.extend(entry.finish());
                }
                current = Some(PotEntry::new(unquote(rest, line_number)?));
            } else if let Some(rest) = line.strip_prefix("msgstr ") {
                let Some(entry) = current.as_mut() else {
                    bail!("line {}: msgstr without msgid", line_number);
                };
                entry.msgstr = Some(unquote(rest, line_number)?);
                entry.field = Field::Msgstr;
            } else if line.starts_with("msgctxt ") || line.starts_with("msgid_plural ") {
                // Context and plural forms are not part of the key table.
                if let Some(entry) = current.as_mut() {
                    entry.field = Field::Ignored;
                }
            } else if line.starts_with('"') {
                let text = unquote(line, line_number)?;
                if let Some(entry) = current.as_mut() {
                    entry.append(&text);
                }
            } else if line.starts_with("msgstr[") {
                if let Some(entry) = current.as_mut() {
                    entry.field = Field::Ignored;
                }
            } else {
                bail!("line {}: unexpected content '{}'", line_number, line);
            }
        }

        if let Some(entry) = current.take() {
            entries.extend(entry.finish());
        }
        Ok(entries.into_iter().collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Msgid,
    Msgstr,
    Ignored,
}

#[derive(Debug)]
struct PotEntry {
    msgid: String,
    msgstr: Option<String>,
    field: Field,
}

impl PotEntry {
    fn new(msgid: String) -> Self {
        Self {
            msgid,
            msgstr: None,
            field: Field::Msgid,
        }
    }

    fn append(&mut self, text: &str) {
        match self.field {
            Field::Msgid => self.msgid.push_str(text),
            Field::Msgstr => self.msgstr.get_or_insert_with(String::new).push_str(text),
            Field::Ignored => {}
        }
    }

    /// The header entry (empty msgid) carries metadata, not a key.
    fn finish(self) -> Option<(String, TranslationValue)> {
        if self.msgid.is_empty() {
            return None;
        }
        let value = self.msgstr.filter(|s| !s.is_empty());
        Some((self.msgid, value))
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn unquote(text: &str, line_number: usize) -> Result<String> {
    let text = text.trim();
    let Some(body) = text
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        bail!("line {}: expected a quoted string, found '{}'", line_number, text);
    };

    let mut unescaped = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => unescaped.push('\n'),
            Some('r') => unescaped.push('\r'),
            Some('t') => unescaped.push('\t'),
            Some(other) => unescaped.push(other),
            None => bail!("line {}: dangling escape", line_number),
        }
    }
    Ok(unescaped)
}
