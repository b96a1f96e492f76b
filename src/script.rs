//! Literal extraction from generated data scripts.
//!
//! The generator emits data, not code: every file is a sequence of `var NAME = <literal>;`
//! statements whose initialisers are arrays, objects, strings, numbers and `null`. We parse the
//! file with tree-sitter, run the format's declaration query, and lift each initialiser into a
//! [`Literal`]. Nothing downstream ever sees a syntax node.

use crate::error::{DoxnavError, Result};
use crate::formats::javascript::JavaScriptFormat;
use crate::formats::Format;
use std::fmt::Write;
use std::fs;
use std::path::Path;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Parser, Query, QueryCursor};

/// A JavaScript literal value as written by the generator.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    /// `null` or `undefined`.
    Null,
    /// `true` or `false`.
    Bool(bool),
    /// Any numeric literal.
    Number(f64),
    /// A single- or double-quoted string with escapes resolved.
    String(String),
    /// An array literal, in source order.
    Array(Vec<Literal>),
    /// An object literal, keys in source order.
    Object(Vec<(String, Literal)>),
}

impl Literal {
    #[must_use]
    /// Borrows the string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    /// Borrows the elements, if this is an array.
    pub fn as_array(&self) -> Option<&[Literal]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    /// Short name of the literal's kind for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }
}

/// The top-level declarations of one generated script.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Script {
    bindings: Vec<(String, Literal)>,
}

impl Script {
    /// Parses JavaScript source into its declared literals.
    ///
    /// # Errors
    ///
    /// Returns [`DoxnavError::Script`] if the source has syntax errors or a declaration's
    /// initialiser is not a plain literal.
    pub fn parse(source: &str) -> Result<Self> {
        Self::parse_with(source, &JavaScriptFormat)
    }

    /// Parses source with an explicit format.
    ///
    /// # Errors
    ///
    /// Returns [`DoxnavError::Script`] if the grammar cannot be loaded, the source has syntax
    /// errors, or a declaration's initialiser is not a plain literal.
    pub fn parse_with(source: &str, format: &impl Format) -> Result<Self> {
        let language = format.language();
        let mut parser = Parser::new();
        parser
            .set_language(&language)
            .map_err(|e| DoxnavError::Script(e.to_string()))?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| DoxnavError::Script("parser returned no tree".to_string()))?;

        let root = tree.root_node();
        if let Some(bad) = first_error(root) {
            return Err(DoxnavError::Script(format!(
                "syntax error at line {}, column {}",
                bad.start_position().row + 1,
                bad.start_position().column + 1
            )));
        }

        let query = Query::new(&language, format.declaration_query())
            .map_err(|e| DoxnavError::Script(e.to_string()))?;
        let (Some(name_idx), Some(value_idx)) = (
            query.capture_index_for_name("name"),
            query.capture_index_for_name("value"),
        ) else {
            return Err(DoxnavError::Script(
                "declaration query must capture @name and @value".to_string(),
            ));
        };

        let bytes = source.as_bytes();
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, root, bytes);
        let mut bindings = Vec::new();

        while let Some(m) = matches.next() {
            let mut name = None;
            let mut value = None;
            for capture in m.captures {
                if capture.index == name_idx {
                    name = Some(capture.node);
                } else if capture.index == value_idx {
                    value = Some(capture.node);
                }
            }
            if let (Some(name), Some(value)) = (name, value) {
                bindings.push((node_text(name, bytes)?.to_string(), lift(value, bytes)?));
            }
        }

        Ok(Self { bindings })
    }

    /// Reads and parses a script file.
    ///
    /// # Errors
    ///
    /// Returns [`DoxnavError::PathNotFound`] for a missing file, [`DoxnavError::Io`] for other
    /// read failures and [`DoxnavError::Script`] for unparseable content.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DoxnavError::PathNotFound(path.to_path_buf()));
        }
        let source = fs::read_to_string(path)?;
        Self::parse(&source)
    }

    #[must_use]
    /// Looks up the first declaration with this name.
    pub fn get(&self, name: &str) -> Option<&Literal> {
        self.bindings
            .iter()
            .find(|(bound, _)| bound == name)
            .map(|(_, value)| value)
    }

    /// Declared names in source order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|(name, _)| name.as_str())
    }
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

fn node_text<'a>(node: Node, bytes: &'a [u8]) -> Result<&'a str> {
    node.utf8_text(bytes)
        .map_err(|e| DoxnavError::Script(e.to_string()))
}

fn named_children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

fn lift(node: Node, bytes: &[u8]) -> Result<Literal> {
    match node.kind() {
        "null" | "undefined" => Ok(Literal::Null),
        "true" => Ok(Literal::Bool(true)),
        "false" => Ok(Literal::Bool(false)),
        "number" => {
            let text = node_text(node, bytes)?;
            parse_number(text)
                .map(Literal::Number)
                .ok_or_else(|| unsupported(node, &format!("number {text}")))
        }
        "string" => Ok(Literal::String(decode_string(node, bytes)?)),
        "array" => named_children(node)
            .into_iter()
            .map(|child| lift(child, bytes))
            .collect::<Result<Vec<_>>>()
            .map(Literal::Array),
        "object" => {
            let mut fields = Vec::new();
            for pair in named_children(node) {
                if pair.kind() != "pair" {
                    return Err(unsupported(pair, pair.kind()));
                }
                let (Some(key), Some(value)) = (
                    pair.child_by_field_name("key"),
                    pair.child_by_field_name("value"),
                ) else {
                    return Err(unsupported(pair, "incomplete pair"));
                };
                let key = if key.kind() == "string" {
                    decode_string(key, bytes)?
                } else {
                    node_text(key, bytes)?.to_string()
                };
                fields.push((key, lift(value, bytes)?));
            }
            Ok(Literal::Object(fields))
        }
        "parenthesized_expression" => match named_children(node).first() {
            Some(inner) => lift(*inner, bytes),
            None => Err(unsupported(node, "empty parentheses")),
        },
        "unary_expression" => {
            let text = node_text(node, bytes)?;
            text.strip_prefix('-')
                .and_then(|rest| parse_number(rest.trim()))
                .map(|n| Literal::Number(-n))
                .ok_or_else(|| unsupported(node, text))
        }
        other => Err(unsupported(node, other)),
    }
}

fn unsupported(node: Node, what: &str) -> DoxnavError {
    DoxnavError::Script(format!(
        "unsupported {what} at line {}, column {}",
        node.start_position().row + 1,
        node.start_position().column + 1
    ))
}

#[allow(clippy::cast_precision_loss)]
fn parse_number(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    let with_prefix = |prefixes: [&str; 2], radix: u32| {
        prefixes
            .iter()
            .find_map(|p| cleaned.strip_prefix(p))
            .map(|digits| u64::from_str_radix(digits, radix))
    };
    if let Some(parsed) = with_prefix(["0x", "0X"], 16)
        .or_else(|| with_prefix(["0o", "0O"], 8))
        .or_else(|| with_prefix(["0b", "0B"], 2))
    {
        return parsed.ok().map(|n| n as f64);
    }
    cleaned.parse().ok()
}

fn decode_string(node: Node, bytes: &[u8]) -> Result<String> {
    let mut out = String::new();
    // High surrogate waiting for its `\uDCxx` partner.
    let mut high: Option<u32> = None;
    for part in named_children(node) {
        let text = node_text(part, bytes)?;
        let escape = part.kind() == "escape_sequence";
        let unit = if escape { utf16_unit(text) } else { None };

        if let Some(first) = high.take() {
            if let Some(low @ 0xDC00..=0xDFFF) = unit {
                let combined = 0x10000 + ((first - 0xD800) << 10) + (low - 0xDC00);
                out.push(char::from_u32(combined).unwrap_or(char::REPLACEMENT_CHARACTER));
                continue;
            }
            out.push(char::REPLACEMENT_CHARACTER);
        }

        match unit {
            Some(first @ 0xD800..=0xDBFF) => high = Some(first),
            _ if escape => decode_escape(text, &mut out),
            _ => out.push_str(text),
        }
    }
    if high.is_some() {
        out.push(char::REPLACEMENT_CHARACTER);
    }
    Ok(out)
}

/// The code unit of a four-digit `\uXXXX` escape.
fn utf16_unit(escape: &str) -> Option<u32> {
    let hex = escape.strip_prefix("\\u")?;
    if hex.len() != 4 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

fn decode_escape(escape: &str, out: &mut String) {
    let body = escape.strip_prefix('\\').unwrap_or(escape);
    let mut chars = body.chars();
    match chars.next() {
        Some('n') => out.push('\n'),
        Some('t') => out.push('\t'),
        Some('r') => out.push('\r'),
        Some('b') => out.push('\u{8}'),
        Some('f') => out.push('\u{c}'),
        Some('v') => out.push('\u{b}'),
        Some('0') if body.len() == 1 => out.push('\0'),
        Some('x') => push_code_point(&body[1..], out),
        Some('u') => push_code_point(body[1..].trim_start_matches('{').trim_end_matches('}'), out),
        // Line continuation
        Some('\n' | '\r') => {}
        Some(c) => {
            out.push(c);
            out.push_str(chars.as_str());
        }
        None => {}
    }
}

fn push_code_point(hex: &str, out: &mut String) {
    let decoded = u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
    out.push(decoded.unwrap_or(char::REPLACEMENT_CHARACTER));
}

/// Quotes a string as a JavaScript literal using the given quote character.
#[must_use]
pub fn quote(value: &str, delimiter: char) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push(delimiter);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == delimiter => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push(delimiter);
    out
}

#[cfg(test)]
#[path = "tests/script.rs"]
mod tests;
