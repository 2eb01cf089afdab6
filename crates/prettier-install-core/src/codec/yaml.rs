// Block-style YAML emitter that keeps key order and sequence indentation

use super::indent::Indent;
use crate::document::{Document, Scalar};
use crate::error::{PatchError, PatchResult};
use std::path::Path;

pub(super) fn decode(text: &str) -> PatchResult<Document> {
    let value: serde_yaml::Value =
        serde_yaml::from_str(text).map_err(|e| PatchError::malformed(Path::new(""), e.to_string()))?;
    Document::from_yaml(value)
}

/// Whether `- item` lines sit one level deeper than their parent key
pub(super) fn detect_indented_sequences(text: &str) -> Option<bool> {
    let mut previous: Option<&str> = None;
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        let trimmed = line.trim_start();
        if trimmed == "-" || trimmed.starts_with("- ") {
            if let Some(parent) = previous.filter(|p| p.trim_end().ends_with(':')) {
                return Some(leading_width(line) > leading_width(parent));
            }
        }
        previous = Some(line);
    }
    None
}

fn leading_width(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

pub(super) fn encode(document: &Document, indent: Indent, indented_sequences: bool) -> String {
    let unit = match indent {
        Indent::Compact => Indent::DEFAULT.unit(),
        other => other.unit(),
    };
    let emitter = Emitter {
        unit,
        indented_sequences,
    };
    let lines = match document {
        Document::Map(map) if !map.is_empty() => emitter.block(document),
        Document::List(items) if !items.is_empty() => emitter.block(document),
        other => vec![inline(other)],
    };
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

struct Emitter {
    unit: String,
    indented_sequences: bool,
}

impl Emitter {
    /// Lines of a non-empty map or list, relative to column zero
    fn block(&self, node: &Document) -> Vec<String> {
        let mut lines = Vec::new();
        match node {
            Document::Map(map) => {
                for (key, value) in map.iter() {
                    let key = scalar_text(key);
                    if is_block(value) {
                        lines.push(format!("{}:", key));
                        let prefix = match value {
                            Document::List(_) if !self.indented_sequences => "",
                            _ => self.unit.as_str(),
                        };
                        lines.extend(self.block(value).into_iter().map(|l| format!("{}{}", prefix, l)));
                    } else {
                        lines.push(format!("{}: {}", key, inline(value)));
                    }
                }
            }
            Document::List(items) => {
                for item in items {
                    if is_block(item) {
                        let mut child = self.block(item).into_iter();
                        if let Some(first) = child.next() {
                            lines.push(format!("- {}", first));
                        }
                        lines.extend(child.map(|l| format!("  {}", l)));
                    } else {
                        lines.push(format!("- {}", inline(item)));
                    }
                }
            }
            Document::Scalar(_) => lines.push(inline(node)),
        }
        lines
    }
}

fn is_block(node: &Document) -> bool {
    match node {
        Document::Map(map) => !map.is_empty(),
        Document::List(items) => !items.is_empty(),
        Document::Scalar(_) => false,
    }
}

fn inline(node: &Document) -> String {
    match node {
        Document::Map(_) => "{}".to_string(),
        Document::List(_) => "[]".to_string(),
        Document::Scalar(Scalar::Null) => "null".to_string(),
        Document::Scalar(Scalar::Bool(b)) => b.to_string(),
        Document::Scalar(Scalar::Number(n)) => n.to_string(),
        Document::Scalar(Scalar::String(s)) => scalar_text(s),
    }
}

/// Plain or quoted YAML scalar that stays on one line
fn scalar_text(s: &str) -> String {
    match serde_yaml::to_string(s) {
        Ok(text) => {
            let text = text.trim_end_matches('\n');
            if text.contains('\n') {
                serde_json::Value::String(s.to_string()).to_string()
            } else {
                text.to_string()
            }
        }
        Err(_) => serde_json::Value::String(s.to_string()).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(text: &str) -> String {
        let doc = decode(text).unwrap();
        let indent = Indent::detect(text).unwrap_or_default();
        let indented = detect_indented_sequences(text).unwrap_or(true);
        encode(&doc, indent, indented)
    }

    #[test]
    fn test_roundtrip_indented_sequences() {
        let text = "extends:\n  - foo\n  - bar\nrules:\n  semi: error\n";
        assert_eq!(roundtrip(text), text);
    }

    #[test]
    fn test_roundtrip_flush_sequences() {
        let text = "extends:\n- foo\nrules:\n    semi: error\n";
        assert_eq!(roundtrip(text), text);
    }

    #[test]
    fn test_sequence_of_maps() {
        let text = "overrides:\n  - files: a.js\n    rules:\n      semi: warn\n";
        assert_eq!(roundtrip(text), text);
    }

    #[test]
    fn test_strings_that_need_quotes_are_quoted() {
        let doc = decode("a: 'yes'\nb: '123'\nc: 'x: y'\n").unwrap();
        let out = encode(&doc, Indent::DEFAULT, true);
        let back = decode(&out).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_multiline_strings_stay_on_one_line() {
        let doc = decode("a: \"line1\\nline2\"\n").unwrap();
        let out = encode(&doc, Indent::DEFAULT, true);
        assert_eq!(out.lines().count(), 1);
        assert_eq!(decode(&out).unwrap(), doc);
    }

    #[test]
    fn test_exactly_one_trailing_newline() {
        let doc = decode("a: 1\n\n\n").unwrap();
        assert_eq!(encode(&doc, Indent::DEFAULT, true), "a: 1\n");
    }

    #[test]
    fn test_detects_sequence_style() {
        assert_eq!(detect_indented_sequences("a:\n  - b\n"), Some(true));
        assert_eq!(detect_indented_sequences("a:\n- b\n"), Some(false));
        assert_eq!(detect_indented_sequences("a: b\n"), None);
    }

    #[test]
    fn test_malformed_yaml_is_reported() {
        let err = decode("a: [1, 2\n").unwrap_err();
        assert!(matches!(err, PatchError::MalformedDocument { .. }));
    }
}
