// Text <-> document bridge that remembers the source layout

pub mod indent;
mod json;
mod yaml;

pub use indent::Indent;

use crate::document::Document;
use crate::error::PatchResult;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

/// Layout facts detected from the text a document was decoded from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub indent: Indent,
    pub trailing_newline: bool,
    pub indented_sequences: bool,
}

impl Style {
    /// Layout used when there is no source text to learn from
    pub fn fresh() -> Self {
        Self {
            indent: Indent::DEFAULT,
            trailing_newline: false,
            indented_sequences: true,
        }
    }

    pub fn detect(format: Format, text: &str) -> Self {
        let indent = match Indent::detect(text) {
            Some(indent) => indent,
            None if text.trim().is_empty() => Indent::DEFAULT,
            // only single-line JSON is written back compact
            None if format == Format::Json && !text.trim().contains('\n') => Indent::Compact,
            None => Indent::DEFAULT,
        };
        let indented_sequences = match format {
            Format::Yaml => yaml::detect_indented_sequences(text).unwrap_or(true),
            Format::Json => true,
        };
        Self {
            indent,
            trailing_newline: text.ends_with('\n'),
            indented_sequences,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub document: Document,
    pub style: Style,
}

impl Format {
    pub fn decode(self, text: &str) -> PatchResult<Decoded> {
        let document = match self {
            Format::Json => json::decode(text)?,
            Format::Yaml => yaml::decode(text)?,
        };
        let style = Style::detect(self, text);
        debug!(format = ?self, ?style, "decoded document");
        Ok(Decoded { document, style })
    }

    pub fn encode(self, document: &Document, style: &Style) -> String {
        match self {
            Format::Json => {
                let mut text = json::encode(document, style.indent);
                if style.trailing_newline {
                    text.push('\n');
                }
                text
            }
            // YAML output always ends with exactly one newline
            Format::Yaml => yaml::encode(document, style.indent, style.indented_sequences),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patcher::{Pipeline, Severity};

    fn patch(format: Format, text: &str) -> String {
        let decoded = format.decode(text).unwrap();
        let doc = Pipeline::prettier_extras(Severity::Error).apply(decoded.document).unwrap();
        format.encode(&doc, &decoded.style)
    }

    #[test]
    fn test_json_roundtrip_is_exact() {
        let text = "{\n    \"name\": \"app\",\n    \"scripts\": {\n        \"test\": \"jest\"\n    }\n}\n";
        let decoded = Format::Json.decode(text).unwrap();
        assert_eq!(Format::Json.encode(&decoded.document, &decoded.style), text);
    }

    #[test]
    fn test_compact_json_stays_compact() {
        assert_eq!(
            patch(Format::Json, r#"{"extends":"foo"}"#),
            r#"{"extends":["foo","prettier"],"plugins":["prettier"],"rules":{"prettier/prettier":"error"}}"#
        );
    }

    #[test]
    fn test_four_space_json_stays_four_space() {
        let out = patch(Format::Json, "{\n    \"extends\": [\"prettier\", \"foo\"]\n}");
        assert_eq!(
            out,
            "{\n    \"extends\": [\n        \"foo\",\n        \"prettier\"\n    ],\n    \"plugins\": [\n        \"prettier\"\n    ],\n    \"rules\": {\n        \"prettier/prettier\": \"error\"\n    }\n}"
        );
    }

    #[test]
    fn test_yaml_patch() {
        assert_eq!(
            patch(Format::Yaml, "extends:\n  - foo\n"),
            "extends:\n  - foo\n  - prettier\nplugins:\n  - prettier\nrules:\n  prettier/prettier: error\n"
        );
    }

    #[test]
    fn test_fresh_style_is_two_spaces_without_newline() {
        let style = Style::fresh();
        let doc = Format::Json.decode(r#"{"tabWidth":2}"#).unwrap().document;
        assert_eq!(Format::Json.encode(&doc, &style), "{\n  \"tabWidth\": 2\n}");
    }

    #[test]
    fn test_unindented_multiline_json_gets_default_indent() {
        let decoded = Format::Json.decode("{\n\"a\": 1\n}\n").unwrap();
        assert_eq!(decoded.style.indent, Indent::DEFAULT);
        assert_eq!(
            Format::Json.encode(&decoded.document, &decoded.style),
            "{\n  \"a\": 1\n}\n"
        );
    }
}
