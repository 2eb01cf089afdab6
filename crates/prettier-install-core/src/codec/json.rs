// JSON encoding with JSON.stringify-compatible layout

use super::indent::Indent;
use crate::document::Document;
use crate::error::{PatchError, PatchResult};
use serde::Serialize;
use std::path::Path;

pub(super) fn decode(text: &str) -> PatchResult<Document> {
    if text.trim().is_empty() {
        return Ok(Document::empty_map());
    }
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| PatchError::malformed(Path::new(""), e.to_string()))?;
    Ok(Document::from(value))
}

/// Pretty output nests each level by one `indent`; compact has no whitespace at all
pub(super) fn encode(document: &Document, indent: Indent) -> String {
    let value = serde_json::Value::from(document);
    match indent {
        Indent::Compact => value.to_string(),
        indent => {
            let unit = indent.unit();
            let formatter = serde_json::ser::PrettyFormatter::with_indent(unit.as_bytes());
            let mut buf = Vec::new();
            let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
            // Serializing a Value into memory cannot fail
            if value.serialize(&mut ser).is_err() {
                return value.to_string();
            }
            String::from_utf8(buf).unwrap_or_else(|_| value.to_string())
        }
    }
}
