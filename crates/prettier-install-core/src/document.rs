// Format-independent configuration tree shared by the JSON and YAML codecs

use crate::error::{PatchError, PatchResult};
use serde_json::Number;

/// Leaf value of a configuration document
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

/// Configuration document: a tree of scalars, lists and ordered maps
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Scalar(Scalar),
    List(Vec<Document>),
    Map(Mapping),
}

/// String-keyed map that keeps insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapping {
    entries: Vec<(String, Document)>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&Document> {
        self.position(key).map(|idx| &self.entries[idx].1)
    }

    /// Set `key`, replacing an existing value in place or appending a new entry
    pub fn insert(&mut self, key: impl Into<String>, value: Document) -> Option<Document> {
        let key = key.into();
        match self.position(&key) {
            Some(idx) => Some(std::mem::replace(&mut self.entries[idx].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Document> {
        let idx = self.position(key)?;
        Some(self.entries.remove(idx).1)
    }

    /// Value under `key`, appending `default()` first when absent
    pub fn get_or_insert_with(&mut self, key: &str, default: impl FnOnce() -> Document) -> &mut Document {
        let idx = match self.position(key) {
            Some(idx) => idx,
            None => {
                self.entries.push((key.to_string(), default()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Document)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }
}

impl FromIterator<(String, Document)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (String, Document)>>(iter: I) -> Self {
        let mut map = Mapping::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl Document {
    pub fn empty_map() -> Self {
        Document::Map(Mapping::new())
    }

    pub fn empty_list() -> Self {
        Document::List(Vec::new())
    }

    pub fn string(value: impl Into<String>) -> Self {
        Document::Scalar(Scalar::String(value.into()))
    }

    pub fn null() -> Self {
        Document::Scalar(Scalar::Null)
    }

    /// Short shape name used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Document::Scalar(Scalar::Null) => "null",
            Document::Scalar(_) => "scalar",
            Document::List(_) => "list",
            Document::Map(_) => "map",
        }
    }

    pub fn as_map(&self) -> Option<&Mapping> {
        match self {
            Document::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Document::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Document>> {
        match self {
            Document::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Document::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Exact string equality; non-string scalars never match
    pub fn is_string(&self, value: &str) -> bool {
        self.as_str() == Some(value)
    }

    /// Decode a YAML value; non-string scalar keys are stringified
    pub fn from_yaml(value: serde_yaml::Value) -> PatchResult<Self> {
        use serde_yaml::Value as Y;

        Ok(match value {
            Y::Null => Document::null(),
            Y::Bool(b) => Document::Scalar(Scalar::Bool(b)),
            Y::Number(n) => Document::Scalar(Scalar::Number(yaml_number(&n)?)),
            Y::String(s) => Document::string(s),
            Y::Sequence(items) => Document::List(
                items
                    .into_iter()
                    .map(Document::from_yaml)
                    .collect::<PatchResult<_>>()?,
            ),
            Y::Mapping(map) => {
                let mut out = Mapping::new();
                for (key, value) in map {
                    out.insert(yaml_key(key)?, Document::from_yaml(value)?);
                }
                Document::Map(out)
            }
            Y::Tagged(tagged) => Document::from_yaml(tagged.value)?,
        })
    }
}

fn yaml_number(n: &serde_yaml::Number) -> PatchResult<Number> {
    if let Some(i) = n.as_i64() {
        return Ok(Number::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Ok(Number::from(u));
    }
    n.as_f64()
        .and_then(Number::from_f64)
        .ok_or_else(|| PatchError::malformed(std::path::Path::new(""), format!("unsupported number {}", n)))
}

fn yaml_key(key: serde_yaml::Value) -> PatchResult<String> {
    use serde_yaml::Value as Y;

    match key {
        Y::String(s) => Ok(s),
        Y::Bool(b) => Ok(b.to_string()),
        Y::Number(n) => Ok(n.to_string()),
        Y::Null => Ok("null".to_string()),
        other => Err(PatchError::malformed(
            std::path::Path::new(""),
            format!("unsupported mapping key {:?}", other),
        )),
    }
}

impl From<serde_json::Value> for Document {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value as J;

        match value {
            J::Null => Document::null(),
            J::Bool(b) => Document::Scalar(Scalar::Bool(b)),
            J::Number(n) => Document::Scalar(Scalar::Number(n)),
            J::String(s) => Document::string(s),
            J::Array(items) => Document::List(items.into_iter().map(Document::from).collect()),
            J::Object(map) => Document::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Document::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&Document> for serde_json::Value {
    fn from(doc: &Document) -> Self {
        use serde_json::Value as J;

        match doc {
            Document::Scalar(Scalar::Null) => J::Null,
            Document::Scalar(Scalar::Bool(b)) => J::Bool(*b),
            Document::Scalar(Scalar::Number(n)) => J::Number(n.clone()),
            Document::Scalar(Scalar::String(s)) => J::String(s.clone()),
            Document::List(items) => J::Array(items.iter().map(J::from).collect()),
            Document::Map(map) => J::Object(
                map.iter()
                    .map(|(k, v)| (k.to_string(), J::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for Document {
    fn from(value: &str) -> Self {
        Document::string(value)
    }
}

impl From<bool> for Document {
    fn from(value: bool) -> Self {
        Document::Scalar(Scalar::Bool(value))
    }
}

impl From<u64> for Document {
    fn from(value: u64) -> Self {
        Document::Scalar(Scalar::Number(Number::from(value)))
    }
}

impl From<Mapping> for Document {
    fn from(value: Mapping) -> Self {
        Document::Map(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_keeps_position_of_existing_key() {
        let mut map = Mapping::new();
        map.insert("a", Document::from(1u64));
        map.insert("b", Document::from(2u64));
        map.insert("a", Document::from(3u64));

        let keys: Vec<_> = map.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(map.get("a"), Some(&Document::from(3u64)));
    }

    #[test]
    fn test_json_conversion_preserves_key_order() {
        let value = json!({"zeta": 1, "alpha": [true, null, "x"]});
        let doc = Document::from(value.clone());

        let keys: Vec<_> = doc.as_map().unwrap().keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
        assert_eq!(serde_json::Value::from(&doc), value);
    }

    #[test]
    fn test_yaml_conversion_stringifies_scalar_keys() {
        let value: serde_yaml::Value = serde_yaml::from_str("1: one\ntrue: yes\nname: x\n").unwrap();
        let doc = Document::from_yaml(value).unwrap();

        let keys: Vec<_> = doc.as_map().unwrap().keys().collect();
        assert_eq!(keys, vec!["1", "true", "name"]);
    }

    #[test]
    fn test_is_string_is_exact() {
        let doc = Document::string("Prettier");
        assert!(doc.is_string("Prettier"));
        assert!(!doc.is_string("prettier"));
        assert!(!Document::from(true).is_string("true"));
    }
}
