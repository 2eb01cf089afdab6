// Declarative merge operations over a decoded configuration document

use crate::document::{Document, Mapping, Scalar};
use crate::error::{PatchError, PatchResult};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Severity written for the `prettier/prettier` rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Error,
    Warn,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warn => "warn",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(Severity::Error),
            "warn" => Ok(Severity::Warn),
            other => Err(format!("unknown severity '{}' (expected error or warn)", other)),
        }
    }
}

/// Sequence of map keys addressing a location inside a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        KeyPath(segments.into_iter().map(Into::into).collect())
    }

    fn prefixed(&self, prefix: &KeyPath) -> KeyPath {
        KeyPath(prefix.0.iter().chain(self.0.iter()).cloned().collect())
    }

    fn split_last(&self) -> Option<(&[String], &str)> {
        self.0.split_last().map(|(last, parents)| (parents, last.as_str()))
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("<root>")
        } else {
            f.write_str(&self.0.join("."))
        }
    }
}

/// One idempotent edit; list and map targets are coerced before editing
#[derive(Debug, Clone, PartialEq)]
pub enum PatchStep {
    /// Add `path: default` when the key is absent
    EnsureKey { path: KeyPath, default: Document },
    /// Set `path` to `value`, creating intermediate maps
    SetKey { path: KeyPath, value: Document },
    /// Append `value` to the list at `path` unless already present
    EnsureInList { path: KeyPath, value: String },
    /// Move or append `value` so it is the only and last occurrence
    EnsureAtEndOfList { path: KeyPath, value: String },
    /// Set `key` inside the map at `path` only when absent
    EnsureMapKeyDefault {
        path: KeyPath,
        key: String,
        default: Document,
    },
}

impl PatchStep {
    fn path(&self) -> &KeyPath {
        match self {
            PatchStep::EnsureKey { path, .. }
            | PatchStep::SetKey { path, .. }
            | PatchStep::EnsureInList { path, .. }
            | PatchStep::EnsureAtEndOfList { path, .. }
            | PatchStep::EnsureMapKeyDefault { path, .. } => path,
        }
    }

    fn with_path(&self, path: KeyPath) -> PatchStep {
        let mut step = self.clone();
        match &mut step {
            PatchStep::EnsureKey { path: p, .. }
            | PatchStep::SetKey { path: p, .. }
            | PatchStep::EnsureInList { path: p, .. }
            | PatchStep::EnsureAtEndOfList { path: p, .. }
            | PatchStep::EnsureMapKeyDefault { path: p, .. } => *p = path,
        }
        step
    }

    pub fn apply(&self, root: &mut Document) -> PatchResult<()> {
        match self {
            PatchStep::EnsureKey { path, default } => {
                let (parents, key) = leaf(path)?;
                let map = descend(root, parents)?;
                if !map.contains_key(key) {
                    map.insert(key, default.clone());
                }
            }
            PatchStep::SetKey { path, value } => {
                let (parents, key) = leaf(path)?;
                descend(root, parents)?.insert(key, value.clone());
            }
            PatchStep::EnsureInList { path, value } => {
                let items = list_at(root, path)?;
                if !items.iter().any(|item| item.is_string(value)) {
                    items.push(Document::string(value.as_str()));
                }
            }
            PatchStep::EnsureAtEndOfList { path, value } => {
                let items = list_at(root, path)?;
                items.retain(|item| !item.is_string(value));
                items.push(Document::string(value.as_str()));
            }
            PatchStep::EnsureMapKeyDefault { path, key, default } => {
                let map = map_at(root, path)?;
                if !map.contains_key(key) {
                    map.insert(key.as_str(), default.clone());
                }
            }
        }
        Ok(())
    }
}

/// Ordered list of steps applied as a fold over one document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pipeline {
    steps: Vec<PatchStep>,
}

impl Pipeline {
    pub fn new(steps: Vec<PatchStep>) -> Self {
        Self { steps }
    }

    /// The prettier preset, plugin and rule injection for an ESLint config
    pub fn prettier_extras(severity: Severity) -> Self {
        Pipeline::new(vec![
            PatchStep::EnsureKey {
                path: KeyPath::new(["extends"]),
                default: Document::empty_list(),
            },
            PatchStep::EnsureAtEndOfList {
                path: KeyPath::new(["extends"]),
                value: "prettier".to_string(),
            },
            PatchStep::EnsureKey {
                path: KeyPath::new(["plugins"]),
                default: Document::empty_list(),
            },
            PatchStep::EnsureInList {
                path: KeyPath::new(["plugins"]),
                value: "prettier".to_string(),
            },
            PatchStep::EnsureKey {
                path: KeyPath::new(["rules"]),
                default: Document::empty_map(),
            },
            PatchStep::EnsureMapKeyDefault {
                path: KeyPath::new(["rules"]),
                key: "prettier/prettier".to_string(),
                default: Document::string(severity.as_str()),
            },
        ])
    }

    /// `scripts.prettier = "prettier --write <glob>"`
    pub fn prettier_script(glob: &str) -> Self {
        Pipeline::new(vec![PatchStep::SetKey {
            path: KeyPath::new(["scripts", "prettier"]),
            value: Document::string(format!("prettier --write {}", glob)),
        }])
    }

    /// Overwrite each given top-level key, leaving the others untouched
    pub fn merge_top_level(entries: &Mapping) -> Self {
        Pipeline::new(
            entries
                .iter()
                .map(|(key, value)| PatchStep::SetKey {
                    path: KeyPath::new([key]),
                    value: value.clone(),
                })
                .collect(),
        )
    }

    /// Re-root every step under `prefix`
    pub fn scoped(&self, prefix: &KeyPath) -> Self {
        Pipeline::new(
            self.steps
                .iter()
                .map(|step| step.with_path(step.path().prefixed(prefix)))
                .collect(),
        )
    }

    pub fn apply(&self, document: Document) -> PatchResult<Document> {
        self.steps.iter().try_fold(document, |mut doc, step| {
            debug!(?step, "applying patch step");
            step.apply(&mut doc)?;
            Ok(doc)
        })
    }
}

fn leaf(path: &KeyPath) -> PatchResult<(&[String], &str)> {
    path.split_last().ok_or(PatchError::SchemaMismatch {
        path: path.to_string(),
        expected: "key",
        found: "empty path",
    })
}

/// Walk to the map holding the last segment, creating or coercing parents
fn descend<'a>(root: &'a mut Document, parents: &[String]) -> PatchResult<&'a mut Mapping> {
    let mut node = root_map(root)?;
    for (depth, key) in parents.iter().enumerate() {
        let child = node.get_or_insert_with(key, Document::empty_map);
        node = coerce_map(child, || KeyPath::new(&parents[..=depth]))?;
    }
    Ok(node)
}

fn root_map(root: &mut Document) -> PatchResult<&mut Mapping> {
    if matches!(root, Document::Scalar(Scalar::Null)) {
        *root = Document::empty_map();
    }
    let found = root.kind();
    root.as_map_mut().ok_or(PatchError::SchemaMismatch {
        path: KeyPath::default().to_string(),
        expected: "map",
        found,
    })
}

/// Scalars become a fresh empty map; lists cannot be coerced
fn coerce_map(node: &mut Document, path: impl FnOnce() -> KeyPath) -> PatchResult<&mut Mapping> {
    if matches!(node, Document::Scalar(_)) {
        *node = Document::empty_map();
    }
    let found = node.kind();
    node.as_map_mut().ok_or_else(|| PatchError::SchemaMismatch {
        path: path().to_string(),
        expected: "map",
        found,
    })
}

fn map_at<'a>(root: &'a mut Document, path: &KeyPath) -> PatchResult<&'a mut Mapping> {
    let (parents, key) = leaf(path)?;
    let target = descend(root, parents)?.get_or_insert_with(key, Document::empty_map);
    coerce_map(target, || path.clone())
}

/// Null becomes an empty list, any other scalar a one-element list
fn list_at<'a>(root: &'a mut Document, path: &KeyPath) -> PatchResult<&'a mut Vec<Document>> {
    let (parents, key) = leaf(path)?;
    let target = descend(root, parents)?.get_or_insert_with(key, Document::empty_list);
    if matches!(target, Document::Scalar(_)) {
        let existing = std::mem::replace(target, Document::empty_list());
        if !matches!(existing, Document::Scalar(Scalar::Null)) {
            *target = Document::List(vec![existing]);
        }
    }
    let found = target.kind();
    target.as_list_mut().ok_or_else(|| PatchError::SchemaMismatch {
        path: path.to_string(),
        expected: "list",
        found,
    })
}
