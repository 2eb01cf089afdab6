// What the installer knows about the JavaScript project it runs in

use crate::codec::Format;
use crate::configs::PACKAGE_JSON;
use crate::document::{Document, Mapping};
use crate::files::read_optional;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

pub const NODE_MODULES: &str = "node_modules";

#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
}

impl Project {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `package.json`, or an empty map when it is missing or unreadable
    async fn manifest(&self) -> Mapping {
        let path = self.root.join(PACKAGE_JSON);
        let text = match read_optional(&path).await {
            Ok(Some(text)) => text,
            Ok(None) => return Mapping::new(),
            Err(e) => {
                warn!(error = %e, "cannot read {}", PACKAGE_JSON);
                return Mapping::new();
            }
        };
        match Format::Json.decode(&text) {
            Ok(decoded) => match decoded.document {
                Document::Map(map) => map,
                _ => Mapping::new(),
            },
            Err(e) => {
                warn!(error = %e, "ignoring malformed {}", PACKAGE_JSON);
                Mapping::new()
            }
        }
    }

    /// Names from `dependencies` and `devDependencies`
    pub async fn dependencies(&self) -> Vec<String> {
        let manifest = self.manifest().await;
        let mut names: Vec<String> = Vec::new();
        for section in ["dependencies", "devDependencies"] {
            if let Some(deps) = manifest.get(section).and_then(Document::as_map) {
                for name in deps.keys() {
                    if !names.iter().any(|n| n == name) {
                        names.push(name.to_string());
                    }
                }
            }
        }
        names
    }

    pub async fn scripts(&self) -> Mapping {
        match self.manifest().await.remove("scripts") {
            Some(Document::Map(scripts)) => scripts,
            _ => Mapping::new(),
        }
    }

    pub async fn has_script(&self, name: &str) -> bool {
        self.scripts().await.contains_key(name)
    }

    /// Entries of `node_modules`; empty when it does not exist
    pub async fn installed_modules(&self) -> Vec<String> {
        let mut modules = Vec::new();
        let Ok(mut entries) = fs::read_dir(self.root.join(NODE_MODULES)).await else {
            return modules;
        };
        while let Ok(Some(entry)) = entries.next_entry().await {
            modules.push(entry.file_name().to_string_lossy().into_owned());
        }
        modules.sort();
        modules
    }

    pub async fn directory_exists(&self, relative: impl AsRef<Path>) -> bool {
        fs::metadata(self.root.join(relative))
            .await
            .is_ok_and(|meta| meta.is_dir())
    }

    pub async fn is_module_installed(&self, name: &str) -> bool {
        self.directory_exists(Path::new(NODE_MODULES).join(name)).await
    }

    /// Declared as a dependency and present in `node_modules`
    pub async fn has_module(&self, name: &str) -> bool {
        let declared = self.dependencies().await.iter().any(|dep| dep == name);
        let installed = declared && self.is_module_installed(name).await;
        debug!(module = name, declared, installed, "checked module");
        installed
    }

    /// The project's local prettier executable
    pub fn prettier_bin(&self) -> PathBuf {
        self.root.join(NODE_MODULES).join(".bin").join("prettier")
    }
}
