// Locating the authoritative ESLint configuration of a project

use crate::codec::Format;
use crate::error::{PatchError, PatchResult};
use crate::files::read_optional;
use crate::patcher::KeyPath;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Key of `package.json` holding an embedded ESLint config
pub const PACKAGE_JSON_SECTION: &str = "eslintConfig";

/// ESLint config locations, in lookup priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EslintConfigFile {
    Js,
    Yaml,
    Yml,
    Json,
    /// `.eslintrc` holding bare JSON
    Bare,
    PackageJson,
}

impl EslintConfigFile {
    pub const CANDIDATES: [EslintConfigFile; 6] = [
        EslintConfigFile::Js,
        EslintConfigFile::Yaml,
        EslintConfigFile::Yml,
        EslintConfigFile::Json,
        EslintConfigFile::Bare,
        EslintConfigFile::PackageJson,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            EslintConfigFile::Js => ".eslintrc.js",
            EslintConfigFile::Yaml => ".eslintrc.yaml",
            EslintConfigFile::Yml => ".eslintrc.yml",
            EslintConfigFile::Json => ".eslintrc.json",
            EslintConfigFile::Bare => ".eslintrc",
            EslintConfigFile::PackageJson => "package.json",
        }
    }

    pub fn from_file_name(name: &str) -> PatchResult<Self> {
        Self::CANDIDATES
            .into_iter()
            .find(|candidate| candidate.file_name() == name)
            .ok_or_else(|| PatchError::UnsupportedConfigFormat {
                file: name.to_string(),
            })
    }

    /// Text codec for the file; `None` for JavaScript source
    pub fn format(self) -> Option<Format> {
        match self {
            EslintConfigFile::Js => None,
            EslintConfigFile::Yaml | EslintConfigFile::Yml => Some(Format::Yaml),
            EslintConfigFile::Json | EslintConfigFile::Bare | EslintConfigFile::PackageJson => Some(Format::Json),
        }
    }

    /// Where the config lives inside the decoded document
    pub fn scope(self) -> KeyPath {
        match self {
            EslintConfigFile::PackageJson => KeyPath::new([PACKAGE_JSON_SECTION]),
            _ => KeyPath::default(),
        }
    }

    async fn qualifies(self, path: &Path) -> PatchResult<bool> {
        match self {
            EslintConfigFile::PackageJson => {
                let Some(text) = read_optional(path).await? else {
                    return Ok(false);
                };
                let decoded = Format::Json.decode(&text).map_err(|e| e.at_path(path))?;
                Ok(decoded
                    .document
                    .as_map()
                    .is_some_and(|map| map.contains_key(PACKAGE_JSON_SECTION)))
            }
            _ => Ok(fs::try_exists(path)
                .await
                .map_err(|e| PatchError::from_io(path, e))?),
        }
    }
}

impl fmt::Display for EslintConfigFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub kind: EslintConfigFile,
    pub path: PathBuf,
}

impl ResolvedConfig {
    pub fn new(root: &Path, kind: EslintConfigFile) -> Self {
        Self {
            kind,
            path: root.join(kind.file_name()),
        }
    }

    /// A config file chosen by the user; its name decides how it is patched
    pub fn from_path(path: &Path) -> PatchResult<Self> {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            kind: EslintConfigFile::from_file_name(&name)?,
            path: path.to_path_buf(),
        })
    }
}

/// First candidate under `root` that qualifies, or `None`
pub async fn find_eslint_config(root: &Path) -> PatchResult<Option<ResolvedConfig>> {
    for kind in EslintConfigFile::CANDIDATES {
        let resolved = ResolvedConfig::new(root, kind);
        if kind.qualifies(&resolved.path).await? {
            debug!(file = %kind, "resolved ESLint configuration");
            return Ok(Some(resolved));
        }
    }
    debug!(root = %root.display(), "no ESLint configuration found");
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, name: &str, contents: &str) {
        std::fs::write(dir.path().join(name), contents).unwrap();
    }

    async fn resolve(dir: &TempDir) -> Option<EslintConfigFile> {
        find_eslint_config(dir.path()).await.unwrap().map(|r| r.kind)
    }

    #[tokio::test]
    async fn test_nothing_found() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(resolve(&tmp).await, None);
    }

    #[tokio::test]
    async fn test_priority_order() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp, "package.json", r#"{"eslintConfig":{}}"#);
        assert_eq!(resolve(&tmp).await, Some(EslintConfigFile::PackageJson));

        touch(&tmp, ".eslintrc", "{}");
        assert_eq!(resolve(&tmp).await, Some(EslintConfigFile::Bare));

        touch(&tmp, ".eslintrc.json", "{}");
        assert_eq!(resolve(&tmp).await, Some(EslintConfigFile::Json));

        touch(&tmp, ".eslintrc.yml", "");
        assert_eq!(resolve(&tmp).await, Some(EslintConfigFile::Yml));

        touch(&tmp, ".eslintrc.yaml", "");
        assert_eq!(resolve(&tmp).await, Some(EslintConfigFile::Yaml));

        touch(&tmp, ".eslintrc.js", "module.exports = {};");
        assert_eq!(resolve(&tmp).await, Some(EslintConfigFile::Js));
    }

    #[tokio::test]
    async fn test_package_json_needs_section() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp, "package.json", r#"{"name":"app"}"#);
        assert_eq!(resolve(&tmp).await, None);
    }

    #[tokio::test]
    async fn test_malformed_package_json_is_an_error() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp, "package.json", "{");
        let err = find_eslint_config(tmp.path()).await.unwrap_err();
        assert!(matches!(err, PatchError::MalformedDocument { .. }));
    }

    #[test]
    fn test_dispatch() {
        assert_eq!(EslintConfigFile::Js.format(), None);
        assert_eq!(EslintConfigFile::Yml.format(), Some(Format::Yaml));
        assert_eq!(EslintConfigFile::Bare.format(), Some(Format::Json));
        assert_eq!(EslintConfigFile::PackageJson.scope().to_string(), "eslintConfig");
        assert_eq!(EslintConfigFile::Json.scope().to_string(), "<root>");
    }

    #[test]
    fn test_from_path() {
        let resolved = ResolvedConfig::from_path(Path::new("config/.eslintrc.yml")).unwrap();
        assert_eq!(resolved.kind, EslintConfigFile::Yml);
        assert_eq!(resolved.path, Path::new("config/.eslintrc.yml"));

        let err = ResolvedConfig::from_path(Path::new("eslint.config.mjs")).unwrap_err();
        assert!(matches!(err, PatchError::UnsupportedConfigFormat { file } if file == "eslint.config.mjs"));
    }

    #[test]
    fn test_unknown_file_name() {
        let err = EslintConfigFile::from_file_name(".eslintrc.cjs").unwrap_err();
        assert_eq!(err.to_string(), "ESLint configuration in file .eslintrc.cjs is not supported");
        assert_eq!(
            EslintConfigFile::from_file_name(".eslintrc").unwrap(),
            EslintConfigFile::Bare
        );
    }
}
