// Read-modify-write of a single configuration file

use crate::codec::{Decoded, Format, Style};
use crate::document::Document;
use crate::error::{PatchError, PatchResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Outcome of rewriting one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchedFile {
    pub path: PathBuf,
    /// File did not exist before the patch
    pub created: bool,
    /// Contents differ from what was on disk
    pub changed: bool,
}

/// File contents, or `None` when the file does not exist
pub async fn read_optional(path: &Path) -> PatchResult<Option<String>> {
    match fs::read_to_string(path).await {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(PatchError::from_io(path, e)),
    }
}

/// Decode a file, or an empty map with the default layout when it is absent
pub async fn read_document(path: &Path, format: Format) -> PatchResult<Decoded> {
    match read_optional(path).await? {
        Some(text) => format.decode(&text).map_err(|e| e.at_path(path)),
        None => Ok(Decoded {
            document: Document::empty_map(),
            style: Style::fresh(),
        }),
    }
}

/// Rewrite `path` from its current text; the new text is fully built before writing
pub async fn rewrite_file<F>(path: &Path, rewrite: F) -> PatchResult<PatchedFile>
where
    F: FnOnce(Option<&str>) -> PatchResult<String>,
{
    let original = read_optional(path).await?;
    let updated = rewrite(original.as_deref())?;

    let changed = original.as_deref() != Some(updated.as_str());
    if changed {
        fs::write(path, &updated)
            .await
            .map_err(|e| PatchError::from_io(path, e))?;
        info!(path = %path.display(), created = original.is_none(), "wrote file");
    } else {
        debug!(path = %path.display(), "file already up to date");
    }

    Ok(PatchedFile {
        path: path.to_path_buf(),
        created: original.is_none(),
        changed,
    })
}

/// Decode, transform and re-encode a JSON or YAML file with its original layout
pub async fn patch_file<F>(path: &Path, format: Format, transform: F) -> PatchResult<PatchedFile>
where
    F: FnOnce(Document) -> PatchResult<Document>,
{
    rewrite_file(path, |text| {
        let decoded = match text {
            Some(text) => format.decode(text).map_err(|e| e.at_path(path))?,
            None => Decoded {
                document: Document::empty_map(),
                style: Style::fresh(),
            },
        };
        let document = transform(decoded.document)?;
        Ok(format.encode(&document, &decoded.style))
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patcher::{Pipeline, Severity};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_is_created_from_empty_document() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".eslintrc.json");

        let result = patch_file(&path, Format::Json, |doc| {
            assert_eq!(doc, Document::empty_map());
            Pipeline::prettier_extras(Severity::Error).apply(doc)
        })
        .await
        .unwrap();

        assert!(result.created);
        assert!(result.changed);
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("{\n  \"extends\": [\n    \"prettier\"\n  ]"));
    }

    #[tokio::test]
    async fn test_unchanged_file_is_not_rewritten() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("package.json");
        std::fs::write(&path, "{\n  \"name\": \"app\"\n}\n").unwrap();

        let result = patch_file(&path, Format::Json, Ok).await.unwrap();

        assert!(!result.created);
        assert!(!result.changed);
    }

    #[tokio::test]
    async fn test_malformed_file_names_its_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".eslintrc");
        std::fs::write(&path, "{ nope").unwrap();

        let err = patch_file(&path, Format::Json, Ok).await.unwrap_err();
        match err {
            PatchError::MalformedDocument { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ nope");
    }

    #[tokio::test]
    async fn test_failed_transform_leaves_file_untouched() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".eslintrc.json");
        std::fs::write(&path, r#"{"rules":[]}"#).unwrap();

        let err = patch_file(&path, Format::Json, |doc| {
            Pipeline::prettier_extras(Severity::Error).apply(doc)
        })
        .await
        .unwrap_err();

        assert!(matches!(err, PatchError::SchemaMismatch { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), r#"{"rules":[]}"#);
    }

    #[tokio::test]
    async fn test_read_optional_missing() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(read_optional(&tmp.path().join("nope")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unreadable_target_is_an_io_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("package.json");
        std::fs::create_dir(&path).unwrap();

        let err = patch_file(&path, Format::Json, |doc| {
            Pipeline::prettier_extras(Severity::Error).apply(doc)
        })
        .await
        .unwrap_err();

        match err {
            PatchError::Io { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error {other:?}"),
        }
        assert!(path.is_dir());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_permission_denied_is_surfaced_without_writing() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".eslintrc.json");
        std::fs::write(&path, "{}").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o000)).unwrap();
        if std::fs::read(&path).is_ok() {
            // running as root, permissions are not enforced
            return;
        }

        let err = patch_file(&path, Format::Json, |doc| {
            Pipeline::prettier_extras(Severity::Error).apply(doc)
        })
        .await
        .unwrap_err();

        assert!(matches!(err, PatchError::Permission { .. }));
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }
}
