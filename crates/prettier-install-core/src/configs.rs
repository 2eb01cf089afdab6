//! Patch operations on a project's configuration files.
//!
//! Each operation reads one file, applies its transform in memory and writes
//! the result back in a single call, so a failure never leaves a half-written
//! file behind.

use crate::codec::Format;
use crate::document::{Document, Mapping};
use crate::error::{PatchError, PatchResult};
use crate::files::{patch_file, read_document, read_optional, rewrite_file, PatchedFile};
use crate::js::update_eslintrc_contents;
use crate::patcher::{Pipeline, Severity};
use crate::resolve::{find_eslint_config, EslintConfigFile, ResolvedConfig};
use std::path::Path;
use tracing::{debug, info};

pub const PACKAGE_JSON: &str = "package.json";
pub const PRETTIERRC: &str = ".prettierrc";

/// Inject the prettier preset, plugin and rule into the project's ESLint config
///
/// With `create`, a project without any config gets a new `.eslintrc.json`;
/// otherwise that case is [`PatchError::NotFound`].
pub async fn patch_eslint_config(root: &Path, severity: Severity, create: bool) -> PatchResult<PatchedFile> {
    let resolved = match find_eslint_config(root).await? {
        Some(resolved) => resolved,
        None if create => {
            info!("no ESLint configuration found, creating one");
            ResolvedConfig::new(root, EslintConfigFile::Json)
        }
        None => {
            return Err(PatchError::NotFound {
                path: root.join(EslintConfigFile::Json.file_name()),
            })
        }
    };
    patch_resolved(&resolved, severity).await
}

/// Like [`patch_eslint_config`] for a file named explicitly
///
/// The file must exist and carry one of the known ESLint config file names;
/// any other name is [`PatchError::UnsupportedConfigFormat`].
pub async fn patch_eslint_config_file(path: &Path, severity: Severity) -> PatchResult<PatchedFile> {
    let resolved = ResolvedConfig::from_path(path)?;
    if read_optional(&resolved.path).await?.is_none() {
        return Err(PatchError::NotFound { path: resolved.path });
    }
    patch_resolved(&resolved, severity).await
}

async fn patch_resolved(resolved: &ResolvedConfig, severity: Severity) -> PatchResult<PatchedFile> {
    debug!(file = %resolved.kind, %severity, "patching ESLint configuration");

    match resolved.kind.format() {
        None => {
            rewrite_file(&resolved.path, |text| {
                update_eslintrc_contents(text.unwrap_or_default(), severity)
            })
            .await
        }
        Some(format) => {
            let pipeline = Pipeline::prettier_extras(severity).scoped(&resolved.kind.scope());
            patch_file(&resolved.path, format, |document| pipeline.apply(document)).await
        }
    }
}

/// Set `scripts.prettier` in `package.json` to `prettier --write <glob>`
pub async fn patch_package_json_script(root: &Path, glob: &str) -> PatchResult<PatchedFile> {
    let pipeline = Pipeline::prettier_script(glob);
    patch_file(&root.join(PACKAGE_JSON), Format::Json, |document| pipeline.apply(document)).await
}

/// Merge `options` into `.prettierrc`, creating it when absent
///
/// Returns `None` when there is nothing to do: no options were given, or the
/// file already holds every requested value.
pub async fn patch_prettier_rc(root: &Path, options: &Mapping) -> PatchResult<Option<PatchedFile>> {
    if options.is_empty() {
        debug!("no prettier options given, leaving {} alone", PRETTIERRC);
        return Ok(None);
    }

    let path = root.join(PRETTIERRC);
    let current = read_document(&path, Format::Json).await?;
    if holds_all(&current.document, options) {
        debug!("{} already up to date", PRETTIERRC);
        return Ok(None);
    }

    let pipeline = Pipeline::merge_top_level(options);
    patch_file(&path, Format::Json, |document| pipeline.apply(document))
        .await
        .map(Some)
}

fn holds_all(document: &Document, options: &Mapping) -> bool {
    document
        .as_map()
        .is_some_and(|existing| options.iter().all(|(key, value)| existing.get(key) == Some(value)))
}
