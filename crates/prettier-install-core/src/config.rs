// Layered installer settings: user file, project file, then CLI flags

use crate::options::PrettierOptions;
use crate::packager::Packager;
use crate::patcher::Severity;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const DEFAULT_GLOB: &str = "**/*.js";
/// Relative to the home directory
pub const USER_CONFIG: &str = ".prettier-install/config.toml";
/// Relative to the project root
pub const PROJECT_CONFIG: &str = "prettier-install.toml";

/// One configuration layer; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialSettings {
    pub glob: Option<String>,
    pub severity: Option<Severity>,
    pub packager: Option<Packager>,
    pub commit: Option<bool>,
    pub prettier: Option<PrettierOptions>,
}

impl PartialSettings {
    /// Overlay `other`, whose set fields win
    pub fn merge(&mut self, other: PartialSettings) {
        if other.glob.is_some() {
            self.glob = other.glob;
        }
        if other.severity.is_some() {
            self.severity = other.severity;
        }
        if other.packager.is_some() {
            self.packager = other.packager;
        }
        if other.commit.is_some() {
            self.commit = other.commit;
        }
        if let Some(new_options) = other.prettier {
            match self.prettier.as_mut() {
                Some(existing) => existing.merge(&new_options),
                None => self.prettier = Some(new_options),
            }
        }
    }
}

/// Fully resolved settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub glob: String,
    pub severity: Severity,
    /// Forced package manager; detected from `PATH` when unset
    pub packager: Option<Packager>,
    pub commit: bool,
    pub prettier: PrettierOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Settings::from(PartialSettings::default())
    }
}

impl From<PartialSettings> for Settings {
    fn from(partial: PartialSettings) -> Self {
        Settings {
            glob: partial.glob.unwrap_or_else(|| DEFAULT_GLOB.to_string()),
            severity: partial.severity.unwrap_or_default(),
            packager: partial.packager,
            commit: partial.commit.unwrap_or(true),
            prettier: partial.prettier.unwrap_or_default(),
        }
    }
}

pub fn user_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(USER_CONFIG))
}

/// Load settings with precedence:
/// 1. User config (~/.prettier-install/config.toml) - lowest priority
/// 2. Project config (<root>/prettier-install.toml)
/// 3. `overrides` from the command line - highest priority
pub fn load_settings(root: &Path, overrides: PartialSettings) -> Result<Settings> {
    load_settings_from(user_config_path().as_deref(), root, overrides)
}

pub fn load_settings_from(user_config: Option<&Path>, root: &Path, overrides: PartialSettings) -> Result<Settings> {
    let mut merged = PartialSettings::default();

    // A broken user file should not block every project
    if let Some(path) = user_config.filter(|p| p.exists()) {
        match load_single_config(path) {
            Ok(cfg) => merged.merge(cfg),
            Err(e) => warn!("Failed to load user config: {:#}", e),
        }
    }

    let project_config = root.join(PROJECT_CONFIG);
    if project_config.exists() {
        merged.merge(load_single_config(&project_config)?);
    }

    merged.merge(overrides);
    let settings = Settings::from(merged);
    debug!(?settings, "loaded settings");
    Ok(settings)
}

fn load_single_config(path: &Path) -> Result<PartialSettings> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read config: {}", path.display()))?;
    let config: PartialSettings =
        toml::from_str(&content).with_context(|| format!("Failed to parse config: {}", path.display()))?;
    Ok(config)
}
