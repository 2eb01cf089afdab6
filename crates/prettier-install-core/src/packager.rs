// Package manager detection and install commands

use crate::runner::CommandLine;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Packager {
    Yarn,
    Npm,
}

impl Packager {
    /// Preference order when both are installed
    pub const ALL: [Packager; 2] = [Packager::Yarn, Packager::Npm];

    pub fn executable(self) -> &'static str {
        match self {
            Packager::Yarn => "yarn",
            Packager::Npm => "npm",
        }
    }

    /// First packager found on `PATH`
    pub fn detect() -> Option<Packager> {
        Self::detect_with(|name| which::which(name).is_ok())
    }

    fn detect_with(found: impl Fn(&str) -> bool) -> Option<Packager> {
        let packager = Self::ALL.into_iter().find(|p| found(p.executable()));
        debug!(?packager, "detected package manager");
        packager
    }

    /// Command adding `dependencies` as dev dependencies of the project at `root`
    pub fn install_command(self, dependencies: &[&str], root: &Path) -> CommandLine {
        let command = match self {
            Packager::Yarn => CommandLine::new("yarn").args(["add", "--dev"]),
            Packager::Npm => CommandLine::new("npm").args(["install", "--save-dev"]),
        };
        command.args(dependencies.iter().copied()).current_dir(root)
    }
}

impl fmt::Display for Packager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.executable())
    }
}

impl FromStr for Packager {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yarn" => Ok(Packager::Yarn),
            "npm" => Ok(Packager::Npm),
            other => Err(format!("unknown packager '{}' (expected yarn or npm)", other)),
        }
    }
}
