// Git working tree checks and the final commit

use crate::runner::{CommandLine, CommandRunner};
use anyhow::{bail, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const COMMIT_MESSAGE: &str = "Installed prettier";

pub fn is_git_available() -> bool {
    which::which("git").is_ok()
}

/// Closest directory at or above `start` holding a `.git` entry
pub fn find_repository(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

/// Whether the tracked files match `HEAD`
pub async fn is_working_tree_clean(runner: &dyn CommandRunner, root: &Path) -> Result<bool> {
    let command = CommandLine::new("git")
        .args(["diff-index", "--quiet", "HEAD", "--"])
        .current_dir(root);
    let status = runner.run(&command).await?;
    debug!(code = ?status.code, "checked working tree");

    match status.code {
        Some(0) => Ok(true),
        Some(1) => Ok(false),
        Some(code) => bail!("`{}` failed with exit code {}", command, code),
        None => bail!("`{}` was terminated by a signal", command),
    }
}

/// Commit every tracked change, letting the user edit the message
pub async fn commit_all(runner: &dyn CommandRunner, root: &Path) -> Result<()> {
    let command = CommandLine::new("git")
        .args(["commit", "--all", "--edit", "--message", COMMIT_MESSAGE])
        .current_dir(root);
    let status = runner.run(&command).await?;
    if !status.success {
        bail!("`{}` failed", command);
    }
    Ok(())
}
