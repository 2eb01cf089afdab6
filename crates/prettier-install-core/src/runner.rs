//! External process execution.
//!
//! Everything that shells out (package managers, git, prettier) goes through
//! [`CommandRunner`] so it can be swapped for a recording fake in tests.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Mutex;
use tracing::debug;

/// A program with its arguments and working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// How a finished process exited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    pub success: bool,
    /// Exit code; `None` when killed by a signal
    pub code: Option<i32>,
}

impl CommandStatus {
    pub fn from_code(code: i32) -> Self {
        Self {
            success: code == 0,
            code: Some(code),
        }
    }
}

#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &CommandLine) -> Result<CommandStatus>;
}

/// Runs commands for real, sharing this process's terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, command: &CommandLine) -> Result<CommandStatus> {
        debug!(%command, cwd = ?command.cwd, "spawning command");

        let mut process = tokio::process::Command::new(&command.program);
        process
            .args(&command.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if let Some(dir) = &command.cwd {
            process.current_dir(dir);
        }

        let status = process
            .status()
            .await
            .with_context(|| format!("Failed to run `{}`", command))?;
        debug!(%command, code = ?status.code(), "command finished");

        Ok(CommandStatus {
            success: status.success(),
            code: status.code(),
        })
    }
}

/// Records every command instead of running it
///
/// Answers with the queued statuses in order, then with success.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    commands: Mutex<Vec<CommandLine>>,
    statuses: Mutex<VecDeque<CommandStatus>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_statuses(statuses: impl IntoIterator<Item = CommandStatus>) -> Self {
        Self {
            commands: Mutex::default(),
            statuses: Mutex::new(statuses.into_iter().collect()),
        }
    }

    /// Rendered command lines run so far
    pub fn commands(&self) -> Vec<String> {
        self.commands
            .lock()
            .map(|commands| commands.iter().map(ToString::to_string).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, command: &CommandLine) -> Result<CommandStatus> {
        self.commands
            .lock()
            .map_err(|_| anyhow::anyhow!("command log poisoned"))?
            .push(command.clone());
        let next = self
            .statuses
            .lock()
            .map_err(|_| anyhow::anyhow!("status queue poisoned"))?
            .pop_front();
        Ok(next.unwrap_or(CommandStatus::from_code(0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let command = CommandLine::new("npm").args(["install", "--save-dev", "prettier"]);
        assert_eq!(command.to_string(), "npm install --save-dev prettier");
    }

    #[tokio::test]
    async fn test_recording_runner_replays_statuses() {
        let runner = RecordingRunner::with_statuses([CommandStatus::from_code(1)]);

        let first = runner.run(&CommandLine::new("git").args(["status"])).await.unwrap();
        let second = runner.run(&CommandLine::new("git").args(["log"])).await.unwrap();

        assert!(!first.success);
        assert!(second.success);
        assert_eq!(runner.commands(), vec!["git status", "git log"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_system_runner_reports_exit_code() {
        let runner = SystemRunner;
        let status = runner
            .run(&CommandLine::new("sh").args(["-c", "exit 3"]))
            .await
            .unwrap();
        assert_eq!(status, CommandStatus { success: false, code: Some(3) });
    }

    #[tokio::test]
    async fn test_system_runner_missing_program() {
        let err = SystemRunner
            .run(&CommandLine::new("definitely-not-a-real-program-42"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("definitely-not-a-real-program-42"));
    }
}
