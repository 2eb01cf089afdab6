pub mod codec;
pub mod config;
pub mod configs;
pub mod document;
pub mod error;
pub mod files;
pub mod git;
pub mod interactive;
pub mod js;
pub mod options;
pub mod packager;
pub mod patcher;
pub mod project;
pub mod resolve;
pub mod runner;

pub use error::{PatchError, PatchResult};

use anyhow::{Context as _, Result};
use config::Settings;
use files::PatchedFile;
use packager::Packager;
use project::Project;
use runner::{CommandLine, CommandRunner, SystemRunner};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Dependencies the ESLint integration needs next to prettier itself
pub const ESLINT_DEPENDENCIES: [&str; 2] = ["eslint-config-prettier", "eslint-plugin-prettier"];

/// Everything an installer step needs to run against one project
#[derive(Clone)]
pub struct Context {
    pub root: PathBuf,
    pub settings: Settings,
    /// Answer yes to every confirmation
    pub assume_yes: bool,
    pub runner: Arc<dyn CommandRunner>,
}

impl Context {
    pub fn new(root: impl Into<PathBuf>, settings: Settings, assume_yes: bool) -> Self {
        Self {
            root: root.into(),
            settings,
            assume_yes,
            runner: Arc::new(SystemRunner),
        }
    }

    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn project(&self) -> Project {
        Project::new(&self.root)
    }

    /// Configured package manager, or the first one found on `PATH`
    pub fn packager(&self) -> Result<Packager> {
        self.settings
            .packager
            .or_else(Packager::detect)
            .ok_or_else(|| anyhow::anyhow!("No packager is available."))
    }

    fn display_path<'a>(&self, path: &'a Path) -> std::path::Display<'a> {
        path.strip_prefix(&self.root).unwrap_or(path).display()
    }
}

/// Show what the installer finds in the project
pub async fn cmd_detect(ctx: &Context) -> Result<()> {
    use comfy_table::presets::UTF8_FULL;
    use comfy_table::{Cell, Color, Row, Table};

    let project = ctx.project();
    let packager = ctx.settings.packager.or_else(Packager::detect);
    let eslint = resolve::find_eslint_config(&ctx.root)
        .await
        .context("Failed to resolve ESLint configuration")?;
    let prettier_installed = project.has_module("prettier").await;
    let installed = project.installed_modules().await;
    let integration: Vec<&str> = ESLINT_DEPENDENCIES
        .into_iter()
        .filter(|dep| installed.iter().any(|m| m == dep))
        .collect();
    let has_script = project.has_script("prettier").await;

    interactive::print_header("prettier-install");

    let found = |yes: bool, text: String| Cell::new(text).fg(if yes { Color::Green } else { Color::Yellow });
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.add_row(Row::from(vec![
        Cell::new("Project").fg(Color::Cyan),
        Cell::new(ctx.root.display().to_string()).fg(Color::White),
    ]));
    table.add_row(Row::from(vec![
        Cell::new("Packager").fg(Color::Cyan),
        found(
            packager.is_some(),
            packager.map_or_else(|| "not found".to_string(), |p| p.to_string()),
        ),
    ]));
    table.add_row(Row::from(vec![
        Cell::new("Git").fg(Color::Cyan),
        found(
            git::is_git_available(),
            if git::is_git_available() { "available" } else { "not found" }.to_string(),
        ),
    ]));
    table.add_row(Row::from(vec![
        Cell::new("ESLint config").fg(Color::Cyan),
        found(
            eslint.is_some(),
            eslint.map_or_else(|| "none".to_string(), |r| r.kind.to_string()),
        ),
    ]));
    table.add_row(Row::from(vec![
        Cell::new("Prettier").fg(Color::Cyan),
        found(
            prettier_installed,
            if prettier_installed { "installed" } else { "not installed" }.to_string(),
        ),
    ]));
    table.add_row(Row::from(vec![
        Cell::new("ESLint integration").fg(Color::Cyan),
        found(
            integration.len() == ESLINT_DEPENDENCIES.len(),
            if integration.is_empty() {
                "not installed".to_string()
            } else {
                integration.join(", ")
            },
        ),
    ]));
    table.add_row(Row::from(vec![
        Cell::new("Prettier script").fg(Color::Cyan),
        found(has_script, if has_script { "present" } else { "missing" }.to_string()),
    ]));

    println!("{}", table);
    println!();
    Ok(())
}

/// Ask before touching files when git reports uncommitted changes
pub async fn ensure_safe_changes(ctx: &Context) -> Result<()> {
    if !git::is_git_available() || git::find_repository(&ctx.root).is_none() {
        debug!("not a git checkout, skipping working tree check");
        return Ok(());
    }
    if git::is_working_tree_clean(ctx.runner.as_ref(), &ctx.root).await? {
        return Ok(());
    }
    if interactive::confirm("Working tree is not clean. Proceed anyway?", false, ctx.assume_yes)? {
        return Ok(());
    }
    anyhow::bail!("Aborted: working tree is not clean")
}

async fn install_modules(ctx: &Context, modules: &[&str]) -> Result<()> {
    let command = ctx.packager()?.install_command(modules, &ctx.root);
    interactive::print_info("Installing dev dependencies:");
    for module in modules {
        interactive::print_item(module);
    }
    interactive::print_info(&format!("Running {}", command));
    let status = ctx.runner.run(&command).await?;
    if !status.success {
        anyhow::bail!("`{}` failed", command);
    }
    Ok(())
}

fn report(ctx: &Context, file: &PatchedFile) {
    let name = ctx.display_path(&file.path);
    if file.created {
        interactive::print_success(&format!("Created {}", name));
    } else if file.changed {
        interactive::print_success(&format!("Updated {}", name));
    } else {
        interactive::print_info(&format!("{} is already up to date", name));
    }
}

/// Install prettier unless the project already has it
pub async fn cmd_install_prettier(ctx: &Context) -> Result<()> {
    if ctx.project().has_module("prettier").await {
        interactive::print_info("Prettier is already installed, skipping");
        return Ok(());
    }
    ensure_safe_changes(ctx).await?;
    install_modules(ctx, &["prettier"]).await?;
    interactive::print_success("Prettier installed!");
    Ok(())
}

/// Install the ESLint integration packages and patch the ESLint config
///
/// `config` names the file to patch, relative to the project root, instead of
/// resolving it from the candidate list.
pub async fn cmd_eslint(ctx: &Context, config: Option<&Path>, create: bool, install: bool) -> Result<()> {
    ensure_safe_changes(ctx).await?;

    if install {
        let declared = ctx.project().dependencies().await;
        let missing: Vec<&str> = ESLINT_DEPENDENCIES
            .into_iter()
            .filter(|dep| !declared.iter().any(|d| d == *dep))
            .collect();
        if missing.is_empty() {
            debug!("ESLint integration packages already declared");
        } else {
            install_modules(ctx, &missing).await?;
        }
    }

    let severity = ctx.settings.severity;
    let patched = match config {
        Some(file) => configs::patch_eslint_config_file(&ctx.root.join(file), severity).await,
        None => configs::patch_eslint_config(&ctx.root, severity, create).await,
    }
    .context("Failed to update ESLint configuration")?;
    report(ctx, &patched);
    Ok(())
}

/// Add the `prettier` script to `package.json`
pub async fn cmd_script(ctx: &Context, force: bool) -> Result<()> {
    let glob = ctx.settings.glob.as_str();
    globset::Glob::new(glob).with_context(|| format!("Invalid glob pattern '{}'", glob))?;

    if !force && ctx.project().has_script("prettier").await {
        interactive::print_info("A prettier script already exists, skipping (use --force to replace it)");
        return Ok(());
    }

    ensure_safe_changes(ctx).await?;
    let patched = configs::patch_package_json_script(&ctx.root, glob)
        .await
        .context("Failed to update package.json")?;
    report(ctx, &patched);
    Ok(())
}

/// Write the configured prettier options into `.prettierrc`
pub async fn cmd_prettierrc(ctx: &Context) -> Result<()> {
    let options = ctx.settings.prettier.to_document();
    if options.is_empty() {
        interactive::print_info("No prettier options given, leaving .prettierrc alone");
        return Ok(());
    }

    ensure_safe_changes(ctx).await?;
    match configs::patch_prettier_rc(&ctx.root, &options)
        .await
        .context("Failed to update .prettierrc")?
    {
        Some(patched) => report(ctx, &patched),
        None => interactive::print_info(".prettierrc already holds these options"),
    }
    Ok(())
}

/// Reformat the project with its local prettier
pub async fn cmd_format(ctx: &Context) -> Result<()> {
    let project = ctx.project();
    if !project.is_module_installed("prettier").await {
        interactive::print_warning("Prettier is not installed in node_modules, skipping");
        return Ok(());
    }

    ensure_safe_changes(ctx).await?;
    let command = CommandLine::new(project.prettier_bin().to_string_lossy())
        .args(ctx.settings.prettier.to_arguments())
        .args(["--write", ctx.settings.glob.as_str()])
        .current_dir(&ctx.root);
    let status = ctx.runner.run(&command).await?;
    if !status.success {
        anyhow::bail!("Prettier failed to format files");
    }
    interactive::print_success("Files formatted with prettier");
    Ok(())
}

/// Commit everything the installer changed
pub async fn cmd_commit(ctx: &Context) -> Result<()> {
    if !ctx.settings.commit {
        interactive::print_info("Committing is disabled in settings, skipping");
        return Ok(());
    }
    if !git::is_git_available() {
        interactive::print_info("Git executable is not available");
        return Ok(());
    }
    if git::find_repository(&ctx.root).is_none() {
        interactive::print_info("Not a git repository, skipping commit");
        return Ok(());
    }
    git::commit_all(ctx.runner.as_ref(), &ctx.root).await?;
    interactive::print_success("Changes committed");
    Ok(())
}
