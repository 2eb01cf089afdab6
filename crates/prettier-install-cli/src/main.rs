use anyhow::{Context as _, Result};
use clap::{Args, Parser, Subcommand};
use prettier_install_core::config::{load_settings, PartialSettings};
use prettier_install_core::options::{PrettierOptions, TrailingComma};
use prettier_install_core::packager::Packager;
use prettier_install_core::patcher::Severity;
use prettier_install_core::Context;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "prettier-install", version, about = "Add Prettier to a JavaScript project")]
struct Cli {
    /// Project directory (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    cwd: Option<PathBuf>,
    /// Show debug logs
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Answer yes to every confirmation
    #[arg(short = 'y', long, global = true)]
    yes: bool,
    /// Package manager to use instead of detecting one
    #[arg(long, global = true, value_name = "npm|yarn")]
    packager: Option<Packager>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show packager, git, ESLint config and prettier status
    Detect,
    /// Install prettier as a dev dependency
    InstallPrettier,
    /// Install the ESLint integration and patch the ESLint config
    Eslint {
        /// Severity of the prettier/prettier rule
        #[arg(long, value_name = "error|warn")]
        severity: Option<Severity>,
        /// ESLint config file to patch instead of the one found in the project
        #[arg(long, value_name = "FILE", conflicts_with = "create")]
        config: Option<PathBuf>,
        /// Create .eslintrc.json when the project has no ESLint config
        #[arg(long)]
        create: bool,
        /// Only patch the config, do not install packages
        #[arg(long)]
        no_install: bool,
    },
    /// Add a `prettier` script to package.json
    Script {
        /// Files the script formats
        #[arg(long)]
        glob: Option<String>,
        /// Replace an existing prettier script
        #[arg(long)]
        force: bool,
    },
    /// Write prettier options into .prettierrc
    Prettierrc {
        #[command(flatten)]
        options: PrettierFlags,
    },
    /// Run the project's prettier over its files
    Format {
        /// Files to format
        #[arg(long)]
        glob: Option<String>,
        #[command(flatten)]
        options: PrettierFlags,
    },
    /// Commit all changes with git
    Commit,
}

/// Prettier's own formatting flags
#[derive(Args)]
struct PrettierFlags {
    #[arg(long, value_name = "N")]
    print_width: Option<u32>,
    #[arg(long, value_name = "N")]
    tab_width: Option<u32>,
    #[arg(long)]
    use_tabs: bool,
    #[arg(long)]
    no_semi: bool,
    #[arg(long)]
    single_quote: bool,
    #[arg(long, value_name = "none|es5|all")]
    trailing_comma: Option<TrailingComma>,
    #[arg(long)]
    no_bracket_spacing: bool,
    #[arg(long)]
    jsx_bracket_same_line: bool,
}

impl PrettierFlags {
    /// Only flags that were actually passed
    fn to_options(&self) -> Option<PrettierOptions> {
        let options = PrettierOptions {
            print_width: self.print_width,
            tab_width: self.tab_width,
            use_tabs: self.use_tabs.then_some(true),
            semi: self.no_semi.then_some(false),
            single_quote: self.single_quote.then_some(true),
            trailing_comma: self.trailing_comma,
            bracket_spacing: self.no_bracket_spacing.then_some(false),
            jsx_bracket_same_line: self.jsx_bracket_same_line.then_some(true),
        };
        (options != PrettierOptions::default()).then_some(options)
    }
}

impl Cli {
    /// Settings given on the command line, applied over the config files
    fn overrides(&self) -> PartialSettings {
        let mut overrides = PartialSettings {
            packager: self.packager,
            ..Default::default()
        };
        match &self.cmd {
            Command::Eslint { severity, .. } => overrides.severity = *severity,
            Command::Script { glob, .. } => overrides.glob = glob.clone(),
            Command::Prettierrc { options } => overrides.prettier = options.to_options(),
            Command::Format { glob, options } => {
                overrides.glob = glob.clone();
                overrides.prettier = options.to_options();
            }
            Command::Detect | Command::InstallPrettier | Command::Commit => {}
        }
        overrides
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("PRETTIER_INSTALL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let root = match &cli.cwd {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("Failed to read current directory")?,
    };
    if !root.is_dir() {
        anyhow::bail!("Project directory {} does not exist", root.display());
    }

    tracing::debug!(root = %root.display(), "resolved project root");
    let settings = load_settings(&root, cli.overrides())?;
    let ctx = Context::new(root, settings, cli.yes);

    match cli.cmd {
        Command::Detect => prettier_install_core::cmd_detect(&ctx).await?,
        Command::InstallPrettier => prettier_install_core::cmd_install_prettier(&ctx).await?,
        Command::Eslint {
            config,
            create,
            no_install,
            ..
        } => prettier_install_core::cmd_eslint(&ctx, config.as_deref(), create, !no_install).await?,
        Command::Script { force, .. } => prettier_install_core::cmd_script(&ctx, force).await?,
        Command::Prettierrc { .. } => prettier_install_core::cmd_prettierrc(&ctx).await?,
        Command::Format { .. } => prettier_install_core::cmd_format(&ctx).await?,
        Command::Commit => prettier_install_core::cmd_commit(&ctx).await?,
    }
    Ok(())
}
