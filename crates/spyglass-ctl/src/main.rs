//! `spyglass-ctl`: command-line inspector for pluggable template engines.

mod cli_config;
mod commands;
mod error;
mod output;
mod plugins;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use error::CtlResult;

#[derive(Debug, Parser)]
#[command(name = "spyglass-ctl", version, about = "Inspect what template engines generate", styles = output::clap_styles())]
struct Cli {
    /// Enable debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Extra directory to scan for engine plugins (repeatable)
    #[arg(long = "plugin-path", value_name = "DIR", global = true)]
    plugin_paths: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List registered engines and their output languages
    Engines {
        #[arg(short, long, value_enum, default_value_t = ListFormat::Text)]
        format: ListFormat,
    },

    /// Inspect engine plugins
    #[command(subcommand)]
    Plugin(PluginCommands),

    /// Compile a template once and print the result
    Generate(GenerateArgs),

    /// Recompile a template every time the file changes
    Watch(WatchArgs),
}

#[derive(Debug, Subcommand)]
pub(crate) enum PluginCommands {
    /// List discovered plugins
    List,
    /// Validate a plugin directory
    Validate {
        /// Directory containing spyglass-plugin.toml
        path: String,
    },
}

#[derive(Debug, Args)]
pub(crate) struct SelectionArgs {
    /// Engine id (default: configured default-engine, else the first engine)
    #[arg(short, long)]
    pub engine: Option<String>,

    /// Output language id (default: configured default-language, else the engine's first)
    #[arg(short, long)]
    pub language: Option<String>,

    /// Generate in design-time mode (line pragmas, template comments)
    #[arg(long)]
    pub design_time: bool,
}

#[derive(Debug, Args)]
pub(crate) struct GenerateArgs {
    /// Template file, or `-` to read stdin
    pub template: PathBuf,

    #[command(flatten)]
    pub selection: SelectionArgs,

    #[arg(short, long, value_enum, default_value_t = GenerateFormat::Code)]
    pub format: GenerateFormat,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub(crate) struct WatchArgs {
    /// Template file to watch
    pub template: PathBuf,

    #[command(flatten)]
    pub selection: SelectionArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ListFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum GenerateFormat {
    /// Generated source in the selected language
    Code,
    /// Syntax tree outline
    Tree,
    /// Full inspector snapshot
    Json,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("spyglass=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("spyglass=info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> CtlResult<()> {
    let mut config = cli_config::load_cli_config();
    config.plugin_paths.extend(cli.plugin_paths);

    match cli.command {
        Commands::Engines { format } => commands::handle_engines_command(format, &config),
        Commands::Plugin(cmd) => commands::handle_plugin_command(cmd, &config),
        Commands::Generate(args) => commands::handle_generate_command(args, &config),
        Commands::Watch(args) => commands::handle_watch_command(args, &config).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e);
            ExitCode::FAILURE
        }
    }
}
