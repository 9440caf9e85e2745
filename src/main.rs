use clap::{Parser, Subcommand};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use proflog::cli::commands::analyze::AnalyzeOptions;
use proflog::config::{Config, ConfigLoader, OutputFormat};

#[derive(Parser)]
#[command(name = "proflog")]
#[command(
    version,
    about = "Lists the functions and methods defined in a Python repository"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, short, help = "Config file to use instead of .proflog/config.toml")]
    config: Option<PathBuf>,

    #[arg(long)]
    verbose: bool,

    #[arg(long, short)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a local directory
    Analyze {
        #[arg(help = "Repository root to analyze")]
        path: PathBuf,
        #[arg(
            long,
            short,
            help = "Path substring to skip (repeatable, replaces configured patterns)"
        )]
        exclude: Vec<String>,
        #[arg(short = 'f', long, help = "Output format: text, json")]
        format: Option<OutputFormat>,
    },

    /// Clone a git repository into the workspace and analyze it
    Clone {
        #[arg(help = "Repository URL")]
        url: String,
        #[arg(long, help = "Clone target (default: workspace.dir)")]
        target_dir: Option<PathBuf>,
        #[arg(
            long,
            short,
            help = "Path substring to skip (repeatable, replaces configured patterns)"
        )]
        exclude: Vec<String>,
        #[arg(short = 'f', long, help = "Output format: text, json")]
        format: Option<OutputFormat>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(short = 'g', long, help = "Show global config file only")]
        global: bool,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: OutputFormat,
    },
    /// Show configuration file paths
    Path,
    /// Initialize configuration
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mproflog encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        config.log.level.as_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_layer = match &config.log.file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(Arc::new(file))
                    .with_ansi(false)
                    .boxed(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(())
}

fn exclude_override(exclude: Vec<String>) -> Option<Vec<String>> {
    (!exclude.is_empty()).then_some(exclude)
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = ConfigLoader::load_with(cli.config.as_deref())?;
    init_tracing(&cli, &config)?;

    match cli.command {
        Commands::Analyze {
            path,
            exclude,
            format,
        } => {
            let options = AnalyzeOptions {
                exclude: exclude_override(exclude),
                format,
            };
            proflog::cli::commands::analyze::run(&path, &options, &config)?;
        }
        Commands::Clone {
            url,
            target_dir,
            exclude,
            format,
        } => {
            let options = AnalyzeOptions {
                exclude: exclude_override(exclude),
                format,
            };
            proflog::cli::commands::clone::run(&url, target_dir, &options, &config)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { global, format } => {
                proflog::cli::commands::config::show(global, format, &config)?;
            }
            ConfigAction::Path => {
                proflog::cli::commands::config::path()?;
            }
            ConfigAction::Init { global, force } => {
                proflog::cli::commands::config::init(global, force)?;
            }
        },
    }

    Ok(())
}
