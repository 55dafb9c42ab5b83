//! Termfolio CLI - serve or browse the terminal portfolio

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use termfolio::config::{
    DEFAULT_DATA_PATH, DEFAULT_HOST, DEFAULT_MAX_SESSIONS, DEFAULT_PORT, DEFAULT_TICK_MS,
};
use termfolio::{
    ContentProvider, DataLoader, FixSuggestion, FolioError, PortfolioContent, Server,
    ServerConfig,
};

#[derive(Parser)]
#[command(name = "termfolio")]
#[command(about = "Termfolio - interactive terminal portfolio")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the portfolio to remote terminals (telnet)
    Serve {
        /// Address to bind
        #[arg(long, env = "TERMFOLIO_HOST", default_value = DEFAULT_HOST)]
        host: String,

        /// Port to listen on
        #[arg(short, long, env = "TERMFOLIO_PORT", default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Portfolio data file (.json, .yaml, .yml)
        #[arg(short, long, env = "TERMFOLIO_DATA", default_value = DEFAULT_DATA_PATH)]
        data: PathBuf,

        /// Animation tick interval in milliseconds
        #[arg(long, env = "TERMFOLIO_TICK_MS", default_value_t = DEFAULT_TICK_MS)]
        tick_ms: u64,

        /// Maximum concurrent sessions
        #[arg(long, env = "TERMFOLIO_MAX_SESSIONS", default_value_t = DEFAULT_MAX_SESSIONS)]
        max_sessions: usize,
    },

    /// Browse the portfolio in this terminal
    Local {
        /// Portfolio data file (.json, .yaml, .yml)
        #[arg(short, long, env = "TERMFOLIO_DATA", default_value = DEFAULT_DATA_PATH)]
        data: PathBuf,

        /// Start with particle effects off
        #[arg(long)]
        no_effects: bool,

        /// Write logs to this file (logging is off otherwise)
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// Validate a portfolio data file
    Validate {
        /// Path to the data file
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (ignore if not present)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve {
            host,
            port,
            data,
            tick_ms,
            max_sessions,
        } => {
            init_tracing();
            serve(host, port, data, tick_ms, max_sessions).await
        }
        Commands::Local {
            data,
            no_effects,
            log_file,
        } => local(&data, !no_effects, log_file.as_deref()).await,
        Commands::Validate { path } => validate(&path),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        if let Some(suggestion) = e
            .downcast_ref::<FolioError>()
            .and_then(|e| e.fix_suggestion())
        {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into())
}

/// Logs to stderr
fn init_tracing() {
    tracing_subscriber::fmt().with_env_filter(env_filter()).init();
}

/// Logs to a file; the terminal belongs to the TUI
fn init_file_tracing(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

/// Load and validate portfolio content, falling back to placeholders when the
/// file is missing
fn load_content(path: &Path) -> Result<Arc<dyn ContentProvider>, FolioError> {
    let mut loader = DataLoader::new(path);
    match loader.load() {
        Ok(()) => loader.validate()?,
        Err(FolioError::DataNotFound { path }) => {
            warn!(path = %path.display(), "Data file not found, serving fallback content");
        }
        Err(e) => return Err(e),
    }
    Ok(Arc::new(PortfolioContent::new(loader)))
}

async fn serve(
    host: String,
    port: u16,
    data: PathBuf,
    tick_ms: u64,
    max_sessions: usize,
) -> anyhow::Result<()> {
    let config = ServerConfig::new(host, port, data, tick_ms, max_sessions)?;
    let content = load_content(&config.data_path)?;

    println!(
        "{} Portfolio server on {}",
        "→".cyan(),
        config.bind_address().cyan().bold()
    );
    println!(
        "  Connect with: {}",
        config.connect_command().green().bold()
    );
    println!("  Press Ctrl+C to stop");

    Server::new(config, content).run().await?;
    Ok(())
}

async fn local(data: &Path, effects: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    if let Some(path) = log_file {
        init_file_tracing(path)?;
    }
    let content = load_content(data)?;
    termfolio::tui::run(content, effects).await
}

fn validate(path: &Path) -> anyhow::Result<()> {
    let mut loader = DataLoader::new(path);
    loader.load()?;
    loader.validate()?;

    let name = loader.personal().map_or("", |p| p.name.as_str());
    println!("{} Portfolio data is valid: {}", "✓".green(), path.display());
    println!("  Name: {}", name);
    println!("  Experiences: {}", loader.experiences().len());
    println!("  Skill categories: {}", loader.skills().len());
    println!("  Projects: {}", loader.projects().len());
    println!("  Tech facts: {}", loader.tech_facts().len());

    Ok(())
}
