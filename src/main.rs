//! modelprobe CLI - find the working models behind a gateway.

use chrono::Local;
use clap::{Parser, Subcommand};
use modelprobe::config::{Config, LogVerbosity};
use modelprobe::logger::env_filter;
use modelprobe::report::Summary;
use modelprobe::tester::GatewayTester;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*};

const RULE: &str = "============================================================";

#[derive(Parser)]
#[command(name = "modelprobe")]
#[command(about = "Probe every provider/model behind a gateway and report the working ones")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover and probe all models (default)
    Run {
        /// Gateway base URL (overrides CUSTOM_API_URL)
        #[arg(short, long)]
        api_url: Option<String>,

        /// Directory for working_results.txt and last_run.txt
        #[arg(short, long)]
        working_dir: Option<PathBuf>,

        /// Per-probe log verbosity
        #[arg(short, long, value_enum)]
        log_level: Option<LogLevel>,

        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show current configuration
    Config {
        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum LogLevel {
    Minimal,
    Compact,
    Verbose,
}

impl From<LogLevel> for LogVerbosity {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Minimal => LogVerbosity::Minimal,
            LogLevel::Compact => LogVerbosity::Compact,
            LogLevel::Verbose => LogVerbosity::Verbose,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Run { api_url, working_dir, log_level, config }) => {
            run(api_url, working_dir, log_level, config).await?;
        }
        Some(Commands::Config { path }) => {
            show_config(path)?;
        }
        None => {
            run(None, None, None, None).await?;
        }
    }

    Ok(())
}

async fn run(
    api_url: Option<String>,
    working_dir: Option<PathBuf>,
    log_level: Option<LogLevel>,
    config_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(env_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .init();

    let mut config = match config_path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    }
    .with_env_overrides();

    if let Some(url) = api_url {
        config.gateway.api_url = url;
    }
    if let Some(dir) = working_dir {
        config.output.working_dir = dir;
    }
    if let Some(level) = log_level {
        config.app.log_verbosity = level.into();
    }

    let tester = GatewayTester::new(config);
    print_banner(tester.api_url());

    println!("\nStarting tests...");
    let results = tester.run().await?;

    if results.is_empty() {
        println!("\nNo results to save!");
    } else {
        let saved = tester.save_results(&results, Local::now().naive_local())?;
        tracing::info!("Marker written to {}", saved.last_run_path.display());
        println!("\n{}", Summary::from_results(&results).render(tester.api_url()));
    }

    println!("\n{}", RULE);
    println!("TESTING COMPLETE!");
    println!("{}", RULE);
    Ok(())
}

fn print_banner(api_url: &str) {
    println!("{}", RULE);
    println!("CUSTOM API PROVIDER/MODEL TESTER");
    println!("{}", RULE);
    println!("Testing API: {}", api_url);
    println!("Workflow:");
    println!("   1. GET /v1/providers -> Get provider IDs (excluding 'Custom')");
    println!("   2. GET /api/{{provider}}/models -> Get model IDs");
    println!("   3. POST /api/{{provider}}/chat/completions -> Test each model");
    println!("   4. Generate working_results.txt -> Provider|Model|MediaType");
    println!("{}", RULE);
}

fn show_config(show_path: bool) -> anyhow::Result<()> {
    if show_path {
        println!("{}", Config::default_path().display());
        return Ok(());
    }

    let config = Config::load()?.with_env_overrides();
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
