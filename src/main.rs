mod config;
mod poller;
mod replay;
mod status;

use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use crate::config::Config;
use crate::replay::ReplaySource;
use crate::status::{normalize, RawRtkStatus, RtkStatus};

#[derive(Parser)]
#[command(name = "rtkmon")]
#[command(about = "RTK base station status monitor")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a single raw snapshot file and print it
    Normalize {
        snapshot: String,
        #[arg(long)]
        pretty: bool,
    },
    /// Poll a snapshot source periodically and print normalized statuses
    Watch {
        /// JSON-lines file of raw snapshots to replay
        source: Option<String>,
        /// Poll period, e.g. "1s" or "500ms"
        #[arg(long, default_value = "1s")]
        period: String,
        /// YAML config file; overrides the positional source and --period
        #[arg(long)]
        config: Option<String>,
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Normalize { snapshot, pretty } => run_normalize(&snapshot, pretty),
        Commands::Watch {
            source,
            period,
            config,
            pretty,
        } => run_watch(source, &period, config, pretty),
    }
}

fn run_normalize(path: &str, pretty: bool) -> ExitCode {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let raw: RawRtkStatus = match serde_json::from_str(&content) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Parse error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let status = normalize(&raw, chrono::Utc::now().timestamp_millis());
    print_status(&status, pretty);
    ExitCode::SUCCESS
}

fn run_watch(
    source: Option<String>,
    period: &str,
    config: Option<String>,
    pretty: bool,
) -> ExitCode {
    let (path, period, pretty) = if let Some(config_path) = config {
        let config = match Config::from_file(&config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Config error: {}", e);
                return ExitCode::FAILURE;
            }
        };
        let period = match config.period() {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Config error: {}", e);
                return ExitCode::FAILURE;
            }
        };
        (config.source, period, config.pretty || pretty)
    } else {
        let Some(path) = source else {
            eprintln!("Either a source file or --config is required");
            return ExitCode::FAILURE;
        };
        let period = match humantime::parse_duration(period) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Invalid period: {}", e);
                return ExitCode::FAILURE;
            }
        };
        (PathBuf::from(path), period, pretty)
    };

    let source = match ReplaySource::open(&path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading source: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if source.is_empty() {
        log::warn!(
            "Source {} holds no snapshots; every poll will fail",
            path.display()
        );
    }

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Runtime error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    rt.block_on(watch(source, path, period, pretty));
    ExitCode::SUCCESS
}

async fn watch(source: ReplaySource, path: PathBuf, period: Duration, pretty: bool) {
    log::info!(
        "Polling {} every {}",
        path.display(),
        humantime::format_duration(period)
    );

    let handle = poller::start(
        source,
        period,
        move |status| print_status(&status, pretty),
        |err| log::error!("RTK status query failed: {}", err),
    );

    let _ = tokio::signal::ctrl_c().await;
    log::info!("Stopping");
    handle.cancel();
    handle.join().await;
}

fn print_status(status: &RtkStatus, pretty: bool) {
    let out = if pretty {
        serde_json::to_string_pretty(status)
    } else {
        serde_json::to_string(status)
    };
    match out {
        Ok(s) => println!("{}", s),
        Err(e) => log::error!("Failed to serialize status: {}", e),
    }
}
