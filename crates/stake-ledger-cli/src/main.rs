/*
[INPUT]:  CLI arguments, YAML configuration file, STAKE_LEDGER__* env, OS shutdown signals
[OUTPUT]: Interactive or scripted ledger session with graceful shutdown
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or shutdown handling
*/

mod cli;
mod render;
mod settings;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use stake_ledger::Orchestrator;

#[derive(Parser, Debug)]
#[command(name = "stake-ledger", version, about = "Staked task ledger behind a wallet session")]
struct Cli {
    #[arg(long = "config", value_name = "PATH", global = true)]
    config_path: Option<PathBuf>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info", global = true)]
    log_level: String,
    /// Write logs to this file instead of stderr
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Menu-driven session (default)
    Interactive,
    /// Connect, create and complete a task, then print the ledger
    Demo {
        /// Print the final snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Load and print the effective configuration
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    let _log_guard = init_tracing(&args.log_level, args.log_file.as_deref())?;

    let config = settings::load(args.config_path.as_deref()).context("load config")?;
    info!(
        config_path = ?args.config_path,
        connect_latency_ms = config.session.connect_latency_ms,
        completion_latency_ms = config.ledger.completion_latency_ms,
        "configuration loaded"
    );

    match args.command.unwrap_or(Command::Interactive) {
        Command::CheckConfig => {
            print!("{}", config.to_yaml().context("render configuration")?);
            return Ok(());
        }
        Command::Demo { json } => {
            let orchestrator = Orchestrator::from_config(&config);
            let shutdown = CancellationToken::new();
            setup_signal_handlers(shutdown.clone());
            tokio::select! {
                result = cli::run_demo(&orchestrator, json) => result?,
                _ = shutdown.cancelled() => {
                    info!("shutdown signal received; demo aborted");
                }
            }
        }
        Command::Interactive => {
            cli::run_interactive(Orchestrator::from_config(&config)).await?;
        }
    }

    info!("stake-ledger exited");
    Ok(())
}

fn init_tracing(log_level: &str, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("open log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(writer)
                .try_init()
                .map_err(|err| anyhow!(err))
                .context("initialize tracing subscriber")?;
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|err| anyhow!(err))
                .context("initialize tracing subscriber")?;
            Ok(None)
        }
    }
}

fn setup_signal_handlers(shutdown: CancellationToken) {
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install SIGINT handler");
            return;
        }
        info!("received SIGINT");
        shutdown_clone.cancel();
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        tokio::spawn(async move {
            match signal(SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                    info!("received SIGTERM");
                    shutdown.cancel();
                }
                Err(err) => {
                    warn!(error = %err, "failed to install SIGTERM handler");
                }
            }
        });
    }
}
