#![doc = include_str!("../README.md")]

mod config;
mod report;
mod telemetry;
mod worker;

use clap::Parser;
use config::{AppConfig, CliArgs, Command, RunConfig};
use permute_bridge::{BridgeConfig, Producer, Session};
use report::Report;
use telemetry::init_telemetry;
use tokio::io::BufReader;
use tokio::signal;
use tokio_util::sync::CancellationToken;

// Using mimalloc for better performance with many small string allocations,
// especially in musl environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = AppConfig::try_from(args)?;

    init_telemetry(config.log_format)?;
    log_startup_info(&config);

    match config.command {
        Command::Run(run) => run_session(config.bridge, run).await,
        Command::Worker => run_worker(config.bridge).await,
    }
}

async fn run_session(bridge: BridgeConfig, run: RunConfig) -> anyhow::Result<()> {
    let mut session = Session::spawn(bridge, run.collation)?;
    session.start(run.symbols).await?;

    tokio::select! {
        res = session.run_to_completion() => res?,
        () = shutdown_signal() => {
            tracing::warn!(
                unique = session.tracker().len(),
                "Interrupted, reporting partial results"
            );
        }
    }

    let report = Report::new(session.inputs(), session.tracker(), &run.filter, run.limit);
    let stdout = std::io::stdout();
    if run.json {
        report.write_json(stdout.lock())?;
    } else {
        report.write_text(stdout.lock())?;
    }

    session.shutdown().await?;
    Ok(())
}

async fn run_worker(bridge: BridgeConfig) -> anyhow::Result<()> {
    let shutdown = CancellationToken::new();
    let token = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        token.cancel();
    });

    worker::serve(
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        Producer::new(bridge.batch_size),
        shutdown,
    )
    .await?;

    tracing::info!("Worker shut down successfully");
    Ok(())
}

fn log_startup_info(config: &AppConfig) {
    if cfg!(debug_assertions) {
        tracing::debug!("Starting with full config: {:#?}", config);
    } else {
        tracing::info!(
            "Starting with batch size {} and channel capacity {}",
            config.bridge.batch_size,
            config.bridge.channel_capacity
        );
    }
}

/// Resolves on Ctrl+C or SIGTERM. A handler that fails to install never
/// resolves, leaving the other one in charge.
async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C signal"),
        () = terminate => tracing::info!("Received SIGTERM signal"),
    }
}
