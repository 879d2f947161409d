//! dateindex CLI entry point

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use dateindex::logging::init_logging;
use dateindex::{Cli, IndexError, IndexerConfig, ShutdownReason, ShutdownSignal, WatchSet};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(ShutdownReason::UserStop) => ExitCode::SUCCESS,
        Ok(ShutdownReason::Fatal(message)) => {
            eprintln!("Error: {}", message);
            ExitCode::from(1)
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            e.downcast_ref::<IndexError>()
                .map(IndexError::exit_code)
                .unwrap_or(ExitCode::FAILURE)
        }
    }
}

fn run(cli: &Cli) -> Result<ShutdownReason> {
    let config = IndexerConfig::from_cli(cli)?;
    init_logging(&config.log_level)?;
    config.validate()?;

    tracing::info!("Starting dateindex v{}", env!("CARGO_PKG_VERSION"));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    let shutdown = ShutdownSignal::new();
    let watchers = WatchSet::start(&config, &shutdown).context("failed to start watchers")?;
    tracing::info!("watching {} source directories", watchers.len());

    let reason = runtime.block_on(wait_for_shutdown(&shutdown));
    watchers.join();

    tracing::info!("dateindex shutting down: {:?}", reason);
    Ok(reason)
}

/// Block until a dispatcher fails or the user asks to stop
async fn wait_for_shutdown(shutdown: &ShutdownSignal) -> ShutdownReason {
    tokio::select! {
        reason = shutdown.wait() => reason,
        Ok(()) = tokio::signal::ctrl_c() => user_stop(shutdown),
        _ = terminate() => user_stop(shutdown),
    }
}

fn user_stop(shutdown: &ShutdownSignal) -> ShutdownReason {
    shutdown.trigger(ShutdownReason::UserStop);
    shutdown.reason().unwrap_or(ShutdownReason::UserStop)
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut term) => {
            term.recv().await;
        }
        Err(e) => {
            tracing::warn!("cannot listen for SIGTERM: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}
