//! dotnet-locator CLI entry point.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use dotnet_locator::cli::{Cli, CommandDispatcher};
use dotnet_locator::ui::{OutputMode, TerminalUI, UserInterface};
use dotnet_locator::Locator;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Exit code for a run cancelled by Ctrl-C or the timeout.
const EXIT_CANCELLED: u8 = 130;

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is WARN
///
/// Logs go to stderr so that stdout carries only the requested data.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("dotnet_locator=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dotnet_locator=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Cancel `cancel` on Ctrl-C or when `timeout` elapses.
fn spawn_cancellation(cancel: &CancellationToken, timeout: Option<u64>) {
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::debug!("interrupted");
            on_signal.cancel();
        }
    });

    if let Some(secs) = timeout {
        let on_timeout = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(secs)).await;
            tracing::warn!("timed out after {}s", secs);
            on_timeout.cancel();
        });
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("dotnet-locator starting with args: {:?}", cli);

    let output_mode = if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };
    let mut ui = if cli.no_color {
        TerminalUI::with_colors(output_mode, false)
    } else {
        TerminalUI::new(output_mode)
    };

    let cancel = CancellationToken::new();
    spawn_cancellation(&cancel, cli.timeout);

    let dispatcher = CommandDispatcher::new(Locator::new(), &cli);

    match dispatcher.dispatch(&cli, &mut ui, &cancel).await {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) if e.is_cancelled() => {
            ui.error(&format!("Error: {}", e));
            ExitCode::from(EXIT_CANCELLED)
        }
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}
