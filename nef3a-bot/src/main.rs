//! nef3a Bot - Main Entry Point
//!
//! Serves registry lookups over a JSON-lines channel on stdin/stdout.
//! Logs go to stderr.
//!
//! Usage:
//!     nef3a-bot --database data/converted.sqlite --access-code s3cret
//!     ACCESS_CODE=s3cret ADMIN_ID=1234 nef3a-bot --database registry.sqlite --init

use std::any::Any;
use std::path::PathBuf;

use clap::Parser;
use nef3a_bot::channel::{pump_inbound, pump_outbound};
use nef3a_bot::{BotConfig, BotService};
use nef3a_core::{Engine, MemorySessionStore};
use tokio::io::BufReader;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "nef3a-bot")]
#[command(about = "Registry lookup bot over a JSON-lines channel")]
#[command(version)]
struct Args {
    /// Registry SQLite database
    #[arg(short, long, env = "NEF3A_DATABASE", default_value = "data/converted.sqlite")]
    database: PathBuf,

    /// Create an empty registry if the database file does not exist
    #[arg(long)]
    init: bool,

    /// Access code senders must send once before searching
    #[arg(long, env = "ACCESS_CODE", hide_env_values = true)]
    access_code: String,

    /// Sender allowed to use /admin
    #[arg(long, env = "ADMIN_ID")]
    admin_id: Option<i64>,

    /// Records per reply batch
    #[arg(long, default_value = "3")]
    batch_size: usize,

    /// Rows scanned per phonetic name search
    #[arg(long, default_value = "100")]
    fuzzy_window: usize,

    /// Log filter when RUST_LOG is unset (debug, info, warn, error, or a directive list)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("PANIC: nef3a-bot panicked");
        eprintln!(
            "  Location: {}",
            panic_info
                .location()
                .map(|l| l.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        );
        eprintln!("  Message: {}", panic_message(panic_info.payload()));
    }));

    let args = Args::parse();

    init_tracing(&args.log_level);

    info!("Initializing nef3a bot");
    info!("  Version: {}", env!("CARGO_PKG_VERSION"));

    let config = BotConfig::new(args.database, args.access_code)
        .admin(args.admin_id)
        .create_if_missing(args.init)
        .batch_size(args.batch_size)
        .fuzzy_window(args.fuzzy_window);
    config.validate()?;

    let store = config.open_registry()?;
    info!(
        database = %config.database.display(),
        batch_size = config.engine.batch_size,
        fuzzy_window = config.engine.fuzzy_window,
        "registry ready"
    );

    let engine = Engine::new(store, MemorySessionStore::new(), config.engine);
    let service = BotService::new(engine);

    let (inbound_tx, inbound_rx) = mpsc::channel(256);
    let (outbound_tx, outbound_rx) = mpsc::channel(256);

    let reader = tokio::spawn(pump_inbound(BufReader::new(tokio::io::stdin()), inbound_tx));
    let writer = tokio::spawn(pump_outbound(tokio::io::stdout(), outbound_rx));

    tokio::select! {
        _ = service.run(inbound_rx, outbound_tx) => {
            info!("Inbound channel closed");
        }
        _ = shutdown_signal() => {}
    }

    reader.abort();
    match writer.await {
        Ok(Err(e)) => error!(error = %e, "outbound channel failed"),
        Err(e) if !e.is_cancelled() => error!(error = %e, "outbound writer failed"),
        _ => {}
    }

    info!("nef3a bot shutdown complete");
    Ok(())
}

/// Text of a panic payload: `panic!("literal")` carries a `&str`, formatted
/// panics carry a `String`.
fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("<no message>")
}

/// Compact stderr logging; RUST_LOG wins over `--log-level`.
/// stdout carries the channel, so logs must stay off it.
fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message_payloads() {
        let literal = std::panic::catch_unwind(|| panic!("registry gone")).unwrap_err();
        assert_eq!(panic_message(literal.as_ref()), "registry gone");

        let formatted = std::panic::catch_unwind(|| panic!("sender {}", 42)).unwrap_err();
        assert_eq!(panic_message(formatted.as_ref()), "sender 42");

        let other: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(other.as_ref()), "<no message>");
    }
}
