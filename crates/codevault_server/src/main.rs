//! CodeVault API server entrypoint.

use codevault_server::{
    config::{env_flag_enabled, Config},
    db::Database,
    resolve_bind_address, serve_router, AppState, DEFAULT_PORT,
};
use std::future::Future;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// What the process should do for the given command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Launch {
    Serve,
    Help,
    Version,
}

fn launch_from_args<I>(args: I) -> anyhow::Result<Launch>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut launch = Launch::Serve;
    for arg in args {
        launch = match (arg.as_ref(), launch) {
            ("--help" | "-h", _) => Launch::Help,
            ("--version" | "-V", Launch::Serve) => Launch::Version,
            ("--version" | "-V", current) => current,
            (flag, _) if flag.starts_with('-') => {
                anyhow::bail!("unrecognized flag '{}' (try --help)", flag)
            }
            (other, _) => anyhow::bail!("codevault takes no arguments, got '{}'", other),
        };
    }
    Ok(launch)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "codevault=info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match launch_from_args(std::env::args().skip(1))? {
        Launch::Help => {
            print_help();
            return Ok(());
        }
        Launch::Version => {
            println!("codevault {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Launch::Serve => {}
    }

    let config = Config::from_env();
    let database = Database::new(&config.db_path)?;
    tracing::info!("Using database at {}", database.path().display());

    if config.cors_origins.is_empty() {
        tracing::info!("CORS: any origin");
    } else {
        tracing::info!("CORS: {}", config.cors_origins.join(", "));
    }

    let allow_public = env_flag_enabled("ALLOW_PUBLIC_ACCESS");
    let bind_addr = resolve_bind_address(&config, allow_public);
    if !bind_addr.ip().is_loopback() {
        tracing::warn!(
            "Listening on non-loopback address {}; the API has no authentication",
            bind_addr
        );
    }

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let actual_addr = listener.local_addr().unwrap_or(bind_addr);
    tracing::info!("CodeVault running at http://{}", actual_addr);
    tracing::info!("Share links use {}", config.public_url);

    let state = AppState::new(config, database);
    serve_router(listener, state, shutdown_signal()).await?;
    tracing::info!("Server stopped");

    Ok(())
}

fn print_help() {
    println!("CodeVault Server\n");
    println!("Usage: codevault [OPTIONS]\n");
    println!("Options:");
    println!("  -h, --help        Show this help message");
    println!("  -V, --version     Print the version");
    println!("\nEnvironment variables:");
    println!("  DB_PATH           Database directory (default: ~/.cache/codevault/db)");
    println!("  PORT              Server port (default: {})", DEFAULT_PORT);
    println!("  MAX_PASTE_SIZE    Maximum paste size in bytes (default: 10MB)");
    println!(
        "  PUBLIC_URL        Base URL for share links (default: http://localhost:<PORT>)"
    );
    println!("  CORS_ORIGINS      Comma-separated allowed origins (default: any)");
    println!("  ALLOW_PUBLIC_ACCESS  Permit non-loopback BIND addresses");
    println!(
        "  BIND              Override bind address (e.g. 0.0.0.0:{})",
        DEFAULT_PORT
    );
}

/// Which signal ended the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopReason {
    Interrupt,
    Terminate,
}

/// Resolve with the first of the two stop sources to fire.
async fn first_stop<I, T>(interrupt: I, terminate: T) -> StopReason
where
    I: Future<Output = ()>,
    T: Future<Output = ()>,
{
    tokio::select! {
        () = interrupt => StopReason::Interrupt,
        () = terminate => StopReason::Terminate,
    }
}

/// Wait forever if a signal handler cannot be installed.
async fn or_never(installed: std::io::Result<()>, name: &str) {
    if let Err(err) = installed {
        tracing::error!("{} handler unavailable: {}", name, err);
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn sigterm() {
    use tokio::signal::unix::{signal, SignalKind};
    match signal(SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(err) => or_never(Err(err), "SIGTERM").await,
    }
}

#[cfg(not(unix))]
async fn sigterm() {
    std::future::pending::<()>().await;
}

async fn shutdown_signal() {
    let interrupt = async { or_never(tokio::signal::ctrl_c().await, "Ctrl+C").await };
    let reason = first_stop(interrupt, sigterm()).await;
    tracing::info!("Shutting down ({:?})", reason);
}
