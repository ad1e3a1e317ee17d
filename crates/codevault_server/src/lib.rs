//! HTTP server wiring for CodeVault (API, handlers, and shared state).

/// HTTP error mapping for API handlers.
pub mod error;
/// Request extractors.
pub mod extract;
/// HTTP handlers for paste endpoints.
pub mod handlers;

pub use codevault_core::{config, db, models, AppError, Config, Database, DEFAULT_PORT};

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

/// Room for the JSON envelope around a maximum-size paste body.
const BODY_ENVELOPE_ALLOWANCE: usize = 64 * 1024;

/// Shared state passed to HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Construct shared application state.
    pub fn new(config: Config, db: Database) -> Self {
        Self {
            db: Arc::new(db),
            config: Arc::new(config),
        }
    }
}

/// Create the application router with all routes and middleware.
///
/// CORS follows `config.cors_origins`: an empty list admits any origin.
pub fn create_app(state: AppState) -> Router {
    let body_limit = state
        .config
        .max_paste_size
        .saturating_add(BODY_ENVELOPE_ALLOWANCE);
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/api/paste", post(handlers::paste::create_paste))
        .route(
            "/api/paste/:id",
            get(handlers::paste::get_paste).put(handlers::paste::update_paste),
        )
        .route("/api/paste/:id/raw", get(handlers::paste::get_raw_paste))
        .route("/api/recent", get(handlers::paste::list_recent))
        .with_state(state)
        .layer(
            tower::ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors)
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("DENY"),
                )),
        )
}

/// Resolve the listener address from the `BIND` override and security policy.
///
/// Non-loopback addresses are only honored when public access is enabled.
pub fn resolve_bind_address(config: &Config, allow_public_access: bool) -> SocketAddr {
    let default_bind = SocketAddr::from(([127, 0, 0, 1], config.port));
    let requested = match std::env::var("BIND") {
        Ok(value) => match value.trim().parse::<SocketAddr>() {
            Ok(addr) => addr,
            Err(err) => {
                tracing::warn!(
                    "Invalid BIND='{}': {}. Falling back to {}",
                    value,
                    err,
                    default_bind
                );
                default_bind
            }
        },
        Err(_) => default_bind,
    };

    if allow_public_access || requested.ip().is_loopback() {
        return requested;
    }

    tracing::warn!(
        "Non-loopback bind {} requested without ALLOW_PUBLIC_ACCESS; forcing 127.0.0.1",
        requested
    );
    SocketAddr::from(([127, 0, 0, 1], requested.port()))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods([Method::GET, Method::POST, Method::PUT]);
    if origins.is_empty() {
        return layer.allow_origin(Any).allow_headers(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!("Ignoring CORS origin '{}': {}", origin, err);
                None
            }
        })
        .collect();
    layer
        .allow_origin(AllowOrigin::list(allowed))
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

/// Run the Axum server until `shutdown_signal` resolves.
///
/// # Errors
/// Returns any I/O error produced by `axum::serve`.
pub async fn serve_router(
    listener: tokio::net::TcpListener,
    state: AppState,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown_signal)
        .await
}

#[cfg(test)]
mod tests {
    use super::resolve_bind_address;
    use codevault_core::env::{env_lock, EnvGuard};
    use codevault_core::Config;
    use std::net::SocketAddr;

    fn config_on_port(port: u16) -> Config {
        Config {
            db_path: String::from("/tmp/codevault-db"),
            port,
            max_paste_size: 1024,
            public_url: format!("http://localhost:{}", port),
            cors_origins: Vec::new(),
        }
    }

    #[test]
    fn resolve_bind_address_enforces_loopback_when_public_access_disabled() {
        let _lock = env_lock().lock().expect("env lock");
        let _bind = EnvGuard::set("BIND", "0.0.0.0:4040");
        let config = config_on_port(4040);

        let resolved = resolve_bind_address(&config, false);
        assert_eq!(resolved, SocketAddr::from(([127, 0, 0, 1], 4040)));

        let public = resolve_bind_address(&config, true);
        assert_eq!(public, SocketAddr::from(([0, 0, 0, 0], 4040)));
    }

    #[test]
    fn resolve_bind_address_allows_loopback_and_invalid_fallback() {
        let _lock = env_lock().lock().expect("env lock");
        let config = config_on_port(4041);
        {
            let _bind = EnvGuard::remove("BIND");
            let loopback = resolve_bind_address(&config, false);
            assert_eq!(loopback, SocketAddr::from(([127, 0, 0, 1], 4041)));
        }

        let _bind = EnvGuard::set("BIND", "bad:host");
        let fallback = resolve_bind_address(&config, false);
        assert_eq!(fallback, SocketAddr::from(([127, 0, 0, 1], 4041)));
    }
}
