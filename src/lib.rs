//! Root crate facade for the CodeVault server and storage core.

pub use codevault_server::{
    config, create_app, db, error, handlers, models, resolve_bind_address, serve_router,
    AppError, AppState, Config, Database,
};
pub use codevault_core::{compute_expiry, generate_id, is_expired, Expiry};
