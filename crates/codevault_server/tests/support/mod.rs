//! Shared integration-test server bootstrap helpers.

use axum_test::TestServer;
use codevault_server::{create_app, AppState, Config, Database};
use std::path::Path;
use tempfile::TempDir;

pub(crate) const TEST_PUBLIC_URL: &str = "http://paste.test";

pub(crate) fn test_config_for_db_path(db_path: &Path, max_paste_size: usize) -> Config {
    Config {
        port: 0,
        db_path: db_path.to_str().expect("db path").to_string(),
        max_paste_size,
        public_url: TEST_PUBLIC_URL.to_string(),
        cors_origins: Vec::new(),
    }
}

pub(crate) fn setup_server_with_config(adjust: impl FnOnce(&mut Config)) -> (TestServer, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let mut config = test_config_for_db_path(&temp_dir.path().join("vault"), 10_000_000);
    adjust(&mut config);
    let db = Database::new(config.db_path.as_str()).expect("open db");
    let app = create_app(AppState::new(config, db));
    let server = TestServer::new(app).expect("server");
    (server, temp_dir)
}

pub(crate) fn setup_server_with_limit(max_paste_size: usize) -> (TestServer, TempDir) {
    setup_server_with_config(|config| config.max_paste_size = max_paste_size)
}

pub(crate) fn setup_test_server() -> (TestServer, TempDir) {
    setup_server_with_limit(10_000_000)
}
