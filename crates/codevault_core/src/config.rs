//! Configuration loading from environment variables.

use crate::constants::{DEFAULT_MAX_PASTE_SIZE, DEFAULT_PORT};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

/// Runtime configuration for CodeVault.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub db_path: String,
    pub port: u16,
    pub max_paste_size: usize,
    /// Base URL used when building share links (no trailing slash).
    pub public_url: String,
    /// Browser origins allowed to call the API. Empty allows any origin.
    pub cors_origins: Vec<String>,
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: String) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = resolve_home_dir() {
            return home.join(rest).to_string_lossy().to_string();
        }
    }
    path
}

fn resolve_home_dir() -> Option<PathBuf> {
    if let Ok(home) = env::var("HOME") {
        if !home.trim().is_empty() {
            return Some(PathBuf::from(home));
        }
    }

    // Windows USERPROFILE (standard)
    if let Ok(profile) = env::var("USERPROFILE") {
        if !profile.trim().is_empty() {
            return Some(PathBuf::from(profile));
        }
    }

    std::env::current_dir().ok()
}

fn default_db_path() -> String {
    let home = resolve_home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".cache")
        .join("codevault")
        .join("db")
        .to_string_lossy()
        .to_string()
}

/// Normalize a public base URL so link building can append `/path` safely.
///
/// # Returns
/// The trimmed URL without trailing slashes, or `None` when blank.
pub fn normalize_public_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Split a comma-separated origin list, dropping blanks and trailing slashes.
///
/// A `*` entry anywhere in the list yields an empty list (any origin).
pub fn parse_cors_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .filter_map(normalize_public_url)
        .collect();
    if origins.iter().any(|origin| origin == "*") {
        return Vec::new();
    }
    origins
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment.
///
/// Missing or unrecognized values are treated as `false`.
pub fn env_flag_enabled(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(false)
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing.
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let public_url = env::var("PUBLIC_URL")
            .ok()
            .and_then(|raw| normalize_public_url(&raw))
            .unwrap_or_else(|| format!("http://localhost:{}", port));
        Self {
            db_path: env::var("DB_PATH")
                .map(expand_tilde)
                .unwrap_or_else(|_| default_db_path()),
            port,
            max_paste_size: env::var("MAX_PASTE_SIZE")
                .ok()
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(DEFAULT_MAX_PASTE_SIZE),
            public_url,
            cors_origins: env::var("CORS_ORIGINS")
                .map(|raw| parse_cors_origins(&raw))
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_public_url, parse_cors_origins, parse_env_flag, Config};
    use crate::env::{env_lock, EnvGuard};
    use crate::{DEFAULT_MAX_PASTE_SIZE, DEFAULT_PORT};

    #[test]
    fn parse_env_flag_accepts_truthy_values() {
        for value in ["1", "true", "TRUE", " yes ", "on"] {
            assert_eq!(parse_env_flag(value), Some(true), "value: {}", value);
        }
    }

    #[test]
    fn parse_env_flag_accepts_falsy_values() {
        for value in ["", "0", "false", "FALSE", " no ", "off"] {
            assert_eq!(parse_env_flag(value), Some(false), "value: {}", value);
        }
    }

    #[test]
    fn parse_env_flag_rejects_unknown_values() {
        assert_eq!(parse_env_flag("maybe"), None);
        assert_eq!(parse_env_flag("enabled"), None);
    }

    #[test]
    fn normalize_public_url_trims_trailing_slashes_and_blank() {
        assert_eq!(
            normalize_public_url(" https://vault.example/ "),
            Some("https://vault.example".to_string())
        );
        assert_eq!(
            normalize_public_url("http://host:3000//"),
            Some("http://host:3000".to_string())
        );
        assert_eq!(normalize_public_url("   "), None);
    }

    #[test]
    fn from_env_applies_defaults() {
        let _lock = env_lock().lock().expect("env lock");
        let _port = EnvGuard::remove("PORT");
        let _size = EnvGuard::remove("MAX_PASTE_SIZE");
        let _url = EnvGuard::remove("PUBLIC_URL");
        let _cors = EnvGuard::remove("CORS_ORIGINS");
        let _db = EnvGuard::set("DB_PATH", "/tmp/codevault-config-test");

        let config = Config::from_env();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.max_paste_size, DEFAULT_MAX_PASTE_SIZE);
        assert_eq!(config.db_path, "/tmp/codevault-config-test");
        assert!(config.cors_origins.is_empty());
        assert_eq!(
            config.public_url,
            format!("http://localhost:{}", DEFAULT_PORT)
        );
    }

    #[test]
    fn from_env_public_url_follows_port_unless_overridden() {
        let _lock = env_lock().lock().expect("env lock");
        let _port = EnvGuard::set("PORT", "4100");
        let _url = EnvGuard::remove("PUBLIC_URL");
        assert_eq!(Config::from_env().public_url, "http://localhost:4100");

        let _override = EnvGuard::set("PUBLIC_URL", "https://paste.example/");
        let config = Config::from_env();
        assert_eq!(config.port, 4100);
        assert_eq!(config.public_url, "https://paste.example");
    }

    #[test]
    fn parse_cors_origins_splits_and_normalizes() {
        assert_eq!(
            parse_cors_origins(" http://localhost:8080/ ,, https://app.example "),
            vec![
                "http://localhost:8080".to_string(),
                "https://app.example".to_string()
            ]
        );
        assert!(parse_cors_origins("").is_empty());
        assert!(parse_cors_origins("https://app.example, *").is_empty());
    }

    #[test]
    fn from_env_reads_cors_origins() {
        let _lock = env_lock().lock().expect("env lock");
        let _cors = EnvGuard::set("CORS_ORIGINS", "http://localhost:8080,http://127.0.0.1:8080");
        assert_eq!(
            Config::from_env().cors_origins,
            vec![
                "http://localhost:8080".to_string(),
                "http://127.0.0.1:8080".to_string()
            ]
        );
    }

    #[test]
    fn from_env_ignores_unparseable_numbers() {
        let _lock = env_lock().lock().expect("env lock");
        let _port = EnvGuard::set("PORT", "not-a-port");
        let _size = EnvGuard::set("MAX_PASTE_SIZE", "-5");
        let config = Config::from_env();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.max_paste_size, DEFAULT_MAX_PASTE_SIZE);
    }
}
