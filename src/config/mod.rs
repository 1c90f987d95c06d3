//! Configuration module for the Meetling server.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Mark the session cookie `Secure` (serve over HTTPS only)
    pub cookie_secure: bool,
    /// Emit logs as JSON lines instead of human-readable text
    pub log_json: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let db_path = env::var("MEETLING_DB_PATH")
            .unwrap_or_else(|_| "./data/meetling.sqlite".to_string())
            .into();

        let bind_addr = parse_bind_addr(env::var("MEETLING_BIND_ADDR").ok().as_deref());

        let log_level = env::var("MEETLING_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            db_path,
            bind_addr,
            log_level,
            cookie_secure: env_flag("MEETLING_COOKIE_SECURE"),
            log_json: env_flag("MEETLING_LOG_JSON"),
        }
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

fn parse_bind_addr(value: Option<&str>) -> SocketAddr {
    let default = SocketAddr::from(([127, 0, 0, 1], 8080));
    match value {
        None => default,
        Some(value) => value.parse().unwrap_or_else(|_| {
            // The logger is not set up yet at this point
            eprintln!(
                "Invalid MEETLING_BIND_ADDR {:?}, using {}",
                value, DEFAULT_BIND_ADDR
            );
            default
        }),
    }
}
