//! Configuration module for the campaign backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the CSV records file
    pub records_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let records_path = env::var("CAMPAIGN_RECORDS_PATH")
            .unwrap_or_else(|_| "./campaign_records.csv".to_string())
            .into();

        let bind_addr = env::var("CAMPAIGN_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid CAMPAIGN_BIND_ADDR format");

        let log_level = env::var("CAMPAIGN_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            records_path,
            bind_addr,
            log_level,
        }
    }
}
