//! Environment-variable configuration.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use materia_core::LOW_STOCK_THRESHOLD;

const DEFAULT_DB_PATH: &str = "materia.db";
const DEFAULT_PORT: u16 = 8000;

/// Server configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub http_port: u16,
    pub low_stock_threshold: i64,
}

impl Config {
    /// Read configuration from the environment, falling back to defaults.
    ///
    /// * `MATERIA_DB_PATH` - SQLite file path (default `materia.db`)
    /// * `MATERIA_HTTP_PORT` - listen port (default 8000)
    /// * `MATERIA_LOW_STOCK_THRESHOLD` - low-stock report cutoff (default 10)
    pub fn from_env() -> Result<Self> {
        let db_path = env::var("MATERIA_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DB_PATH));

        let http_port = match env::var("MATERIA_HTTP_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("invalid MATERIA_HTTP_PORT: {raw}"))?,
            Err(_) => DEFAULT_PORT,
        };

        let low_stock_threshold = match env::var("MATERIA_LOW_STOCK_THRESHOLD") {
            Ok(raw) => raw
                .parse::<i64>()
                .with_context(|| format!("invalid MATERIA_LOW_STOCK_THRESHOLD: {raw}"))?,
            Err(_) => LOW_STOCK_THRESHOLD,
        };

        Ok(Self {
            db_path,
            http_port,
            low_stock_threshold,
        })
    }
}
