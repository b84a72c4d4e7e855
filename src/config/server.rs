use crate::config::parse_var;
use crate::core::Result;
use serde::Deserialize;
use std::env;

/// Server configuration for HTTP server
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    /// Browser origin allowed by CORS; any origin when unset
    pub cors_allowed_origin: Option<String>,
}

impl ServerConfig {
    pub fn new(host: String, port: u16) -> Self {
        Self {
            host,
            port,
            workers: num_cpus::get() * 2, // 2x CPU cores for I/O-bound workload
            cors_allowed_origin: None,
        }
    }

    pub fn from_env() -> Result<Self> {
        let mut config = Self::new(
            env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            parse_var("SERVER_PORT", "8080")?,
        );

        if env::var("SERVER_WORKERS").is_ok() {
            config.workers = parse_var("SERVER_WORKERS", "1")?;
        }

        config.cors_allowed_origin = env::var("CORS_ALLOWED_ORIGIN")
            .ok()
            .filter(|origin| !origin.trim().is_empty());

        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
