use crate::core::{AppError, BusinessCalendar, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::env;
use std::str::FromStr;

pub mod database;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    pub log_format: LogFormat,
    /// VAT applied to purchases and sales, in percent
    pub vat_rate_percent: Decimal,
    /// Whole-hour UTC offset of the business calendar
    pub business_utc_offset_hours: i32,
    /// Number of sales shown on the dashboard
    pub recent_sales_limit: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Invalid log format: {}", s)),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(AppConfig {
            env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "debug".to_string()),
            log_format: parse_var("LOG_FORMAT", "pretty")?,
            vat_rate_percent: parse_var("VAT_RATE_PERCENT", "5")?,
            business_utc_offset_hours: parse_var("BUSINESS_UTC_OFFSET_HOURS", "4")?,
            recent_sales_limit: parse_var("RECENT_SALES_LIMIT", "5")?,
        })
    }

    pub fn calendar(&self) -> BusinessCalendar {
        BusinessCalendar::new(self.business_utc_offset_hours)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            env: "development".to_string(),
            log_level: "debug".to_string(),
            log_format: LogFormat::Pretty,
            vat_rate_percent: Decimal::from(5),
            business_utc_offset_hours: 4,
            recent_sales_limit: 5,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            server: ServerConfig::from_env()?,
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.app.vat_rate_percent < Decimal::ZERO
            || self.app.vat_rate_percent > Decimal::ONE_HUNDRED
        {
            return Err(AppError::Configuration(
                "VAT_RATE_PERCENT must be between 0 and 100".to_string(),
            ));
        }

        if !(-12..=14).contains(&self.app.business_utc_offset_hours) {
            return Err(AppError::Configuration(
                "BUSINESS_UTC_OFFSET_HOURS must be between -12 and 14".to_string(),
            ));
        }

        if self.app.recent_sales_limit == 0 {
            return Err(AppError::Configuration(
                "RECENT_SALES_LIMIT must be greater than 0".to_string(),
            ));
        }

        if self.database.pool_size > self.database.max_connections {
            return Err(AppError::Configuration(
                "DATABASE_POOL_SIZE cannot exceed DATABASE_MAX_CONNECTIONS".to_string(),
            ));
        }

        if self.server.workers == 0 {
            return Err(AppError::Configuration(
                "SERVER_WORKERS must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Read `name` from the environment (or `default`) and parse it
pub(crate) fn parse_var<T: FromStr>(name: &str, default: &str) -> Result<T> {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .trim()
        .parse()
        .map_err(|_| AppError::Configuration(format!("Invalid {}", name)))
}
