//! Runtime configuration, read from the environment (and `.env`)

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a number, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },
    #[error("{name} must be between {min} and {max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Backend origin, without the `/api/v1` prefix
    pub api_base_url: String,
    pub transaction_page_limit: u32,
    pub balance_page_limit: u32,
    /// Wait before reloading the trade log after a trade cycle was triggered
    pub trade_refresh_delay: Duration,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: "http://localhost:8000".to_string(),
            transaction_page_limit: 20,
            balance_page_limit: 100,
            trade_refresh_delay: Duration::from_millis(1000),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Backend rejects page sizes outside 1..=100
const PAGE_LIMIT_RANGE: (u64, u64) = (1, 100);

impl Config {
    /// Load `.env` if present, then read the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from any variable source; missing variables keep their default
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let api_base_url = lookup("API_BASE_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(defaults.api_base_url);

        let transaction_page_limit =
            parse_var(&lookup, "TRANSACTION_PAGE_LIMIT", defaults.transaction_page_limit)?;
        check_range("TRANSACTION_PAGE_LIMIT", transaction_page_limit as u64, PAGE_LIMIT_RANGE)?;

        let balance_page_limit =
            parse_var(&lookup, "BALANCE_PAGE_LIMIT", defaults.balance_page_limit)?;
        check_range("BALANCE_PAGE_LIMIT", balance_page_limit as u64, PAGE_LIMIT_RANGE)?;

        let delay_ms = parse_var(
            &lookup,
            "TRADE_REFRESH_DELAY_MS",
            defaults.trade_refresh_delay.as_millis() as u64,
        )?;
        let timeout_secs = parse_var(
            &lookup,
            "REQUEST_TIMEOUT_SECS",
            defaults.request_timeout.as_secs(),
        )?;
        check_range("REQUEST_TIMEOUT_SECS", timeout_secs, (1, 300))?;

        Ok(Config {
            api_base_url,
            transaction_page_limit,
            balance_page_limit,
            trade_refresh_delay: Duration::from_millis(delay_ms),
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
        None => Ok(default),
    }
}

fn check_range(name: &'static str, value: u64, (min, max): (u64, u64)) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        });
    }
    Ok(())
}
