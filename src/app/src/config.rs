use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error as ThisError;

pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_ALPHA_VANTAGE_URL: &str = "https://www.alphavantage.co/query";
pub const DEFAULT_API_KEY: &str = "demo";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(ThisError, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} has invalid value {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlphaVantageConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub addr: SocketAddr,
    pub alpha_vantage: AlphaVantageConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let addr = parse_or("STOCK_INDEX_ADDR", lookup("STOCK_INDEX_ADDR"), DEFAULT_ADDR)?;
        let timeout_secs: u64 = parse_or(
            "ALPHA_VANTAGE_TIMEOUT_SECS",
            lookup("ALPHA_VANTAGE_TIMEOUT_SECS"),
            &DEFAULT_TIMEOUT_SECS.to_string(),
        )?;

        Ok(Self {
            addr,
            alpha_vantage: AlphaVantageConfig {
                base_url: lookup("ALPHA_VANTAGE_URL")
                    .unwrap_or_else(|| DEFAULT_ALPHA_VANTAGE_URL.to_string()),
                api_key: lookup("ALPHA_VANTAGE_API_KEY")
                    .unwrap_or_else(|| DEFAULT_API_KEY.to_string()),
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    var: &'static str,
    value: Option<String>,
    default: &str,
) -> Result<T, ConfigError> {
    let value = value.unwrap_or_else(|| default.to_string());
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { var, value })
}
