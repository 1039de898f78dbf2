//! Server configuration read from environment variables.
//!
//! - `CRAFT_DB_PATH`: SQLite database file path (default: "craft.db")
//! - `CRAFT_PORT`: server listen port (default: "3000")
//! - `MESHY_API_KEY`: bearer token for the asset generation provider
//! - `MESHY_API_BASE`: provider base URL (default: "https://api.meshy.ai/v1")
//! - `CRAFT_PROVIDER_TIMEOUT_SECS`: provider request timeout (default: 60)

use thiserror::Error;

/// Default provider base URL.
pub const DEFAULT_PROVIDER_BASE: &str = "https://api.meshy.ai/v1";

const DEFAULT_DB_PATH: &str = "craft.db";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: '{value}'")]
    InvalidValue { var: &'static str, value: String },
}

/// Connection settings for the asset generation provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            base_url: DEFAULT_PROVIDER_BASE.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_PROVIDER_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub db_path: String,
    pub port: u16,
    pub provider: ProviderConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let db_path = lookup("CRAFT_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
        let port = parse_or(&lookup, "CRAFT_PORT", DEFAULT_PORT)?;
        let timeout_secs = parse_or(
            &lookup,
            "CRAFT_PROVIDER_TIMEOUT_SECS",
            DEFAULT_PROVIDER_TIMEOUT_SECS,
        )?;
        let base_url =
            lookup("MESHY_API_BASE").unwrap_or_else(|| DEFAULT_PROVIDER_BASE.to_string());
        let api_key = lookup("MESHY_API_KEY").filter(|key| !key.is_empty());

        Ok(ServerConfig {
            db_path,
            port,
            provider: ProviderConfig {
                base_url,
                api_key,
                timeout_secs,
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var, value }),
        None => Ok(default),
    }
}
