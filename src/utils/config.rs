use chrono::Duration;
use std::env;
use thiserror::Error;

use crate::utils::validators::{validate_api_base_url, validate_origin, validate_username};

const DEFAULT_GITHUB_API_BASE_URL: &str = "https://api.github.com";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable is not set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub github_token: String,
    pub github_username: String,
    pub github_api_base_url: String,
    pub revalidate_window: Duration,
    pub static_dir: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values count as unset
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let github_token = var("GITHUB_TOKEN").ok_or(ConfigError::Missing("GITHUB_TOKEN"))?;
        let github_username =
            var("GITHUB_USERNAME").ok_or(ConfigError::Missing("GITHUB_USERNAME"))?;
        validate_username(&github_username).map_err(|e| ConfigError::Invalid {
            name: "GITHUB_USERNAME",
            reason: e.to_string(),
        })?;

        let github_api_base_url = var("GITHUB_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_GITHUB_API_BASE_URL.to_string());
        let github_api_base_url =
            validate_api_base_url(&github_api_base_url).map_err(|e| ConfigError::Invalid {
                name: "GITHUB_API_BASE_URL",
                reason: e.to_string(),
            })?;

        let frontend_url =
            var("FRONTEND_URL").unwrap_or_else(|| "http://localhost:3000".to_string());
        let frontend_url = validate_origin(&frontend_url).map_err(|e| ConfigError::Invalid {
            name: "FRONTEND_URL",
            reason: e.to_string(),
        })?;

        let revalidate_secs: u64 = parse_or(
            "CONTRIBUTIONS_REVALIDATE_SECS",
            var("CONTRIBUTIONS_REVALIDATE_SECS"),
            3600,
        )?;
        let revalidate_window = i64::try_from(revalidate_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or_else(|| ConfigError::Invalid {
                name: "CONTRIBUTIONS_REVALIDATE_SECS",
                reason: format!("{} seconds is out of range", revalidate_secs),
            })?;

        Ok(Config {
            host: var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or("PORT", var("PORT"), 8080)?,
            frontend_url,
            github_token,
            github_username,
            github_api_base_url,
            revalidate_window,
            static_dir: var("STATIC_DIR"),
        })
    }
}

fn parse_or<T>(name: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
