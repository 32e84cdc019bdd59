use dotenvy::dotenv;
use std::env;

use crate::error::ConfigError;

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: String,
    pub github_api_url: String,
    pub fetch_concurrency: usize,
}

impl Config {
    /// Reads configuration from the process environment, loading `.env` first if present.
    pub fn from_env() -> Result<Config, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let github_token = get_env(&lookup, "GITHUB_TOKEN")?;
        let github_api_url =
            get_env_or_default(&lookup, "GITHUB_API_URL", DEFAULT_GITHUB_API_URL);

        let raw_concurrency = get_env_or_default(&lookup, "GIST_FETCH_CONCURRENCY", "1");
        let fetch_concurrency = match raw_concurrency.trim().parse::<usize>() {
            Ok(n) if n > 0 => n,
            _ => {
                return Err(ConfigError::InvalidValue {
                    key: "GIST_FETCH_CONCURRENCY",
                    value: raw_concurrency,
                });
            }
        };

        Ok(Config {
            github_token,
            github_api_url,
            fetch_concurrency,
        })
    }
}

fn get_env<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVariable(key)),
    }
}

fn get_env_or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
