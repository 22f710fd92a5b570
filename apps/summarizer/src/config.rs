use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::llm_client::{DEFAULT_ENDPOINT, DEFAULT_MODEL};

/// Application configuration loaded from environment variables.
/// Loaded once at startup, validated, never mutated; missing credentials are fatal.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: String,
    pub gemini_model: String,
    pub gemini_endpoint: String,
    pub generation_timeout: Duration,
    pub batch_concurrency: usize,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. `from_env` passes the process environment.
    pub fn from_source(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let google_api_key = get("GOOGLE_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .context("Required environment variable 'GOOGLE_API_KEY' is not set")?;

        let timeout_secs = get("GENERATION_TIMEOUT_SECS")
            .unwrap_or_else(|| "120".to_string())
            .parse::<u64>()
            .context("GENERATION_TIMEOUT_SECS must be a whole number of seconds")?;
        if timeout_secs == 0 {
            bail!("GENERATION_TIMEOUT_SECS must be greater than zero");
        }

        let batch_concurrency = get("BATCH_CONCURRENCY")
            .unwrap_or_else(|| "1".to_string())
            .parse::<usize>()
            .context("BATCH_CONCURRENCY must be a positive integer")?;
        if batch_concurrency == 0 {
            bail!("BATCH_CONCURRENCY must be at least 1");
        }

        Ok(Config {
            google_api_key,
            gemini_model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_endpoint: get("GEMINI_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            generation_timeout: Duration::from_secs(timeout_secs),
            batch_concurrency,
            port: get("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            google_api_key: "test-key".to_string(),
            gemini_model: DEFAULT_MODEL.to_string(),
            gemini_endpoint: "http://127.0.0.1:9".to_string(),
            generation_timeout: Duration::from_secs(5),
            batch_concurrency: 1,
            port: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_source(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_applied() {
        let config = load(&[("GOOGLE_API_KEY", "abc")]).unwrap();
        assert_eq!(config.google_api_key, "abc");
        assert_eq!(config.gemini_model, "gemini-2.5-pro");
        assert_eq!(config.gemini_endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.generation_timeout, Duration::from_secs(120));
        assert_eq!(config.batch_concurrency, 1);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_missing_key_is_fatal() {
        let err = load(&[]).unwrap_err();
        assert!(err.to_string().contains("GOOGLE_API_KEY"));
        assert!(load(&[("GOOGLE_API_KEY", "   ")]).is_err());
    }

    #[test]
    fn test_overrides_parsed() {
        let config = load(&[
            ("GOOGLE_API_KEY", "abc"),
            ("GEMINI_MODEL", "gemini-2.5-flash"),
            ("GENERATION_TIMEOUT_SECS", "30"),
            ("BATCH_CONCURRENCY", "4"),
            ("PORT", "9000"),
        ])
        .unwrap();
        assert_eq!(config.gemini_model, "gemini-2.5-flash");
        assert_eq!(config.generation_timeout, Duration::from_secs(30));
        assert_eq!(config.batch_concurrency, 4);
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        assert!(load(&[("GOOGLE_API_KEY", "abc"), ("BATCH_CONCURRENCY", "0")]).is_err());
        assert!(load(&[("GOOGLE_API_KEY", "abc"), ("GENERATION_TIMEOUT_SECS", "x")]).is_err());
        assert!(load(&[("GOOGLE_API_KEY", "abc"), ("PORT", "70000")]).is_err());
    }
}
