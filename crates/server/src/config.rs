use serde::Deserialize;
use std::time::Duration;

use posters::ResolverSettings;
use tmdb_client::TmdbSettings;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB v3 API key
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Prefix joined with poster paths
    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    /// Language sent with metadata requests
    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    /// Metadata attempts per poster
    #[serde(default = "default_poster_retries")]
    pub poster_retries: u32,

    /// Timeout for metadata requests, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Timeout for poster HEAD checks, in seconds
    #[serde(default = "default_asset_timeout_secs")]
    pub asset_timeout_secs: u64,

    /// Pause between failed metadata attempts, in milliseconds
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Pause between poster resolutions of one batch, in milliseconds
    #[serde(default = "default_inter_call_delay_ms")]
    pub inter_call_delay_ms: u64,

    /// Titles returned per recommendation
    #[serde(default = "default_recommendation_count")]
    pub recommendation_count: usize,
}

fn default_tmdb_api_url() -> String {
    tmdb_client::DEFAULT_API_URL.to_string()
}

fn default_tmdb_image_url() -> String {
    tmdb_client::DEFAULT_IMAGE_URL.to_string()
}

fn default_tmdb_language() -> String {
    tmdb_client::DEFAULT_LANGUAGE.to_string()
}

fn default_poster_retries() -> u32 {
    3
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_asset_timeout_secs() -> u64 {
    5
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_inter_call_delay_ms() -> u64 {
    crate::orchestrator::DEFAULT_INTER_CALL_DELAY.as_millis() as u64
}

fn default_recommendation_count() -> usize {
    engine::DEFAULT_LIMIT
}

impl Config {
    /// Load configuration from environment variables (and `.env`, if present)
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.tmdb_api_key.trim().is_empty(),
            "TMDB_API_KEY must not be empty"
        );
        anyhow::ensure!(self.poster_retries > 0, "POSTER_RETRIES must be at least 1");
        anyhow::ensure!(
            self.recommendation_count > 0,
            "RECOMMENDATION_COUNT must be at least 1"
        );
        Ok(())
    }

    pub fn tmdb_settings(&self) -> TmdbSettings {
        TmdbSettings::new(self.tmdb_api_key.clone())
            .with_api_url(self.tmdb_api_url.clone())
            .with_language(self.tmdb_language.clone())
            .with_request_timeout(Duration::from_secs(self.request_timeout_secs))
            .with_asset_timeout(Duration::from_secs(self.asset_timeout_secs))
    }

    pub fn resolver_settings(&self) -> ResolverSettings {
        ResolverSettings {
            max_attempts: self.poster_retries,
            retry_backoff: Duration::from_millis(self.retry_backoff_ms),
            image_base_url: self.tmdb_image_url.clone(),
        }
    }

    pub fn inter_call_delay(&self) -> Duration {
        Duration::from_millis(self.inter_call_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, envy::Error> {
        envy::from_iter(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn test_defaults_apply() {
        let config = config_from(&[("TMDB_API_KEY", "secret")]).unwrap();

        assert_eq!(config.tmdb_api_url, "https://api.themoviedb.org/3");
        assert_eq!(config.tmdb_image_url, "https://image.tmdb.org/t/p/w500");
        assert_eq!(config.tmdb_language, "en-US");
        assert_eq!(config.poster_retries, 3);
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.asset_timeout_secs, 5);
        assert_eq!(config.retry_backoff_ms, 1000);
        assert_eq!(config.inter_call_delay(), Duration::from_millis(200));
        assert_eq!(config.recommendation_count, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_api_key_is_required() {
        assert!(config_from(&[("POSTER_RETRIES", "2")]).is_err());
    }

    #[test]
    fn test_overrides_flow_into_settings() {
        let config = config_from(&[
            ("TMDB_API_KEY", "secret"),
            ("TMDB_API_URL", "http://localhost:9999"),
            ("POSTER_RETRIES", "5"),
            ("REQUEST_TIMEOUT_SECS", "2"),
            ("RETRY_BACKOFF_MS", "10"),
        ])
        .unwrap();

        let tmdb = config.tmdb_settings();
        assert_eq!(tmdb.api_url, "http://localhost:9999");
        assert_eq!(tmdb.request_timeout, Duration::from_secs(2));
        assert_eq!(tmdb.asset_timeout, Duration::from_secs(5));

        let resolver = config.resolver_settings();
        assert_eq!(resolver.max_attempts, 5);
        assert_eq!(resolver.retry_backoff, Duration::from_millis(10));
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let zero_retries =
            config_from(&[("TMDB_API_KEY", "secret"), ("POSTER_RETRIES", "0")]).unwrap();
        assert!(zero_retries.validate().is_err());

        let zero_count =
            config_from(&[("TMDB_API_KEY", "secret"), ("RECOMMENDATION_COUNT", "0")]).unwrap();
        assert!(zero_count.validate().is_err());

        let blank_key = config_from(&[("TMDB_API_KEY", "  ")]).unwrap();
        assert!(blank_key.validate().is_err());
    }
}
