//! Configuration management for LinkHub.
//!
//! Loads the remote gateway endpoint from environment variables, with
//! `.env` support via dotenvy:
//! - `LINKHUB_API_URL`  — base URL of the REST endpoint
//! - `LINKHUB_API_KEY`  — API key sent as `apikey` and bearer token

use std::env;

use crate::error::{Error, Result};

/// Remote gateway endpoint settings.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub api_key: String,
}

impl GatewayConfig {
    /// Load settings from the environment (and `.env`, when present).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let base_url = env::var("LINKHUB_API_URL")
            .map_err(|_| Error::Config("LINKHUB_API_URL is not set".to_string()))?;
        let api_key = env::var("LINKHUB_API_KEY")
            .map_err(|_| Error::Config("LINKHUB_API_KEY is not set".to_string()))?;

        Ok(Self { base_url, api_key })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_url_is_a_config_error() {
        // Serialize env access within the test binary.
        let _guard = ENV_LOCK.lock().unwrap();
        env::remove_var("LINKHUB_API_URL");
        env::remove_var("LINKHUB_API_KEY");

        let err = GatewayConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("LINKHUB_API_URL"));
    }

    #[test]
    fn reads_both_variables() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::set_var("LINKHUB_API_URL", "https://db.example.com/rest/v1");
        env::set_var("LINKHUB_API_KEY", "secret");

        let config = GatewayConfig::from_env().unwrap();
        assert_eq!(config.base_url, "https://db.example.com/rest/v1");
        assert_eq!(config.api_key, "secret");

        env::remove_var("LINKHUB_API_URL");
        env::remove_var("LINKHUB_API_KEY");
    }

    static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
}
