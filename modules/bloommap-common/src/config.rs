use std::env;

use crate::error::BloomMapError;

const DEFAULT_PHOTO_MAX_BYTES: usize = 5 * 1024 * 1024;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Supabase
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_service_key: Option<String>,
    pub supabase_jwt_secret: String,

    // Storage
    pub photo_bucket: String,
    pub photo_max_bytes: usize,

    // Prediction dataset
    pub predictions_path: String,

    // Web server
    pub web_host: String,
    pub web_port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, BloomMapError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. `from_env` delegates here.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BloomMapError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| {
                    BloomMapError::Config(format!("{key} environment variable is required"))
                })
        };

        let web_port = match lookup("WEB_PORT") {
            Some(v) => v
                .parse()
                .map_err(|_| BloomMapError::Config(format!("WEB_PORT must be a number, got {v}")))?,
            None => 3000,
        };

        let photo_max_bytes = match lookup("PHOTO_MAX_BYTES") {
            Some(v) => v.parse().map_err(|_| {
                BloomMapError::Config(format!("PHOTO_MAX_BYTES must be a number, got {v}"))
            })?,
            None => DEFAULT_PHOTO_MAX_BYTES,
        };

        Ok(Self {
            supabase_url: required("SUPABASE_URL")?.trim_end_matches('/').to_string(),
            supabase_anon_key: required("SUPABASE_ANON_KEY")?,
            supabase_service_key: lookup("SUPABASE_SERVICE_KEY").filter(|v| !v.is_empty()),
            supabase_jwt_secret: required("SUPABASE_JWT_SECRET")?,
            photo_bucket: lookup("PHOTO_BUCKET").unwrap_or_else(|| "sighting-photos".to_string()),
            photo_max_bytes,
            predictions_path: lookup("PREDICTIONS_PATH")
                .unwrap_or_else(|| "data/predictions.json".to_string()),
            web_host: lookup("WEB_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            web_port,
        })
    }
}
