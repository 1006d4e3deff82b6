//! Configuration module
//!
//! Backend endpoint and key come from the environment; `.env` loading (via
//! dotenvy) happens at the binary edge, not here.

use std::env;

use crate::constants;
use crate::error::AppError;

/// Connection settings for a Supabase-compatible backend plus the tunables
/// the client core reads at runtime.
#[derive(Clone, Debug)]
pub struct BackendConfig {
    /// Base URL of the backend, e.g. "https://abc.supabase.co".
    pub base_url: String,
    /// Publishable (anon) API key sent with every request.
    pub anon_key: String,
    pub bucket: String,
    pub table: String,
    pub max_file_size_bytes: usize,
    pub signed_url_ttl_secs: u64,
}

impl BackendConfig {
    /// Read configuration from `WAVESHELF_*` environment variables.
    ///
    /// `WAVESHELF_BACKEND_URL` and `WAVESHELF_ANON_KEY` are required;
    /// everything else has defaults.
    pub fn from_env() -> Result<Self, AppError> {
        let base_url = env::var("WAVESHELF_BACKEND_URL").map_err(|_| {
            AppError::Internal("Missing environment variable WAVESHELF_BACKEND_URL".to_string())
        })?;
        let anon_key = env::var("WAVESHELF_ANON_KEY").map_err(|_| {
            AppError::Internal("Missing environment variable WAVESHELF_ANON_KEY".to_string())
        })?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
            bucket: env::var("WAVESHELF_BUCKET")
                .unwrap_or_else(|_| constants::AUDIO_BUCKET.to_string()),
            table: env::var("WAVESHELF_TABLE")
                .unwrap_or_else(|_| constants::AUDIO_FILES_TABLE.to_string()),
            max_file_size_bytes: parse_env_or("WAVESHELF_MAX_FILE_SIZE", constants::MAX_AUDIO_FILE_SIZE),
            signed_url_ttl_secs: parse_env_or(
                "WAVESHELF_SIGNED_URL_TTL_SECS",
                constants::SIGNED_URL_TTL.as_secs(),
            ),
        })
    }
}

fn parse_env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_or_falls_back() {
        assert_eq!(parse_env_or("WAVESHELF_TEST_UNSET_VAR", 42usize), 42);
    }
}
