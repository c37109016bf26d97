use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;
const DEFAULT_ANNOTATOR_TIMEOUT_SECS: u64 = 30;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding `config.json`, `tokenizer.json` and `model.safetensors`
    /// of the BERT-style encoder used for embeddings.
    pub model_dir: PathBuf,
    /// Endpoint of the linguistic annotation service (POS tags + entities).
    pub annotator_url: String,
    pub annotator_timeout: Duration,
    /// Request body limit for the multipart ranking endpoint.
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            model_dir: PathBuf::from(require_env("MODEL_DIR")?),
            annotator_url: require_env("ANNOTATOR_URL")?,
            annotator_timeout: Duration::from_secs(parse_env(
                "ANNOTATOR_TIMEOUT_SECS",
                DEFAULT_ANNOTATOR_TIMEOUT_SECS,
            )?),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_falls_back_to_default() {
        let port: u16 = parse_env("SCREENER_TEST_UNSET_PORT", 8080).unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("SCREENER_TEST_BAD_LIMIT", "twenty");
        let result: Result<usize> = parse_env("SCREENER_TEST_BAD_LIMIT", 1);
        assert!(result.is_err());
        std::env::remove_var("SCREENER_TEST_BAD_LIMIT");
    }

    #[test]
    fn test_require_env_names_missing_key() {
        let err = require_env("SCREENER_TEST_DEFINITELY_MISSING").unwrap_err();
        assert!(err.to_string().contains("SCREENER_TEST_DEFINITELY_MISSING"));
    }
}
