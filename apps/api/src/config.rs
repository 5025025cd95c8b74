use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_LLM_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const DEFAULT_MODEL_ID: &str = "google/gemini-flash-1.5";

/// Application configuration loaded from environment variables.
///
/// The generation credential is optional here: a missing key does not stop the
/// server from starting, it is reported per call as `MissingCredential`.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LlmSettings,
    pub port: u16,
    pub rust_log: String,
}

/// Everything the Generation Client needs to reach the upstream service.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
    pub site_url: String,
    pub app_name: String,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_LLM_API_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL_ID.to_string(),
            temperature: 0.75,
            max_tokens: 8192,
            timeout: Duration::from_secs(120),
            site_url: "https://your-shopify-store.com".to_string(),
            app_name: "Bazi Pro Calculator".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = LlmSettings::default();
        let llm = LlmSettings {
            api_url: optional_env("LLM_API_URL").unwrap_or(defaults.api_url),
            api_key: optional_env("OPENROUTER_API_KEY"),
            model: optional_env("MODEL_ID").unwrap_or(defaults.model),
            temperature: parse_env("LLM_TEMPERATURE", defaults.temperature)?,
            max_tokens: parse_env("LLM_MAX_TOKENS", defaults.max_tokens)?,
            timeout: Duration::from_secs(parse_env(
                "LLM_TIMEOUT_SECS",
                defaults.timeout.as_secs(),
            )?),
            site_url: optional_env("SITE_URL").unwrap_or(defaults.site_url),
            app_name: optional_env("APP_NAME").unwrap_or(defaults.app_name),
        };

        Ok(Config {
            llm,
            port: parse_env("PORT", 8080u16).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Returns the variable's value, treating unset and blank the same way.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_match_upstream_contract() {
        let s = LlmSettings::default();
        assert_eq!(s.api_url, DEFAULT_LLM_API_URL);
        assert_eq!(s.max_tokens, 8192);
        assert_eq!(s.timeout, Duration::from_secs(120));
        assert!(s.api_key.is_none());
    }

    #[test]
    fn test_parse_env_falls_back_to_default_when_unset() {
        let value: u32 = parse_env("MINGLI_TEST_SURELY_UNSET_VAR", 42).unwrap();
        assert_eq!(value, 42);
    }
}
