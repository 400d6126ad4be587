use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_LLM_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_LLM_MODEL: &str = "llama3-8b-8192";
const DEFAULT_LLM_TEMPERATURE: f64 = 0.3;
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the medbrief server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer credential for the hosted chat-completion API.
    pub llm_api_key: String,
    /// Root of the OpenAI-compatible API (without the `/chat/completions` suffix).
    pub llm_base_url: String,
    /// Model identifier sent with every completion request.
    pub llm_model: String,
    /// Sampling temperature sent with every completion request.
    pub llm_temperature: f64,
    /// Upper bound on a single completion request.
    pub llm_timeout_secs: u64,
    /// Directory where uploads are staged while a request is processed.
    pub upload_dir: PathBuf,
    /// Maximum accepted request body size in bytes.
    pub max_upload_bytes: usize,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
    /// Optional CORS origin allowlist; any origin is accepted when absent.
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            llm_api_key: load_env(&lookup, "LLM_API_KEY")?,
            llm_base_url: load_env_optional(&lookup, "LLM_BASE_URL")
                .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string()),
            llm_model: load_env_optional(&lookup, "LLM_MODEL")
                .unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            llm_temperature: parse_optional(&lookup, "LLM_TEMPERATURE")?
                .unwrap_or(DEFAULT_LLM_TEMPERATURE),
            llm_timeout_secs: parse_optional(&lookup, "LLM_TIMEOUT_SECS")?
                .unwrap_or(DEFAULT_LLM_TIMEOUT_SECS),
            upload_dir: load_env_optional(&lookup, "UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR)),
            max_upload_bytes: parse_optional(&lookup, "MAX_UPLOAD_BYTES")?
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            server_port: parse_optional(&lookup, "SERVER_PORT")?,
            cors_allowed_origins: load_env_optional(&lookup, "CORS_ALLOWED_ORIGINS").map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect()
            }),
        })
    }

    /// Request timeout applied to the summarization client.
    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }
}

fn load_env<F>(lookup: &F, key: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    load_env_optional(lookup, key).ok_or_else(|| ConfigError::MissingVariable(key.to_string()))
}

fn load_env_optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|value| !value.trim().is_empty())
}

fn parse_optional<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    load_env_optional(lookup, key)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string()))
        })
        .transpose()
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load config from environment");
    tracing::debug!(
        llm_base_url = %config.llm_base_url,
        llm_model = %config.llm_model,
        upload_dir = %config.upload_dir.display(),
        server_port = ?config.server_port,
        "Loaded configuration"
    );
    CONFIG.set(config).expect("Failed to set config");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_the_key_is_set() {
        let config = Config::from_lookup(vars(&[("LLM_API_KEY", "test-key")])).expect("config");

        assert_eq!(config.llm_api_key, "test-key");
        assert_eq!(config.llm_base_url, "https://api.groq.com/openai/v1");
        assert_eq!(config.llm_model, "llama3-8b-8192");
        assert!((config.llm_temperature - 0.3).abs() < f64::EPSILON);
        assert_eq!(config.llm_timeout(), Duration::from_secs(60));
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
        assert_eq!(config.max_upload_bytes, 20 * 1024 * 1024);
        assert_eq!(config.server_port, None);
        assert_eq!(config.cors_allowed_origins, None);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = Config::from_lookup(vars(&[
            ("LLM_API_KEY", "test-key"),
            ("LLM_MODEL", "llama-3.1-8b-instant"),
            ("LLM_TEMPERATURE", "0.7"),
            ("MAX_UPLOAD_BYTES", "1024"),
            ("SERVER_PORT", " 8080 "),
            ("CORS_ALLOWED_ORIGINS", "http://a.test, ,http://b.test"),
        ]))
        .expect("config");

        assert_eq!(config.llm_model, "llama-3.1-8b-instant");
        assert!((config.llm_temperature - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.max_upload_bytes, 1024);
        assert_eq!(config.server_port, Some(8080));
        assert_eq!(
            config.cors_allowed_origins,
            Some(vec!["http://a.test".to_string(), "http://b.test".to_string()])
        );
    }

    #[test]
    fn missing_api_key_is_reported() {
        let error = Config::from_lookup(vars(&[])).expect_err("no key");
        assert!(matches!(error, ConfigError::MissingVariable(key) if key == "LLM_API_KEY"));
    }

    #[test]
    fn parse_optional_rejects_garbage() {
        let lookup = vars(&[("SERVER_PORT", "not-a-port")]);
        let result: Result<Option<u16>, _> = parse_optional(&lookup, "SERVER_PORT");
        assert!(matches!(result, Err(ConfigError::InvalidValue(key)) if key == "SERVER_PORT"));
    }

    #[test]
    fn blank_values_count_as_missing() {
        let lookup = vars(&[("LLM_API_KEY", "   ")]);
        assert!(load_env_optional(&lookup, "LLM_API_KEY").is_none());
        assert!(matches!(
            load_env(&lookup, "LLM_API_KEY"),
            Err(ConfigError::MissingVariable(_))
        ));
    }
}
