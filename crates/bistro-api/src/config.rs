use bistro_llm::config::{
    DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
};
use bistro_llm::ModelConfig;
use config::{Config as ConfigLoader, ConfigError as LoaderError, Environment, File};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
pub const API_KEY_FILE_ENV: &str = "ANTHROPIC_API_KEY_FILE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] LoaderError),

    #[error("ANTHROPIC_API_KEY is not set; export it, add it to .env, or point ANTHROPIC_API_KEY_FILE at a file containing the key")]
    MissingCredential,

    #[error("Failed to read secret file {}: {source}", path.display())]
    SecretFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub llm: LlmConfig,
    pub logging: LoggingConfig,
    pub app: AppConfig,

    // Secret (from ENV or secret file only)
    #[serde(skip)]
    pub api_key: ApiKey,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub enabled: bool,
    pub origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub max_retries: usize,
    /// Unset means no timeout; this is the only timeout applied to model calls.
    pub timeout_secs: Option<u64>,
    pub api_key_file: Option<PathBuf>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            max_retries: DEFAULT_MAX_RETRIES,
            timeout_secs: None,
            api_key_file: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Choices offered to the restaurant generator front-end
    pub countries: Vec<String>,
}

/// Model API key. Never printed.
#[derive(Clone, Default)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. BISTRO_-prefixed environment variables, `__` between section and key
    ///    (e.g. BISTRO_LLM__MAX_RETRIES=3)
    ///
    /// Fails with [`ConfigError::MissingCredential`] when no API key can be found.
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let loader = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("BISTRO")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("app.countries")
                    .with_list_parse_key("cors.origins"),
            )
            .build()?;

        let mut cfg: Config = loader.try_deserialize()?;

        let key_file = std::env::var_os(API_KEY_FILE_ENV)
            .map(PathBuf::from)
            .or_else(|| cfg.llm.api_key_file.clone());
        cfg.api_key = resolve_api_key(std::env::var(API_KEY_ENV).ok(), key_file.as_deref())?;

        Ok(cfg)
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = ApiKey::new(key);
        self
    }

    pub fn model_config(&self) -> ModelConfig {
        ModelConfig::new(self.api_key.expose())
            .with_base_url(&self.llm.base_url)
            .with_model(&self.llm.model)
            .with_temperature(self.llm.temperature)
            .with_max_tokens(self.llm.max_tokens)
            .with_max_retries(self.llm.max_retries)
            .with_timeout(self.llm.timeout_secs.map(Duration::from_secs))
    }
}

/// Pick the API key: a non-blank environment value wins, then the secret file.
pub fn resolve_api_key(env_value: Option<String>, file: Option<&Path>) -> Result<ApiKey, ConfigError> {
    if let Some(key) = env_value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        return Ok(ApiKey(key));
    }

    if let Some(path) = file {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::SecretFile {
            path: path.to_path_buf(),
            source,
        })?;
        let key = contents.trim();
        if !key.is_empty() {
            return Ok(ApiKey(key.to_string()));
        }
    }

    Err(ConfigError::MissingCredential)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_key_file(contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("bistro-key-{}", uuid::Uuid::new_v4()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_config_structure() {
        let toml = r#"
            [server]
            host = "0.0.0.0"
            port = 9000

            [cors]
            enabled = true
            origins = ["http://localhost:5173"]

            [llm]
            model = "claude-3-5-haiku-latest"
            temperature = 0.2
            max_tokens = 512
            max_retries = 2
            timeout_secs = 20

            [logging]
            level = "debug"
            format = "json"

            [app]
            countries = ["India", "Mexico"]
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.llm.max_retries, 2);
        assert_eq!(config.llm.timeout_secs, Some(20));
        assert_eq!(config.llm.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.app.countries, vec!["India", "Mexico"]);
        assert!(config.api_key.expose().is_empty());
    }

    #[test]
    fn test_missing_sections_fall_back_to_defaults() {
        let config: Config = toml::from_str("[logging]\nformat = \"json\"").unwrap();
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.llm.model, DEFAULT_MODEL);
        assert_eq!(config.llm.timeout_secs, None);
    }

    #[test]
    fn test_env_value_wins_over_file() {
        let path = temp_key_file("from-file");
        let key = resolve_api_key(Some("from-env".to_string()), Some(&path)).unwrap();
        assert_eq!(key.expose(), "from-env");
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_key_read_from_file_is_trimmed() {
        let path = temp_key_file("  sk-ant-test\n");
        let key = resolve_api_key(None, Some(&path)).unwrap();
        assert_eq!(key.expose(), "sk-ant-test");
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_blank_env_and_no_file_is_missing_credential() {
        let err = resolve_api_key(Some("   ".to_string()), None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential));
        assert!(err.to_string().contains(API_KEY_ENV));
    }

    #[test]
    fn test_empty_secret_file_is_missing_credential() {
        let path = temp_key_file("\n");
        let err = resolve_api_key(None, Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_unreadable_secret_file() {
        let path = std::env::temp_dir().join(format!("bistro-missing-{}", uuid::Uuid::new_v4()));
        let err = resolve_api_key(None, Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::SecretFile { .. }));
    }

    #[test]
    fn test_model_config_mapping() {
        let mut config = Config::default().with_api_key("sk-ant-test");
        config.llm.model = "claude-3-5-haiku-latest".to_string();
        config.llm.max_retries = 1;
        config.llm.timeout_secs = Some(15);

        let model = config.model_config();
        assert_eq!(model.api_key, "sk-ant-test");
        assert_eq!(model.model, "claude-3-5-haiku-latest");
        assert_eq!(model.max_retries, 1);
        assert_eq!(model.timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = Config::default().with_api_key("sk-ant-secret");
        let printed = format!("{:?}", config);
        assert!(!printed.contains("sk-ant-secret"));
        assert!(printed.contains("ApiKey(***)"));
    }
}
