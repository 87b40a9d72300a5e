use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::llm::providers::{DEFAULT_MODEL, OPENAI_BASE_URL};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "NOUN_FORGE_CONFIG";
/// Config file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "noun-forge.toml";
/// Prefix for nested overrides, e.g. `NOUN_FORGE_GENERATION__TEMPERATURE`.
pub const ENV_PREFIX: &str = "NOUN_FORGE_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Extract(#[from] Box<figment::Error>),

    #[error("failed to read prompt template {path}: {source}")]
    TemplateRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("prompt template is missing the {0} placeholder")]
    TemplatePlaceholder(&'static str),
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub provider: ProviderSettings,
    pub generation: GenerationSettings,
    pub logging: LoggingSettings,
}

/// Listening address.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Completion provider credentials and endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Read from `OPENAI_API_KEY`; absence is tolerated at startup.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    /// Per-request deadline. Unset keeps the transport default.
    pub request_timeout_secs: Option<u64>,
}

/// Generation parameters and exclusion seeding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub max_tokens: u32,
    pub frequency_penalty: Option<f32>,
    pub presence_penalty: Option<f32>,
    pub stop: Vec<String>,
    /// Hold one lock from exclusion snapshot through write-back.
    pub serialize: bool,
    pub banned_words: Vec<String>,
    /// Replaces the built-in prompt wording.
    pub prompt_template_path: Option<PathBuf>,
}

/// Log output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
    /// Also write JSON logs to a daily rolling file.
    pub json_file: bool,
    /// Override the default log directory.
    pub log_dir: Option<PathBuf>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4000,
        }
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: OPENAI_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout_secs: None,
        }
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            max_tokens: 200,
            frequency_penalty: Some(0.5),
            presence_penalty: Some(0.5),
            stop: Vec::new(),
            serialize: true,
            banned_words: ["car", "book", "dog", "apple"]
                .iter()
                .map(|w| w.to_string())
                .collect(),
            prompt_template_path: None,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json_file: false,
            log_dir: None,
        }
    }
}

impl ProviderSettings {
    /// A key made only of whitespace counts as missing.
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

impl LoggingSettings {
    /// Resolved log directory (override or platform data dir).
    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("noun-forge").join("logs"))
                .unwrap_or_else(|| PathBuf::from("logs"))
        })
    }
}

impl AppConfig {
    /// Load from defaults, the optional TOML file and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::from_figment(Self::figment(&path))
    }

    /// Layered sources, lowest precedence first.
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(
                Env::raw()
                    .only(&["PORT", "OPENAI_API_KEY"])
                    .map(|key| {
                        if key.as_str().eq_ignore_ascii_case("PORT") {
                            "server.port".into()
                        } else {
                            "provider.api_key".into()
                        }
                    }),
            )
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        figment.extract().map_err(|e| ConfigError::Extract(Box::new(e)))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
