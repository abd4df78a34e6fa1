use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;
use thiserror::Error;

const DEFAULT_SERVER_PORT: u16 = 3002;
const DEFAULT_HUGGINGFACE_MODEL: &str = "sshleifer/distilbart-cnn-12-6";
const DEFAULT_SUMMARY_MAX_LENGTH: usize = 130;
const DEFAULT_SUMMARY_MIN_LENGTH: usize = 30;
const DEFAULT_CHUNK_SIZE: usize = 1000;
const DEFAULT_MAX_CHUNKS: usize = 3;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 200 * 1024 * 1024;

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

/// Runtime configuration for the Rusty Digest server.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Port the HTTP server binds on all interfaces.
    pub server_port: u16,
    /// Runtime that hosts the summarization model.
    pub summarization_provider: SummarizationProvider,
    /// Optional base URL override for the summarization runtime.
    pub summarization_url: Option<String>,
    /// Model identifier passed to the runtime.
    pub summarization_model: String,
    /// Optional bearer token sent to the runtime.
    pub summarization_api_token: Option<String>,
    /// Upper output length bound requested for each chunk summary.
    pub summary_max_length: usize,
    /// Lower output length bound requested for each chunk summary.
    pub summary_min_length: usize,
    /// Number of characters per chunk.
    pub chunk_size: usize,
    /// Number of leading chunks that are summarized; the rest are dropped.
    pub max_chunks: usize,
    /// Largest accepted upload body in bytes.
    pub max_upload_bytes: usize,
    /// Optional log file path; defaults to `logs/rusty-digest.log`.
    pub log_file: Option<PathBuf>,
}

/// Supported summarization runtimes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummarizationProvider {
    /// Hugging Face style inference endpoint serving a summarization pipeline.
    HuggingFace,
    /// Local Ollama runtime driven through a summarization prompt.
    Ollama,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Blank values are treated as absent so that an empty `.env` entry falls back to the
    /// default instead of failing to parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let summarization_provider = match get("SUMMARIZATION_PROVIDER") {
            Some(value) => value
                .parse()
                .map_err(|()| ConfigError::InvalidValue("SUMMARIZATION_PROVIDER".into()))?,
            None => SummarizationProvider::HuggingFace,
        };

        let summarization_model = match (get("SUMMARIZATION_MODEL"), summarization_provider) {
            (Some(model), _) => model,
            (None, SummarizationProvider::HuggingFace) => DEFAULT_HUGGINGFACE_MODEL.to_string(),
            (None, SummarizationProvider::Ollama) => {
                return Err(ConfigError::MissingVariable("SUMMARIZATION_MODEL".into()));
            }
        };

        let config = Self {
            server_port: parse_or(&get, "SERVER_PORT", DEFAULT_SERVER_PORT)?,
            summarization_provider,
            summarization_url: get("SUMMARIZATION_URL"),
            summarization_model,
            summarization_api_token: get("SUMMARIZATION_API_TOKEN"),
            summary_max_length: parse_or(&get, "SUMMARY_MAX_LENGTH", DEFAULT_SUMMARY_MAX_LENGTH)?,
            summary_min_length: parse_or(&get, "SUMMARY_MIN_LENGTH", DEFAULT_SUMMARY_MIN_LENGTH)?,
            chunk_size: parse_or(&get, "CHUNK_SIZE", DEFAULT_CHUNK_SIZE)?,
            max_chunks: parse_or(&get, "MAX_CHUNKS", DEFAULT_MAX_CHUNKS)?,
            max_upload_bytes: parse_or(&get, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            log_file: get("RUSTY_DIGEST_LOG_FILE").map(PathBuf::from),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::InvalidValue("CHUNK_SIZE".into()));
        }
        if self.max_chunks == 0 {
            return Err(ConfigError::InvalidValue("MAX_CHUNKS".into()));
        }
        if self.summary_max_length == 0 {
            return Err(ConfigError::InvalidValue("SUMMARY_MAX_LENGTH".into()));
        }
        if self.summary_min_length > self.summary_max_length {
            return Err(ConfigError::InvalidValue("SUMMARY_MIN_LENGTH".into()));
        }
        Ok(())
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    G: Fn(&str) -> Option<String>,
{
    get(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string()))
        })
        .transpose()
        .map(|value| value.unwrap_or(default))
}

impl std::str::FromStr for SummarizationProvider {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "huggingface" | "hf" => Ok(Self::HuggingFace),
            "ollama" => Ok(Self::Ollama),
            _ => Err(()),
        }
    }
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, if [`init_config`] has run.
pub fn get_config() -> Option<&'static Config> {
    CONFIG.get()
}

/// Load configuration from the environment and install it in the global cache.
///
/// Calling this more than once keeps the first configuration.
pub fn init_config() -> Result<&'static Config, ConfigError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    tracing::debug!(
        server_port = config.server_port,
        provider = ?config.summarization_provider,
        model = %config.summarization_model,
        chunk_size = config.chunk_size,
        max_chunks = config.max_chunks,
        "Loaded configuration"
    );
    Ok(CONFIG.get_or_init(|| config))
}
