//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `DOCQA_*` environment
//! variables. Model-specific settings live in [`crate::embedding::EmbedderConfig`]
//! and [`crate::reranker::RerankerConfig`], both of which read their own
//! `DOCQA_*` variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

use crate::constants::{DEFAULT_CACHE_CAPACITY, DEFAULT_TOP_K};
use crate::llm::DEFAULT_MODEL;
use crate::retrieval::DEFAULT_COLLECTION_NAME;

/// Default Qdrant URL used when `DOCQA_QDRANT_URL` is not set.
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";

/// Default OpenAI-compatible model endpoint.
pub const DEFAULT_LLM_URL: &str = "http://127.0.0.1:8080/v1";

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `DOCQA_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8501`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Directory for the ingest manifest and chat histories. Default:
    /// `./.data`.
    pub data_dir: PathBuf,

    /// Directory scanned for extracted corpus text. Default: `./corpus`.
    pub corpus_dir: PathBuf,

    /// Qdrant endpoint URL.
    pub qdrant_url: String,

    /// Qdrant collection holding the passages.
    pub collection: String,

    /// OpenAI-compatible model endpoint.
    pub llm_url: String,

    /// Model name used when `/models` discovery fails.
    pub llm_model: String,

    /// Passages returned per question. Default: `5`.
    pub top_k: usize,

    /// Fingerprint cache capacity. Default: `100`.
    pub cache_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8501,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            data_dir: PathBuf::from("./.data"),
            corpus_dir: PathBuf::from("./corpus"),
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            collection: DEFAULT_COLLECTION_NAME.to_string(),
            llm_url: DEFAULT_LLM_URL.to_string(),
            llm_model: DEFAULT_MODEL.to_string(),
            top_k: DEFAULT_TOP_K,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "DOCQA_PORT";
    const ENV_BIND_ADDR: &'static str = "DOCQA_BIND_ADDR";
    const ENV_DATA_DIR: &'static str = "DOCQA_DATA_DIR";
    const ENV_CORPUS_DIR: &'static str = "DOCQA_CORPUS_DIR";
    const ENV_QDRANT_URL: &'static str = "DOCQA_QDRANT_URL";
    const ENV_COLLECTION: &'static str = "DOCQA_COLLECTION";
    const ENV_LLM_URL: &'static str = "DOCQA_LLM_URL";
    const ENV_LLM_MODEL: &'static str = "DOCQA_LLM_MODEL";
    const ENV_TOP_K: &'static str = "DOCQA_TOP_K";
    const ENV_CACHE_CAPACITY: &'static str = "DOCQA_CACHE_CAPACITY";

    /// Loads configuration from environment variables (falling back to
    /// defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            port: Self::parse_port_from_env(defaults.port)?,
            bind_addr: Self::parse_bind_addr_from_env(defaults.bind_addr)?,
            data_dir: Self::parse_path_from_env(Self::ENV_DATA_DIR, defaults.data_dir),
            corpus_dir: Self::parse_path_from_env(Self::ENV_CORPUS_DIR, defaults.corpus_dir),
            qdrant_url: Self::parse_string_from_env(Self::ENV_QDRANT_URL, defaults.qdrant_url),
            collection: Self::parse_string_from_env(Self::ENV_COLLECTION, defaults.collection),
            llm_url: Self::parse_string_from_env(Self::ENV_LLM_URL, defaults.llm_url),
            llm_model: Self::parse_string_from_env(Self::ENV_LLM_MODEL, defaults.llm_model),
            top_k: Self::parse_nonzero_from_env(Self::ENV_TOP_K, defaults.top_k)?,
            cache_capacity: Self::parse_nonzero_from_env(
                Self::ENV_CACHE_CAPACITY,
                defaults.cache_capacity,
            )?,
        })
    }

    /// Validates paths and basic invariants (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        for path in [&self.data_dir, &self.corpus_dir] {
            if path.exists() && !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }
        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Path of the ingest manifest under the data directory.
    pub fn manifest_path(&self) -> PathBuf {
        self.data_dir.join("processed_files.json")
    }

    /// Path of the chat histories directory under the data directory.
    pub fn histories_dir(&self) -> PathBuf {
        self.data_dir.join("chat_histories")
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_nonzero_from_env(var_name: &str, default: usize) -> Result<usize, ConfigError> {
        match env::var(var_name) {
            Ok(value) => match value.parse::<usize>() {
                Ok(n) if n > 0 => Ok(n),
                _ => Err(ConfigError::InvalidNumber {
                    var: var_name.to_string(),
                    value,
                }),
            },
            Err(_) => Ok(default),
        }
    }
}
