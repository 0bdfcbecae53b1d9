use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::models::BackendKind;
use crate::ranking::DEFAULT_TOP_K;

/// Application-level constants
pub const APP_NAME: &str = "SymptomChecker";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Remote prediction calls give up after this long.
pub const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 10;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Environment variable names.
pub const ENV_BACKEND: &str = "SYMPTOM_CHECKER_BACKEND";
pub const ENV_PREDICTION_URL: &str = "SYMPTOM_CHECKER_PREDICTION_URL";
pub const ENV_TIMEOUT_SECS: &str = "SYMPTOM_CHECKER_TIMEOUT_SECS";
pub const ENV_FALLBACK_TO_LOCAL: &str = "SYMPTOM_CHECKER_FALLBACK_TO_LOCAL";
pub const ENV_KNOWLEDGE_BASE: &str = "SYMPTOM_CHECKER_KNOWLEDGE_BASE";
pub const ENV_BIND: &str = "SYMPTOM_CHECKER_BIND";
pub const ENV_TOP_K: &str = "SYMPTOM_CHECKER_TOP_K";

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "symptom_checker=info"
}

/// Get the application data directory
/// ~/SymptomChecker/ when a home directory exists, else the working directory.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(APP_NAME))
        .unwrap_or_else(|| PathBuf::from("."))
}

pub const KNOWLEDGE_BASE_FILE: &str = "knowledge_base.json";

/// Sample knowledge base shipped with the source tree.
pub const BUNDLED_KNOWLEDGE_BASE: &str = "data/knowledge_base.json";

/// Default knowledge base location: the installed copy under the data
/// directory, else the bundled sample when running from a checkout.
pub fn default_knowledge_base_path() -> PathBuf {
    pick_knowledge_base(|path| path.is_file())
}

fn pick_knowledge_base<F>(exists: F) -> PathBuf
where
    F: Fn(&Path) -> bool,
{
    let installed = app_data_dir().join(KNOWLEDGE_BASE_FILE);
    let bundled = PathBuf::from(BUNDLED_KNOWLEDGE_BASE);
    if !exists(&installed) && exists(&bundled) {
        return bundled;
    }
    installed
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{key}={value:?} is invalid: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("SYMPTOM_CHECKER_BACKEND=remote requires SYMPTOM_CHECKER_PREDICTION_URL")]
    MissingPredictionUrl,
}

/// Runtime configuration for the engine and its HTTP surface.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub backend: BackendKind,
    pub prediction_url: Option<String>,
    pub request_timeout: Duration,
    /// Use the local knowledge base when the remote is unavailable.
    /// Off unless explicitly enabled.
    pub fallback_to_local: bool,
    pub knowledge_base_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub default_k: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Local,
            prediction_url: None,
            request_timeout: Duration::from_secs(DEFAULT_REMOTE_TIMEOUT_SECS),
            fallback_to_local: false,
            knowledge_base_path: default_knowledge_base_path(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            default_k: DEFAULT_TOP_K,
        }
    }
}

impl EngineConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key → value lookup; unset keys keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(value) = get(ENV_BACKEND) {
            config.backend = value
                .to_lowercase()
                .parse()
                .map_err(|_| invalid(ENV_BACKEND, &value, "expected `local` or `remote`"))?;
        }

        config.prediction_url = get(ENV_PREDICTION_URL);

        if let Some(value) = get(ENV_TIMEOUT_SECS) {
            let secs: u64 = value
                .parse()
                .map_err(|_| invalid(ENV_TIMEOUT_SECS, &value, "expected whole seconds"))?;
            if secs == 0 {
                return Err(invalid(ENV_TIMEOUT_SECS, &value, "must be at least 1"));
            }
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Some(value) = get(ENV_FALLBACK_TO_LOCAL) {
            config.fallback_to_local = parse_bool(&value)
                .ok_or_else(|| invalid(ENV_FALLBACK_TO_LOCAL, &value, "expected true or false"))?;
        }

        if let Some(value) = get(ENV_KNOWLEDGE_BASE) {
            config.knowledge_base_path = PathBuf::from(value);
        }

        if let Some(value) = get(ENV_BIND) {
            config.bind_addr = value
                .parse()
                .map_err(|_| invalid(ENV_BIND, &value, "expected host:port"))?;
        }

        if let Some(value) = get(ENV_TOP_K) {
            config.default_k = value
                .parse()
                .ok()
                .filter(|k: &usize| *k >= 1)
                .ok_or_else(|| invalid(ENV_TOP_K, &value, "expected an integer >= 1"))?;
        }

        if config.backend == BackendKind::Remote && config.prediction_url.is_none() {
            return Err(ConfigError::MissingPredictionUrl);
        }

        Ok(config)
    }
}

fn invalid(key: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
