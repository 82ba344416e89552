//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when
//! present). Every setting has a default except the room to watch.

use ama_core::SnapshotPolicy;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ApiConfig,
    pub stream: StreamSettings,
    pub session: SessionSettings,
}

/// General application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => Ok(Self::Development),
            other => Err(other.to_string()),
        }
    }
}

/// REST API client settings
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL including the `/api` prefix, e.g. `http://localhost:8080/api`
    pub base_url: String,
    pub request_timeout_secs: u64,
}

impl ApiConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Event stream settings
#[derive(Debug, Clone)]
pub struct StreamSettings {
    /// WebSocket origin, e.g. `ws://localhost:8080`
    pub base_url: String,
    /// Capacity of the hand-off channel between the socket task and the session
    pub buffer: usize,
    pub reconnect: ReconnectSettings,
}

/// Which reconnect strategy to use after the stream drops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReconnectMode {
    Never,
    Immediate,
    Fixed,
    #[default]
    Backoff,
}

impl FromStr for ReconnectMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "never" | "none" => Ok(Self::Never),
            "immediate" => Ok(Self::Immediate),
            "fixed" => Ok(Self::Fixed),
            "backoff" | "exponential" => Ok(Self::Backoff),
            other => Err(other.to_string()),
        }
    }
}

/// Reconnect tuning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectSettings {
    pub mode: ReconnectMode,
    /// Fixed delay, or the first backoff delay
    pub delay_ms: u64,
    /// Backoff ceiling
    pub max_delay_ms: u64,
    /// `None` retries until the session is closed
    pub max_attempts: Option<u32>,
    pub jitter: bool,
}

impl Default for ReconnectSettings {
    fn default() -> Self {
        Self {
            mode: ReconnectMode::default(),
            delay_ms: default_reconnect_delay_ms(),
            max_delay_ms: default_reconnect_max_delay_ms(),
            max_attempts: Some(default_reconnect_max_attempts()),
            jitter: true,
        }
    }
}

/// Room session settings
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Room to watch; required by `ama-watch`
    pub room_id: Option<String>,
    pub snapshot_policy: SnapshotPolicy,
}

// Default value functions
fn default_app_name() -> String {
    "ama-watch".to_string()
}

fn default_api_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_ws_url() -> String {
    "ws://localhost:8080".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_stream_buffer() -> usize {
    100
}

fn default_reconnect_delay_ms() -> u64 {
    1_000
}

fn default_reconnect_max_delay_ms() -> u64 {
    30_000
}

fn default_reconnect_max_attempts() -> u32 {
    10
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a variable is set to a value that does not parse
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            app: AppSettings {
                name: var("APP_NAME").unwrap_or_else(default_app_name),
                env: parse_var(&var, "APP_ENV")?.unwrap_or_default(),
            },
            api: ApiConfig {
                base_url: var("AMA_API_URL")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or_else(default_api_url),
                request_timeout_secs: parse_var(&var, "AMA_REQUEST_TIMEOUT_SECS")?
                    .unwrap_or_else(default_request_timeout_secs),
            },
            stream: StreamSettings {
                base_url: var("AMA_WS_URL")
                    .map(|url| ws_url(url.trim_end_matches('/')))
                    .transpose()?
                    .unwrap_or_else(default_ws_url),
                buffer: parse_var(&var, "AMA_STREAM_BUFFER")?
                    .unwrap_or_else(default_stream_buffer)
                    .max(1),
                reconnect: ReconnectSettings {
                    mode: parse_var(&var, "AMA_RECONNECT")?.unwrap_or_default(),
                    delay_ms: parse_var(&var, "AMA_RECONNECT_DELAY_MS")?
                        .unwrap_or_else(default_reconnect_delay_ms),
                    max_delay_ms: parse_var(&var, "AMA_RECONNECT_MAX_DELAY_MS")?
                        .unwrap_or_else(default_reconnect_max_delay_ms),
                    max_attempts: match var("AMA_RECONNECT_MAX_ATTEMPTS") {
                        Some(v) if v.eq_ignore_ascii_case("unlimited") => None,
                        Some(v) => Some(v.parse().map_err(|_| {
                            ConfigError::InvalidValue("AMA_RECONNECT_MAX_ATTEMPTS", v.clone())
                        })?),
                        None => Some(default_reconnect_max_attempts()),
                    },
                    jitter: parse_var(&var, "AMA_RECONNECT_JITTER")?.unwrap_or(true),
                },
            },
            session: SessionSettings {
                room_id: var("AMA_ROOM_ID"),
                snapshot_policy: parse_var(&var, "AMA_SNAPSHOT_POLICY")?.unwrap_or_default(),
            },
        })
    }

    /// Room id, or an error naming the variable to set
    pub fn require_room_id(&self) -> Result<&str, ConfigError> {
        self.session
            .room_id
            .as_deref()
            .ok_or(ConfigError::MissingVar("AMA_ROOM_ID"))
    }
}

/// The WebSocket client is built without TLS, so only `ws://` is usable
fn ws_url(url: &str) -> Result<String, ConfigError> {
    if url.starts_with("ws://") {
        Ok(url.to_string())
    } else {
        Err(ConfigError::InvalidValue("AMA_WS_URL", url.to_string()))
    }
}

fn parse_var<T, F>(var: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    var(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key, raw.clone()))
        })
        .transpose()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
