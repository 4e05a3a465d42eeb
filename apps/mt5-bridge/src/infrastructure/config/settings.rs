//! Bridge Configuration Settings
//!
//! Configuration types for the bridge, loaded from environment variables
//! (after `.env` has been applied by the binary).

use std::net::IpAddr;
use std::time::Duration;

use crate::application::ports::Credentials;
use crate::application::settings::TradeSettings;
use crate::domain::shared::Symbol;
use crate::domain::trading::{OrderDefaults, PositionSelection};

/// Which terminal adapter serves the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TerminalMode {
    /// Terminal gateway process over HTTP.
    #[default]
    Gateway,
    /// In-memory paper terminal (dry runs).
    Paper,
}

impl TerminalMode {
    /// Parse mode from string.
    #[must_use]
    pub fn from_str_case_insensitive(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "paper" => Self::Paper,
            _ => Self::Gateway,
        }
    }

    /// Get the mode name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Gateway => "gateway",
            Self::Paper => "paper",
        }
    }
}

/// Shared secret required in the `X-API-Key` header.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a key.
    #[must_use]
    pub const fn new(key: String) -> Self {
        Self(key)
    }

    /// Whether `candidate` matches the key.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        // Constant time over the key length.
        self.0.len() == candidate.len()
            && self
                .0
                .bytes()
                .zip(candidate.bytes())
                .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

/// HTTP server settings.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// Bind address.
    pub host: IpAddr,
    /// Bind port.
    pub port: u16,
    /// Required API key; `None` disables authentication.
    pub api_key: Option<ApiKey>,
    /// Prometheus metrics port (0 = disabled).
    pub metrics_port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 5000,
            api_key: None,
            metrics_port: 0,
        }
    }
}

/// Terminal gateway settings.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    /// Gateway base URL.
    pub url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8228".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Complete bridge configuration.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Terminal adapter.
    pub mode: TerminalMode,
    /// Trading account credentials.
    pub credentials: Credentials,
    /// HTTP server settings.
    pub server: ServerSettings,
    /// Terminal gateway settings.
    pub gateway: GatewaySettings,
    /// Trade request settings.
    pub trade: TradeSettings,
    /// Symbol used when a request names none.
    pub default_symbol: Symbol,
}

impl BridgeConfig {
    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns an error if required variables are missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let login_raw = required(&lookup, "MT5_LOGIN")?;
        let login = login_raw
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidValue {
                key: "MT5_LOGIN".to_string(),
                message: "expected an account number".to_string(),
            })?;
        let password = required(&lookup, "MT5_PASSWORD")?;
        let server = required(&lookup, "MT5_SERVER")?;

        let mode = lookup("TERMINAL_MODE")
            .map(|s| TerminalMode::from_str_case_insensitive(&s))
            .unwrap_or_default();

        let server_defaults = ServerSettings::default();
        let host = match lookup("BRIDGE_HOST") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "BRIDGE_HOST".to_string(),
                message: format!("'{raw}' is not an IP address"),
            })?,
            None => server_defaults.host,
        };
        let server_settings = ServerSettings {
            host,
            port: parse_u16(&lookup, "BRIDGE_PORT", server_defaults.port),
            api_key: lookup("BRIDGE_API_KEY")
                .filter(|k| !k.is_empty())
                .map(ApiKey::new),
            metrics_port: parse_u16(&lookup, "METRICS_PORT", server_defaults.metrics_port),
        };

        let gateway_defaults = GatewaySettings::default();
        let gateway = GatewaySettings {
            url: lookup("TERMINAL_GATEWAY_URL")
                .filter(|u| !u.is_empty())
                .unwrap_or(gateway_defaults.url),
            timeout: parse_duration_secs(
                &lookup,
                "TERMINAL_GATEWAY_TIMEOUT_SECS",
                gateway_defaults.timeout,
            ),
        };

        let position_selection = match lookup("POSITION_SELECTION") {
            Some(raw) => raw
                .parse::<PositionSelection>()
                .map_err(|message| ConfigError::InvalidValue {
                    key: "POSITION_SELECTION".to_string(),
                    message,
                })?,
            None => PositionSelection::default(),
        };

        let trade_defaults = TradeSettings::default();
        let trade = TradeSettings {
            order_defaults: OrderDefaults {
                deviation: parse_u32(
                    &lookup,
                    "ORDER_DEVIATION",
                    trade_defaults.order_defaults.deviation,
                ),
                magic: parse_u64(&lookup, "ORDER_MAGIC", trade_defaults.order_defaults.magic),
                comment: lookup("ORDER_COMMENT")
                    .filter(|c| !c.is_empty())
                    .unwrap_or_else(|| trade_defaults.order_defaults.comment.clone()),
            },
            close_all_magic: parse_u64(&lookup, "CLOSE_ALL_MAGIC", trade_defaults.close_all_magic),
            fill_retry_delay: parse_duration_millis(
                &lookup,
                "FILL_RETRY_DELAY_MS",
                trade_defaults.fill_retry_delay,
            ),
            min_stop_distance_points: parse_u32(
                &lookup,
                "MIN_STOP_DISTANCE_POINTS",
                trade_defaults.min_stop_distance_points,
            ),
            position_selection,
        };

        let default_symbol = Symbol::parse(
            lookup("DEFAULT_SYMBOL")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "XAUUSD".to_string()),
        )
        .map_err(|e| ConfigError::InvalidValue {
            key: "DEFAULT_SYMBOL".to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            mode,
            credentials: Credentials {
                login,
                password,
                server,
            },
            server: server_settings,
            gateway,
            trade,
            default_symbol,
        })
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    /// Environment variable has empty value.
    #[error("environment variable {0} cannot be empty")]
    EmptyValue(String),
    /// Environment variable cannot be parsed.
    #[error("invalid value for {key}: {message}")]
    InvalidValue {
        /// Variable name.
        key: String,
        /// Parse failure.
        message: String,
    },
}

fn required<F>(lookup: &F, key: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))?;
    if value.trim().is_empty() {
        return Err(ConfigError::EmptyValue(key.to_string()));
    }
    Ok(value)
}

fn parse_u16<F>(lookup: &F, key: &str, default: u16) -> u16
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_u32<F>(lookup: &F, key: &str, default: u32) -> u32
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_u64<F>(lookup: &F, key: &str, default: u64) -> u64
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_duration_secs<F>(lookup: &F, key: &str, default: Duration) -> Duration
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map_or(default, Duration::from_secs)
}

fn parse_duration_millis<F>(lookup: &F, key: &str, default: Duration) -> Duration
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map_or(default, Duration::from_millis)
}
