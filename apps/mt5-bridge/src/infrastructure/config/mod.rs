//! Configuration Module
//!
//! Configuration loading for the bridge service.

mod settings;

pub use settings::{
    ApiKey, BridgeConfig, ConfigError, GatewaySettings, ServerSettings, TerminalMode,
};
