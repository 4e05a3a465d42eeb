//! Infrastructure Layer
//!
//! This module contains all adapters (implementations) for the ports defined
//! in the application layer. Following hexagonal architecture:
//!
//! - **Driven Adapters (Outbound)**: Implement ports for external systems
//!   - `terminal/`: Trading terminal adapters (gateway, paper)
//!
//! - **Driver Adapters (Inbound)**: Expose application to external world
//!   - `http/`: REST API controllers
//!
//! - **Configuration**: Environment-based settings
//!   - `config/`: `BridgeConfig` and its sections

pub mod config;
pub mod http;
pub mod terminal;
