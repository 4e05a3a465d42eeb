//! Application Layer
//!
//! The application layer orchestrates domain logic through use cases.
//! It defines:
//!
//! - **Ports**: The trading terminal interface
//! - **Services**: Terminal session, lookups and order submission
//! - **Use Cases**: Open, partial close, modify, close-all, status
//! - **DTOs**: Use case inputs and outputs

pub mod dto;
pub mod errors;
pub mod ports;
pub mod services;
pub mod settings;
pub mod use_cases;

pub use dto::*;
pub use errors::TradeError;
pub use ports::*;
pub use settings::TradeSettings;
pub use use_cases::*;
