//! Domain Layer
//!
//! The innermost layer containing trading rules with zero infrastructure dependencies.
//! This layer defines:
//!
//! - **Value Objects**: Immutable domain types with equality by value
//! - **Domain Services**: Stateless business logic (stop correction, position selection)
//!
//! # Bounded Contexts
//!
//! - [`trading`]: Order requests, fill modes, stop-level correction
//! - [`session`]: Terminal connection state
//! - [`shared`]: Symbols, volumes, tickets and domain errors

pub mod session;
pub mod shared;
pub mod trading;
