//! Shared Kernel
//!
//! Value objects and errors used across bounded contexts.

mod errors;
pub mod value_objects;

pub use errors::DomainError;
pub use value_objects::{Symbol, Ticket, Volume};
