//! Shared Value Objects
//!
//! Immutable domain types used across bounded contexts.
//! Value objects are compared by value, not identity.

mod symbol;
mod ticket;
mod volume;

pub use symbol::Symbol;
pub use ticket::Ticket;
pub use volume::Volume;
