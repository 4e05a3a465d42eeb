//! Application Use Cases
//!
//! Use cases orchestrate domain logic to fulfill application requirements.

mod account_status;
mod close_all;
mod close_partial;
mod modify_position;
mod open_position;
#[cfg(test)]
pub(crate) mod test_support;

pub use account_status::AccountStatusUseCase;
pub use close_all::CloseAllUseCase;
pub use close_partial::ClosePartialUseCase;
pub use modify_position::ModifyPositionUseCase;
pub use open_position::OpenPositionUseCase;
