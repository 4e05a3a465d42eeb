//! Data Transfer Objects (DTOs)
//!
//! Use case inputs and outputs.

mod trade_dto;

pub use trade_dto::{
    AccountStatus, CloseAllReport, ClosePartialCommand, ModifyPositionCommand,
    OpenPositionCommand, OpenPositionOutcome,
};
