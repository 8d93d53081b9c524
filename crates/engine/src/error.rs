//! The module contains the error the engine can throw.
//!
//! The balance accumulator and the settlement matcher never fail on their
//! own: the errors below come from input validation (strict mode and the
//! [`TripLedger`]) and from parsing user provided amounts.
//!
//! - [`EmptySplit`] thrown when an equal split has nobody to divide among.
//! - [`UnknownSplitParticipant`] thrown when a custom amount names someone
//!   outside the expense's split list.
//! - [`KeyNotFound`] thrown when an item is not found.
//!
//!  [`EmptySplit`]: EngineError::EmptySplit
//!  [`UnknownSplitParticipant`]: EngineError::UnknownSplitParticipant
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`TripLedger`]: super::ledger::TripLedger
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid participant: {0}")]
    InvalidParticipant(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Expense \"{0}\" has an equal split without participants")]
    EmptySplit(String),
    #[error("Expense \"{expense}\" assigns an amount to \"{participant}\" outside its split list")]
    UnknownSplitParticipant {
        expense: String,
        participant: String,
    },
    #[error("Currency mismatch: {0}")]
    CurrencyMismatch(String),
}
