//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{BankError, TimerSettingsError};

/// Errors emitted by engine intents.
///
/// Session navigation never errors: `next`, `previous` and `select_choice`
/// self-clamp or no-op instead. Only bank edits and timer configuration can
/// be rejected, and both leave the engine unchanged.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    #[error("timer duration cannot change while a countdown is armed")]
    TimerArmed,

    #[error(transparent)]
    Bank(#[from] BankError),

    #[error(transparent)]
    Timer(#[from] TimerSettingsError),
}
