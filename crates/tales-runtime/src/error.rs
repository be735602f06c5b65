//! Error types for the interpreter.

use thiserror::Error;

/// Result type for interpreter operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Errors reported to the host. None of them leave the interpreter unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// A start scene or transition target is not in the script.
    #[error("unknown scene: {0}")]
    UnknownScene(String),

    /// The selected index is outside the current menu.
    #[error("invalid choice {index}: the menu has {len} option(s)")]
    InvalidChoiceIndex {
        /// Index the caller asked for.
        index: usize,
        /// Number of options in the menu.
        len: usize,
    },

    /// `select` was called while no menu is pending.
    #[error("no choice is pending; call advance first")]
    NotAwaitingChoice,

    /// A snapshot does not fit the script it is resumed against.
    #[error("snapshot does not match the script: {0}")]
    InvalidSnapshot(String),
}
