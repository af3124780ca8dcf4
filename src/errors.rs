// src/errors.rs

//! Crate-wide error types for the user-facing failure modes.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DooError {
    /// Preformatted bundle of catalog validation errors.
    #[error("{0}")]
    Validation(String),

    #[error("failed to parse pattern '{pattern}': {source}")]
    BadPattern {
        pattern: String,
        source: globset::Error,
    },

    #[error("no target matched: {0}")]
    NoMatch(String),

    #[error("no targets. nothing to do.")]
    NothingToDo,

    #[error("doo is deadlocked. do you have a dependency cycle?")]
    Deadlocked,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, DooError>;
