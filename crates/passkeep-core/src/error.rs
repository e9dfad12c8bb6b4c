// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Passkeep.

use thiserror::Error;

use crate::types::UserId;

/// The primary error type used across collaborator traits and command handling.
///
/// Expected failures (bad input, unknown index, cooldown) are ordinary values
/// here; the dispatcher turns every variant into a user-facing response.
#[derive(Debug, Error)]
pub enum PasskeepError {
    /// The first token matched no command verb or keyboard label.
    #[error("command not found: {0}")]
    CommandNotFound(String),

    /// A step or one-shot parameter failed its local validation.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A password record could not be resolved (bad index, stale id).
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    /// The user id has no user record.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// Encryption or decryption failed (malformed input, key mismatch).
    #[error("crypto error: {0}")]
    Crypto(String),

    /// The recovery phrase was changed too recently.
    #[error("recovery phrase cooldown active for {remaining_days} more day(s)")]
    CooldownActive { remaining_days: i64 },

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Channel adapter errors (connection failure, message format, rate limiting).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration errors detected outside the config crate.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PasskeepError {
    /// Wraps any error as a storage failure.
    pub fn storage(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        PasskeepError::Storage {
            source: Box::new(source),
        }
    }
}

/// Reasons a single piece of user input was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("password length must be an integer between {min} and {max}")]
    Length { min: usize, max: usize },

    #[error("complexity must be 1, 2 or 3")]
    Complexity,

    #[error("index does not refer to a stored password")]
    Index,

    #[error("reminder days must be an integer between {min} and {max}")]
    Days { min: u32, max: u32 },

    #[error("unknown sort type")]
    SortType,

    #[error("expected a yes or no answer")]
    Agreement,

    #[error("password must be a single non-empty token")]
    Secret,

    #[error("text must not be empty")]
    Empty,
}
