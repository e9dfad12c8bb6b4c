// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Passkeep.
//!
//! This crate provides the error type, the shared domain types (steps,
//! responses, password records) and the collaborator traits that the
//! conversation core, the scheduler and the adapters are written against.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{PasskeepError, ValidationError};
pub use types::{
    Agreement, Complexity, EntityId, HealthStatus, MessageId, PasswordRecord, ReminderDelivery,
    Response, SortOrder, Step, UserId,
};

pub use traits::{
    ChannelAdapter, Cipher, CredentialStore, EventPublisher, PasswordGenerator, PhraseHasher,
    PluginAdapter, UserStore,
};
