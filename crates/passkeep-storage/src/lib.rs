// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for Passkeep.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a single-writer
//! concurrency model via `tokio-rusqlite`, and the [`CredentialStore`] and
//! [`UserStore`] implementations used in production.
//!
//! [`CredentialStore`]: passkeep_core::CredentialStore
//! [`UserStore`]: passkeep_core::UserStore

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteStore;
pub use database::Database;
