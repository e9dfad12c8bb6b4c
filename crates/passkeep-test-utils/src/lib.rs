// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Passkeep integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without a bot token or a vault.
//!
//! # Components
//!
//! - [`MockChannel`] - Mock messaging channel with message injection and capture
//! - [`InMemoryCredentialStore`], [`InMemoryUserStore`] - Map-backed stores
//! - [`PrefixCipher`], [`PatternGenerator`], [`PlainPhraseHasher`] - Deterministic crypto stand-ins
//! - [`TestHarness`] - Fully wired dispatcher over the pieces above

pub mod fakes;
pub mod harness;
pub mod memory;
pub mod mock_channel;

pub use fakes::{PatternGenerator, PlainPhraseHasher, PrefixCipher};
pub use harness::{TestHarness, TestHarnessBuilder};
pub use memory::{InMemoryCredentialStore, InMemoryUserStore};
pub use mock_channel::MockChannel;
