// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits the conversation core is written against.
//!
//! Async traits use `#[async_trait]` so implementations can be held as
//! `Arc<dyn Trait>` and swapped for in-memory doubles in tests.

pub mod adapter;
pub mod channel;
pub mod credential;
pub mod crypto;
pub mod events;
pub mod user;

pub use adapter::PluginAdapter;
pub use channel::ChannelAdapter;
pub use credential::CredentialStore;
pub use crypto::{Cipher, PasswordGenerator, PhraseHasher};
pub use events::EventPublisher;
pub use user::UserStore;
