// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret handling for Passkeep.
//!
//! Stored passwords are encrypted with AES-256-GCM under a random master
//! key. The master key itself is protected by a passphrase-derived key via
//! Argon2id and kept in the `vault_meta` table. This crate also provides the
//! password generator and recovery phrase hashing.

pub mod crypto;
pub mod generator;
pub mod kdf;
pub mod phrase;
pub mod prompt;
pub mod vault;

pub use generator::RandomPasswordGenerator;
pub use phrase::{Argon2PhraseHasher, hash_phrase, verify_phrase};
pub use prompt::get_vault_passphrase;
pub use vault::{Vault, open_or_create};
