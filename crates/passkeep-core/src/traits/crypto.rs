// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret handling collaborators: symmetric cipher and password generator.

use crate::error::PasskeepError;
use crate::types::Complexity;

/// Encrypts stored secrets. Fails with [`PasskeepError::Crypto`].
pub trait Cipher: Send + Sync {
    fn encrypt(&self, plaintext: &str) -> Result<String, PasskeepError>;

    fn decrypt(&self, ciphertext: &str) -> Result<String, PasskeepError>;
}

/// Produces random passwords. Fails with [`PasskeepError::Validation`] when
/// the length is outside the generator's range.
pub trait PasswordGenerator: Send + Sync {
    fn generate(&self, length: usize, complexity: Complexity) -> Result<String, PasskeepError>;
}

/// One-way hashing of recovery phrases.
pub trait PhraseHasher: Send + Sync {
    fn hash(&self, phrase: &str) -> Result<String, PasskeepError>;
}
