// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Argon2id hashing of recovery phrases (PHC string format).

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use passkeep_config::model::VaultConfig;
use passkeep_core::{PasskeepError, PhraseHasher};

use crate::kdf::{self, KdfParams};

/// [`PhraseHasher`] using the configured Argon2id cost.
#[derive(Debug, Clone, Copy)]
pub struct Argon2PhraseHasher {
    params: KdfParams,
}

impl Argon2PhraseHasher {
    pub fn new(config: &VaultConfig) -> Self {
        Self {
            params: KdfParams::from(config),
        }
    }
}

impl PhraseHasher for Argon2PhraseHasher {
    fn hash(&self, phrase: &str) -> Result<String, PasskeepError> {
        hash_phrase(phrase, self.params)
    }
}

/// Hash a recovery phrase. Surrounding whitespace is not significant.
pub fn hash_phrase(phrase: &str, params: KdfParams) -> Result<String, PasskeepError> {
    let salt = kdf::generate_salt()?;
    let salt = SaltString::encode_b64(&salt)
        .map_err(|e| PasskeepError::Crypto(format!("failed to encode salt: {e}")))?;
    let hash = params
        .argon2(None)?
        .hash_password(phrase.trim().as_bytes(), &salt)
        .map_err(|e| PasskeepError::Crypto(format!("recovery phrase hashing failed: {e}")))?;
    Ok(hash.to_string())
}

/// Check a phrase against a stored PHC hash. Parameters come from the hash.
pub fn verify_phrase(phrase: &str, stored: &str) -> Result<bool, PasskeepError> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| PasskeepError::Crypto(format!("stored phrase hash is malformed: {e}")))?;
    Ok(argon2::Argon2::default()
        .verify_password(phrase.trim().as_bytes(), &parsed)
        .is_ok())
}
