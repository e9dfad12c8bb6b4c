// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic stand-ins for the vault-backed cipher, the random
//! generator and the Argon2 phrase hasher.

use passkeep_core::types::Complexity;
use passkeep_core::{Cipher, PasskeepError, PasswordGenerator, PhraseHasher, ValidationError};

const SEALED_PREFIX: &str = "sealed:";

/// Reversible "encryption" that only tags the plaintext.
///
/// Decrypting anything without the tag fails like a corrupted ciphertext.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrefixCipher;

impl Cipher for PrefixCipher {
    fn encrypt(&self, plaintext: &str) -> Result<String, PasskeepError> {
        Ok(format!("{SEALED_PREFIX}{plaintext}"))
    }

    fn decrypt(&self, ciphertext: &str) -> Result<String, PasskeepError> {
        ciphertext
            .strip_prefix(SEALED_PREFIX)
            .map(str::to_string)
            .ok_or_else(|| PasskeepError::Crypto("ciphertext is not sealed".to_string()))
    }
}

/// Repeats a fixed per-complexity pattern up to the requested length.
#[derive(Debug, Clone, Copy)]
pub struct PatternGenerator {
    min_length: usize,
    max_length: usize,
}

impl PatternGenerator {
    pub fn new(min_length: usize, max_length: usize) -> Self {
        Self {
            min_length,
            max_length,
        }
    }

    pub fn pattern(complexity: Complexity) -> &'static str {
        match complexity {
            Complexity::Low => "ab1",
            Complexity::Medium => "aB1",
            Complexity::High => "aB1!",
        }
    }
}

impl Default for PatternGenerator {
    fn default() -> Self {
        Self::new(8, 64)
    }
}

impl PasswordGenerator for PatternGenerator {
    fn generate(&self, length: usize, complexity: Complexity) -> Result<String, PasskeepError> {
        if !(self.min_length..=self.max_length).contains(&length) {
            return Err(ValidationError::Length {
                min: self.min_length,
                max: self.max_length,
            }
            .into());
        }
        Ok(Self::pattern(complexity).chars().cycle().take(length).collect())
    }
}

/// "Hashes" by tagging the trimmed phrase, so tests can read it back.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainPhraseHasher;

impl PhraseHasher for PlainPhraseHasher {
    fn hash(&self, phrase: &str) -> Result<String, PasskeepError> {
        Ok(format!("plain${}", phrase.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_cipher_round_trips_and_rejects_foreign_text() {
        let sealed = PrefixCipher.encrypt("hunter2").unwrap();
        assert_eq!(PrefixCipher.decrypt(&sealed).unwrap(), "hunter2");
        assert!(matches!(
            PrefixCipher.decrypt("garbage"),
            Err(PasskeepError::Crypto(_))
        ));
    }

    #[test]
    fn pattern_generator_honors_length_and_bounds() {
        let generator = PatternGenerator::default();
        assert_eq!(generator.generate(8, Complexity::High).unwrap(), "aB1!aB1!");
        assert_eq!(generator.generate(9, Complexity::Low).unwrap(), "ab1ab1ab1");
        assert!(generator.generate(7, Complexity::Low).is_err());
        assert!(generator.generate(65, Complexity::Low).is_err());
    }
}
