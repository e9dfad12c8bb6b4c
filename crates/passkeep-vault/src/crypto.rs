// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Low-level AES-256-GCM seal/open operations.
//!
//! Every call to [`seal`] generates a fresh random 96-bit nonce via the system
//! CSPRNG. Nonce reuse would be catastrophic for GCM security.

use passkeep_core::PasskeepError;
use ring::aead::{AES_256_GCM, Aad, LessSafeKey, NONCE_LEN, Nonce, UnboundKey};
use ring::rand::{SecureRandom, SystemRandom};

fn key(bytes: &[u8; 32]) -> Result<LessSafeKey, PasskeepError> {
    let unbound = UnboundKey::new(&AES_256_GCM, bytes)
        .map_err(|_| PasskeepError::Crypto("failed to create AES-256-GCM key".to_string()))?;
    Ok(LessSafeKey::new(unbound))
}

/// Encrypt plaintext with AES-256-GCM using a random 96-bit nonce.
///
/// Returns `(ciphertext_with_tag, nonce_bytes)`.
pub fn seal(key_bytes: &[u8; 32], plaintext: &[u8]) -> Result<(Vec<u8>, [u8; NONCE_LEN]), PasskeepError> {
    let key = key(key_bytes)?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    SystemRandom::new()
        .fill(&mut nonce_bytes)
        .map_err(|_| PasskeepError::Crypto("failed to generate random nonce".to_string()))?;
    let nonce = Nonce::assume_unique_for_key(nonce_bytes);

    let mut in_out = plaintext.to_vec();
    key.seal_in_place_append_tag(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| PasskeepError::Crypto("AES-256-GCM encryption failed".to_string()))?;

    Ok((in_out, nonce_bytes))
}

/// Decrypt ciphertext (with its 16-byte tag) produced by [`seal`].
pub fn open(
    key_bytes: &[u8; 32],
    nonce_bytes: &[u8; NONCE_LEN],
    ciphertext: &[u8],
) -> Result<Vec<u8>, PasskeepError> {
    let key = key(key_bytes)?;
    let nonce = Nonce::assume_unique_for_key(*nonce_bytes);

    let mut in_out = ciphertext.to_vec();
    let plaintext = key.open_in_place(nonce, Aad::empty(), &mut in_out).map_err(|_| {
        PasskeepError::Crypto("AES-256-GCM decryption failed: wrong key or corrupted data".to_string())
    })?;

    Ok(plaintext.to_vec())
}

/// Seal into a single buffer laid out as `nonce || ciphertext || tag`.
pub fn seal_combined(key_bytes: &[u8; 32], plaintext: &[u8]) -> Result<Vec<u8>, PasskeepError> {
    let (ciphertext, nonce) = seal(key_bytes, plaintext)?;
    let mut combined = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    combined.extend_from_slice(&nonce);
    combined.extend_from_slice(&ciphertext);
    Ok(combined)
}

/// Inverse of [`seal_combined`].
pub fn open_combined(key_bytes: &[u8; 32], combined: &[u8]) -> Result<Vec<u8>, PasskeepError> {
    if combined.len() < NONCE_LEN + AES_256_GCM.tag_len() {
        return Err(PasskeepError::Crypto("ciphertext too short".to_string()));
    }
    let (nonce, ciphertext) = combined.split_at(NONCE_LEN);
    let nonce: [u8; NONCE_LEN] = nonce
        .try_into()
        .map_err(|_| PasskeepError::Crypto("corrupted nonce".to_string()))?;
    open(key_bytes, &nonce, ciphertext)
}

/// Generate a random 32-byte key suitable for AES-256-GCM.
pub fn generate_random_key() -> Result<[u8; 32], PasskeepError> {
    let mut key = [0u8; 32];
    SystemRandom::new()
        .fill(&mut key)
        .map_err(|_| PasskeepError::Crypto("failed to generate random key".to_string()))?;
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seal_open_roundtrip() {
        let key = generate_random_key().unwrap();
        let (ciphertext, nonce) = seal(&key, b"hunter2").unwrap();
        assert_eq!(open(&key, &nonce, &ciphertext).unwrap(), b"hunter2");
    }

    #[test]
    fn same_plaintext_encrypts_differently() {
        let key = generate_random_key().unwrap();
        let a = seal_combined(&key, b"same input").unwrap();
        let b = seal_combined(&key, b"same input").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn open_with_wrong_key_fails() {
        let key1 = generate_random_key().unwrap();
        let key2 = generate_random_key().unwrap();
        let combined = seal_combined(&key1, b"secret").unwrap();
        assert!(matches!(open_combined(&key2, &combined), Err(PasskeepError::Crypto(_))));
    }

    #[test]
    fn combined_layout_is_nonce_then_ciphertext_and_tag() {
        let key = generate_random_key().unwrap();
        let combined = seal_combined(&key, b"hello").unwrap();
        assert_eq!(combined.len(), NONCE_LEN + 5 + 16);
    }

    #[test]
    fn tampered_or_truncated_input_fails() {
        let key = generate_random_key().unwrap();
        let mut combined = seal_combined(&key, b"do not tamper").unwrap();
        combined[NONCE_LEN] ^= 0x01;
        assert!(open_combined(&key, &combined).is_err());
        assert!(open_combined(&key, &combined[..10]).is_err());
    }
}
