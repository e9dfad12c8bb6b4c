// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Argon2id key derivation from a passphrase.

use passkeep_core::PasskeepError;
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroizing;

/// Argon2id cost parameters, as persisted next to the wrapped key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    pub memory_cost: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl KdfParams {
    pub fn argon2(&self, output_len: Option<usize>) -> Result<argon2::Argon2<'static>, PasskeepError> {
        let params = argon2::Params::new(self.memory_cost, self.iterations, self.parallelism, output_len)
            .map_err(|e| PasskeepError::Crypto(format!("invalid Argon2id parameters: {e}")))?;
        Ok(argon2::Argon2::new(
            argon2::Algorithm::Argon2id,
            argon2::Version::V0x13,
            params,
        ))
    }
}

impl From<&passkeep_config::model::VaultConfig> for KdfParams {
    fn from(config: &passkeep_config::model::VaultConfig) -> Self {
        Self {
            memory_cost: config.kdf_memory_cost,
            iterations: config.kdf_iterations,
            parallelism: config.kdf_parallelism,
        }
    }
}

/// Derive a 32-byte key from `passphrase`, zeroed on drop.
pub fn derive_key(
    passphrase: &[u8],
    salt: &[u8; 16],
    params: KdfParams,
) -> Result<Zeroizing<[u8; 32]>, PasskeepError> {
    let argon2 = params.argon2(Some(32))?;
    let mut output = Zeroizing::new([0u8; 32]);
    argon2
        .hash_password_into(passphrase, salt, output.as_mut())
        .map_err(|e| PasskeepError::Crypto(format!("Argon2id key derivation failed: {e}")))?;
    Ok(output)
}

/// Generate a random 16-byte salt.
pub fn generate_salt() -> Result<[u8; 16], PasskeepError> {
    let mut salt = [0u8; 16];
    SystemRandom::new()
        .fill(&mut salt)
        .map_err(|_| PasskeepError::Crypto("failed to generate random salt".to_string()))?;
    Ok(salt)
}

#[cfg(test)]
pub(crate) const TEST_PARAMS: KdfParams = KdfParams {
    memory_cost: 8192,
    iterations: 1,
    parallelism: 1,
};
