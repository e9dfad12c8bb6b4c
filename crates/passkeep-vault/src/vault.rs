// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Master key lifecycle and the [`Cipher`] used for stored passwords.
//!
//! The vault uses a key-wrapping pattern:
//! - A random master key encrypts every stored password.
//! - The master key itself is encrypted with a key derived from the operator's
//!   passphrase via Argon2id (stored in `vault_meta` as `wrapped_master_key`).
//! - Changing the passphrase only re-wraps the master key; stored passwords
//!   are never re-encrypted.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use passkeep_config::model::VaultConfig;
use passkeep_core::{Cipher, PasskeepError};
use rusqlite::params;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::crypto;
use crate::kdf::{self, KdfParams};

/// The unlocked vault, holding the master key in memory.
pub struct Vault {
    master_key: Zeroizing<[u8; 32]>,
    conn: tokio_rusqlite::Connection,
}

impl std::fmt::Debug for Vault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vault")
            .field("master_key", &"[REDACTED]")
            .finish()
    }
}

/// Raw `vault_meta` rows needed to unwrap the master key.
struct VaultMeta {
    wrapped_master_key: Vec<u8>,
    nonce: Vec<u8>,
    salt: Vec<u8>,
    kdf_params: Vec<u8>,
}

impl Vault {
    /// Whether a wrapped master key is stored.
    pub async fn exists(conn: &tokio_rusqlite::Connection) -> Result<bool, PasskeepError> {
        conn.call(|conn| -> Result<bool, rusqlite::Error> {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM vault_meta WHERE key = 'wrapped_master_key'",
                [],
                |row| row.get(0),
            )?;
            Ok(count > 0)
        })
        .await
        .map_err(map_tr_err)
    }

    /// Create a new vault with a random master key wrapped by the passphrase.
    pub async fn create(
        conn: tokio_rusqlite::Connection,
        passphrase: &SecretString,
        config: &VaultConfig,
    ) -> Result<Self, PasskeepError> {
        let master_key = Zeroizing::new(crypto::generate_random_key()?);
        let vault = Self { master_key, conn };
        vault.wrap_and_store(passphrase, KdfParams::from(config)).await?;
        info!("vault created");
        Ok(vault)
    }

    /// Unlock an existing vault by re-deriving the wrapping key.
    pub async fn unlock(
        conn: tokio_rusqlite::Connection,
        passphrase: &SecretString,
    ) -> Result<Self, PasskeepError> {
        let meta = conn
            .call(|conn| -> Result<VaultMeta, rusqlite::Error> {
                let read = |key: &str| -> Result<Vec<u8>, rusqlite::Error> {
                    conn.query_row(
                        "SELECT value FROM vault_meta WHERE key = ?1",
                        params![key],
                        |row| row.get(0),
                    )
                };
                Ok(VaultMeta {
                    wrapped_master_key: read("wrapped_master_key")?,
                    nonce: read("master_key_nonce")?,
                    salt: read("kdf_salt")?,
                    kdf_params: read("kdf_params")?,
                })
            })
            .await
            .map_err(map_tr_err)?;

        let params = parse_kdf_params(&meta.kdf_params)?;
        let salt: [u8; 16] = meta
            .salt
            .try_into()
            .map_err(|_| PasskeepError::Crypto("corrupted salt (expected 16 bytes)".to_string()))?;
        let nonce: [u8; 12] = meta
            .nonce
            .try_into()
            .map_err(|_| PasskeepError::Crypto("corrupted nonce (expected 12 bytes)".to_string()))?;

        let wrapping_key = kdf::derive_key(passphrase.expose_secret().as_bytes(), &salt, params)?;
        let master_key_bytes = Zeroizing::new(
            crypto::open(&wrapping_key, &nonce, &meta.wrapped_master_key).map_err(|_| {
                PasskeepError::Crypto("invalid passphrase or corrupted vault: decryption failed".to_string())
            })?,
        );
        let master_key: [u8; 32] = master_key_bytes
            .as_slice()
            .try_into()
            .map_err(|_| PasskeepError::Crypto("corrupted master key (expected 32 bytes)".to_string()))?;

        debug!("vault unlocked");
        Ok(Self {
            master_key: Zeroizing::new(master_key),
            conn,
        })
    }

    /// Re-wrap the master key under a new passphrase.
    pub async fn change_passphrase(
        &self,
        new_passphrase: &SecretString,
        config: &VaultConfig,
    ) -> Result<(), PasskeepError> {
        self.wrap_and_store(new_passphrase, KdfParams::from(config)).await?;
        info!("vault passphrase changed");
        Ok(())
    }

    async fn wrap_and_store(&self, passphrase: &SecretString, params: KdfParams) -> Result<(), PasskeepError> {
        let salt = kdf::generate_salt()?;
        let wrapping_key = kdf::derive_key(passphrase.expose_secret().as_bytes(), &salt, params)?;
        let (wrapped, nonce) = crypto::seal(&wrapping_key, self.master_key.as_slice())?;

        let kdf_params = serde_json::json!({
            "memory_cost": params.memory_cost,
            "iterations": params.iterations,
            "parallelism": params.parallelism,
        })
        .to_string()
        .into_bytes();
        let rows: [(&'static str, Vec<u8>); 4] = [
            ("wrapped_master_key", wrapped),
            ("master_key_nonce", nonce.to_vec()),
            ("kdf_salt", salt.to_vec()),
            ("kdf_params", kdf_params),
        ];

        self.conn
            .call(move |conn| -> Result<(), rusqlite::Error> {
                let tx = conn.transaction()?;
                for (key, value) in rows {
                    tx.execute(
                        "INSERT OR REPLACE INTO vault_meta (key, value) VALUES (?1, ?2)",
                        params![key, value],
                    )?;
                }
                tx.commit()
            })
            .await
            .map_err(map_tr_err)
    }
}

impl Cipher for Vault {
    fn encrypt(&self, plaintext: &str) -> Result<String, PasskeepError> {
        let combined = crypto::seal_combined(&self.master_key, plaintext.as_bytes())?;
        Ok(STANDARD.encode(combined))
    }

    fn decrypt(&self, ciphertext: &str) -> Result<String, PasskeepError> {
        let combined = STANDARD
            .decode(ciphertext.trim())
            .map_err(|e| PasskeepError::Crypto(format!("ciphertext is not valid base64: {e}")))?;
        let plaintext = crypto::open_combined(&self.master_key, &combined)?;
        String::from_utf8(plaintext)
            .map_err(|e| PasskeepError::Crypto(format!("decrypted value is not valid UTF-8: {e}")))
    }
}

/// Unlock the vault if one exists, otherwise create it.
pub async fn open_or_create(
    conn: tokio_rusqlite::Connection,
    passphrase: &SecretString,
    config: &VaultConfig,
) -> Result<Vault, PasskeepError> {
    if Vault::exists(&conn).await? {
        Vault::unlock(conn, passphrase).await
    } else {
        Vault::create(conn, passphrase, config).await
    }
}

fn parse_kdf_params(bytes: &[u8]) -> Result<KdfParams, PasskeepError> {
    let value: serde_json::Value = serde_json::from_slice(bytes)
        .map_err(|e| PasskeepError::Crypto(format!("corrupted KDF params: {e}")))?;
    let field = |name: &str| -> Result<u32, PasskeepError> {
        value[name]
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| PasskeepError::Crypto(format!("missing {name} in KDF params")))
    };
    Ok(KdfParams {
        memory_cost: field("memory_cost")?,
        iterations: field("iterations")?,
        parallelism: field("parallelism")?,
    })
}

fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> PasskeepError {
    PasskeepError::storage(e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kdf::TEST_PARAMS;

    fn test_config() -> VaultConfig {
        VaultConfig {
            kdf_memory_cost: TEST_PARAMS.memory_cost,
            kdf_iterations: TEST_PARAMS.iterations,
            kdf_parallelism: TEST_PARAMS.parallelism,
        }
    }

    async fn open_test_db() -> (tokio_rusqlite::Connection, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vault.db");
        let db = passkeep_storage::Database::open(path.to_str().unwrap())
            .await
            .unwrap();
        (db.connection().clone(), dir)
    }

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[tokio::test]
    async fn create_then_unlock_decrypts_old_ciphertexts() {
        let (conn, _dir) = open_test_db().await;
        assert!(!Vault::exists(&conn).await.unwrap());

        let vault = Vault::create(conn.clone(), &secret("pass"), &test_config())
            .await
            .unwrap();
        assert!(Vault::exists(&conn).await.unwrap());
        let ciphertext = vault.encrypt("correct horse").unwrap();
        drop(vault);

        let reopened = Vault::unlock(conn, &secret("pass")).await.unwrap();
        assert_eq!(reopened.decrypt(&ciphertext).unwrap(), "correct horse");
    }

    #[tokio::test]
    async fn wrong_passphrase_is_rejected() {
        let (conn, _dir) = open_test_db().await;
        Vault::create(conn.clone(), &secret("right"), &test_config())
            .await
            .unwrap();

        let err = Vault::unlock(conn, &secret("wrong")).await.unwrap_err();
        assert!(err.to_string().contains("invalid passphrase"), "{err}");
    }

    #[tokio::test]
    async fn open_or_create_reuses_existing_key() {
        let (conn, _dir) = open_test_db().await;
        let first = open_or_create(conn.clone(), &secret("p"), &test_config())
            .await
            .unwrap();
        let ciphertext = first.encrypt("x").unwrap();

        let second = open_or_create(conn, &secret("p"), &test_config())
            .await
            .unwrap();
        assert_eq!(second.decrypt(&ciphertext).unwrap(), "x");
    }

    #[tokio::test]
    async fn change_passphrase_keeps_master_key() {
        let (conn, _dir) = open_test_db().await;
        let vault = Vault::create(conn.clone(), &secret("old"), &test_config())
            .await
            .unwrap();
        let ciphertext = vault.encrypt("keep me").unwrap();
        vault
            .change_passphrase(&secret("new"), &test_config())
            .await
            .unwrap();

        assert!(Vault::unlock(conn.clone(), &secret("old")).await.is_err());
        let reopened = Vault::unlock(conn, &secret("new")).await.unwrap();
        assert_eq!(reopened.decrypt(&ciphertext).unwrap(), "keep me");
    }

    #[tokio::test]
    async fn malformed_ciphertext_is_a_crypto_error() {
        let (conn, _dir) = open_test_db().await;
        let vault = Vault::create(conn, &secret("p"), &test_config()).await.unwrap();

        assert!(matches!(vault.decrypt("not base64!"), Err(PasskeepError::Crypto(_))));
        assert!(matches!(vault.decrypt("AAAA"), Err(PasskeepError::Crypto(_))));
    }

    #[test]
    fn kdf_params_parse_and_reject_garbage() {
        let parsed = parse_kdf_params(br#"{"memory_cost":8192,"iterations":1,"parallelism":1}"#).unwrap();
        assert_eq!(parsed, TEST_PARAMS);
        assert!(parse_kdf_params(b"{}").is_err());
        assert!(parse_kdf_params(b"nope").is_err());
    }
}
