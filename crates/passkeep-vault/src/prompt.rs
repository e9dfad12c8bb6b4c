// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Passphrase acquisition via TTY prompt or PASSKEEP_VAULT_KEY environment variable.

use passkeep_core::PasskeepError;
use secrecy::SecretString;

/// The environment variable name for providing the vault passphrase.
pub const VAULT_KEY_ENV_VAR: &str = "PASSKEEP_VAULT_KEY";

/// Get the vault passphrase.
///
/// Priority:
/// 1. `PASSKEEP_VAULT_KEY` environment variable (headless, Docker, systemd)
/// 2. Interactive TTY prompt via `rpassword`
pub fn get_vault_passphrase() -> Result<SecretString, PasskeepError> {
    if let Ok(key) = std::env::var(VAULT_KEY_ENV_VAR)
        && !key.is_empty()
    {
        return Ok(SecretString::from(key));
    }

    if std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        eprint!("Vault passphrase: ");
        let passphrase = rpassword::read_password()
            .map_err(|e| PasskeepError::Crypto(format!("failed to read passphrase: {e}")))?;
        if passphrase.is_empty() {
            return Err(PasskeepError::Crypto("empty passphrase not allowed".to_string()));
        }
        return Ok(SecretString::from(passphrase));
    }

    Err(PasskeepError::Config(format!(
        "no vault passphrase provided; set {VAULT_KEY_ENV_VAR} or run interactively"
    )))
}
