// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./passkeep.toml` > `~/.config/passkeep/passkeep.toml`
//! > `/etc/passkeep/passkeep.toml` with environment variable overrides via the
//! `PASSKEEP_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::PasskeepConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/passkeep/passkeep.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "passkeep.toml";

/// Sections that `PASSKEEP_<SECTION>_<KEY>` variables map into.
const ENV_SECTIONS: [&str; 7] = [
    "agent",
    "telegram",
    "storage",
    "vault",
    "password",
    "conversation",
    "scheduler",
];

/// User XDG config file, if a config directory exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("passkeep").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/passkeep/passkeep.toml`
/// 3. `~/.config/passkeep/passkeep.toml`
/// 4. `./passkeep.toml`
/// 5. `PASSKEEP_*` environment variables
pub fn load_config() -> Result<PasskeepConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<PasskeepConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PasskeepConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PasskeepConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PasskeepConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for hierarchy loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(PasskeepConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Environment provider mapping `PASSKEEP_SECTION_KEY` to `section.key`.
///
/// Uses `Env::map()` rather than `Env::split("_")`: keys such as
/// `bot_token` contain underscores themselves. `PASSKEEP_VAULT_KEY` carries
/// the vault passphrase and is never part of the config model.
fn env_provider() -> Env {
    Env::prefixed("PASSKEEP_")
        .ignore(&["VAULT_KEY"])
        .map(|key| map_env_key(key.as_str()).into())
}

/// Rewrites the first `<section>_` prefix of a lowercased key into `<section>.`.
fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in ENV_SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key
}
