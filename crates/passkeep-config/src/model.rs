// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Passkeep.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Passkeep configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PasskeepConfig {
    /// Process-wide behavior.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Telegram bot integration settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Master key derivation settings.
    #[serde(default)]
    pub vault: VaultConfig,

    /// Password generation policy.
    #[serde(default)]
    pub password: PasswordConfig,

    /// In-memory conversation state settings.
    #[serde(default)]
    pub conversation: ConversationConfig,

    /// Reminder scheduler settings.
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

/// Process-wide behavior.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name used in logs and the help text.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Upper bound on messages processed concurrently by the agent loop.
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            max_in_flight: default_max_in_flight(),
        }
    }
}

fn default_agent_name() -> String {
    "passkeep".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_in_flight() -> usize {
    64
}

/// Telegram bot integration configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. `None` disables Telegram integration.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Allowed Telegram user IDs or usernames. Empty admits every user.
    #[serde(default)]
    pub allowed_users: Vec<String>,
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("passkeep").join("passkeep.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("passkeep.db"))
        .display()
        .to_string()
}

fn default_wal_mode() -> bool {
    true
}

/// Argon2id parameters for wrapping the master key and hashing recovery phrases.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// Argon2id memory cost in KiB (default: 65536 = 64 MiB).
    #[serde(default = "default_kdf_memory_cost")]
    pub kdf_memory_cost: u32,

    /// Argon2id iteration count (default: 3).
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Argon2id parallelism lanes (default: 4).
    #[serde(default = "default_kdf_parallelism")]
    pub kdf_parallelism: u32,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            kdf_memory_cost: default_kdf_memory_cost(),
            kdf_iterations: default_kdf_iterations(),
            kdf_parallelism: default_kdf_parallelism(),
        }
    }
}

fn default_kdf_memory_cost() -> u32 {
    65536
}

fn default_kdf_iterations() -> u32 {
    3
}

fn default_kdf_parallelism() -> u32 {
    4
}

/// Accepted password length range.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PasswordConfig {
    #[serde(default = "default_min_length")]
    pub min_length: usize,

    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            min_length: default_min_length(),
            max_length: default_max_length(),
        }
    }
}

fn default_min_length() -> usize {
    8
}

fn default_max_length() -> usize {
    64
}

/// Eviction of abandoned conversations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConversationConfig {
    /// A conversation untouched for this long is dropped by the sweep.
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,

    /// How often the sweep runs.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: default_idle_timeout_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

fn default_idle_timeout_secs() -> u64 {
    1800
}

fn default_sweep_interval_secs() -> u64 {
    300
}

/// Longest reminder delay the scheduler accepts, in milliseconds.
///
/// Its timer wheel cannot hold deadlines much past two years.
pub const MAX_REMINDER_DELAY_MILLIS: u64 = 730 * 86_400_000;

/// Reminder days after which a changed recovery phrase may change again.
pub const RECOVERY_REMINDER_DAYS: u32 = 30;

/// Reminder scheduler configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SchedulerConfig {
    /// Size of the pool that delivers fired reminders.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Smallest accepted reminder delay in days.
    #[serde(default = "default_min_days")]
    pub min_days: u32,

    /// Largest accepted reminder delay in days.
    #[serde(default = "default_max_days")]
    pub max_days: u32,

    /// Length of one reminder "day" in milliseconds. Lower it to test reminders by hand.
    #[serde(default = "default_day_millis")]
    pub day_millis: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            min_days: default_min_days(),
            max_days: default_max_days(),
            day_millis: default_day_millis(),
        }
    }
}

impl SchedulerConfig {
    /// Delay of the furthest reminder this config can arm, in milliseconds.
    pub fn longest_delay_millis(&self) -> u64 {
        u64::from(self.max_days.max(RECOVERY_REMINDER_DAYS)).saturating_mul(self.day_millis)
    }
}

fn default_workers() -> usize {
    4
}

fn default_min_days() -> u32 {
    3
}

fn default_max_days() -> u32 {
    90
}

fn default_day_millis() -> u64 {
    86_400_000
}
