// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::{MAX_REMINDER_DELAY_MILLIS, PasskeepConfig};

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every violation instead of failing on the first one.
pub fn validate_config(config: &PasskeepConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    if config.agent.max_in_flight == 0 {
        fail("agent.max_in_flight must be at least 1".to_string());
    }

    if config.vault.kdf_memory_cost < 32768 {
        fail(format!(
            "vault.kdf_memory_cost must be at least 32768 (32 MiB), got {}",
            config.vault.kdf_memory_cost
        ));
    }
    if config.vault.kdf_iterations < 2 {
        fail(format!(
            "vault.kdf_iterations must be at least 2, got {}",
            config.vault.kdf_iterations
        ));
    }
    if config.vault.kdf_parallelism < 1 {
        fail(format!(
            "vault.kdf_parallelism must be at least 1, got {}",
            config.vault.kdf_parallelism
        ));
    }

    let password = &config.password;
    if password.min_length < 4 {
        fail(format!(
            "password.min_length must be at least 4, got {}",
            password.min_length
        ));
    }
    if password.min_length > password.max_length {
        fail(format!(
            "password.min_length ({}) must not exceed password.max_length ({})",
            password.min_length, password.max_length
        ));
    }

    let scheduler = &config.scheduler;
    if scheduler.workers == 0 {
        fail("scheduler.workers must be at least 1".to_string());
    }
    if scheduler.min_days == 0 || scheduler.min_days > scheduler.max_days {
        fail(format!(
            "scheduler day range {}..={} is invalid",
            scheduler.min_days, scheduler.max_days
        ));
    }
    if scheduler.day_millis == 0 {
        fail("scheduler.day_millis must be positive".to_string());
    }
    if scheduler.longest_delay_millis() > MAX_REMINDER_DELAY_MILLIS {
        fail(format!(
            "scheduler.max_days * scheduler.day_millis must not exceed {MAX_REMINDER_DELAY_MILLIS} ms, got {} ms",
            scheduler.longest_delay_millis()
        ));
    }

    if config.conversation.sweep_interval_secs == 0 {
        fail("conversation.sweep_interval_secs must be positive".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
