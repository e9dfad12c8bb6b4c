// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence of chat users and their recovery phrase.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::PasskeepError;
use crate::types::{UserId, UserRecord};

/// Minimum number of days between two recovery phrase changes.
pub const RECOVERY_PHRASE_COOLDOWN_DAYS: i64 = 30;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn exists(&self, id: UserId) -> Result<bool, PasskeepError>;

    /// Inserts the user if missing; returns `true` when a row was created.
    async fn create_if_absent(&self, id: UserId) -> Result<bool, PasskeepError>;

    /// Fails with [`PasskeepError::UserNotFound`] for unknown ids.
    async fn find(&self, id: UserId) -> Result<UserRecord, PasskeepError>;

    /// Stores a new phrase hash. Fails with [`PasskeepError::CooldownActive`]
    /// if the previous phrase was set less than
    /// [`RECOVERY_PHRASE_COOLDOWN_DAYS`] before `now`.
    async fn set_recovery_phrase(
        &self,
        id: UserId,
        phrase_hash: String,
        now: DateTime<Utc>,
    ) -> Result<(), PasskeepError>;
}

/// Days left before the phrase may change again, or `None` if it may change now.
pub fn cooldown_remaining(set_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Option<i64> {
    let set_at = set_at?;
    let elapsed = now.signed_duration_since(set_at);
    let cooldown = chrono::Duration::days(RECOVERY_PHRASE_COOLDOWN_DAYS);
    if elapsed >= cooldown {
        return None;
    }
    let left = cooldown - elapsed;
    // Round partial days up so "0 days left" is never reported.
    let days = (left.num_seconds() + 86_399) / 86_400;
    Some(days.max(1))
}
