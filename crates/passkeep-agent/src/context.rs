// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborators and limits shared by every handler.

use std::sync::Arc;
use std::time::Duration;

use passkeep_config::model::PasskeepConfig;
use passkeep_core::types::{PasswordRecord, UserId};
use passkeep_core::{
    Cipher, CredentialStore, PasskeepError, PasswordGenerator, PhraseHasher, UserStore,
    ValidationError,
};
use passkeep_scheduler::ReminderScheduler;

use crate::conversation::ConversationStore;

/// Input bounds enforced by the handlers and the continuation router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub min_length: usize,
    pub max_length: usize,
    pub min_days: u32,
    pub max_days: u32,
    /// Milliseconds in one reminder day.
    pub day_millis: u64,
}

impl Limits {
    pub fn from_config(config: &PasskeepConfig) -> Self {
        Self {
            min_length: config.password.min_length,
            max_length: config.password.max_length,
            min_days: config.scheduler.min_days,
            max_days: config.scheduler.max_days,
            day_millis: config.scheduler.day_millis,
        }
    }

    pub fn parse_length(&self, text: &str) -> Result<usize, ValidationError> {
        text.trim()
            .parse::<usize>()
            .ok()
            .filter(|length| (self.min_length..=self.max_length).contains(length))
            .ok_or(ValidationError::Length {
                min: self.min_length,
                max: self.max_length,
            })
    }

    pub fn parse_days(&self, text: &str) -> Result<u32, ValidationError> {
        text.trim()
            .parse::<u32>()
            .ok()
            .filter(|days| (self.min_days..=self.max_days).contains(days))
            .ok_or(ValidationError::Days {
                min: self.min_days,
                max: self.max_days,
            })
    }

    pub fn days(&self, days: u32) -> Duration {
        Duration::from_millis(self.day_millis.saturating_mul(u64::from(days)))
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::from_config(&PasskeepConfig::default())
    }
}

/// Everything a handler may touch.
pub struct HandlerContext {
    pub conversations: ConversationStore,
    pub credentials: Arc<dyn CredentialStore>,
    pub users: Arc<dyn UserStore>,
    pub cipher: Arc<dyn Cipher>,
    pub generator: Arc<dyn PasswordGenerator>,
    pub phrases: Arc<dyn PhraseHasher>,
    pub scheduler: ReminderScheduler,
    pub limits: Limits,
}

impl HandlerContext {
    /// Resolves a 1-based index typed by the user into their record.
    ///
    /// Indexes follow [`CredentialStore::list_by_user`] order.
    pub async fn resolve_index(
        &self,
        user: UserId,
        text: &str,
    ) -> Result<(usize, PasswordRecord), PasskeepError> {
        let index = text
            .trim()
            .parse::<usize>()
            .map_err(|_| ValidationError::Index)?;
        if index == 0 {
            return Err(ValidationError::Index.into());
        }
        let records = self.credentials.list_by_user(user).await?;
        records
            .into_iter()
            .nth(index - 1)
            .map(|record| (index, record))
            .ok_or_else(|| PasskeepError::EntityNotFound(format!("password #{index} of user {user}")))
    }

    /// Whether `text` is a valid index, checked against the record count only.
    pub async fn is_valid_index(&self, user: UserId, text: &str) -> Result<bool, PasskeepError> {
        let Ok(index) = text.trim().parse::<usize>() else {
            return Ok(false);
        };
        let count = self.credentials.count_by_user(user).await?;
        Ok((1..=count).contains(&index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_bounds_are_inclusive() {
        let limits = Limits::default();
        assert_eq!(limits.parse_length("8"), Ok(8));
        assert_eq!(limits.parse_length(" 64 "), Ok(64));
        assert_eq!(
            limits.parse_length("7"),
            Err(ValidationError::Length { min: 8, max: 64 })
        );
        assert!(limits.parse_length("twelve").is_err());
        assert!(limits.parse_length("-1").is_err());
    }

    #[test]
    fn days_bounds_are_inclusive() {
        let limits = Limits::default();
        assert_eq!(limits.parse_days("3"), Ok(3));
        assert_eq!(limits.parse_days("90"), Ok(90));
        assert_eq!(
            limits.parse_days("2"),
            Err(ValidationError::Days { min: 3, max: 90 })
        );
        assert!(limits.parse_days("91").is_err());
    }

    #[test]
    fn day_length_scales_delay() {
        let limits = Limits {
            day_millis: 10,
            ..Limits::default()
        };
        assert_eq!(limits.days(3), Duration::from_millis(30));
        assert_eq!(Limits::default().days(1), Duration::from_secs(86_400));
    }

    #[test]
    fn recovery_reminder_matches_phrase_cooldown() {
        use passkeep_config::model::RECOVERY_REMINDER_DAYS;
        use passkeep_core::traits::user::RECOVERY_PHRASE_COOLDOWN_DAYS;

        assert_eq!(i64::from(RECOVERY_REMINDER_DAYS), RECOVERY_PHRASE_COOLDOWN_DAYS);
    }
}
