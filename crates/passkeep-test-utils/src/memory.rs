// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Map-backed stores with the same observable behavior as the SQLite ones.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use passkeep_core::traits::user::cooldown_remaining;
use passkeep_core::types::{NewPasswordRecord, PasswordRecord, SortOrder, UserId, UserRecord};
use passkeep_core::{CredentialStore, PasskeepError, UserStore};

#[derive(Default)]
struct Records {
    next_id: i64,
    /// Keyed by id, so iteration is creation order.
    by_id: BTreeMap<i64, PasswordRecord>,
}

impl Records {
    fn of_user(&self, user_id: UserId) -> impl Iterator<Item = &PasswordRecord> {
        self.by_id.values().filter(move |r| r.user_id == user_id)
    }
}

/// In-memory [`CredentialStore`].
#[derive(Default)]
pub struct InMemoryCredentialStore {
    records: Mutex<Records>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of records across all users.
    pub async fn len(&self) -> usize {
        self.records.lock().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn create(&self, record: NewPasswordRecord) -> Result<PasswordRecord, PasskeepError> {
        let mut records = self.records.lock().await;
        records.next_id += 1;
        let stored = PasswordRecord {
            id: records.next_id,
            user_id: record.user_id,
            description: record.description,
            encrypted_secret: record.encrypted_secret,
            last_modified: record.last_modified,
        };
        records.by_id.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find(&self, id: i64) -> Result<Option<PasswordRecord>, PasskeepError> {
        Ok(self.records.lock().await.by_id.get(&id).cloned())
    }

    async fn update(&self, record: &PasswordRecord) -> Result<(), PasskeepError> {
        let mut records = self.records.lock().await;
        let stored = records
            .by_id
            .get_mut(&record.id)
            .ok_or_else(|| PasskeepError::EntityNotFound(format!("password {}", record.id)))?;
        stored.description = record.description.clone();
        stored.encrypted_secret = record.encrypted_secret.clone();
        stored.last_modified = record.last_modified;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), PasskeepError> {
        self.records.lock().await.by_id.remove(&id);
        Ok(())
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<PasswordRecord>, PasskeepError> {
        Ok(self.records.lock().await.of_user(user_id).cloned().collect())
    }

    async fn count_by_user(&self, user_id: UserId) -> Result<usize, PasskeepError> {
        Ok(self.records.lock().await.of_user(user_id).count())
    }

    async fn find_by_partial_description(
        &self,
        user_id: UserId,
        needle: &str,
    ) -> Result<Vec<PasswordRecord>, PasskeepError> {
        let needle = needle.to_lowercase();
        Ok(self
            .records
            .lock()
            .await
            .of_user(user_id)
            .filter(|r| r.description.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn find_sorted(
        &self,
        user_id: UserId,
        order: SortOrder,
    ) -> Result<Vec<PasswordRecord>, PasskeepError> {
        let mut records: Vec<PasswordRecord> =
            self.records.lock().await.of_user(user_id).cloned().collect();
        match order {
            SortOrder::ByDate => records.sort_by(|a, b| {
                b.last_modified
                    .cmp(&a.last_modified)
                    .then_with(|| b.id.cmp(&a.id))
            }),
            SortOrder::ByDescription => {
                records.sort_by_cached_key(|r| (r.description.to_lowercase(), r.id))
            }
        }
        Ok(records)
    }

    async fn delete_all_by_user(&self, user_id: UserId) -> Result<Vec<i64>, PasskeepError> {
        let mut records = self.records.lock().await;
        let ids: Vec<i64> = records.of_user(user_id).map(|r| r.id).collect();
        for id in &ids {
            records.by_id.remove(id);
        }
        Ok(ids)
    }
}

/// In-memory [`UserStore`] enforcing the recovery phrase cooldown.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<HashMap<UserId, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backdates the phrase timestamp, for cooldown tests.
    pub async fn set_phrase_time(&self, id: UserId, set_at: DateTime<Utc>) {
        if let Some(user) = self.users.lock().await.get_mut(&id) {
            user.recovery_phrase_set_at = Some(set_at);
        }
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn exists(&self, id: UserId) -> Result<bool, PasskeepError> {
        Ok(self.users.lock().await.contains_key(&id))
    }

    async fn create_if_absent(&self, id: UserId) -> Result<bool, PasskeepError> {
        let mut users = self.users.lock().await;
        if users.contains_key(&id) {
            return Ok(false);
        }
        users.insert(
            id,
            UserRecord {
                id,
                recovery_phrase_hash: None,
                recovery_phrase_set_at: None,
                created_at: Utc::now(),
            },
        );
        Ok(true)
    }

    async fn find(&self, id: UserId) -> Result<UserRecord, PasskeepError> {
        self.users
            .lock()
            .await
            .get(&id)
            .cloned()
            .ok_or(PasskeepError::UserNotFound(id))
    }

    async fn set_recovery_phrase(
        &self,
        id: UserId,
        phrase_hash: String,
        now: DateTime<Utc>,
    ) -> Result<(), PasskeepError> {
        let mut users = self.users.lock().await;
        let user = users.get_mut(&id).ok_or(PasskeepError::UserNotFound(id))?;
        if let Some(remaining_days) = cooldown_remaining(user.recovery_phrase_set_at, now) {
            return Err(PasskeepError::CooldownActive { remaining_days });
        }
        user.recovery_phrase_hash = Some(phrase_hash);
        user.recovery_phrase_set_at = Some(now);
        Ok(())
    }
}
