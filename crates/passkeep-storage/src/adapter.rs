// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the credential and user store traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use passkeep_config::model::StorageConfig;
use passkeep_core::types::{NewPasswordRecord, PasswordRecord, SortOrder, UserId, UserRecord};
use passkeep_core::{CredentialStore, HealthStatus, PasskeepError, PluginAdapter, UserStore};

use crate::database::{Database, map_tr_err};
use crate::queries;

/// SQLite-backed store for users and password records.
///
/// Cloning is cheap; clones share the single background connection.
#[derive(Clone)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Opens the database at the configured path.
    pub async fn open(config: &StorageConfig) -> Result<Self, PasskeepError> {
        let db = Database::open_with(&config.database_path, config.wal_mode).await?;
        debug!(path = %config.database_path, "SQLite store initialized");
        Ok(Self { db })
    }

    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl PluginAdapter for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn health_check(&self) -> Result<HealthStatus, PasskeepError> {
        self.db
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> { conn.execute_batch("SELECT 1;") })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PasskeepError> {
        self.db.checkpoint().await?;
        debug!("shutdown: WAL checkpoint complete");
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for SqliteStore {
    async fn create(&self, record: NewPasswordRecord) -> Result<PasswordRecord, PasskeepError> {
        queries::passwords::create(&self.db, record).await
    }

    async fn find(&self, id: i64) -> Result<Option<PasswordRecord>, PasskeepError> {
        queries::passwords::find(&self.db, id).await
    }

    async fn update(&self, record: &PasswordRecord) -> Result<(), PasskeepError> {
        queries::passwords::update(&self.db, record).await
    }

    async fn delete(&self, id: i64) -> Result<(), PasskeepError> {
        queries::passwords::delete(&self.db, id).await
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<PasswordRecord>, PasskeepError> {
        queries::passwords::list_by_user(&self.db, user_id).await
    }

    async fn count_by_user(&self, user_id: UserId) -> Result<usize, PasskeepError> {
        queries::passwords::count_by_user(&self.db, user_id).await
    }

    async fn find_by_partial_description(
        &self,
        user_id: UserId,
        needle: &str,
    ) -> Result<Vec<PasswordRecord>, PasskeepError> {
        queries::passwords::find_by_partial_description(&self.db, user_id, needle).await
    }

    async fn find_sorted(
        &self,
        user_id: UserId,
        order: SortOrder,
    ) -> Result<Vec<PasswordRecord>, PasskeepError> {
        queries::passwords::find_sorted(&self.db, user_id, order).await
    }

    async fn delete_all_by_user(&self, user_id: UserId) -> Result<Vec<i64>, PasskeepError> {
        queries::passwords::delete_all_by_user(&self.db, user_id).await
    }
}

#[async_trait]
impl UserStore for SqliteStore {
    async fn exists(&self, id: UserId) -> Result<bool, PasskeepError> {
        queries::users::exists(&self.db, id).await
    }

    async fn create_if_absent(&self, id: UserId) -> Result<bool, PasskeepError> {
        queries::users::create_if_absent(&self.db, id).await
    }

    async fn find(&self, id: UserId) -> Result<UserRecord, PasskeepError> {
        queries::users::find(&self.db, id).await
    }

    async fn set_recovery_phrase(
        &self,
        id: UserId,
        phrase_hash: String,
        now: DateTime<Utc>,
    ) -> Result<(), PasskeepError> {
        queries::users::set_recovery_phrase(&self.db, id, phrase_hash, now).await
    }
}
