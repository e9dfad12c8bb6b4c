// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence of password records.

use async_trait::async_trait;

use crate::error::PasskeepError;
use crate::types::{NewPasswordRecord, PasswordRecord, SortOrder, UserId};

/// CRUD repository for [`PasswordRecord`]s.
///
/// `list_by_user` defines the canonical order that 1-based indexes typed by
/// users refer to: ascending record id, i.e. creation order.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn create(&self, record: NewPasswordRecord) -> Result<PasswordRecord, PasskeepError>;

    async fn find(&self, id: i64) -> Result<Option<PasswordRecord>, PasskeepError>;

    /// Overwrites description, secret and modification time of an existing record.
    async fn update(&self, record: &PasswordRecord) -> Result<(), PasskeepError>;

    async fn delete(&self, id: i64) -> Result<(), PasskeepError>;

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<PasswordRecord>, PasskeepError>;

    async fn count_by_user(&self, user_id: UserId) -> Result<usize, PasskeepError>;

    /// Case-insensitive substring match on the description.
    async fn find_by_partial_description(
        &self,
        user_id: UserId,
        needle: &str,
    ) -> Result<Vec<PasswordRecord>, PasskeepError>;

    async fn find_sorted(
        &self,
        user_id: UserId,
        order: SortOrder,
    ) -> Result<Vec<PasswordRecord>, PasskeepError>;

    /// Removes every record of the user, returning the deleted ids.
    async fn delete_all_by_user(&self, user_id: UserId) -> Result<Vec<i64>, PasskeepError>;
}
