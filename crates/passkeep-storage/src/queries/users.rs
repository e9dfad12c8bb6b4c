// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User CRUD and the recovery phrase cooldown.

use chrono::{DateTime, Utc};
use passkeep_core::traits::user::cooldown_remaining;
use passkeep_core::types::{UserId, UserRecord};
use passkeep_core::PasskeepError;
use rusqlite::{OptionalExtension, params};

use crate::database::{Database, map_tr_err};

pub async fn exists(db: &Database, id: UserId) -> Result<bool, PasskeepError> {
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM users WHERE id = ?1",
                params![id.0],
                |row| row.get(0),
            )?;
            Ok(count > 0)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn create_if_absent(db: &Database, id: UserId) -> Result<bool, PasskeepError> {
    let now = Utc::now();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO users (id, created_at) VALUES (?1, ?2)",
                params![id.0, now],
            )?;
            Ok(inserted > 0)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn find(db: &Database, id: UserId) -> Result<UserRecord, PasskeepError> {
    let record = db
        .connection()
        .call(move |conn| -> Result<Option<UserRecord>, rusqlite::Error> {
            conn.query_row(
                "SELECT id, recovery_phrase_hash, recovery_phrase_set_at, created_at
                 FROM users WHERE id = ?1",
                params![id.0],
                |row| {
                    Ok(UserRecord {
                        id: UserId(row.get(0)?),
                        recovery_phrase_hash: row.get(1)?,
                        recovery_phrase_set_at: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                },
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)?;
    record.ok_or(PasskeepError::UserNotFound(id))
}

/// Checks the cooldown and writes the new hash in one transaction.
pub async fn set_recovery_phrase(
    db: &Database,
    id: UserId,
    phrase_hash: String,
    now: DateTime<Utc>,
) -> Result<(), PasskeepError> {
    db.connection()
        .call(move |conn| -> Result<Result<(), PasskeepError>, rusqlite::Error> {
            let tx = conn.transaction()?;
            let set_at: Option<Option<DateTime<Utc>>> = tx
                .query_row(
                    "SELECT recovery_phrase_set_at FROM users WHERE id = ?1",
                    params![id.0],
                    |row| row.get(0),
                )
                .optional()?;
            let Some(set_at) = set_at else {
                return Ok(Err(PasskeepError::UserNotFound(id)));
            };
            if let Some(remaining_days) = cooldown_remaining(set_at, now) {
                return Ok(Err(PasskeepError::CooldownActive { remaining_days }));
            }
            tx.execute(
                "UPDATE users SET recovery_phrase_hash = ?1, recovery_phrase_set_at = ?2 WHERE id = ?3",
                params![phrase_hash, now, id.0],
            )?;
            tx.commit()?;
            Ok(Ok(()))
        })
        .await
        .map_err(map_tr_err)?
}
