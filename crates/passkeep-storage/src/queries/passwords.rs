// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Password record CRUD operations.

use passkeep_core::types::{NewPasswordRecord, PasswordRecord, SortOrder, UserId};
use passkeep_core::PasskeepError;
use rusqlite::{Row, params};

use crate::database::{Database, map_tr_err};

const COLUMNS: &str = "id, user_id, description, encrypted_secret, last_modified";

fn from_row(row: &Row<'_>) -> Result<PasswordRecord, rusqlite::Error> {
    Ok(PasswordRecord {
        id: row.get(0)?,
        user_id: UserId(row.get(1)?),
        description: row.get(2)?,
        encrypted_secret: row.get(3)?,
        last_modified: row.get(4)?,
    })
}

/// Runs a `SELECT {COLUMNS} ...` bound to a single user id parameter.
async fn select_for_user(
    db: &Database,
    sql: String,
    user_id: UserId,
) -> Result<Vec<PasswordRecord>, PasskeepError> {
    db.connection()
        .call(move |conn| -> Result<Vec<PasswordRecord>, rusqlite::Error> {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![user_id.0], from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

pub async fn create(db: &Database, record: NewPasswordRecord) -> Result<PasswordRecord, PasskeepError> {
    db.connection()
        .call(move |conn| -> Result<PasswordRecord, rusqlite::Error> {
            conn.execute(
                "INSERT INTO passwords (user_id, description, encrypted_secret, last_modified)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    record.user_id.0,
                    record.description,
                    record.encrypted_secret,
                    record.last_modified,
                ],
            )?;
            Ok(PasswordRecord {
                id: conn.last_insert_rowid(),
                user_id: record.user_id,
                description: record.description,
                encrypted_secret: record.encrypted_secret,
                last_modified: record.last_modified,
            })
        })
        .await
        .map_err(map_tr_err)
}

pub async fn find(db: &Database, id: i64) -> Result<Option<PasswordRecord>, PasskeepError> {
    db.connection()
        .call(move |conn| -> Result<Option<PasswordRecord>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM passwords WHERE id = ?1"))?;
            match stmt.query_row(params![id], from_row) {
                Ok(record) => Ok(Some(record)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Fails with [`PasskeepError::EntityNotFound`] when no row matches.
pub async fn update(db: &Database, record: &PasswordRecord) -> Result<(), PasskeepError> {
    let record = record.clone();
    let id = record.id;
    let changed = db
        .connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute(
                "UPDATE passwords SET description = ?1, encrypted_secret = ?2, last_modified = ?3
                 WHERE id = ?4",
                params![
                    record.description,
                    record.encrypted_secret,
                    record.last_modified,
                    record.id,
                ],
            )
        })
        .await
        .map_err(map_tr_err)?;
    if changed == 0 {
        return Err(PasskeepError::EntityNotFound(format!("password {id}")));
    }
    Ok(())
}

pub async fn delete(db: &Database, id: i64) -> Result<(), PasskeepError> {
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute("DELETE FROM passwords WHERE id = ?1", params![id])?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn list_by_user(db: &Database, user_id: UserId) -> Result<Vec<PasswordRecord>, PasskeepError> {
    let sql = format!("SELECT {COLUMNS} FROM passwords WHERE user_id = ?1 ORDER BY id");
    select_for_user(db, sql, user_id).await
}

pub async fn count_by_user(db: &Database, user_id: UserId) -> Result<usize, PasskeepError> {
    db.connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM passwords WHERE user_id = ?1",
                params![user_id.0],
                |row| row.get(0),
            )?;
            Ok(usize::try_from(count).unwrap_or(0))
        })
        .await
        .map_err(map_tr_err)
}

/// Case-insensitive substring match on the description.
pub async fn find_by_partial_description(
    db: &Database,
    user_id: UserId,
    needle: &str,
) -> Result<Vec<PasswordRecord>, PasskeepError> {
    // SQLite's LIKE and lower() only fold ASCII; Cyrillic descriptions need Rust's folding.
    let needle = needle.to_lowercase();
    let all = list_by_user(db, user_id).await?;
    Ok(all
        .into_iter()
        .filter(|r| r.description.to_lowercase().contains(&needle))
        .collect())
}

pub async fn find_sorted(
    db: &Database,
    user_id: UserId,
    order: SortOrder,
) -> Result<Vec<PasswordRecord>, PasskeepError> {
    match order {
        SortOrder::ByDate => {
            let sql = format!(
                "SELECT {COLUMNS} FROM passwords WHERE user_id = ?1 ORDER BY last_modified DESC, id DESC"
            );
            select_for_user(db, sql, user_id).await
        }
        SortOrder::ByDescription => {
            let mut records = list_by_user(db, user_id).await?;
            records.sort_by(|a, b| {
                a.description
                    .to_lowercase()
                    .cmp(&b.description.to_lowercase())
                    .then(a.id.cmp(&b.id))
            });
            Ok(records)
        }
    }
}

pub async fn delete_all_by_user(db: &Database, user_id: UserId) -> Result<Vec<i64>, PasskeepError> {
    db.connection()
        .call(move |conn| -> Result<Vec<i64>, rusqlite::Error> {
            let tx = conn.transaction()?;
            let ids = {
                let mut stmt = tx.prepare("SELECT id FROM passwords WHERE user_id = ?1 ORDER BY id")?;
                let rows = stmt.query_map(params![user_id.0], |row| row.get(0))?;
                rows.collect::<Result<Vec<i64>, _>>()?
            };
            tx.execute("DELETE FROM passwords WHERE user_id = ?1", params![user_id.0])?;
            tx.commit()?;
            Ok(ids)
        })
        .await
        .map_err(map_tr_err)
}
