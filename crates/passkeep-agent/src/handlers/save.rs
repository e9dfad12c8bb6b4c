// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use chrono::Utc;
use passkeep_core::types::{NewPasswordRecord, Response, Step, UserId};
use passkeep_core::{PasskeepError, ValidationError};
use tracing::info;

use crate::context::HandlerContext;
use crate::messages;

/// `/save [<secret> <description...>]`
pub async fn handle(
    ctx: &HandlerContext,
    user: UserId,
    args: &[String],
) -> Result<Response, PasskeepError> {
    let [secret, description @ ..] = args else {
        return Ok(Response::new(messages::SECRET_PROMPT, Step::SaveStep1));
    };
    if description.is_empty() {
        return Err(super::unexpected_arguments("/save", args));
    }
    let description = description.join(" ");
    if description.trim().is_empty() {
        return Err(ValidationError::Empty.into());
    }

    ctx.users.create_if_absent(user).await?;
    let encrypted_secret = ctx.cipher.encrypt(secret)?;
    let record = ctx
        .credentials
        .create(NewPasswordRecord {
            user_id: user,
            description: description.trim().to_string(),
            encrypted_secret,
            last_modified: Utc::now(),
        })
        .await?;
    let index = super::index_of(ctx, user, record.id).await?;
    info!(user_id = %user, record_id = record.id, "password saved");

    Ok(super::offer_reminder(ctx, user, index, messages::saved(index)))
}
