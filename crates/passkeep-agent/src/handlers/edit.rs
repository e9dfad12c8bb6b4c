// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use chrono::Utc;
use passkeep_core::types::{Complexity, EntityId, Response, Step, UserId};
use passkeep_core::{PasskeepError, ValidationError};
use tracing::info;

use crate::context::HandlerContext;
use crate::messages;

/// `/edit [<index> <length> <complexity> <description...>]`
///
/// Replaces the secret with a freshly generated one, renames the record and
/// drops any reminder armed for it.
pub async fn handle(
    ctx: &HandlerContext,
    user: UserId,
    args: &[String],
) -> Result<Response, PasskeepError> {
    let [index, length, complexity, description @ ..] = args else {
        if args.is_empty() {
            return super::prompt_if_any(ctx, user, messages::INDEX_PROMPT, Step::EditStep1).await;
        }
        return Err(super::unexpected_arguments("/edit", args));
    };
    let description = description.join(" ");
    if description.trim().is_empty() {
        return Err(ValidationError::Empty.into());
    }

    ctx.users.create_if_absent(user).await?;
    let (index, mut record) = ctx.resolve_index(user, index).await?;
    let length = ctx.limits.parse_length(length)?;
    let complexity = Complexity::parse(complexity).ok_or(ValidationError::Complexity)?;

    let password = ctx.generator.generate(length, complexity)?;
    record.encrypted_secret = ctx.cipher.encrypt(&password)?;
    record.description = description.trim().to_string();
    record.last_modified = Utc::now();
    ctx.credentials.update(&record).await?;
    ctx.scheduler.cancel(EntityId::password(record.id));
    info!(user_id = %user, record_id = record.id, "password replaced");

    Ok(super::offer_reminder(
        ctx,
        user,
        index,
        messages::edited(index, &password),
    ))
}
