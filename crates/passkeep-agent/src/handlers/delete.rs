// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use passkeep_core::types::{EntityId, Response, Step, UserId};
use passkeep_core::PasskeepError;
use tracing::info;

use crate::context::HandlerContext;
use crate::messages;

/// `/delete [<index>]`
pub async fn handle(
    ctx: &HandlerContext,
    user: UserId,
    args: &[String],
) -> Result<Response, PasskeepError> {
    match args {
        [] => super::prompt_if_any(ctx, user, messages::INDEX_PROMPT, Step::DeleteStep1).await,
        [index] => {
            let (index, record) = ctx.resolve_index(user, index).await?;
            // Cancel first so a reminder cannot fire for a record already gone.
            ctx.scheduler.cancel(EntityId::password(record.id));
            ctx.credentials.delete(record.id).await?;
            info!(user_id = %user, record_id = record.id, "password deleted");
            Ok(Response::idle(messages::deleted(index)))
        }
        _ => Err(super::unexpected_arguments("/delete", args)),
    }
}
