// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use passkeep_core::types::{EntityId, Response, Step, UserId};
use passkeep_core::PasskeepError;
use tracing::info;

use crate::context::HandlerContext;
use crate::messages;

/// `/clear`: asks for confirmation before wiping the list.
pub async fn handle(ctx: &HandlerContext, user: UserId) -> Result<Response, PasskeepError> {
    super::prompt_if_any(ctx, user, messages::CLEAR_CONFIRM, Step::ClearStep1).await
}

/// Confirmed `/clear`: cancels every reminder, then deletes every record.
pub async fn confirm(ctx: &HandlerContext, user: UserId) -> Result<Response, PasskeepError> {
    for record in ctx.credentials.list_by_user(user).await? {
        ctx.scheduler.cancel(EntityId::password(record.id));
    }
    let removed = ctx.credentials.delete_all_by_user(user).await?;
    // Records created between the listing and the delete.
    for id in &removed {
        ctx.scheduler.cancel(EntityId::password(*id));
    }
    info!(user_id = %user, count = removed.len(), "password list cleared");
    Ok(Response::idle(messages::cleared(removed.len())))
}
