// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use passkeep_core::types::{EntityId, Response, Step, UserId};
use passkeep_core::PasskeepError;
use tracing::info;

use crate::context::HandlerContext;
use crate::messages;

/// `/remind [<index> <days>]`
///
/// Arms a password-change reminder. A later reminder for the same record
/// replaces the earlier one.
pub async fn handle(
    ctx: &HandlerContext,
    user: UserId,
    args: &[String],
) -> Result<Response, PasskeepError> {
    match args {
        [] => super::prompt_if_any(ctx, user, messages::INDEX_PROMPT, Step::RemindStep1).await,
        [index, days] => {
            let (index, record) = ctx.resolve_index(user, index).await?;
            let days = ctx.limits.parse_days(days)?;
            ctx.scheduler.schedule(
                user,
                EntityId::password(record.id),
                ctx.limits.days(days),
                Response::idle(messages::reminder_due(&record.description)),
            );
            info!(user_id = %user, record_id = record.id, days, "reminder armed");
            Ok(Response::idle(messages::reminder_set(index, days)))
        }
        _ => Err(super::unexpected_arguments("/remind", args)),
    }
}
