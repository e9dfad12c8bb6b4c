// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use passkeep_core::types::{Response, Step, UserId};
use passkeep_core::PasskeepError;

use crate::context::HandlerContext;
use crate::messages;

/// `/find [<text...>]`
pub async fn handle(
    ctx: &HandlerContext,
    user: UserId,
    args: &[String],
) -> Result<Response, PasskeepError> {
    if args.is_empty() {
        return Ok(Response::new(messages::FIND_PROMPT, Step::FindStep1));
    }
    let needle = args.join(" ");
    let hits = ctx
        .credentials
        .find_by_partial_description(user, &needle)
        .await?;
    if hits.is_empty() {
        return Ok(Response::idle(messages::NOTHING_FOUND));
    }
    let text = super::render_records(ctx, user, messages::LIST_HEADER, &hits).await?;
    Ok(Response::new(text, Step::InList))
}
