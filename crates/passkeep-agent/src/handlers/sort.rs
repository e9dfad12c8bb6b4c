// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use passkeep_core::types::{Response, SortOrder, Step, UserId};
use passkeep_core::{PasskeepError, ValidationError};

use crate::context::HandlerContext;
use crate::messages;

/// `/sort [<order...>]`. Labels such as "По дате" span two tokens.
pub async fn handle(
    ctx: &HandlerContext,
    user: UserId,
    args: &[String],
) -> Result<Response, PasskeepError> {
    if args.is_empty() {
        return Ok(Response::new(messages::SORT_PROMPT, Step::SortStep1));
    }
    let order = SortOrder::parse(&args.join(" ")).ok_or(ValidationError::SortType)?;
    let records = ctx.credentials.find_sorted(user, order).await?;
    if records.is_empty() {
        return Ok(Response::idle(messages::EMPTY_LIST));
    }
    let text = super::render_records(ctx, user, messages::LIST_HEADER, &records).await?;
    Ok(Response::new(text, Step::InList))
}
