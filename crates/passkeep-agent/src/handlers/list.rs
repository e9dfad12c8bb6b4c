// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use passkeep_core::types::{Response, Step, UserId};
use passkeep_core::PasskeepError;

use crate::context::HandlerContext;
use crate::messages;

/// `/list`: every record, decrypted and numbered.
pub async fn handle(ctx: &HandlerContext, user: UserId) -> Result<Response, PasskeepError> {
    let records = ctx.credentials.list_by_user(user).await?;
    if records.is_empty() {
        return Ok(Response::idle(messages::EMPTY_LIST));
    }
    let text = super::render_records(ctx, user, messages::LIST_HEADER, &records).await?;
    Ok(Response::new(text, Step::InList))
}
