// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use passkeep_core::types::{Response, UserId};
use passkeep_core::PasskeepError;
use tracing::info;

use crate::commands;
use crate::context::HandlerContext;
use crate::messages;

pub async fn start(ctx: &HandlerContext, user: UserId) -> Result<Response, PasskeepError> {
    if ctx.users.create_if_absent(user).await? {
        info!(user_id = %user, "new user registered");
    }
    Ok(Response::idle(format!(
        "{}\n\n{}\n{}",
        messages::WELCOME,
        messages::HELP_HEADER,
        commands::help_text()
    )))
}

pub fn help() -> Response {
    Response::idle(format!("{}\n{}", messages::HELP_HEADER, commands::help_text()))
}
