// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One handler per command verb.
//!
//! Every handler receives the full token array (`tokens[0]` is the verb) and
//! decides from the parameter count whether to start its guided flow or to
//! execute a fully parameterized invocation. Handlers return the next step
//! in their [`Response`]; the dispatcher persists it.

pub mod clear;
pub mod delete;
pub mod edit;
pub mod find;
pub mod generate;
pub mod help;
pub mod list;
pub mod recovery;
pub mod remind;
pub mod save;
pub mod sort;

use std::collections::HashMap;

use passkeep_core::types::{PasswordRecord, Response, Step, UserId};
use passkeep_core::PasskeepError;

use crate::commands::CommandKind;
use crate::context::HandlerContext;
use crate::messages;

/// Runs the handler for `kind`. Exhaustive over [`CommandKind`].
pub async fn invoke(
    kind: CommandKind,
    ctx: &HandlerContext,
    user: UserId,
    tokens: &[String],
) -> Result<Response, PasskeepError> {
    let args = tokens.get(1..).unwrap_or_default();
    match kind {
        CommandKind::Start => help::start(ctx, user).await,
        CommandKind::Help => Ok(help::help()),
        CommandKind::Generate => generate::handle(ctx, args).await,
        CommandKind::Save => save::handle(ctx, user, args).await,
        CommandKind::List => list::handle(ctx, user).await,
        CommandKind::Edit => edit::handle(ctx, user, args).await,
        CommandKind::Delete => delete::handle(ctx, user, args).await,
        CommandKind::Sort => sort::handle(ctx, user, args).await,
        CommandKind::Find => find::handle(ctx, user, args).await,
        CommandKind::Remind => remind::handle(ctx, user, args).await,
        CommandKind::Recovery => recovery::handle(ctx, user, args).await,
        CommandKind::Clear => clear::handle(ctx, user).await,
    }
}

/// Error for a parameter count the command table should have rejected.
fn unexpected_arguments(verb: &str, args: &[String]) -> PasskeepError {
    PasskeepError::Internal(format!("{verb} invoked with {} parameter(s)", args.len()))
}

/// Leaves the index of the touched record as the only parameter and asks
/// whether to arm a reminder for it.
fn offer_reminder(ctx: &HandlerContext, user: UserId, index: usize, text: String) -> Response {
    ctx.conversations.clear_params(user);
    ctx.conversations.add_param(user, index.to_string());
    Response::new(text, Step::ReminderOffer)
}

/// Bare flow start that first checks the user has something to act on.
async fn prompt_if_any(
    ctx: &HandlerContext,
    user: UserId,
    prompt: impl Into<String>,
    step: Step,
) -> Result<Response, PasskeepError> {
    if ctx.credentials.count_by_user(user).await? == 0 {
        return Ok(Response::idle(messages::EMPTY_LIST));
    }
    Ok(Response::new(prompt, step))
}

/// Decrypts and numbers `records` by their position in the user's list, so
/// the numbers shown can be typed back into index-taking commands.
async fn render_records(
    ctx: &HandlerContext,
    user: UserId,
    header: &str,
    records: &[PasswordRecord],
) -> Result<String, PasskeepError> {
    let positions: HashMap<i64, usize> = ctx
        .credentials
        .list_by_user(user)
        .await?
        .iter()
        .enumerate()
        .map(|(i, record)| (record.id, i + 1))
        .collect();

    let mut lines = vec![header.to_string()];
    for record in records {
        let Some(index) = positions.get(&record.id) else {
            continue;
        };
        let secret = ctx.cipher.decrypt(&record.encrypted_secret)?;
        lines.push(messages::list_line(*index, &record.description, &secret));
    }
    Ok(lines.join("\n"))
}

/// 1-based position of `record_id` in the user's list.
async fn index_of(ctx: &HandlerContext, user: UserId, record_id: i64) -> Result<usize, PasskeepError> {
    ctx.credentials
        .list_by_user(user)
        .await?
        .iter()
        .position(|record| record.id == record_id)
        .map(|i| i + 1)
        .ok_or_else(|| PasskeepError::EntityNotFound(format!("password {record_id}")))
}
