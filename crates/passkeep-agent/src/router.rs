// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Continuation routing for users in the middle of a guided flow.
//!
//! Each non-resting step validates the incoming text on its own. Invalid
//! input keeps the user on the same step with an error prompt. Valid input
//! either advances to the next step, storing the value as a parameter, or
//! completes the flow by building the full command token array and handing
//! it to the command's handler.

use passkeep_core::types::{Agreement, Complexity, Response, SortOrder, Step, UserId};
use passkeep_core::{PasskeepError, ValidationError};

use crate::commands::CommandKind;
use crate::context::HandlerContext;
use crate::handlers;
use crate::messages;

/// Handles `text` as input for the non-resting `step`.
pub async fn route(
    ctx: &HandlerContext,
    user: UserId,
    step: Step,
    text: &str,
) -> Result<Response, PasskeepError> {
    let text = text.trim();
    match step {
        Step::Idle | Step::InList => Err(PasskeepError::Internal(format!(
            "resting step {step} routed as a continuation"
        ))),

        Step::GenerateStep1 => length(ctx, user, step, text, Step::GenerateStep2),
        Step::GenerateStep2 => {
            let Some(complexity) = Complexity::parse(text) else {
                return Ok(retry(step, ValidationError::Complexity));
            };
            let code = complexity.code().to_string();
            complete(ctx, user, CommandKind::Generate, "/generate", &code).await
        }

        Step::SaveStep1 => {
            if text.is_empty() || text.chars().any(char::is_whitespace) {
                return Ok(retry(step, ValidationError::Secret));
            }
            Ok(advance(ctx, user, text, messages::DESCRIPTION_PROMPT, Step::SaveStep2))
        }
        Step::SaveStep2 => {
            if text.is_empty() {
                return Ok(retry(step, ValidationError::Empty));
            }
            complete(ctx, user, CommandKind::Save, "/save", text).await
        }

        Step::EditStep1 => {
            if !ctx.is_valid_index(user, text).await? {
                return Ok(Response::idle(messages::NOT_FOUND));
            }
            let prompt = messages::length_prompt(ctx.limits.min_length, ctx.limits.max_length);
            Ok(advance(ctx, user, text, prompt, Step::EditStep2))
        }
        Step::EditStep2 => length(ctx, user, step, text, Step::EditStep3),
        Step::EditStep3 => {
            let Some(complexity) = Complexity::parse(text) else {
                return Ok(retry(step, ValidationError::Complexity));
            };
            let code = complexity.code().to_string();
            Ok(advance(ctx, user, &code, messages::DESCRIPTION_PROMPT, Step::EditStep4))
        }
        Step::EditStep4 => {
            if text.is_empty() {
                return Ok(retry(step, ValidationError::Empty));
            }
            complete(ctx, user, CommandKind::Edit, "/edit", text).await
        }

        Step::DeleteStep1 => {
            if !ctx.is_valid_index(user, text).await? {
                return Ok(Response::idle(messages::NOT_FOUND));
            }
            complete(ctx, user, CommandKind::Delete, "/delete", text).await
        }

        Step::SortStep1 => {
            if SortOrder::parse(text).is_none() {
                return Ok(retry(step, ValidationError::SortType));
            }
            complete(ctx, user, CommandKind::Sort, "/sort", text).await
        }

        Step::FindStep1 => {
            if text.is_empty() {
                return Ok(retry(step, ValidationError::Empty));
            }
            complete(ctx, user, CommandKind::Find, "/find", text).await
        }

        Step::RemindStep1 => {
            if !ctx.is_valid_index(user, text).await? {
                return Ok(Response::idle(messages::NOT_FOUND));
            }
            let prompt = messages::days_prompt(ctx.limits.min_days, ctx.limits.max_days);
            Ok(advance(ctx, user, text, prompt, Step::RemindStep2))
        }
        Step::RemindStep2 => {
            if let Err(err) = ctx.limits.parse_days(text) {
                return Ok(retry(step, err));
            }
            complete(ctx, user, CommandKind::Remind, "/remind", text).await
        }

        // Params already hold the index of the saved or edited record.
        Step::ReminderOffer => match Agreement::parse(text) {
            Some(Agreement::Agree) => Ok(Response::new(
                messages::days_prompt(ctx.limits.min_days, ctx.limits.max_days),
                Step::RemindStep2,
            )),
            Some(Agreement::Decline) => Ok(Response::idle(messages::REMINDER_DECLINED)),
            None => Ok(retry(step, ValidationError::Agreement)),
        },

        Step::RecoveryPhraseStep1 => {
            if text.is_empty() {
                return Ok(retry(step, ValidationError::Empty));
            }
            complete(ctx, user, CommandKind::Recovery, "/recovery", text).await
        }

        Step::ClearStep1 => match Agreement::parse(text) {
            Some(Agreement::Agree) => handlers::clear::confirm(ctx, user).await,
            Some(Agreement::Decline) => Ok(Response::idle(messages::CLEAR_CANCELLED)),
            None => Ok(retry(step, ValidationError::Agreement)),
        },
    }
}

/// Same step, with the error text for `err`.
fn retry(step: Step, err: ValidationError) -> Response {
    Response::new(messages::validation(&err), step)
}

fn advance(
    ctx: &HandlerContext,
    user: UserId,
    value: &str,
    prompt: impl Into<String>,
    next: Step,
) -> Response {
    ctx.conversations.add_param(user, value);
    Response::new(prompt, next)
}

fn length(
    ctx: &HandlerContext,
    user: UserId,
    step: Step,
    text: &str,
    next: Step,
) -> Result<Response, PasskeepError> {
    Ok(match ctx.limits.parse_length(text) {
        Ok(_) => advance(ctx, user, text, messages::COMPLEXITY_PROMPT, next),
        Err(err) => retry(step, err),
    })
}

/// Runs the handler with `[verb, params..., last]`. `last` stays a single
/// token even when it contains spaces.
async fn complete(
    ctx: &HandlerContext,
    user: UserId,
    kind: CommandKind,
    verb: &str,
    last: &str,
) -> Result<Response, PasskeepError> {
    let mut tokens = vec![verb.to_string()];
    tokens.extend(ctx.conversations.get_params(user));
    tokens.push(last.to_string());
    handlers::invoke(kind, ctx, user, &tokens).await
}
