// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;

use chrono::Utc;
use passkeep_config::model::RECOVERY_REMINDER_DAYS;
use passkeep_core::traits::user::cooldown_remaining;
use passkeep_core::types::{EntityId, Response, Step, UserId};
use passkeep_core::{PasskeepError, ValidationError};
use tracing::info;

use crate::context::HandlerContext;
use crate::messages;

/// `/recovery [<phrase...>]`
///
/// Stores an Argon2 hash of the phrase, at most once per cooldown period,
/// and arms a reminder for when the phrase may be changed again.
pub async fn handle(
    ctx: &HandlerContext,
    user: UserId,
    args: &[String],
) -> Result<Response, PasskeepError> {
    if args.is_empty() {
        return Ok(Response::new(messages::RECOVERY_PROMPT, Step::RecoveryPhraseStep1));
    }
    let phrase = args.join(" ");
    if phrase.trim().is_empty() {
        return Err(ValidationError::Empty.into());
    }

    ctx.users.create_if_absent(user).await?;
    // Cheap early rejection; the store re-checks atomically on write.
    let existing = ctx.users.find(user).await?;
    if let Some(remaining_days) = cooldown_remaining(existing.recovery_phrase_set_at, Utc::now()) {
        return Err(PasskeepError::CooldownActive { remaining_days });
    }

    let hasher = Arc::clone(&ctx.phrases);
    let hash = tokio::task::spawn_blocking(move || hasher.hash(&phrase))
        .await
        .map_err(|e| PasskeepError::Internal(format!("phrase hashing task failed: {e}")))??;
    ctx.users.set_recovery_phrase(user, hash, Utc::now()).await?;

    ctx.scheduler.schedule(
        user,
        EntityId::recovery(user),
        ctx.limits.days(RECOVERY_REMINDER_DAYS),
        Response::idle(messages::RECOVERY_AVAILABLE),
    );
    info!(user_id = %user, "recovery phrase updated");

    Ok(Response::idle(messages::RECOVERY_SAVED))
}
