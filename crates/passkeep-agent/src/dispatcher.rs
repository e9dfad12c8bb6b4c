// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single entry point from the messaging layer into the conversation core.
//!
//! [`Dispatcher::dispatch`] never fails: every error, and any panic raised
//! while handling, becomes a user-facing response that returns the user to
//! `Idle`.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use passkeep_core::types::{Response, Step, UserId};
use passkeep_core::PasskeepError;
use tracing::{debug, error, warn};

use crate::commands;
use crate::context::HandlerContext;
use crate::handlers;
use crate::messages;
use crate::router;

pub struct Dispatcher {
    ctx: Arc<HandlerContext>,
}

impl Dispatcher {
    pub fn new(ctx: Arc<HandlerContext>) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &HandlerContext {
        &self.ctx
    }

    /// Processes one text message from `user` and returns the reply.
    ///
    /// In a resting step the text is parsed as a command; otherwise it is
    /// input for the current step. The returned step has already been
    /// stored when this returns.
    pub async fn dispatch(&self, user: UserId, text: &str) -> Response {
        let step = self.ctx.conversations.get_step(user);
        let outcome = AssertUnwindSafe(self.process(user, step, text))
            .catch_unwind()
            .await;

        let response = match outcome {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => failure_response(user, step, &err),
            Err(panic) => {
                error!(
                    user_id = %user,
                    step = %step,
                    panic = panic_message(panic.as_ref()),
                    "handler panicked"
                );
                Response::idle(messages::GENERIC_FAILURE)
            }
        };

        self.ctx.conversations.settle(user, response.step);
        debug!(user_id = %user, from = %step, to = %response.step, "message dispatched");
        response
    }

    async fn process(&self, user: UserId, step: Step, text: &str) -> Result<Response, PasskeepError> {
        if !step.is_resting() {
            return router::route(&self.ctx, user, step, text).await;
        }
        let tokens: Vec<String> = text.split_whitespace().map(str::to_string).collect();
        let command = commands::find_with_arity(&tokens)?;
        self.ctx.conversations.clear_params(user);
        debug!(user_id = %user, command = command.verb, params = tokens.len() - 1, "command matched");
        handlers::invoke(command.kind, &self.ctx, user, &tokens).await
    }
}

/// Maps an error to its reply. The user always ends up `Idle`.
fn failure_response(user: UserId, step: Step, err: &PasskeepError) -> Response {
    let text = match err {
        PasskeepError::CommandNotFound(_) => messages::INVALID_COMMAND.to_string(),
        PasskeepError::Validation(reason) => messages::validation(reason),
        PasskeepError::EntityNotFound(_) | PasskeepError::UserNotFound(_) => {
            messages::NOT_FOUND.to_string()
        }
        PasskeepError::Crypto(_) => messages::ENCRYPTION_ERROR.to_string(),
        PasskeepError::CooldownActive { remaining_days } => messages::cooldown(*remaining_days),
        other => {
            error!(user_id = %user, step = %step, error = %other, "message handling failed");
            return Response::idle(messages::GENERIC_FAILURE);
        }
    };
    if matches!(err, PasskeepError::Crypto(_)) {
        warn!(user_id = %user, step = %step, error = %err, "secret could not be processed");
    } else {
        debug!(user_id = %user, step = %step, error = %err, "input rejected");
    }
    Response::idle(text)
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

#[cfg(test)]
mod tests {
    use passkeep_core::ValidationError;
    use tracing_test::traced_test;

    use super::*;

    #[test]
    #[traced_test]
    fn unexpected_errors_are_logged_and_reset() {
        let err = PasskeepError::Internal("connection pool gone".into());
        let response = failure_response(UserId(7), Step::EditStep2, &err);
        assert_eq!(response.step, Step::Idle);
        assert_eq!(response.text, messages::GENERIC_FAILURE);
        assert!(logs_contain("message handling failed"));
        assert!(logs_contain("connection pool gone"));
    }

    #[test]
    #[traced_test]
    fn crypto_errors_are_warned_with_their_own_reply() {
        let err = PasskeepError::Crypto("tag mismatch".into());
        let response = failure_response(UserId(7), Step::Idle, &err);
        assert_eq!(response.text, messages::ENCRYPTION_ERROR);
        assert!(logs_contain("secret could not be processed"));
    }

    #[test]
    fn validation_errors_use_the_reason_text() {
        let err = PasskeepError::Validation(ValidationError::Index);
        let response = failure_response(UserId(7), Step::DeleteStep1, &err);
        assert_eq!(response.step, Step::Idle);
        assert_eq!(response.text, messages::validation(&ValidationError::Index));
    }

    #[test]
    fn panic_payloads_are_rendered() {
        let boxed: Box<dyn Any + Send> = Box::new("static payload");
        assert_eq!(panic_message(boxed.as_ref()), "static payload");
        let boxed: Box<dyn Any + Send> = Box::new(String::from("owned payload"));
        assert_eq!(panic_message(boxed.as_ref()), "owned payload");
        let boxed: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(boxed.as_ref()), "non-string panic payload");
    }
}
