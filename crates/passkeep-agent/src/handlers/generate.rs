// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use passkeep_core::types::{Complexity, Response, Step};
use passkeep_core::{PasskeepError, ValidationError};

use crate::context::HandlerContext;
use crate::messages;

/// `/generate [<length> <complexity>]`
pub async fn handle(ctx: &HandlerContext, args: &[String]) -> Result<Response, PasskeepError> {
    match args {
        [] => Ok(Response::new(
            messages::length_prompt(ctx.limits.min_length, ctx.limits.max_length),
            Step::GenerateStep1,
        )),
        [length, complexity] => {
            let length = ctx.limits.parse_length(length)?;
            let complexity = Complexity::parse(complexity).ok_or(ValidationError::Complexity)?;
            let password = ctx.generator.generate(length, complexity)?;
            Ok(Response::idle(messages::generated(&password)))
        }
        _ => Err(super::unexpected_arguments("/generate", args)),
    }
}
