// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Random password generation.
//!
//! Each complexity level adds a character class; the generated password
//! contains at least one character from every class of its level.

use passkeep_config::model::PasswordConfig;
use passkeep_core::types::Complexity;
use passkeep_core::{PasskeepError, PasswordGenerator, ValidationError};
use rand::Rng;
use rand::seq::SliceRandom;

const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*()-_=+[]{};:,.<>?";

fn classes(complexity: Complexity) -> &'static [&'static [u8]] {
    match complexity {
        Complexity::Low => &[LOWER, DIGITS],
        Complexity::Medium => &[LOWER, UPPER, DIGITS],
        Complexity::High => &[LOWER, UPPER, DIGITS, SYMBOLS],
    }
}

/// [`PasswordGenerator`] backed by the thread-local CSPRNG.
#[derive(Debug, Clone)]
pub struct RandomPasswordGenerator {
    min_length: usize,
    max_length: usize,
}

impl RandomPasswordGenerator {
    pub fn new(config: &PasswordConfig) -> Self {
        Self {
            min_length: config.min_length,
            max_length: config.max_length,
        }
    }
}

impl PasswordGenerator for RandomPasswordGenerator {
    fn generate(&self, length: usize, complexity: Complexity) -> Result<String, PasskeepError> {
        if !(self.min_length..=self.max_length).contains(&length) {
            return Err(ValidationError::Length {
                min: self.min_length,
                max: self.max_length,
            }
            .into());
        }

        let classes = classes(complexity);
        if length < classes.len() {
            return Err(ValidationError::Length {
                min: classes.len(),
                max: self.max_length,
            }
            .into());
        }

        let mut rng = rand::thread_rng();
        let pool: Vec<u8> = classes.iter().flat_map(|c| c.iter().copied()).collect();
        let mut chars: Vec<u8> = classes
            .iter()
            .map(|class| class[rng.gen_range(0..class.len())])
            .collect();
        while chars.len() < length {
            chars.push(pool[rng.gen_range(0..pool.len())]);
        }
        chars.shuffle(&mut rng);

        Ok(chars.into_iter().map(char::from).collect())
    }
}
