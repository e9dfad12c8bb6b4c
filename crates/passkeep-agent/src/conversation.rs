// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user conversation state: current step plus the raw parameters
//! collected so far.
//!
//! Backed by a sharded [`DashMap`], so operations on one user lock only that
//! user's shard and never serialize against other users. Every operation is
//! a single entry access and therefore atomic per user. No entry guard is
//! held across an `.await`.

use std::time::Duration;

use dashmap::DashMap;
use passkeep_core::types::{Step, UserId};
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct Conversation {
    step: Step,
    /// `None` means "no list", which is distinct from an empty list.
    params: Option<Vec<String>>,
    touched_at: Instant,
}

impl Conversation {
    fn new() -> Self {
        Self {
            step: Step::Idle,
            params: None,
            touched_at: Instant::now(),
        }
    }
}

/// Concurrent map from user id to conversation state.
#[derive(Debug, Default)]
pub struct ConversationStore {
    entries: DashMap<UserId, Conversation>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored step, or `Idle`. Materializes an idle entry for unknown users.
    pub fn get_step(&self, user: UserId) -> Step {
        self.entries.entry(user).or_insert_with(Conversation::new).step
    }

    pub fn set_step(&self, user: UserId, step: Step) {
        let mut entry = self.entries.entry(user).or_insert_with(Conversation::new);
        entry.step = step;
        entry.touched_at = Instant::now();
    }

    /// Stored parameters, or an empty list. Never creates an entry.
    pub fn get_params(&self, user: UserId) -> Vec<String> {
        self.entries
            .get(&user)
            .and_then(|entry| entry.params.clone())
            .unwrap_or_default()
    }

    pub fn add_param(&self, user: UserId, value: impl Into<String>) {
        let mut entry = self.entries.entry(user).or_insert_with(Conversation::new);
        entry.params.get_or_insert_with(Vec::new).push(value.into());
        entry.touched_at = Instant::now();
    }

    /// Drops the parameter list entirely.
    pub fn clear_params(&self, user: UserId) {
        if let Some(mut entry) = self.entries.get_mut(&user) {
            entry.params = None;
            entry.touched_at = Instant::now();
        }
    }

    /// Clears parameters and returns to `Idle` in one entry update.
    pub fn reset(&self, user: UserId) {
        let mut entry = self.entries.entry(user).or_insert_with(Conversation::new);
        entry.step = Step::Idle;
        entry.params = None;
        entry.touched_at = Instant::now();
    }

    /// Moves to `step`, dropping parameters when `step` is resting.
    pub fn settle(&self, user: UserId, step: Step) {
        let mut entry = self.entries.entry(user).or_insert_with(Conversation::new);
        entry.step = step;
        if step.is_resting() {
            entry.params = None;
        }
        entry.touched_at = Instant::now();
    }

    /// Removes conversations untouched for longer than `max_idle`.
    ///
    /// Returns the number of removed entries.
    pub fn sweep_idle(&self, max_idle: Duration) -> usize {
        let before = self.entries.len();
        let now = Instant::now();
        self.entries
            .retain(|_, conversation| now.duration_since(conversation.touched_at) <= max_idle);
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use proptest::prelude::*;

    use super::*;

    #[test]
    fn unknown_user_defaults_to_idle_and_materializes() {
        let store = ConversationStore::new();
        assert_eq!(store.get_step(UserId(1)), Step::Idle);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_step(UserId(1)), Step::Idle);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn reading_params_does_not_materialize() {
        let store = ConversationStore::new();
        assert!(store.get_params(UserId(1)).is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn add_then_get_returns_appended_value() {
        let store = ConversationStore::new();
        store.add_param(UserId(1), "12");
        store.add_param(UserId(1), "3");
        assert_eq!(store.get_params(UserId(1)), vec!["12", "3"]);
    }

    #[test]
    fn clear_then_add_starts_fresh_list() {
        let store = ConversationStore::new();
        store.add_param(UserId(1), "stale");
        store.clear_params(UserId(1));
        assert!(store.get_params(UserId(1)).is_empty());

        store.add_param(UserId(1), "fresh");
        assert_eq!(store.get_params(UserId(1)), vec!["fresh"]);
    }

    #[test]
    fn reset_returns_to_idle_without_params() {
        let store = ConversationStore::new();
        store.set_step(UserId(1), Step::EditStep3);
        store.add_param(UserId(1), "1");
        store.reset(UserId(1));
        assert_eq!(store.get_step(UserId(1)), Step::Idle);
        assert!(store.get_params(UserId(1)).is_empty());
    }

    #[test]
    fn settle_keeps_params_only_mid_flow() {
        let store = ConversationStore::new();
        store.add_param(UserId(1), "2");
        store.settle(UserId(1), Step::ReminderOffer);
        assert_eq!(store.get_params(UserId(1)), vec!["2"]);

        store.settle(UserId(1), Step::InList);
        assert_eq!(store.get_step(UserId(1)), Step::InList);
        assert!(store.get_params(UserId(1)).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn sweep_removes_only_stale_conversations() {
        let store = ConversationStore::new();
        store.set_step(UserId(1), Step::GenerateStep1);
        tokio::time::advance(Duration::from_secs(100)).await;
        store.set_step(UserId(2), Step::SaveStep1);
        tokio::time::advance(Duration::from_secs(50)).await;

        assert_eq!(store.sweep_idle(Duration::from_secs(120)), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_step(UserId(2)), Step::SaveStep1);
        assert_eq!(store.get_step(UserId(1)), Step::Idle);
    }

    #[test]
    fn concurrent_users_do_not_interfere() {
        let store = Arc::new(ConversationStore::new());
        let handles: Vec<_> = (0..8)
            .map(|user| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for i in 0..200 {
                        store.add_param(UserId(user), i.to_string());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        for user in 0..8 {
            let params = store.get_params(UserId(user));
            assert_eq!(params.len(), 200);
            assert_eq!(params.last().map(String::as_str), Some("199"));
        }
    }

    proptest! {
        #[test]
        fn params_are_isolated_per_user(ops in proptest::collection::vec((0i64..4, "[a-z0-9]{1,6}"), 0..64)) {
            let store = ConversationStore::new();
            let mut expected: std::collections::HashMap<i64, Vec<String>> = Default::default();
            for (user, value) in ops {
                let before = store.get_params(UserId(user)).len();
                store.add_param(UserId(user), value.clone());
                let after = store.get_params(UserId(user));
                prop_assert_eq!(after.len(), before + 1);
                prop_assert_eq!(after.last(), Some(&value));
                expected.entry(user).or_default().push(value);
            }
            for (user, values) in expected {
                prop_assert_eq!(store.get_params(UserId(user)), values);
            }
        }
    }
}
