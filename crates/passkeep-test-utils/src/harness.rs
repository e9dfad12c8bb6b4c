// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end conversation testing.
//!
//! `TestHarness` assembles a complete dispatcher with deterministic crypto,
//! a real scheduler publishing to a real event bus, and either in-memory or
//! temp-file SQLite stores. `send()` drives the full pipeline.

use std::sync::Arc;

use passkeep_agent::{AgentLoop, ConversationStore, Dispatcher, HandlerContext, Limits};
use passkeep_bus::EventBus;
use passkeep_config::model::PasskeepConfig;
use passkeep_core::types::{Response, UserId};
use passkeep_core::{CredentialStore, EventPublisher, PasskeepError, UserStore};
use passkeep_scheduler::ReminderScheduler;
use passkeep_storage::SqliteStore;

use crate::fakes::{PatternGenerator, PlainPhraseHasher, PrefixCipher};
use crate::memory::{InMemoryCredentialStore, InMemoryUserStore};
use crate::mock_channel::MockChannel;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    config: PasskeepConfig,
    sqlite: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            config: PasskeepConfig::default(),
            sqlite: false,
        }
    }

    /// Length of one reminder "day" in milliseconds.
    pub fn with_day_millis(mut self, day_millis: u64) -> Self {
        self.config.scheduler.day_millis = day_millis;
        self
    }

    pub fn with_scheduler_workers(mut self, workers: usize) -> Self {
        self.config.scheduler.workers = workers;
        self
    }

    /// Idle timeout and sweep period of the agent loop, in seconds.
    pub fn with_idle_sweep(mut self, idle_timeout_secs: u64, sweep_interval_secs: u64) -> Self {
        self.config.conversation.idle_timeout_secs = idle_timeout_secs;
        self.config.conversation.sweep_interval_secs = sweep_interval_secs;
        self
    }

    /// Use a temp-file SQLite database instead of the in-memory stores.
    pub fn with_sqlite(mut self) -> Self {
        self.sqlite = true;
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, PasskeepError> {
        let (credentials, users, temp_dir): (Arc<dyn CredentialStore>, Arc<dyn UserStore>, _) =
            if self.sqlite {
                let temp_dir = tempfile::TempDir::new().map_err(PasskeepError::storage)?;
                let mut storage = self.config.storage.clone();
                storage.database_path =
                    temp_dir.path().join("test.db").to_string_lossy().to_string();
                let store = SqliteStore::open(&storage).await?;
                (Arc::new(store.clone()), Arc::new(store), Some(temp_dir))
            } else {
                (
                    Arc::new(InMemoryCredentialStore::new()),
                    Arc::new(InMemoryUserStore::new()),
                    None,
                )
            };

        let bus = Arc::new(EventBus::default());
        let publisher: Arc<dyn EventPublisher> = bus.clone();
        let scheduler = ReminderScheduler::from_config(&self.config.scheduler, publisher);

        let limits = Limits::from_config(&self.config);
        let context = HandlerContext {
            conversations: ConversationStore::new(),
            credentials: Arc::clone(&credentials),
            users: Arc::clone(&users),
            cipher: Arc::new(PrefixCipher),
            generator: Arc::new(PatternGenerator::new(limits.min_length, limits.max_length)),
            phrases: Arc::new(PlainPhraseHasher),
            scheduler: scheduler.clone(),
            limits,
        };

        Ok(TestHarness {
            dispatcher: Arc::new(Dispatcher::new(Arc::new(context))),
            channel: Arc::new(MockChannel::new()),
            bus,
            scheduler,
            credentials,
            users,
            config: self.config,
            _temp_dir: temp_dir,
        })
    }
}

/// A fully wired conversation core for integration tests.
pub struct TestHarness {
    pub dispatcher: Arc<Dispatcher>,
    pub channel: Arc<MockChannel>,
    pub bus: Arc<EventBus>,
    pub scheduler: ReminderScheduler,
    pub credentials: Arc<dyn CredentialStore>,
    pub users: Arc<dyn UserStore>,
    pub config: PasskeepConfig,
    _temp_dir: Option<tempfile::TempDir>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Dispatches one message from `user`.
    pub async fn send(&self, user: UserId, text: &str) -> Response {
        self.dispatcher.dispatch(user, text).await
    }

    /// Dispatches messages in order, returning every reply.
    pub async fn send_all(&self, user: UserId, texts: &[&str]) -> Vec<Response> {
        let mut responses = Vec::with_capacity(texts.len());
        for text in texts {
            responses.push(self.send(user, text).await);
        }
        responses
    }

    pub fn context(&self) -> &HandlerContext {
        self.dispatcher.context()
    }

    /// An agent loop over the mock channel and this harness's dispatcher.
    pub fn agent_loop(&self) -> AgentLoop {
        AgentLoop::new(
            self.channel.clone(),
            Arc::clone(&self.dispatcher),
            Arc::clone(&self.bus),
            &self.config,
        )
    }
}
