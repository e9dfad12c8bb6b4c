// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock channel adapter for deterministic testing.
//!
//! `MockChannel` implements `ChannelAdapter` with injectable inbound messages
//! and captured outbound messages for assertion in tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use passkeep_core::traits::adapter::PluginAdapter;
use passkeep_core::traits::channel::ChannelAdapter;
use passkeep_core::types::{HealthStatus, InboundMessage, MessageId, OutboundMessage, UserId};
use passkeep_core::PasskeepError;

/// A mock messaging channel for testing.
///
/// Provides two queues:
/// - **inbound**: Messages injected via `inject_message()` are returned by `receive()`
/// - **sent**: Messages passed to `send()` are captured and retrievable via `sent_messages()`
pub struct MockChannel {
    inbound: Arc<Mutex<VecDeque<InboundMessage>>>,
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
    notify: Arc<Notify>,
    sent_notify: Arc<Notify>,
    closed: AtomicBool,
}

impl MockChannel {
    /// Create a new mock channel with empty queues.
    pub fn new() -> Self {
        Self {
            inbound: Arc::new(Mutex::new(VecDeque::new())),
            sent: Arc::new(Mutex::new(Vec::new())),
            notify: Arc::new(Notify::new()),
            sent_notify: Arc::new(Notify::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Builds a private-chat text message from `user`.
    pub fn text(user: UserId, text: &str) -> InboundMessage {
        InboundMessage {
            id: format!("mock-in-{}", uuid::Uuid::new_v4()),
            channel: "mock".to_string(),
            sender_id: user,
            chat_id: user.0,
            text: text.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Inject an inbound message into the receive queue.
    pub async fn inject_message(&self, msg: InboundMessage) {
        self.inbound.lock().await.push_back(msg);
        self.notify.notify_one();
    }

    /// Makes `receive()` fail with a "closed" channel error once the queue is empty.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.notify.notify_one();
    }

    /// Get all messages that were sent through `send()`.
    pub async fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().await.clone()
    }

    /// Get the count of sent messages.
    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Waits until at least `count` messages were sent, or `timeout` elapses.
    ///
    /// Returns everything sent so far.
    pub async fn wait_for_sent(&self, count: usize, timeout: Duration) -> Vec<OutboundMessage> {
        let _ = tokio::time::timeout(timeout, async {
            loop {
                let notified = self.sent_notify.notified();
                if self.sent_count().await >= count {
                    return;
                }
                notified.await;
            }
        })
        .await;
        self.sent_messages().await
    }

    /// Clear all sent messages.
    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockChannel {
    fn name(&self) -> &str {
        "mock-channel"
    }

    async fn health_check(&self) -> Result<HealthStatus, PasskeepError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PasskeepError> {
        self.close();
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for MockChannel {
    async fn connect(&mut self) -> Result<(), PasskeepError> {
        Ok(())
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, PasskeepError> {
        let id = format!("mock-msg-{}", uuid::Uuid::new_v4());
        self.sent.lock().await.push(msg);
        self.sent_notify.notify_waiters();
        Ok(MessageId(id))
    }

    async fn receive(&self) -> Result<InboundMessage, PasskeepError> {
        loop {
            {
                let mut queue = self.inbound.lock().await;
                if let Some(msg) = queue.pop_front() {
                    return Ok(msg);
                }
            }
            if self.closed.load(Ordering::SeqCst) {
                return Err(PasskeepError::Channel {
                    message: "mock channel closed".to_string(),
                    source: None,
                });
            }
            self.notify.notified().await;
        }
    }
}
