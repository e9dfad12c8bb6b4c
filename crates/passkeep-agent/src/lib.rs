// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation core and agent loop for Passkeep.
//!
//! The [`AgentLoop`] is the central coordinator that:
//! - Receives messages from a channel adapter
//! - Dispatches them through the per-user conversation state machine
//! - Pushes fired reminders from the bus's reminder queue back through the channel
//! - Sweeps idle conversations
//! - Handles graceful shutdown

pub mod commands;
pub mod context;
pub mod conversation;
pub mod dispatcher;
pub mod handlers;
pub mod messages;
pub mod router;
pub mod shutdown;

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use passkeep_bus::EventBus;
use passkeep_config::model::PasskeepConfig;
use passkeep_core::types::{InboundMessage, OutboundMessage, ReminderDelivery, UserId};
use passkeep_core::{ChannelAdapter, PasskeepError};
use tokio::sync::Semaphore;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info};

pub use context::{HandlerContext, Limits};
pub use conversation::ConversationStore;
pub use dispatcher::Dispatcher;

/// How long shutdown waits for in-flight messages.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// The main loop that connects a channel adapter to the dispatcher.
///
/// Each inbound message is handled on its own task, bounded by
/// `agent.max_in_flight`. Reminder deliveries arrive from the bus's reminder queue.
pub struct AgentLoop {
    channel: Arc<dyn ChannelAdapter>,
    dispatcher: Arc<Dispatcher>,
    bus: Arc<EventBus>,
    /// Last chat each user wrote from, and when; reminders go there.
    chats: Arc<DashMap<UserId, (i64, Instant)>>,
    permits: Arc<Semaphore>,
    tasks: TaskTracker,
    idle_timeout: Duration,
    sweep_interval: Duration,
}

impl AgentLoop {
    /// Creates a loop over an already connected channel.
    pub fn new(
        channel: Arc<dyn ChannelAdapter>,
        dispatcher: Arc<Dispatcher>,
        bus: Arc<EventBus>,
        config: &PasskeepConfig,
    ) -> Self {
        info!(
            agent_name = config.agent.name.as_str(),
            channel = channel.name(),
            "agent loop initialized"
        );

        Self {
            channel,
            dispatcher,
            bus,
            chats: Arc::new(DashMap::new()),
            permits: Arc::new(Semaphore::new(config.agent.max_in_flight.max(1))),
            tasks: TaskTracker::new(),
            idle_timeout: Duration::from_secs(config.conversation.idle_timeout_secs),
            sweep_interval: Duration::from_secs(config.conversation.sweep_interval_secs.max(1)),
        }
    }

    /// Runs until the cancellation token fires or the channel closes.
    ///
    /// On exit, waits for in-flight messages before returning.
    pub async fn run(&self, cancel: CancellationToken) -> Result<(), PasskeepError> {
        info!("agent loop running");

        let mut sweep = tokio::time::interval(self.sweep_interval);
        sweep.tick().await;

        loop {
            tokio::select! {
                msg = self.channel.receive() => {
                    match msg {
                        Ok(inbound) => self.spawn_inbound(inbound),
                        Err(e) => {
                            error!(error = %e, "channel receive error");
                            if e.to_string().contains("closed") {
                                break;
                            }
                        }
                    }
                }
                delivery = self.bus.recv_reminder() => {
                    match delivery {
                        Some(delivery) => self.spawn_reminder(delivery),
                        None => {
                            error!("reminder queue closed, stopping agent loop");
                            break;
                        }
                    }
                }
                _ = sweep.tick() => self.sweep_idle(),
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping agent loop");
                    break;
                }
            }
        }

        shutdown::drain_tasks(&self.tasks, DRAIN_TIMEOUT).await;

        info!("agent loop stopped");
        Ok(())
    }

    /// Number of users whose last chat is remembered.
    pub fn tracked_chats(&self) -> usize {
        self.chats.len()
    }

    fn sweep_idle(&self) {
        let removed = self.dispatcher.context().conversations.sweep_idle(self.idle_timeout);
        let now = Instant::now();
        let before = self.chats.len();
        self.chats
            .retain(|_, (_, seen_at)| now.duration_since(*seen_at) <= self.idle_timeout);
        let forgotten = before.saturating_sub(self.chats.len());
        if removed > 0 || forgotten > 0 {
            debug!(removed, forgotten, "idle conversations swept");
        }
    }

    fn spawn_inbound(&self, inbound: InboundMessage) {
        self.chats
            .insert(inbound.sender_id, (inbound.chat_id, Instant::now()));

        let channel = Arc::clone(&self.channel);
        let dispatcher = Arc::clone(&self.dispatcher);
        let permits = Arc::clone(&self.permits);
        self.tasks.spawn(async move {
            let Ok(_permit) = permits.acquire_owned().await else {
                return;
            };
            let response = dispatcher.dispatch(inbound.sender_id, &inbound.text).await;
            let outbound = OutboundMessage::from_response(inbound.chat_id, response);
            if let Err(e) = channel.send(outbound).await {
                error!(user_id = %inbound.sender_id, error = %e, "failed to send response");
            }
        });
    }

    /// Pushes a fired reminder without touching the user's conversation; the
    /// keyboard matches whatever step the user is currently in.
    fn spawn_reminder(&self, delivery: ReminderDelivery) {
        let user = delivery.user_id;
        let entity = delivery.entity;
        let chat_id = self.chats.get(&user).map(|chat| chat.0).unwrap_or(user.0);
        let mut outbound = OutboundMessage::from_response(chat_id, delivery.response);
        outbound.step = self.dispatcher.context().conversations.get_step(user);

        let channel = Arc::clone(&self.channel);
        self.tasks.spawn(async move {
            match channel.send(outbound).await {
                Ok(_) => debug!(user_id = %user, entity = %entity, "reminder delivered"),
                Err(e) => error!(user_id = %user, error = %e, "failed to deliver reminder"),
            }
        });
    }
}
