// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Internal typed event bus.
//!
//! A thin wrapper over a `tokio::sync::broadcast` channel. Publishers never
//! block; slow subscribers observe `Lagged` and skip ahead.
//!
//! Due reminders additionally go through an unbounded queue with a single
//! consumer, so a burst of bookkeeping events cannot push one out.

use chrono::{DateTime, Utc};
use passkeep_core::types::{EntityId, ReminderDelivery};
use passkeep_core::EventPublisher;
use tokio::sync::{Mutex, broadcast, mpsc};
use tracing::{debug, trace, warn};
use uuid::Uuid;

/// Default number of buffered events per subscriber.
pub const DEFAULT_CAPACITY: usize = 256;

/// Events exchanged between the scheduler and the messaging side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusEvent {
    /// A reminder fired and must be pushed to its user.
    ReminderDue(ReminderDelivery),
    /// A reminder was armed (or re-armed) for an entity.
    ReminderScheduled {
        entity: EntityId,
        fire_at: DateTime<Utc>,
    },
    /// A live reminder was cancelled before firing.
    ReminderCancelled { entity: EntityId },
}

/// An event with its bus-assigned identity and publication time.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub id: Uuid,
    pub published_at: DateTime<Utc>,
    pub event: BusEvent,
}

/// Broadcast bus; cheap to share behind an `Arc`.
#[derive(Debug)]
pub struct EventBus {
    tx: broadcast::Sender<Envelope>,
    due_tx: mpsc::UnboundedSender<ReminderDelivery>,
    due_rx: Mutex<mpsc::UnboundedReceiver<ReminderDelivery>>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        let (due_tx, due_rx) = mpsc::unbounded_channel();
        Self {
            tx,
            due_tx,
            due_rx: Mutex::new(due_rx),
        }
    }

    /// Publishes an event, returning how many subscribers received it.
    ///
    /// Publishing with no subscribers is not an error; the event is dropped.
    pub fn publish(&self, event: BusEvent) -> usize {
        let envelope = Envelope {
            id: Uuid::new_v4(),
            published_at: Utc::now(),
            event,
        };
        trace!(event_id = %envelope.id, "publishing bus event");
        match self.tx.send(envelope) {
            Ok(receivers) => receivers,
            Err(_) => {
                debug!("bus event dropped: no subscribers");
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Envelope> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Waits for the next due reminder.
    ///
    /// Every delivery is handed out exactly once, to whichever caller is
    /// waiting. Cancel-safe; `None` only if the queue closed.
    pub async fn recv_reminder(&self) -> Option<ReminderDelivery> {
        self.due_rx.lock().await.recv().await
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EventPublisher for EventBus {
    fn publish_reminder(&self, delivery: ReminderDelivery) {
        if self.due_tx.send(delivery.clone()).is_err() {
            warn!(entity = %delivery.entity, "reminder queue closed; delivery dropped");
        }
        self.publish(BusEvent::ReminderDue(delivery));
    }

    fn reminder_scheduled(&self, entity: &EntityId, fire_at: DateTime<Utc>) {
        self.publish(BusEvent::ReminderScheduled {
            entity: entity.clone(),
            fire_at,
        });
    }

    fn reminder_cancelled(&self, entity: &EntityId) {
        self.publish(BusEvent::ReminderCancelled {
            entity: entity.clone(),
        });
    }
}
