// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The owning scheduler loop.

use std::collections::HashMap;
use std::future::poll_fn;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use passkeep_core::types::{EntityId, ReminderDelivery, Response, UserId};
use passkeep_core::EventPublisher;
use tokio::sync::{Semaphore, mpsc};
use tokio_util::task::TaskTracker;
use tokio_util::time::{DelayQueue, delay_queue};
use tracing::{debug, info, trace, warn};

use crate::{MAX_DELAY, SchedulerCommand};

/// What sits in the timer queue until it expires.
#[derive(Debug)]
struct Armed {
    user_id: UserId,
    entity: EntityId,
    response: Response,
}

pub(crate) struct SchedulerActor {
    commands: mpsc::UnboundedReceiver<SchedulerCommand>,
    queue: DelayQueue<Armed>,
    keys: HashMap<EntityId, delay_queue::Key>,
    permits: Arc<Semaphore>,
    deliveries: TaskTracker,
    publisher: Arc<dyn EventPublisher>,
}

impl SchedulerActor {
    pub(crate) fn new(
        commands: mpsc::UnboundedReceiver<SchedulerCommand>,
        workers: usize,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            commands,
            queue: DelayQueue::new(),
            keys: HashMap::new(),
            permits: Arc::new(Semaphore::new(workers)),
            deliveries: TaskTracker::new(),
            publisher,
        }
    }

    pub(crate) async fn run(mut self) {
        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(SchedulerCommand::Shutdown) | None => break,
                    Some(command) => self.apply(command),
                },
                Some(expired) = poll_fn(|cx| self.queue.poll_expired(cx)), if !self.queue.is_empty() => {
                    self.fire(expired.into_inner());
                }
            }
        }

        let dropped = self.keys.len();
        self.queue.clear();
        self.keys.clear();
        self.deliveries.close();
        self.deliveries.wait().await;
        info!(dropped, "reminder scheduler stopped");
    }

    fn apply(&mut self, command: SchedulerCommand) {
        match command {
            SchedulerCommand::Schedule {
                user_id,
                entity,
                delay,
                response,
            } => self.schedule(user_id, entity, delay, response),
            SchedulerCommand::Cancel { entity } => self.cancel(&entity),
            SchedulerCommand::IsScheduled { entity, reply } => {
                let _ = reply.send(self.keys.contains_key(&entity));
            }
            SchedulerCommand::Pending { reply } => {
                let _ = reply.send(self.keys.len());
            }
            SchedulerCommand::Shutdown => {}
        }
    }

    fn schedule(&mut self, user_id: UserId, entity: EntityId, delay: Duration, response: Response) {
        // DelayQueue panics on deadlines past its wheel.
        if delay > MAX_DELAY {
            warn!(
                %entity,
                %user_id,
                delay_ms = delay.as_millis() as u64,
                max_ms = MAX_DELAY.as_millis() as u64,
                "reminder delay out of range; not scheduled"
            );
            return;
        }

        let replaced = match self.keys.remove(&entity) {
            Some(key) => self.queue.try_remove(&key).is_some(),
            None => false,
        };

        let armed = Armed {
            user_id,
            entity: entity.clone(),
            response,
        };
        let key = self.queue.insert(armed, delay);
        self.keys.insert(entity.clone(), key);

        let fire_at = chrono::Duration::from_std(delay)
            .ok()
            .and_then(|d| Utc::now().checked_add_signed(d))
            .unwrap_or(chrono::DateTime::<Utc>::MAX_UTC);
        self.publisher.reminder_scheduled(&entity, fire_at);
        debug!(%entity, %user_id, delay_ms = delay.as_millis() as u64, replaced, "reminder scheduled");
    }

    fn cancel(&mut self, entity: &EntityId) {
        // An absent key means the reminder already fired or never existed.
        let Some(key) = self.keys.remove(entity) else {
            trace!(%entity, "cancel for entity without live reminder");
            return;
        };
        if self.queue.try_remove(&key).is_some() {
            self.publisher.reminder_cancelled(entity);
            debug!(%entity, "reminder cancelled");
        }
    }

    fn fire(&mut self, armed: Armed) {
        self.keys.remove(&armed.entity);
        let permits = Arc::clone(&self.permits);
        let publisher = Arc::clone(&self.publisher);
        self.deliveries.spawn(async move {
            let Ok(_permit) = permits.acquire_owned().await else {
                return;
            };
            debug!(entity = %armed.entity, user_id = %armed.user_id, "reminder fired");
            publisher.publish_reminder(ReminderDelivery {
                user_id: armed.user_id,
                entity: armed.entity,
                response: armed.response,
            });
        });
    }
}
