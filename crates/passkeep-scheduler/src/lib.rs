// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delayed one-shot reminder scheduler.
//!
//! A single actor task owns the timer queue and the entity registry. Callers
//! hold a cheap [`ReminderScheduler`] handle that enqueues commands; nothing
//! on the caller side ever touches the registry directly.
//!
//! Invariant: at most one live reminder per [`EntityId`]. Scheduling an
//! entity that already has a reminder replaces it. Cancelling an entity
//! that has no live reminder (never scheduled, already fired, already
//! cancelled) is a no-op. Delays longer than [`MAX_DELAY`] are refused.

mod actor;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use passkeep_config::model::{MAX_REMINDER_DELAY_MILLIS, SchedulerConfig};
use passkeep_core::types::{EntityId, Response, UserId};
use passkeep_core::EventPublisher;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::actor::SchedulerActor;

/// Longest delay [`ReminderScheduler::schedule`] will arm.
pub const MAX_DELAY: Duration = Duration::from_millis(MAX_REMINDER_DELAY_MILLIS);

/// Message accepted by the scheduler actor.
#[derive(Debug)]
pub(crate) enum SchedulerCommand {
    Schedule {
        user_id: UserId,
        entity: EntityId,
        delay: Duration,
        response: Response,
    },
    Cancel {
        entity: EntityId,
    },
    IsScheduled {
        entity: EntityId,
        reply: oneshot::Sender<bool>,
    },
    Pending {
        reply: oneshot::Sender<usize>,
    },
    Shutdown,
}

/// Handle to the reminder actor. Clones share the same actor.
#[derive(Clone)]
pub struct ReminderScheduler {
    commands: mpsc::UnboundedSender<SchedulerCommand>,
    task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl ReminderScheduler {
    /// Spawns the actor on the current tokio runtime.
    ///
    /// `workers` bounds how many deliveries may publish concurrently.
    pub fn spawn(workers: usize, publisher: Arc<dyn EventPublisher>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let actor = SchedulerActor::new(rx, workers.max(1), publisher);
        let task = tokio::spawn(actor.run());
        debug!(workers, "reminder scheduler started");
        Self {
            commands: tx,
            task: Arc::new(Mutex::new(Some(task))),
        }
    }

    pub fn from_config(config: &SchedulerConfig, publisher: Arc<dyn EventPublisher>) -> Self {
        Self::spawn(config.workers, publisher)
    }

    /// Arms a reminder for `entity`, replacing any live one.
    ///
    /// A delay past [`MAX_DELAY`] is logged and dropped; the live reminder,
    /// if any, is left as it was.
    pub fn schedule(&self, user_id: UserId, entity: EntityId, delay: Duration, response: Response) {
        self.send(SchedulerCommand::Schedule {
            user_id,
            entity,
            delay,
            response,
        });
    }

    /// Cancels the live reminder for `entity`, if any.
    pub fn cancel(&self, entity: EntityId) {
        self.send(SchedulerCommand::Cancel { entity });
    }

    /// Whether `entity` has a reminder that has neither fired nor been cancelled.
    pub async fn is_scheduled(&self, entity: EntityId) -> bool {
        let (reply, rx) = oneshot::channel();
        self.send(SchedulerCommand::IsScheduled { entity, reply });
        rx.await.unwrap_or(false)
    }

    /// Number of live reminders.
    pub async fn pending(&self) -> usize {
        let (reply, rx) = oneshot::channel();
        self.send(SchedulerCommand::Pending { reply });
        rx.await.unwrap_or(0)
    }

    /// Stops the actor, dropping live reminders, and waits for in-flight
    /// deliveries to finish.
    pub async fn shutdown(&self) {
        self.send(SchedulerCommand::Shutdown);
        let task = self.task.lock().ok().and_then(|mut guard| guard.take());
        if let Some(task) = task
            && let Err(e) = task.await
        {
            warn!(error = %e, "reminder scheduler task ended abnormally");
        }
    }

    fn send(&self, command: SchedulerCommand) {
        if self.commands.send(command).is_err() {
            warn!("reminder scheduler is stopped; command dropped");
        }
    }
}

impl std::fmt::Debug for ReminderScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReminderScheduler")
            .field("closed", &self.commands.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use passkeep_core::types::ReminderDelivery;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        deliveries: Mutex<Vec<ReminderDelivery>>,
        cancelled: Mutex<Vec<EntityId>>,
    }

    impl Recorder {
        fn texts(&self) -> Vec<String> {
            self.deliveries
                .lock()
                .unwrap()
                .iter()
                .map(|d| d.response.text.clone())
                .collect()
        }
    }

    impl EventPublisher for Recorder {
        fn publish_reminder(&self, delivery: ReminderDelivery) {
            self.deliveries.lock().unwrap().push(delivery);
        }

        fn reminder_cancelled(&self, entity: &EntityId) {
            self.cancelled.lock().unwrap().push(entity.clone());
        }
    }

    fn setup(workers: usize) -> (ReminderScheduler, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());
        let scheduler = ReminderScheduler::spawn(workers, recorder.clone());
        (scheduler, recorder)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[tokio::test(start_paused = true)]
    async fn rescheduling_same_entity_fires_once() {
        let (scheduler, recorder) = setup(4);
        let entity = EntityId::password(1);

        scheduler.schedule(UserId(1), entity.clone(), ms(100), Response::idle("first"));
        scheduler.schedule(UserId(1), entity.clone(), ms(200), Response::idle("second"));
        assert_eq!(scheduler.pending().await, 1);

        tokio::time::sleep(ms(1_000)).await;
        assert_eq!(recorder.texts(), vec!["second"]);
        assert!(!scheduler.is_scheduled(entity).await);
    }

    #[tokio::test(start_paused = true)]
    async fn distinct_entities_fire_independently() {
        let (scheduler, recorder) = setup(4);

        scheduler.schedule(UserId(1), EntityId::password(1), ms(100), Response::idle("a"));
        scheduler.schedule(UserId(2), EntityId::password(2), ms(300), Response::idle("b"));

        tokio::time::sleep(ms(150)).await;
        assert_eq!(recorder.texts(), vec!["a"]);
        assert_eq!(scheduler.pending().await, 1);

        tokio::time::sleep(ms(200)).await;
        assert_eq!(recorder.texts(), vec!["a", "b"]);
        assert_eq!(scheduler.pending().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn never_fires_before_its_delay() {
        let (scheduler, recorder) = setup(1);
        scheduler.schedule(UserId(1), EntityId::password(5), ms(500), Response::idle("x"));

        tokio::time::sleep(ms(499)).await;
        assert!(recorder.texts().is_empty());

        tokio::time::sleep(ms(2)).await;
        assert_eq!(recorder.texts(), vec!["x"]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_before_fire_suppresses_delivery() {
        let (scheduler, recorder) = setup(4);
        let entity = EntityId::recovery(UserId(9));

        scheduler.schedule(UserId(9), entity.clone(), ms(100), Response::idle("x"));
        assert!(scheduler.is_scheduled(entity.clone()).await);
        scheduler.cancel(entity.clone());

        tokio::time::sleep(ms(1_000)).await;
        assert!(recorder.texts().is_empty());
        assert!(!scheduler.is_scheduled(entity.clone()).await);
        assert_eq!(*recorder.cancelled.lock().unwrap(), vec![entity]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_after_fire_is_a_noop() {
        let (scheduler, recorder) = setup(4);
        let entity = EntityId::password(3);

        scheduler.schedule(UserId(1), entity.clone(), ms(10), Response::idle("x"));
        tokio::time::sleep(ms(50)).await;

        scheduler.cancel(entity.clone());
        scheduler.cancel(entity.clone());
        assert_eq!(scheduler.pending().await, 0);
        assert_eq!(recorder.texts(), vec!["x"]);
        assert!(recorder.cancelled.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn single_worker_delivers_every_reminder() {
        let (scheduler, recorder) = setup(1);
        for id in 0..20 {
            scheduler.schedule(UserId(1), EntityId::password(id), ms(10), Response::idle("x"));
        }

        tokio::time::sleep(ms(100)).await;
        assert_eq!(recorder.texts().len(), 20);
    }

    #[tokio::test(start_paused = true)]
    async fn out_of_range_delay_is_refused_and_actor_survives() {
        let (scheduler, recorder) = setup(2);
        let far = EntityId::password(1);

        scheduler.schedule(UserId(1), far.clone(), ms(10), Response::idle("kept"));
        scheduler.schedule(
            UserId(1),
            far.clone(),
            Duration::from_secs(1_000 * 86_400),
            Response::idle("far"),
        );
        scheduler.schedule(UserId(2), EntityId::password(2), ms(20), Response::idle("near"));

        tokio::time::sleep(ms(100)).await;
        assert_eq!(recorder.texts(), vec!["kept", "near"]);
        assert!(!scheduler.is_scheduled(far).await);
        assert_eq!(scheduler.pending().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn longest_allowed_delay_is_armed() {
        let (scheduler, recorder) = setup(1);
        let entity = EntityId::recovery(UserId(4));

        scheduler.schedule(UserId(4), entity.clone(), MAX_DELAY, Response::idle("x"));
        assert!(scheduler.is_scheduled(entity).await);
        assert!(recorder.texts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_drops_pending_reminders() {
        let (scheduler, recorder) = setup(2);
        scheduler.schedule(UserId(1), EntityId::password(1), ms(100), Response::idle("x"));

        scheduler.shutdown().await;
        scheduler.schedule(UserId(1), EntityId::password(2), ms(10), Response::idle("y"));

        tokio::time::sleep(ms(1_000)).await;
        assert!(recorder.texts().is_empty());
        assert_eq!(scheduler.pending().await, 0);
        assert!(!scheduler.is_scheduled(EntityId::password(1)).await);
    }
}
