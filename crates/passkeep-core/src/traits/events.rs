// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-way publication of reminder lifecycle events.

use chrono::{DateTime, Utc};

use crate::types::{EntityId, ReminderDelivery};

/// Sink for reminder events; the messaging side subscribes and pushes fired
/// reminders to users.
pub trait EventPublisher: Send + Sync {
    /// A reminder fired. Implementations must not drop it.
    fn publish_reminder(&self, delivery: ReminderDelivery);

    /// A reminder was armed for `entity`. Informational only.
    fn reminder_scheduled(&self, _entity: &EntityId, _fire_at: DateTime<Utc>) {}

    /// A live reminder for `entity` was cancelled. Informational only.
    fn reminder_cancelled(&self, _entity: &EntityId) {}
}
