// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the conversation core, the scheduler and adapters.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Chat user identity (the Telegram user id for the Telegram channel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a delivered message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// Opaque key identifying the subject of a scheduled reminder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Key for a stored password record.
    pub fn password(record_id: i64) -> Self {
        Self(format!("password:{record_id}"))
    }

    /// User-scoped key for the recovery phrase cooldown reminder.
    pub fn recovery(user_id: UserId) -> Self {
        Self(format!("recovery:{user_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stage of a multi-turn command flow.
///
/// `Idle` and `InList` are resting states that accept top-level commands;
/// every other step treats the next message as data for that step.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    Idle,
    InList,
    /// Generate: waiting for the length.
    GenerateStep1,
    /// Generate: waiting for the complexity.
    GenerateStep2,
    /// Save: waiting for the password text.
    SaveStep1,
    /// Save: waiting for the description.
    SaveStep2,
    /// Edit: waiting for the record index.
    EditStep1,
    /// Edit: waiting for the new length.
    EditStep2,
    /// Edit: waiting for the new complexity.
    EditStep3,
    /// Edit: waiting for the new description.
    EditStep4,
    /// Delete: waiting for the record index.
    DeleteStep1,
    /// Sort: waiting for the sort type.
    SortStep1,
    /// Find: waiting for the search text.
    FindStep1,
    /// Remind: waiting for the record index.
    RemindStep1,
    /// Remind: waiting for the number of days.
    RemindStep2,
    /// After save or edit: waiting for yes/no on setting a reminder.
    ReminderOffer,
    /// Recovery: waiting for the phrase.
    RecoveryPhraseStep1,
    /// Clear: waiting for yes/no confirmation.
    ClearStep1,
}

impl Step {
    /// Whether this step still accepts top-level commands.
    pub fn is_resting(self) -> bool {
        matches!(self, Step::Idle | Step::InList)
    }
}

/// The result of processing one message: text to send and the step the
/// user is left in (drives the keyboard shown next).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub text: String,
    pub step: Step,
}

impl Response {
    pub fn new(text: impl Into<String>, step: Step) -> Self {
        Self {
            text: text.into(),
            step,
        }
    }

    /// A response that leaves the user idle.
    pub fn idle(text: impl Into<String>) -> Self {
        Self::new(text, Step::Idle)
    }
}

/// Password complexity classes understood by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
pub enum Complexity {
    /// Lowercase letters and digits.
    Low,
    /// Mixed-case letters and digits.
    Medium,
    /// Mixed-case letters, digits and symbols.
    High,
}

impl Complexity {
    pub const LABELS: [&'static str; 3] = ["Низкая", "Средняя", "Высокая"];

    /// Parses a complexity token: `1`-`3`, a keyboard label, or its English name.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim().to_lowercase();
        match token.as_str() {
            "1" | "низкая" | "low" => Some(Complexity::Low),
            "2" | "средняя" | "medium" => Some(Complexity::Medium),
            "3" | "высокая" | "high" => Some(Complexity::High),
            _ => None,
        }
    }

    /// Numeric code, the canonical form stored in conversation params.
    pub fn code(self) -> u8 {
        match self {
            Complexity::Low => 1,
            Complexity::Medium => 2,
            Complexity::High => 3,
        }
    }
}

/// Ordering for the sort command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
pub enum SortOrder {
    /// Most recently modified first.
    ByDate,
    /// Alphabetical by description.
    ByDescription,
}

impl SortOrder {
    pub const LABELS: [&'static str; 2] = ["По дате", "По описанию"];

    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim().to_lowercase();
        match text.as_str() {
            "по дате" | "date" => Some(SortOrder::ByDate),
            "по описанию" | "description" => Some(SortOrder::ByDescription),
            _ => None,
        }
    }
}

/// Answer to a yes/no question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Agreement {
    Agree,
    Decline,
}

impl Agreement {
    pub const LABELS: [&'static str; 2] = ["Да", "Нет"];

    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim().to_lowercase();
        match text.as_str() {
            "да" | "yes" => Some(Agreement::Agree),
            "нет" | "no" => Some(Agreement::Decline),
            _ => None,
        }
    }
}

/// A stored password owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordRecord {
    pub id: i64,
    pub user_id: UserId,
    pub description: String,
    /// Base64 of `nonce || ciphertext || tag`, produced by a [`Cipher`](crate::Cipher).
    pub encrypted_secret: String,
    pub last_modified: DateTime<Utc>,
}

/// Fields needed to create a [`PasswordRecord`]; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPasswordRecord {
    pub user_id: UserId,
    pub description: String,
    pub encrypted_secret: String,
    pub last_modified: DateTime<Utc>,
}

/// A registered chat user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    /// PHC-format Argon2id hash of the recovery phrase.
    pub recovery_phrase_hash: Option<String>,
    pub recovery_phrase_set_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// An inbound text message received from a channel adapter.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Channel-specific message id.
    pub id: String,
    /// Channel name (`"telegram"`, `"mock"`).
    pub channel: String,
    pub sender_id: UserId,
    /// Where replies go; equals the sender for private chats.
    pub chat_id: i64,
    pub text: String,
    /// RFC 3339 receive time.
    pub timestamp: String,
}

/// An outbound message to be sent via a channel adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub chat_id: i64,
    pub text: String,
    /// Step the recipient is in after this message, used to pick a keyboard.
    pub step: Step,
}

impl OutboundMessage {
    pub fn from_response(chat_id: i64, response: Response) -> Self {
        Self {
            chat_id,
            text: response.text,
            step: response.step,
        }
    }
}

/// Payload of a fired reminder, pushed to the user without a prior request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderDelivery {
    pub user_id: UserId,
    pub entity: EntityId,
    pub response: Response,
}
