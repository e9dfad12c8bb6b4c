// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authorization filtering and conversion of Telegram messages into
//! channel-agnostic [`InboundMessage`]s.

use passkeep_core::types::{InboundMessage, UserId};
use teloxide::prelude::*;
use teloxide::types::ChatKind;

/// Checks whether the message sender may use the bot.
///
/// Authorization passes if the sender's user ID (as string) or username
/// matches any entry in `allowed_users`. An empty list admits everyone:
/// every user only ever sees their own vault entries.
///
/// Messages without a sender (e.g., channel posts) always return `false`.
pub fn is_authorized(msg: &Message, allowed_users: &[String]) -> bool {
    let Some(user) = msg.from.as_ref() else {
        return false;
    };
    if allowed_users.is_empty() {
        return true;
    }

    let user_id_str = user.id.0.to_string();
    allowed_users.iter().any(|allowed| {
        if *allowed == user_id_str {
            return true;
        }
        let allowed_clean = allowed.strip_prefix('@').unwrap_or(allowed);
        user.username
            .as_deref()
            .is_some_and(|username| username.eq_ignore_ascii_case(allowed_clean))
    })
}

/// Checks whether the message is from a private (DM) chat.
///
/// Group, supergroup, and channel messages return `false`.
pub fn is_dm(msg: &Message) -> bool {
    matches!(msg.chat.kind, ChatKind::Private(_))
}

/// Converts a Telegram text message into an [`InboundMessage`].
///
/// Returns `None` for non-text messages and senders whose id does not fit
/// an `i64`.
pub fn to_inbound_message(msg: &Message) -> Option<InboundMessage> {
    let text = msg.text()?;
    let user = msg.from.as_ref()?;
    let sender_id = i64::try_from(user.id.0).ok()?;

    Some(InboundMessage {
        id: msg.id.0.to_string(),
        channel: "telegram".to_string(),
        sender_id: UserId(sender_id),
        chat_id: msg.chat.id.0,
        text: text.to_string(),
        timestamp: msg.date.to_rfc3339(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a mock private chat message from JSON, matching Telegram Bot API structure.
    fn make_private_message(user_id: u64, username: Option<&str>, text: &str) -> Message {
        let mut from = serde_json::json!({
            "id": user_id,
            "is_bot": false,
            "first_name": "Test",
        });
        if let Some(uname) = username {
            from["username"] = serde_json::json!(uname);
        }

        let json = serde_json::json!({
            "message_id": 1,
            "date": 1700000000i64,
            "chat": {
                "id": user_id as i64,
                "type": "private",
                "first_name": "Test",
            },
            "from": from,
            "text": text,
        });

        serde_json::from_value(json).expect("failed to deserialize mock message")
    }

    fn make_group_message(user_id: u64, text: &str) -> Message {
        let json = serde_json::json!({
            "message_id": 1,
            "date": 1700000000i64,
            "chat": {
                "id": -100123i64,
                "type": "supergroup",
                "title": "Test Group",
            },
            "from": {
                "id": user_id,
                "is_bot": false,
                "first_name": "Test",
            },
            "text": text,
        });

        serde_json::from_value(json).expect("failed to deserialize mock group message")
    }

    fn make_no_sender_message(text: &str) -> Message {
        let json = serde_json::json!({
            "message_id": 1,
            "date": 1700000000i64,
            "chat": {
                "id": 12345i64,
                "type": "private",
                "first_name": "Test",
            },
            "text": text,
        });

        serde_json::from_value(json).expect("failed to deserialize mock message")
    }

    fn make_sticker_message(user_id: u64) -> Message {
        let json = serde_json::json!({
            "message_id": 2,
            "date": 1700000000i64,
            "chat": {
                "id": user_id as i64,
                "type": "private",
                "first_name": "Test",
            },
            "from": {
                "id": user_id,
                "is_bot": false,
                "first_name": "Test",
            },
            "location": { "latitude": 55.75, "longitude": 37.61 },
        });

        serde_json::from_value(json).expect("failed to deserialize mock location message")
    }

    #[test]
    fn authorized_by_user_id() {
        let msg = make_private_message(12345, None, "hello");
        assert!(is_authorized(&msg, &["12345".into()]));
    }

    #[test]
    fn authorized_by_username_with_at_ignoring_case() {
        let msg = make_private_message(12345, Some("TestUser"), "hello");
        assert!(is_authorized(&msg, &["@testuser".into()]));
        assert!(is_authorized(&msg, &["testuser".into()]));
    }

    #[test]
    fn not_authorized_wrong_user() {
        let msg = make_private_message(12345, Some("testuser"), "hello");
        assert!(!is_authorized(&msg, &["99999".into()]));
    }

    #[test]
    fn empty_allowlist_admits_everyone() {
        let msg = make_private_message(12345, Some("testuser"), "hello");
        assert!(is_authorized(&msg, &[]));
    }

    #[test]
    fn not_authorized_no_sender() {
        let msg = make_no_sender_message("hello");
        assert!(!is_authorized(&msg, &[]));
        assert!(!is_authorized(&msg, &["12345".into()]));
    }

    #[test]
    fn is_dm_only_for_private_chats() {
        assert!(is_dm(&make_private_message(12345, None, "hello")));
        assert!(!is_dm(&make_group_message(12345, "hello")));
    }

    #[test]
    fn to_inbound_message_maps_fields() {
        let msg = make_private_message(12345, Some("testuser"), "/generate 12 3");
        let inbound = to_inbound_message(&msg).expect("text message");

        assert_eq!(inbound.id, "1");
        assert_eq!(inbound.channel, "telegram");
        assert_eq!(inbound.sender_id, UserId(12345));
        assert_eq!(inbound.chat_id, 12345);
        assert_eq!(inbound.text, "/generate 12 3");
        assert!(inbound.timestamp.starts_with("2023-11-14"));
    }

    #[test]
    fn non_text_messages_are_skipped() {
        assert!(to_inbound_message(&make_sticker_message(12345)).is_none());
    }
}
