// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel adapter trait for the messaging gateway (Telegram, test doubles).

use async_trait::async_trait;

use crate::error::PasskeepError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{InboundMessage, MessageId, OutboundMessage};

/// Bidirectional messaging channel.
///
/// The channel delivers `(user, text)` pairs and renders outbound messages,
/// choosing a reply keyboard from [`OutboundMessage::step`].
#[async_trait]
pub trait ChannelAdapter: PluginAdapter {
    /// Establishes a connection to the messaging platform.
    async fn connect(&mut self) -> Result<(), PasskeepError>;

    /// Sends a message through the channel.
    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, PasskeepError>;

    /// Receives the next inbound message from the channel.
    async fn receive(&self) -> Result<InboundMessage, PasskeepError>;
}
