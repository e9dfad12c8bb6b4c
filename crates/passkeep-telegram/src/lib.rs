// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram channel adapter for Passkeep.
//!
//! Implements [`ChannelAdapter`] for the Telegram Bot API via teloxide,
//! providing long polling, authorization filtering and a reply keyboard
//! matching the recipient's conversation step.

pub mod chunking;
pub mod handler;
pub mod keyboard;

use std::sync::Arc;

use async_trait::async_trait;
use passkeep_config::model::TelegramConfig;
use passkeep_core::traits::{ChannelAdapter, PluginAdapter};
use passkeep_core::types::{HealthStatus, InboundMessage, MessageId, OutboundMessage};
use passkeep_core::PasskeepError;
use teloxide::prelude::*;
use teloxide::types::ChatId;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Telegram's limit on the length of one message, in characters.
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// Telegram channel adapter implementing [`ChannelAdapter`].
///
/// Connects to Telegram via long polling, filters messages by authorization
/// and chat type, and forwards text messages to the agent loop.
pub struct TelegramChannel {
    bot: Bot,
    config: TelegramConfig,
    inbound_rx: tokio::sync::Mutex<mpsc::Receiver<InboundMessage>>,
    inbound_tx: mpsc::Sender<InboundMessage>,
    polling_handle: Option<tokio::task::JoinHandle<()>>,
}

impl TelegramChannel {
    /// Creates a new Telegram channel adapter.
    ///
    /// Requires `config.bot_token` to be set.
    pub fn new(config: TelegramConfig) -> Result<Self, PasskeepError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            PasskeepError::Config("telegram.bot_token is required for Telegram adapter".into())
        })?;

        if token.is_empty() {
            return Err(PasskeepError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        let bot = Bot::new(token);
        let (inbound_tx, inbound_rx) = mpsc::channel(100);

        Ok(Self {
            bot,
            config,
            inbound_rx: tokio::sync::Mutex::new(inbound_rx),
            inbound_tx,
            polling_handle: None,
        })
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

#[async_trait]
impl PluginAdapter for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn health_check(&self) -> Result<HealthStatus, PasskeepError> {
        match self.bot.get_me().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Telegram bot unreachable: {e}"
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), PasskeepError> {
        debug!("Telegram channel shutting down");
        if let Some(handle) = &self.polling_handle {
            handle.abort();
        }
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for TelegramChannel {
    async fn connect(&mut self) -> Result<(), PasskeepError> {
        if self.polling_handle.is_some() {
            return Ok(());
        }

        let bot = self.bot.clone();
        let tx = self.inbound_tx.clone();
        let allowed_users: Arc<Vec<String>> = Arc::new(self.config.allowed_users.clone());
        if allowed_users.is_empty() {
            warn!("telegram.allowed_users is empty, every Telegram user may use this bot");
        }

        info!("starting Telegram long polling");

        let handle = tokio::spawn(async move {
            let handler = Update::filter_message().endpoint(move |msg: Message| {
                let tx = tx.clone();
                let allowed = Arc::clone(&allowed_users);
                async move {
                    if !handler::is_dm(&msg) {
                        debug!(chat_id = msg.chat.id.0, "ignoring non-DM message");
                        return respond(());
                    }

                    if !handler::is_authorized(&msg, &allowed) {
                        debug!(chat_id = msg.chat.id.0, "ignoring unauthorized user");
                        return respond(());
                    }

                    match handler::to_inbound_message(&msg) {
                        Some(inbound) => {
                            if tx.send(inbound).await.is_err() {
                                warn!("inbound channel closed, dropping message");
                            }
                        }
                        None => {
                            debug!(msg_id = msg.id.0, "ignoring non-text message");
                        }
                    }

                    respond(())
                }
            });

            Dispatcher::builder(bot, handler)
                .default_handler(|_| async {})
                .build()
                .dispatch()
                .await;
        });

        self.polling_handle = Some(handle);
        Ok(())
    }

    /// Sends the text, split to Telegram's size limit. The keyboard for
    /// `msg.step` is attached to the last part.
    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, PasskeepError> {
        let chat_id = ChatId(msg.chat_id);
        let parts = chunking::split_message(&msg.text, MAX_MESSAGE_CHARS);
        let last = parts.len().saturating_sub(1);

        let mut sent_id = None;
        for (i, part) in parts.into_iter().enumerate() {
            let request = self.bot.send_message(chat_id, part);
            let result = if i == last {
                request.reply_markup(keyboard::reply_markup(msg.step)).await
            } else {
                request.await
            };
            let sent = result.map_err(|e| PasskeepError::Channel {
                message: format!("failed to send message: {e}"),
                source: Some(Box::new(e)),
            })?;
            sent_id = Some(sent.id.0);
        }

        sent_id
            .map(|id| MessageId(id.to_string()))
            .ok_or_else(|| PasskeepError::Channel {
                message: "refusing to send an empty message".into(),
                source: None,
            })
    }

    async fn receive(&self) -> Result<InboundMessage, PasskeepError> {
        let mut rx = self.inbound_rx.lock().await;
        rx.recv().await.ok_or_else(|| PasskeepError::Channel {
            message: "Telegram inbound channel closed".into(),
            source: None,
        })
    }
}
