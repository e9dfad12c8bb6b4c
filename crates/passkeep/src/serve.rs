// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `passkeep serve` command implementation.
//!
//! Opens the encrypted database, unlocks the vault, starts the reminder
//! scheduler and runs the agent loop over the Telegram channel until a
//! shutdown signal arrives.

use std::sync::Arc;

use passkeep_agent::{AgentLoop, ConversationStore, Dispatcher, HandlerContext, Limits, shutdown};
use passkeep_bus::EventBus;
use passkeep_config::PasskeepConfig;
use passkeep_core::{ChannelAdapter, PasskeepError, PluginAdapter};
use passkeep_scheduler::ReminderScheduler;
use passkeep_storage::SqliteStore;
use passkeep_telegram::TelegramChannel;
use passkeep_vault::{Argon2PhraseHasher, RandomPasswordGenerator};
use tracing::{error, info, warn};

/// Runs the `passkeep serve` command.
pub async fn run_serve(config: PasskeepConfig) -> Result<(), PasskeepError> {
    init_tracing(&config.agent.log_level);

    info!("starting passkeep serve");

    let store = Arc::new(SqliteStore::open(&config.storage).await?);

    let passphrase = passkeep_vault::get_vault_passphrase()?;
    let vault = match passkeep_vault::open_or_create(
        store.database().connection().clone(),
        &passphrase,
        &config.vault,
    )
    .await
    {
        Ok(vault) => vault,
        Err(e) => {
            error!(error = %e, "vault could not be opened");
            eprintln!(
                "error: vault cannot be unlocked. \
                 Set PASSKEEP_VAULT_KEY or provide the passphrase interactively."
            );
            return Err(e);
        }
    };
    drop(passphrase);
    info!("vault unlocked");

    let bus = Arc::new(EventBus::default());
    let scheduler = ReminderScheduler::from_config(&config.scheduler, bus.clone());

    let ctx = HandlerContext {
        conversations: ConversationStore::new(),
        credentials: store.clone(),
        users: store.clone(),
        cipher: Arc::new(vault),
        generator: Arc::new(RandomPasswordGenerator::new(&config.password)),
        phrases: Arc::new(Argon2PhraseHasher::new(&config.vault)),
        scheduler: scheduler.clone(),
        limits: Limits::from_config(&config),
    };
    let dispatcher = Arc::new(Dispatcher::new(Arc::new(ctx)));

    let mut telegram = TelegramChannel::new(config.telegram.clone())?;
    telegram.connect().await?;
    let channel: Arc<dyn ChannelAdapter> = Arc::new(telegram);

    let cancel = shutdown::install_signal_handler();
    let agent_loop = AgentLoop::new(channel.clone(), dispatcher, bus, &config);
    let result = agent_loop.run(cancel).await;

    scheduler.shutdown().await;
    if let Err(e) = channel.shutdown().await {
        warn!(error = %e, "channel shutdown failed");
    }
    if let Err(e) = store.shutdown().await {
        warn!(error = %e, "storage shutdown failed");
    }

    info!("passkeep stopped");
    result
}

/// Initializes the tracing subscriber with the given log level.
///
/// `RUST_LOG` takes precedence when set.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("passkeep={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
