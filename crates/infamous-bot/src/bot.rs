//! Core bot logic using the Poise framework.

use crate::error::BotResult;
use infamous_blocklist::{BlockAuthority, PgBlockStore};
use infamous_commands::{create_framework, Data, ExtensionRegistry, PROTECTED_EXTENSION};
use infamous_config::Config;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info};

/// Gateway intents the developer cog needs.
///
/// Prefix commands read message content, and member lookups rely on the
/// member cache.
pub fn intents() -> serenity::GatewayIntents {
    serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::MESSAGE_CONTENT
        | serenity::GatewayIntents::GUILD_MEMBERS
}

/// Main bot structure.
pub struct InfamousBot {
    config: Arc<Config>,
}

impl InfamousBot {
    /// Creates a new bot instance.
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Connects the database, prepares the `blocked` table and loads the block list.
    pub async fn connect_blocklist(&self) -> BotResult<(PgBlockStore, Arc<BlockAuthority>)> {
        let database = &self.config.database;
        let store = PgBlockStore::connect(
            &database.url,
            database.max_connections,
            Duration::from_secs(database.acquire_timeout_seconds),
        )
        .await?;
        store.ensure_schema().await?;

        let authority = BlockAuthority::load(Arc::new(store.clone())).await?;
        Ok((store, Arc::new(authority)))
    }

    /// Starts the bot and runs until every shard has shut down.
    pub async fn start(&self) -> BotResult<()> {
        let launch_time = Instant::now();
        let (database, blocklist) = self.connect_blocklist().await?;
        let pool_handle = database.clone();
        let config = Arc::clone(&self.config);

        let framework = create_framework(&self.config)
            .setup(move |_ctx, ready, framework| {
                Box::pin(async move {
                    info!("Bot connected as: {} ({})", ready.user.name, ready.user.id);

                    let extensions = ExtensionRegistry::from_commands(
                        &framework.options().commands,
                        &[PROTECTED_EXTENSION],
                    );
                    info!("Extensions loaded: {}", extensions.names().join(", "));

                    Ok(Data {
                        config,
                        blocklist,
                        extensions: Arc::new(extensions),
                        database: Some(database),
                        launch_time,
                    })
                })
            })
            .build();

        let mut client = serenity::ClientBuilder::new(&self.config.discord.token, intents())
            .framework(framework)
            .await?;
        info!("Discord client created");

        let shard_manager = client.shard_manager.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {:?}", e);
                return;
            }

            info!("Received shutdown signal, starting graceful shutdown");
            shard_manager.shutdown_all().await;
        });

        let outcome = client.start().await;
        pool_handle.close().await;
        info!("Discord client shutdown complete");

        outcome?;
        Ok(())
    }
}
