use crate::{
    cogs::ExtensionRegistry,
    command::{self, cooldown::Cooldowns},
    config::Config,
    context::BotContext,
    presence,
    settings::Settings,
    storage::Storage,
};
use serenity::all::{Message, Ready};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// Discord event handler
pub struct Handler {
    settings: Settings,
    config: Config,
    storage: Storage,
    registry: RwLock<ExtensionRegistry>,
    cooldowns: RwLock<Cooldowns>,
    presence_started: AtomicBool,
}

impl<'a> Handler {
    pub fn new(
        settings: Settings,
        config: Config,
        storage: Storage,
        registry: ExtensionRegistry,
    ) -> Self {
        Self {
            settings,
            config,
            storage,
            registry: RwLock::new(registry),
            cooldowns: RwLock::new(Cooldowns::new()),
            presence_started: AtomicBool::new(false),
        }
    }

    fn ctx(&'a self, discord_ctx: &'a serenity::all::Context) -> BotContext<'a> {
        BotContext {
            settings: &self.settings,
            config: &self.config,
            storage: &self.storage,
            registry: &self.registry,
            cooldowns: &self.cooldowns,
            cache: &discord_ctx.cache,
            http: &discord_ctx.http,
            cache_http: discord_ctx,
        }
    }
}

#[serenity::async_trait]
impl serenity::all::EventHandler for Handler {
    async fn ready(&self, discord_ctx: serenity::all::Context, ready: Ready) {
        tracing::info!("Logged in as {}", ready.user.name);
        tracing::info!("Running cogbot v{}", env!("CARGO_PKG_VERSION"));
        tracing::info!("-------------------");

        // Reconnects fire ready again; the rotation task must only start once.
        if !self.presence_started.swap(true, Ordering::SeqCst) {
            presence::spawn_rotation(discord_ctx.clone());
        }

        if self.config.sync_commands_globally {
            tracing::info!("Syncing commands globally...");
            let definitions = { self.registry.read().await.slash_definitions() };
            if let Err(e) =
                serenity::all::Command::set_global_commands(&discord_ctx.http, definitions).await
            {
                tracing::error!("Failed to sync commands globally: {e}");
            }
        }
    }

    async fn message(&self, discord_ctx: serenity::all::Context, msg: Message) {
        command::dispatch(&self.ctx(&discord_ctx), &msg).await;
    }
}
