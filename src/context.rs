use crate::{
    cogs::ExtensionRegistry, command::cooldown::Cooldowns, config::Config, settings::Settings,
    storage::Storage,
};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Collection of data that is shared across events
pub struct BotContext<'a> {
    // The bot's own state
    pub settings: &'a Settings,
    pub config: &'a Config,
    pub storage: &'a Storage,
    pub registry: &'a RwLock<ExtensionRegistry>,
    pub cooldowns: &'a RwLock<Cooldowns>,
    // Discord/Serenity context types
    pub cache: &'a Arc<serenity::all::Cache>,
    pub http: &'a Arc<serenity::all::Http>,
    pub cache_http: &'a CacheHttp,
}

/// Many Serenity functions take a `impl CacheHttp` in order to first check the cache if the item
/// is available and fall back to an http request otherwise.  The most readily available type that
/// impl's this is named very differently in a way that could be confusing, and so we alias it.
pub type CacheHttp = serenity::all::Context;
