use anyhow::anyhow;
use cogbot::{
    cogs, config::Config, handler::Handler, keep_alive, lifecycle, settings::Settings, storage,
    storage::Storage,
};
use serenity::{all::GatewayIntents, Client};
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::from_env();
    let config = Config::load().await?;

    let db_path = Path::new(storage::DATABASE_PATH);
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| anyhow!("Could not create `{}`: {}", parent.display(), e))?;
    }
    storage::apply_schema(db_path)?;
    let store = Storage::open(db_path)?;

    let mut registry = cogs::ExtensionRegistry::new(cogs::cogs());
    registry.load_all();
    if registry.is_empty() {
        return Err(anyhow!("No cogs are registered, refusing to start"));
    }

    keep_alive::spawn().await?;

    let token = settings.token.clone();
    let handler = Handler::new(settings, config, store, registry);

    // Things we want discord to tell us about.
    let intents = GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let client = Client::builder(&token, intents)
        .event_handler(handler)
        .await?;

    lifecycle::run(client).await
}
