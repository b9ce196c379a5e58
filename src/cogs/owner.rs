use crate::cogs::{Cog, EMBED_COLOR};
use crate::command::args::parse_user_id;
use crate::command::respond::ERROR_COLOR;
use crate::command::{Command, CommandRun, Invocation};
use crate::context::BotContext;
use anyhow::{anyhow, Result};
use serenity::all::{CreateEmbed, CreateMessage};

/// Commands reserved for the bot owners listed in the configuration.
pub struct Owner;

impl Cog for Owner {
    fn name(&self) -> &'static str {
        "owner"
    }

    fn commands(&self) -> Result<Vec<Command>> {
        Ok(vec![
            Command::new("say", "The bot repeats after you", "say <message>", Say).owner_only(),
            Command::new("shutdown", "Shut the bot down", "shutdown", Shutdown).owner_only(),
            Command::new(
                "blacklist",
                "Manage the command deny-list",
                "blacklist <show/add/remove> [user]",
                Blacklist,
            )
            .owner_only(),
            Command::new("load", "Load a cog", "load <cog>", Load).owner_only(),
            Command::new("unload", "Unload a cog", "unload <cog>", Unload).owner_only(),
            Command::new("reload", "Reload a cog", "reload <cog>", Reload).owner_only(),
        ])
    }
}

async fn send_embed(ctx: &BotContext<'_>, inv: &Invocation<'_>, embed: CreateEmbed) -> Result<()> {
    inv.msg
        .channel_id
        .send_message(ctx.cache_http, CreateMessage::new().embed(embed))
        .await?;
    Ok(())
}

fn ok_embed(text: String) -> CreateEmbed {
    CreateEmbed::new().description(text).color(EMBED_COLOR)
}

fn error_embed(text: String) -> CreateEmbed {
    CreateEmbed::new().description(text).color(ERROR_COLOR)
}

struct Say;

#[serenity::async_trait]
impl CommandRun for Say {
    async fn run(&self, ctx: &BotContext<'_>, inv: &Invocation<'_>) -> Result<()> {
        let message = inv.args.rest_required(0, "message")?;
        inv.msg.channel_id.say(ctx.cache_http, message).await?;
        Ok(())
    }
}

struct Shutdown;

#[serenity::async_trait]
impl CommandRun for Shutdown {
    async fn run(&self, ctx: &BotContext<'_>, inv: &Invocation<'_>) -> Result<()> {
        send_embed(ctx, inv, ok_embed("Shutting down. Bye! :wave:".to_owned())).await?;
        ctx.cache_http.shard.shutdown_clean();
        Ok(())
    }
}

struct Blacklist;

#[serenity::async_trait]
impl CommandRun for Blacklist {
    async fn run(&self, ctx: &BotContext<'_>, inv: &Invocation<'_>) -> Result<()> {
        let subcommand = inv.args.required(0, "subcommand")?;
        match subcommand {
            "show" => {
                let ids = ctx.storage.blacklist_all()?;
                let description = if ids.is_empty() {
                    "No users are blacklisted.".to_owned()
                } else {
                    ids.iter()
                        .map(|id| format!("<@{id}> ({id})"))
                        .collect::<Vec<_>>()
                        .join("\n")
                };
                send_embed(
                    ctx,
                    inv,
                    CreateEmbed::new()
                        .title("Blacklisted users")
                        .description(description)
                        .color(EMBED_COLOR),
                )
                .await
            }
            "add" => {
                let term = inv.args.required(1, "user")?;
                let user_id =
                    parse_user_id(term).ok_or_else(|| anyhow!("Member \"{term}\" not found"))?;
                let user = user_id.to_user(ctx.cache_http).await?;

                let embed = if ctx.storage.blacklist_add(user_id.get())? {
                    ok_embed(format!(
                        "**{}** has been successfully added to the blacklist.",
                        user.tag()
                    ))
                } else {
                    error_embed(format!("**{}** is already in the blacklist.", user.tag()))
                };
                send_embed(ctx, inv, embed).await
            }
            "remove" => {
                let term = inv.args.required(1, "user")?;
                let user_id =
                    parse_user_id(term).ok_or_else(|| anyhow!("Member \"{term}\" not found"))?;
                let user = user_id.to_user(ctx.cache_http).await?;

                let embed = if ctx.storage.blacklist_remove(user_id.get())? {
                    ok_embed(format!(
                        "**{}** has been successfully removed from the blacklist.",
                        user.tag()
                    ))
                } else {
                    error_embed(format!("**{}** is not in the blacklist.", user.tag()))
                };
                send_embed(ctx, inv, embed).await
            }
            _ => {
                inv.msg
                    .reply(
                        ctx.cache_http,
                        "Unknown subcommand. Use `blacklist <show/add/remove>`.",
                    )
                    .await?;
                Ok(())
            }
        }
    }
}

struct Load;

#[serenity::async_trait]
impl CommandRun for Load {
    async fn run(&self, ctx: &BotContext<'_>, inv: &Invocation<'_>) -> Result<()> {
        let name = inv.args.required(0, "cog")?;
        let outcome = { ctx.registry.write().await.load(name) };
        let embed = match outcome {
            Ok(()) => ok_embed(format!("Successfully loaded the `{name}` cog.")),
            Err(e) => error_embed(format!("Could not load the `{name}` cog: {e:#}")),
        };
        send_embed(ctx, inv, embed).await
    }
}

struct Unload;

#[serenity::async_trait]
impl CommandRun for Unload {
    async fn run(&self, ctx: &BotContext<'_>, inv: &Invocation<'_>) -> Result<()> {
        let name = inv.args.required(0, "cog")?;
        let outcome = { ctx.registry.write().await.unload(name) };
        let embed = match outcome {
            Ok(()) => ok_embed(format!("Successfully unloaded the `{name}` cog.")),
            Err(e) => error_embed(format!("Could not unload the `{name}` cog: {e:#}")),
        };
        send_embed(ctx, inv, embed).await
    }
}

struct Reload;

#[serenity::async_trait]
impl CommandRun for Reload {
    async fn run(&self, ctx: &BotContext<'_>, inv: &Invocation<'_>) -> Result<()> {
        let name = inv.args.required(0, "cog")?;
        let outcome = { ctx.registry.write().await.reload(name) };
        let embed = match outcome {
            Ok(()) => ok_embed(format!("Successfully reloaded the `{name}` cog.")),
            Err(e) => error_embed(format!("Could not reload the `{name}` cog: {e:#}")),
        };
        send_embed(ctx, inv, embed).await
    }
}
