use crate::cogs::{Cog, EMBED_COLOR};
use crate::command::{Command, CommandRun, Invocation};
use crate::context::BotContext;
use anyhow::{anyhow, Result};
use serenity::all::{CreateEmbed, CreateMessage, EditMessage};
use std::time::Instant;

/// Everyday commands available to everyone.
pub struct General;

impl Cog for General {
    fn name(&self) -> &'static str {
        "general"
    }

    fn commands(&self) -> Result<Vec<Command>> {
        Ok(vec![
            Command::new("help", "List all loaded commands", "help", Help),
            Command::new("ping", "Check the bot's latency", "ping", Ping),
            Command::new("botinfo", "Show information about the bot", "botinfo", BotInfo),
            Command::new(
                "serverinfo",
                "Show information about this server",
                "serverinfo",
                ServerInfo,
            ),
            Command::new("invite", "Get the bot's invite link", "invite", Invite),
        ])
    }
}

struct Help;

#[serenity::async_trait]
impl CommandRun for Help {
    async fn run(&self, ctx: &BotContext<'_>, inv: &Invocation<'_>) -> Result<()> {
        let prefix = &ctx.settings.prefix;
        let groups = { ctx.registry.read().await.commands_by_unit() };

        let mut embed = CreateEmbed::new().title("Help").color(EMBED_COLOR);
        for (unit, commands) in groups {
            let mut body = String::from("```\n");
            for command in &commands {
                body.push_str(&format!(
                    "{prefix}{} - {}\n",
                    command.usage, command.description
                ));
            }
            body.push_str("```");
            embed = embed.field(unit, body, false);
        }

        inv.msg
            .channel_id
            .send_message(ctx.cache_http, CreateMessage::new().embed(embed))
            .await?;
        Ok(())
    }
}

struct Ping;

#[serenity::async_trait]
impl CommandRun for Ping {
    async fn run(&self, ctx: &BotContext<'_>, inv: &Invocation<'_>) -> Result<()> {
        // Round-trip time of the send itself stands in for gateway latency.
        let embed = CreateEmbed::new()
            .title("🏓 Pong!")
            .description("Measuring latency...")
            .color(EMBED_COLOR);
        let start = Instant::now();
        let mut sent = inv
            .msg
            .channel_id
            .send_message(ctx.cache_http, CreateMessage::new().embed(embed))
            .await?;
        let latency = start.elapsed().as_millis();

        let embed = CreateEmbed::new()
            .title("🏓 Pong!")
            .description(format!("The bot latency is {latency}ms."))
            .color(EMBED_COLOR);
        sent.edit(ctx.cache_http, EditMessage::new().embed(embed))
            .await?;
        Ok(())
    }
}

struct BotInfo;

#[serenity::async_trait]
impl CommandRun for BotInfo {
    async fn run(&self, ctx: &BotContext<'_>, inv: &Invocation<'_>) -> Result<()> {
        let owners = if ctx.config.owners.is_empty() {
            "None".to_owned()
        } else {
            ctx.config
                .owners
                .iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };

        let embed = CreateEmbed::new()
            .title("Bot Information")
            .description("A cog-based Discord bot template")
            .field("Version:", env!("CARGO_PKG_VERSION"), true)
            .field("Library:", "serenity", true)
            .field("Prefix:", ctx.settings.prefix.clone(), true)
            .field("Owners:", owners, false)
            .color(EMBED_COLOR);

        inv.msg
            .channel_id
            .send_message(ctx.cache_http, CreateMessage::new().embed(embed))
            .await?;
        Ok(())
    }
}

struct ServerInfo;

#[serenity::async_trait]
impl CommandRun for ServerInfo {
    async fn run(&self, ctx: &BotContext<'_>, inv: &Invocation<'_>) -> Result<()> {
        let Some(origin) = &inv.guild else {
            inv.msg
                .reply(ctx.cache_http, "This command can only be used in a server.")
                .await?;
            return Ok(());
        };

        let (name, member_count) = {
            let Some(guild) = inv.msg.guild(ctx.cache) else {
                return Err(anyhow!("guild {} is not cached", origin.id));
            };
            (guild.name.clone(), guild.member_count)
        };

        let embed = CreateEmbed::new()
            .title(format!("**{name}**"))
            .field("Server ID", origin.id.to_string(), true)
            .field("Member Count", member_count.to_string(), true)
            .field("Created At", origin.id.created_at().to_string(), true)
            .color(EMBED_COLOR);

        inv.msg
            .channel_id
            .send_message(ctx.cache_http, CreateMessage::new().embed(embed))
            .await?;
        Ok(())
    }
}

struct Invite;

#[serenity::async_trait]
impl CommandRun for Invite {
    async fn run(&self, ctx: &BotContext<'_>, inv: &Invocation<'_>) -> Result<()> {
        inv.msg
            .reply(
                ctx.cache_http,
                format!("Invite me by clicking here: {}", ctx.settings.invite_url()),
            )
            .await?;
        Ok(())
    }
}
