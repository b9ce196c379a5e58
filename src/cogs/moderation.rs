use crate::cogs::{Cog, EMBED_COLOR};
use crate::command::args::parse_user_id;
use crate::command::{Command, CommandRun, GuildOrigin, Invocation};
use crate::context::BotContext;
use anyhow::{anyhow, Result};
use serenity::all::{CreateEmbed, CreateMessage, GetMessages, Permissions, UserId};

/// Guild moderation commands, gated on platform permissions.
pub struct Moderation;

impl Cog for Moderation {
    fn name(&self) -> &'static str {
        "moderation"
    }

    fn commands(&self) -> Result<Vec<Command>> {
        Ok(vec![
            Command::new("kick", "Kick a user out of the server", "kick <user> [reason]", Kick)
                .user_permissions(Permissions::KICK_MEMBERS)
                .bot_permissions(Permissions::KICK_MEMBERS),
            Command::new("purge", "Delete recent messages in this channel", "purge <amount>", Purge)
                .user_permissions(Permissions::MANAGE_MESSAGES)
                .bot_permissions(Permissions::MANAGE_MESSAGES),
            Command::new("warn", "Warn a user in the server", "warn <user> [reason]", Warn)
                .user_permissions(Permissions::MANAGE_MESSAGES),
            Command::new("warnings", "List a user's warnings", "warnings <user>", Warnings)
                .user_permissions(Permissions::MANAGE_MESSAGES),
        ])
    }
}

// The permission checks already refuse these commands in direct messages;
// this is the fallback for that invariant breaking.
fn guild_origin<'a>(inv: &'a Invocation<'_>) -> Result<&'a GuildOrigin> {
    inv.guild
        .as_ref()
        .ok_or_else(|| anyhow!("moderation commands require a guild"))
}

fn target_user(inv: &Invocation<'_>) -> Result<UserId> {
    let term = inv.args.required(0, "user")?;
    parse_user_id(term).ok_or_else(|| anyhow!("Member \"{term}\" not found"))
}

fn reason_or_default(inv: &Invocation<'_>) -> String {
    let reason = inv.args.rest(1);
    if reason.is_empty() {
        "Not specified".to_owned()
    } else {
        reason
    }
}

struct Kick;

#[serenity::async_trait]
impl CommandRun for Kick {
    async fn run(&self, ctx: &BotContext<'_>, inv: &Invocation<'_>) -> Result<()> {
        let origin = guild_origin(inv)?;
        let user_id = target_user(inv)?;
        let reason = reason_or_default(inv);

        let user = user_id.to_user(ctx.cache_http).await?;
        origin
            .id
            .kick_with_reason(ctx.http, user_id, &reason)
            .await?;

        let embed = CreateEmbed::new()
            .description(format!(
                "**{}** was kicked by **{}**!",
                user.tag(),
                inv.msg.author.tag()
            ))
            .field("Reason:", reason, false)
            .color(EMBED_COLOR);
        inv.msg
            .channel_id
            .send_message(ctx.cache_http, CreateMessage::new().embed(embed))
            .await?;
        Ok(())
    }
}

struct Purge;

#[serenity::async_trait]
impl CommandRun for Purge {
    async fn run(&self, ctx: &BotContext<'_>, inv: &Invocation<'_>) -> Result<()> {
        let term = inv.args.required(0, "amount")?;
        let amount: u64 = term
            .parse()
            .map_err(|_| anyhow!("Amount \"{term}\" is not a number"))?;
        let amount = amount.clamp(1, 99);

        // One extra to take the invoking message with it.
        let messages = inv
            .msg
            .channel_id
            .messages(ctx.cache_http, GetMessages::new().limit(amount as u8 + 1))
            .await?;
        for message in &messages {
            message.delete(ctx.cache_http).await?;
        }

        let embed = CreateEmbed::new()
            .description(format!(
                "**{}** cleared **{amount}** messages!",
                inv.msg.author.tag()
            ))
            .color(EMBED_COLOR);
        inv.msg
            .channel_id
            .send_message(ctx.cache_http, CreateMessage::new().embed(embed))
            .await?;
        Ok(())
    }
}

struct Warn;

#[serenity::async_trait]
impl CommandRun for Warn {
    async fn run(&self, ctx: &BotContext<'_>, inv: &Invocation<'_>) -> Result<()> {
        let origin = guild_origin(inv)?;
        let user_id = target_user(inv)?;
        let reason = reason_or_default(inv);

        ctx.storage.warn_add(
            user_id.get(),
            origin.id.get(),
            inv.msg.author.id.get(),
            &reason,
        )?;
        let total = ctx.storage.warns_for(user_id.get(), origin.id.get())?.len();

        let user = user_id.to_user(ctx.cache_http).await?;
        let embed = CreateEmbed::new()
            .description(format!(
                "**{}** was warned by **{}**!\nTotal warns for this user: {total}",
                user.tag(),
                inv.msg.author.tag()
            ))
            .field("Reason:", reason, false)
            .color(EMBED_COLOR);
        inv.msg
            .channel_id
            .send_message(ctx.cache_http, CreateMessage::new().embed(embed))
            .await?;
        Ok(())
    }
}

struct Warnings;

#[serenity::async_trait]
impl CommandRun for Warnings {
    async fn run(&self, ctx: &BotContext<'_>, inv: &Invocation<'_>) -> Result<()> {
        let origin = guild_origin(inv)?;
        let user_id = target_user(inv)?;

        let warns = ctx.storage.warns_for(user_id.get(), origin.id.get())?;
        let user = user_id.to_user(ctx.cache_http).await?;

        let description = if warns.is_empty() {
            "This user has no warnings.".to_owned()
        } else {
            warns
                .iter()
                .map(|warn| {
                    format!(
                        "#{} by <@{}>: {} ({})",
                        warn.id, warn.moderator_id, warn.reason, warn.created_at
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        };

        let embed = CreateEmbed::new()
            .title(format!("Warnings of {}", user.tag()))
            .description(description)
            .color(EMBED_COLOR);
        inv.msg
            .channel_id
            .send_message(ctx.cache_http, CreateMessage::new().embed(embed))
            .await?;
        Ok(())
    }
}
