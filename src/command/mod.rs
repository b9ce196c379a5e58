use crate::command::args::Args;
use crate::command::error::{
    BotMissingPermissions, CallerMissingPermissions, CooldownActive, UserBlacklisted, UserNotOwner,
};
use crate::context::BotContext;
use anyhow::{anyhow, Result};
use serenity::all::{GuildId, Message, Permissions, UserId};
use std::time::{Duration, Instant};

pub mod args;
pub mod cooldown;
pub mod error;
pub mod respond;

/// A single prefix command registered by a cog.
pub struct Command {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub owner_only: bool,
    pub required_user_permissions: Permissions,
    pub required_bot_permissions: Permissions,
    pub cooldown: Option<Duration>,
    run: Box<dyn CommandRun>,
}

impl Command {
    pub fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        run: impl CommandRun + 'static,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            owner_only: false,
            required_user_permissions: Permissions::empty(),
            required_bot_permissions: Permissions::empty(),
            cooldown: None,
            run: Box::new(run),
        }
    }

    pub fn owner_only(mut self) -> Self {
        self.owner_only = true;
        self
    }

    pub fn user_permissions(mut self, perms: Permissions) -> Self {
        self.required_user_permissions = perms;
        self
    }

    pub fn bot_permissions(mut self, perms: Permissions) -> Self {
        self.required_bot_permissions = perms;
        self
    }

    pub fn cooldown(mut self, window: Duration) -> Self {
        self.cooldown = Some(window);
        self
    }
}

/// Implemented by each command's handler.
#[serenity::async_trait]
pub trait CommandRun: Send + Sync {
    async fn run(&self, ctx: &BotContext<'_>, inv: &Invocation<'_>) -> Result<()>;
}

/// Guild a command was invoked from. Absent for direct messages.
pub struct GuildOrigin {
    pub id: GuildId,
    pub name: String,
}

/// Ephemeral description of one command invocation, consumed by the handler
/// and by the error responder.
pub struct Invocation<'a> {
    pub msg: &'a Message,
    pub command_name: &'a str,
    pub guild: Option<GuildOrigin>,
    pub args: Args<'a>,
}

/// Route one message through the command pipeline: prefix match, lookup,
/// checks, then execution. Whatever fails is classified; unrecognized
/// failures are escalated to the error log, never silently dropped.
pub async fn dispatch(ctx: &BotContext<'_>, msg: &Message) {
    if msg.author.bot {
        return;
    }
    let Some(rest) = msg.content.strip_prefix(ctx.settings.prefix.as_str()) else {
        return;
    };
    let rest = rest.trim_start();
    let Some(name) = rest.split_whitespace().next() else {
        return;
    };

    // Clone the handle out so the read guard is gone before the command
    // runs. An owner command reloading the registry takes the write lock.
    let command = { ctx.registry.read().await.command(name) };
    let Some(command) = command else {
        // Not a registered command, so not an invocation at all.
        return;
    };

    let guild = msg.guild_id.map(|id| {
        let name = msg
            .guild(ctx.cache)
            .map(|guild| guild.name.clone())
            .unwrap_or_else(|| id.to_string());
        GuildOrigin { id, name }
    });

    let invocation = Invocation {
        msg,
        command_name: command.name,
        guild,
        args: Args::parse(rest[name.len()..].trim_start()),
    };

    match run_command(ctx, &command, &invocation).await {
        Ok(()) => {
            tracing::info!(
                "{}",
                completion_line(
                    command.name,
                    &msg.author.tag(),
                    msg.author.id,
                    invocation.guild.as_ref()
                )
            );
        }
        Err(err) => match error::classify(err) {
            Ok(descriptor) => respond::respond(ctx, &invocation, &descriptor).await,
            Err(unrecognized) => {
                tracing::error!(
                    "Unhandled error in the '{}' command: {unrecognized:#}",
                    command.name
                );
            }
        },
    }
}

/// Checks run in a fixed order before the handler: deny-list, owner gate,
/// caller permissions, bot permissions, cooldown.
async fn run_command(
    ctx: &BotContext<'_>,
    command: &Command,
    inv: &Invocation<'_>,
) -> Result<()> {
    let author = &inv.msg.author;

    if ctx.storage.is_blacklisted(author.id.get())? {
        return Err(UserBlacklisted.into());
    }

    if command.owner_only && !ctx.config.is_owner(author.id.get()) {
        return Err(UserNotOwner.into());
    }

    if !command.required_user_permissions.is_empty()
        || !command.required_bot_permissions.is_empty()
    {
        check_permissions(ctx, command, inv).await?;
    }

    if let Some(window) = command.cooldown {
        let mut cooldowns = ctx.cooldowns.write().await;
        if let Err(remaining) = cooldowns.check(author.id, command.name, window, Instant::now()) {
            return Err(CooldownActive { remaining }.into());
        }
    }

    command.run.run(ctx, inv).await
}

async fn check_permissions(
    ctx: &BotContext<'_>,
    command: &Command,
    inv: &Invocation<'_>,
) -> Result<()> {
    // Direct messages carry no guild permissions at all, so every required
    // permission counts as missing there.
    let Some(origin) = &inv.guild else {
        if !command.required_user_permissions.is_empty() {
            return Err(CallerMissingPermissions {
                missing: permission_names(command.required_user_permissions),
            }
            .into());
        }
        return Err(BotMissingPermissions {
            missing: permission_names(command.required_bot_permissions),
        }
        .into());
    };

    let member = origin.id.member(ctx.cache_http, inv.msg.author.id).await?;
    let bot_id = ctx.cache.current_user().id;
    let bot_member = origin.id.member(ctx.cache_http, bot_id).await?;

    let (user_perms, bot_perms) = {
        let Some(guild) = inv.msg.guild(ctx.cache) else {
            return Err(anyhow!("guild {} is not cached", origin.id));
        };
        let Some(channel) = guild.channels.get(&inv.msg.channel_id) else {
            return Err(anyhow!("channel {} is not cached", inv.msg.channel_id));
        };
        (
            guild.user_permissions_in(channel, &member),
            guild.user_permissions_in(channel, &bot_member),
        )
    };

    let missing = command.required_user_permissions & !user_perms;
    if !missing.is_empty() {
        return Err(CallerMissingPermissions {
            missing: permission_names(missing),
        }
        .into());
    }

    let missing = command.required_bot_permissions & !bot_perms;
    if !missing.is_empty() {
        return Err(BotMissingPermissions {
            missing: permission_names(missing),
        }
        .into());
    }

    Ok(())
}

/// Lowercase flag names, the form permission lists take in replies and logs.
pub fn permission_names(perms: Permissions) -> Vec<String> {
    perms
        .iter_names()
        .map(|(name, _)| name.to_ascii_lowercase())
        .collect()
}

/// Completion log line, with the guild and direct-message phrasings.
pub fn completion_line(
    command: &str,
    author: &str,
    author_id: UserId,
    origin: Option<&GuildOrigin>,
) -> String {
    match origin {
        Some(origin) => format!(
            "Executed {command} command in {} (ID: {}) by {author} (ID: {author_id})",
            origin.name, origin.id
        ),
        None => format!("Executed {command} command by {author} (ID: {author_id})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;

    #[serenity::async_trait]
    impl CommandRun for Noop {
        async fn run(&self, _ctx: &BotContext<'_>, _inv: &Invocation<'_>) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn builder_defaults_are_unrestricted() {
        let command = Command::new("ping", "Check latency", "ping", Noop);
        assert!(!command.owner_only);
        assert!(command.required_user_permissions.is_empty());
        assert!(command.required_bot_permissions.is_empty());
        assert!(command.cooldown.is_none());
    }

    #[test]
    fn builder_setters_stick() {
        let command = Command::new("kick", "Kick a user", "kick <user>", Noop)
            .owner_only()
            .user_permissions(Permissions::KICK_MEMBERS)
            .bot_permissions(Permissions::KICK_MEMBERS)
            .cooldown(Duration::from_secs(5));
        assert!(command.owner_only);
        assert_eq!(command.required_user_permissions, Permissions::KICK_MEMBERS);
        assert_eq!(command.required_bot_permissions, Permissions::KICK_MEMBERS);
        assert_eq!(command.cooldown, Some(Duration::from_secs(5)));
    }

    #[test]
    fn permission_names_are_lowercase_flag_names() {
        let names = permission_names(Permissions::MANAGE_MESSAGES | Permissions::BAN_MEMBERS);
        assert!(names.contains(&"manage_messages".to_owned()));
        assert!(names.contains(&"ban_members".to_owned()));
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn completion_line_has_guild_and_dm_forms() {
        let origin = GuildOrigin {
            id: GuildId::new(5),
            name: "Testland".into(),
        };
        assert_eq!(
            completion_line("ping", "someone", UserId::new(9), Some(&origin)),
            "Executed ping command in Testland (ID: 5) by someone (ID: 9)"
        );
        assert_eq!(
            completion_line("ping", "someone", UserId::new(9), None),
            "Executed ping command by someone (ID: 9)"
        );
    }
}
