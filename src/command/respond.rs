use crate::command::error::ErrorDescriptor;
use crate::command::{GuildOrigin, Invocation};
use crate::context::BotContext;
use serenity::all::{CreateEmbed, CreateMessage, UserId};
use std::time::Duration;

pub const ERROR_COLOR: u32 = 0xE02B2B;

/// Remaining-wait text for cooldown replies. Units whose value rounds to
/// zero are omitted; seconds always appear when hours and minutes are both
/// omitted.
pub fn format_remaining(remaining: Duration) -> String {
    let total = remaining.as_secs_f64();
    let hours = ((total / 3600.0).floor() as u64) % 24;
    let minutes = ((total / 60.0).floor() as u64) % 60;
    let seconds = (total % 60.0).round() as u64;

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(format!("{hours} hours"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes} minutes"));
    }
    if seconds > 0 || parts.is_empty() {
        parts.push(format!("{seconds} seconds"));
    }
    parts.join(" ")
}

/// User-facing embed description for each failure kind.
pub fn description_for(descriptor: &ErrorDescriptor) -> String {
    match descriptor {
        ErrorDescriptor::CooldownActive { remaining } => format!(
            "**Please slow down** - You can use this command again in {}.",
            format_remaining(*remaining)
        ),
        ErrorDescriptor::UserBlacklisted => "You are blacklisted from using the bot!".to_owned(),
        ErrorDescriptor::UserNotOwner => "You are not the owner of the bot!".to_owned(),
        ErrorDescriptor::CallerMissingPermissions { missing } => format!(
            "You are missing the permission(s) `{}` to execute this command!",
            missing.join(", ")
        ),
        ErrorDescriptor::BotMissingPermissions { missing } => format!(
            "I am missing the permission(s) `{}` to fully perform this command!",
            missing.join(", ")
        ),
        ErrorDescriptor::MissingRequiredArgument { description } => capitalize_first(description),
    }
}

/// Warning-log line for a classified failure, when the kind calls for one.
/// Cooldowns are deliberately silent.
pub fn warn_line(
    author: &str,
    author_id: UserId,
    origin: Option<&GuildOrigin>,
    descriptor: &ErrorDescriptor,
) -> Option<String> {
    let place = match origin {
        Some(origin) => format!("in the guild {} (ID: {})", origin.name, origin.id),
        None => "in the bot's DMs".to_owned(),
    };

    let line = match descriptor {
        ErrorDescriptor::CooldownActive { .. } => return None,
        ErrorDescriptor::UserBlacklisted => format!(
            "{author} (ID: {author_id}) tried to execute a command {place}, \
             but the user is blacklisted from using the bot."
        ),
        ErrorDescriptor::UserNotOwner => format!(
            "{author} (ID: {author_id}) tried to execute an owner only command {place}, \
             but the user is not an owner of the bot."
        ),
        ErrorDescriptor::CallerMissingPermissions { missing } => format!(
            "{author} (ID: {author_id}) tried to execute a command {place}, \
             but the user is missing the permission(s) {}.",
            missing.join(", ")
        ),
        ErrorDescriptor::BotMissingPermissions { missing } => format!(
            "{author} (ID: {author_id}) tried to execute a command {place}, \
             but the bot is missing the permission(s) {}.",
            missing.join(", ")
        ),
        ErrorDescriptor::MissingRequiredArgument { description } => format!(
            "{author} (ID: {author_id}) tried to execute a command {place}, but {description}"
        ),
    };
    Some(line)
}

fn embed_for(descriptor: &ErrorDescriptor) -> CreateEmbed {
    let embed = CreateEmbed::new()
        .description(description_for(descriptor))
        .color(ERROR_COLOR);
    match descriptor {
        ErrorDescriptor::MissingRequiredArgument { .. } => embed.title("Error!"),
        _ => embed,
    }
}

/// Send the reply and emit the log entry for a classified failure. Exactly
/// one of each; a failed send is logged rather than escalated.
pub async fn respond(ctx: &BotContext<'_>, inv: &Invocation<'_>, descriptor: &ErrorDescriptor) {
    let message = CreateMessage::new().embed(embed_for(descriptor));
    if let Err(e) = inv.msg.channel_id.send_message(ctx.cache_http, message).await {
        tracing::error!(
            "Failed to send the error response for the '{}' command: {e}",
            inv.command_name
        );
    }

    let author = inv.msg.author.tag();
    if let Some(line) = warn_line(&author, inv.msg.author.id, inv.guild.as_ref(), descriptor) {
        tracing::warn!("{line}");
    }
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
