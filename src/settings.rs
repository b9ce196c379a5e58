use std::env;

/// Environment-derived settings, read once at process start and immutable after.
///
/// Missing variables become the literal string "None" instead of a load error;
/// the placeholder surfaces wherever the value is actually used.
#[derive(Debug, Clone)]
pub struct Settings {
    pub prefix: String,
    pub token: String,
    pub bot_permissions: String,
    pub application_id: String,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            prefix: var_or_none("PREFIX"),
            token: var_or_none("DISCORD_TOKEN"),
            bot_permissions: var_or_none("BOT_PERMISSIONS"),
            application_id: var_or_none("APPLICATION_ID"),
        }
    }

    /// OAuth2 invite URL built from the application id and permission bitmask.
    pub fn invite_url(&self) -> String {
        format!(
            "https://discord.com/api/oauth2/authorize?client_id={}&permissions={}&scope=bot+applications.commands",
            self.application_id, self.bot_permissions
        )
    }
}

fn var_or_none(name: &str) -> String {
    env::var(name).unwrap_or_else(|_| "None".to_owned())
}
