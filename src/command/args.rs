use crate::command::error::MissingRequiredArgument;
use anyhow::Result;
use serenity::all::UserId;

/// Whitespace-separated positional arguments after the command name.
pub struct Args<'a> {
    terms: Vec<&'a str>,
}

impl<'a> Args<'a> {
    pub fn parse(raw: &'a str) -> Self {
        Self {
            terms: raw.split_whitespace().collect(),
        }
    }

    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.terms.get(index).copied()
    }

    /// Positional argument that the command cannot run without. Reports the
    /// absence under `name` in the standard missing-argument wording.
    pub fn required(&self, index: usize, name: &str) -> Result<&'a str> {
        self.get(index).ok_or_else(|| {
            MissingRequiredArgument {
                description: format!("{name} is a required argument that is missing."),
            }
            .into()
        })
    }

    /// Every term from `index` onward joined back together, for trailing
    /// free-text arguments. Empty string when nothing is there.
    pub fn rest(&self, index: usize) -> String {
        self.terms
            .get(index..)
            .unwrap_or_default()
            .join(" ")
    }

    pub fn rest_required(&self, index: usize, name: &str) -> Result<String> {
        let rest = self.rest(index);
        if rest.is_empty() {
            return Err(MissingRequiredArgument {
                description: format!("{name} is a required argument that is missing."),
            }
            .into());
        }
        Ok(rest)
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Parse a user reference: a raw id, `<@id>`, or the nickname form `<@!id>`.
pub fn parse_user_id(term: &str) -> Option<UserId> {
    let id = term
        .strip_prefix("<@")
        .and_then(|s| s.strip_suffix('>'))
        .map(|s| s.trim_start_matches('!'))
        .unwrap_or(term);

    id.parse::<u64>().ok().filter(|id| *id != 0).map(UserId::new)
}
