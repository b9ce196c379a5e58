use crate::command::Command;
use anyhow::{anyhow, Result};
use serenity::all::CreateCommand;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

mod fun;
mod general;
mod moderation;
mod owner;

/// Embed color for ordinary (non-error) command replies.
pub const EMBED_COLOR: u32 = 0xBEBEFE;

/// An independently loadable unit bundling related commands.
pub trait Cog: Send + Sync {
    /// Unit name, used in logs and by the owner load/unload/reload commands.
    fn name(&self) -> &'static str;
    /// The commands this unit registers. A failure here fails this unit's
    /// load and nothing else.
    fn commands(&self) -> Result<Vec<Command>>;
}

/// Ordered list of available cogs
pub fn cogs() -> Vec<Box<dyn Cog>> {
    vec![
        Box::new(general::General),
        Box::new(fun::Fun),
        Box::new(moderation::Moderation),
        Box::new(owner::Owner),
    ]
}

/// Load lifecycle of a single unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loaded,
    Failed,
}

struct Unit {
    cog: Box<dyn Cog>,
    state: LoadState,
    last_error: Option<String>,
    commands: Vec<Arc<Command>>,
}

/// In-memory registry of cogs and the command table they feed. Unit names
/// are unique; loading walks units in lexical name order so startup logs are
/// reproducible.
pub struct ExtensionRegistry {
    units: BTreeMap<&'static str, Unit>,
    commands: HashMap<&'static str, Arc<Command>>,
}

impl ExtensionRegistry {
    pub fn new(cogs: Vec<Box<dyn Cog>>) -> Self {
        let mut units = BTreeMap::new();
        for cog in cogs {
            let name = cog.name();
            if units.contains_key(name) {
                tracing::error!("Duplicate cog name {name}, ignoring the later registration");
                continue;
            }
            units.insert(
                name,
                Unit {
                    cog,
                    state: LoadState::Unloaded,
                    last_error: None,
                    commands: Vec::new(),
                },
            );
        }
        Self {
            units,
            commands: HashMap::new(),
        }
    }

    /// Attempt to load every unit. Failures are contained per-unit; the scan
    /// itself always completes.
    pub fn load_all(&mut self) {
        let names: Vec<&'static str> = self.units.keys().copied().collect();
        for name in names {
            let _ = self.load(name);
        }
    }

    /// One unit's isolated load attempt. The outcome is recorded on the unit
    /// and logged either way; the returned error is for interactive callers.
    pub fn load(&mut self, name: &str) -> Result<()> {
        let Some(unit) = self.units.get_mut(name) else {
            return Err(anyhow!("no cog named '{name}' is registered"));
        };
        if unit.state == LoadState::Loaded {
            return Err(anyhow!("cog '{name}' is already loaded"));
        }

        match validate_commands(&self.commands, unit.cog.as_ref()) {
            Ok(commands) => {
                unit.commands = commands.into_iter().map(Arc::new).collect();
                unit.state = LoadState::Loaded;
                unit.last_error = None;
                for command in &unit.commands {
                    self.commands.insert(command.name, command.clone());
                }
                tracing::info!("Loaded extension {name}");
                Ok(())
            }
            Err(err) => {
                unit.state = LoadState::Failed;
                unit.last_error = Some(format!("{err:#}"));
                tracing::error!("Failed to load extension {name}\n{err:#}");
                Err(err)
            }
        }
    }

    /// Remove a unit's commands and mark it Unloaded.
    pub fn unload(&mut self, name: &str) -> Result<()> {
        let Some(unit) = self.units.get_mut(name) else {
            return Err(anyhow!("no cog named '{name}' is registered"));
        };
        if unit.state != LoadState::Loaded {
            return Err(anyhow!("cog '{name}' is not loaded"));
        }

        for command in unit.commands.drain(..) {
            self.commands.remove(command.name);
        }
        unit.state = LoadState::Unloaded;
        unit.last_error = None;
        tracing::info!("Unloaded extension {name}");
        Ok(())
    }

    /// Unload then load again, the hot-swap path for loaded units. A unit
    /// that failed to load is retried with `load` instead.
    pub fn reload(&mut self, name: &str) -> Result<()> {
        self.unload(name)?;
        self.load(name)
    }

    pub fn command(&self, name: &str) -> Option<Arc<Command>> {
        self.commands.get(name).cloned()
    }

    /// (unit name, state, last error) per unit, in lexical order.
    pub fn unit_states(&self) -> Vec<(&'static str, LoadState, Option<&str>)> {
        self.units
            .iter()
            .map(|(name, unit)| (*name, unit.state, unit.last_error.as_deref()))
            .collect()
    }

    /// Installed commands grouped by unit: lexical unit order, registration
    /// order within a unit.
    pub fn commands_by_unit(&self) -> Vec<(&'static str, Vec<Arc<Command>>)> {
        self.units
            .iter()
            .filter(|(_, unit)| unit.state == LoadState::Loaded)
            .map(|(name, unit)| (*name, unit.commands.clone()))
            .collect()
    }

    /// Slash-command definitions for the global sync.
    pub fn slash_definitions(&self) -> Vec<CreateCommand> {
        self.units
            .values()
            .filter(|unit| unit.state == LoadState::Loaded)
            .flat_map(|unit| &unit.commands)
            .map(|command| CreateCommand::new(command.name).description(command.description))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// Reject units whose command set cannot be installed as-is. Runs before any
/// table mutation, so a failing unit leaves no trace behind.
fn validate_commands(
    installed: &HashMap<&'static str, Arc<Command>>,
    cog: &dyn Cog,
) -> Result<Vec<Command>> {
    let commands = cog.commands()?;
    let mut seen: Vec<&str> = Vec::new();
    for command in &commands {
        if installed.contains_key(command.name) {
            return Err(anyhow!("command '{}' is already registered", command.name));
        }
        if seen.contains(&command.name) {
            return Err(anyhow!(
                "command '{}' appears twice in this cog",
                command.name
            ));
        }
        seen.push(command.name);
    }
    Ok(commands)
}
