use anyhow::{anyhow, Result};
use cogbot::cogs::{Cog, ExtensionRegistry, LoadState};
use cogbot::command::{Command, CommandRun, Invocation};
use cogbot::context::BotContext;

struct Noop;

#[serenity::async_trait]
impl CommandRun for Noop {
    async fn run(&self, _ctx: &BotContext<'_>, _inv: &Invocation<'_>) -> Result<()> {
        Ok(())
    }
}

struct StubCog {
    name: &'static str,
    commands: &'static [&'static str],
    fail: bool,
}

impl Cog for StubCog {
    fn name(&self) -> &'static str {
        self.name
    }

    fn commands(&self) -> Result<Vec<Command>> {
        if self.fail {
            return Err(anyhow!("deliberately broken cog"));
        }
        Ok(self
            .commands
            .iter()
            .copied()
            .map(|name| Command::new(name, "stub", name, Noop))
            .collect())
    }
}

fn stub(name: &'static str, commands: &'static [&'static str]) -> Box<dyn Cog> {
    Box::new(StubCog {
        name,
        commands,
        fail: false,
    })
}

fn broken(name: &'static str) -> Box<dyn Cog> {
    Box::new(StubCog {
        name,
        commands: &[],
        fail: true,
    })
}

#[test]
fn one_bad_unit_never_blocks_the_others() {
    let mut registry = ExtensionRegistry::new(vec![
        stub("alpha", &["a"]),
        broken("broken"),
        stub("gamma", &["g"]),
    ]);
    registry.load_all();

    let states = registry.unit_states();
    assert_eq!(states.len(), 3);
    for (name, state, last_error) in states {
        if name == "broken" {
            assert_eq!(state, LoadState::Failed);
            assert!(last_error.unwrap().contains("deliberately broken"));
        } else {
            assert_eq!(state, LoadState::Loaded);
            assert!(last_error.is_none());
        }
    }
    assert!(registry.command("a").is_some());
    assert!(registry.command("g").is_some());
}

#[test]
fn unit_scan_order_is_lexical() {
    let mut registry = ExtensionRegistry::new(vec![
        stub("zeta", &["z"]),
        stub("alpha", &["a"]),
        stub("midway", &["m"]),
    ]);
    registry.load_all();

    let order: Vec<&str> = registry
        .unit_states()
        .iter()
        .map(|(name, _, _)| *name)
        .collect();
    assert_eq!(order, ["alpha", "midway", "zeta"]);
}

#[test]
fn duplicate_command_names_fail_the_later_unit() {
    let mut registry = ExtensionRegistry::new(vec![
        stub("alpha", &["ping"]),
        stub("beta", &["ping", "pong"]),
    ]);
    registry.load_all();

    let states = registry.unit_states();
    assert_eq!(states[0].0, "alpha");
    assert_eq!(states[0].1, LoadState::Loaded);
    assert_eq!(states[1].0, "beta");
    assert_eq!(states[1].1, LoadState::Failed);
    assert!(states[1].2.unwrap().contains("already registered"));

    // The failing unit installs nothing, not even its non-colliding names.
    assert!(registry.command("ping").is_some());
    assert!(registry.command("pong").is_none());
}

#[test]
fn duplicate_unit_names_keep_only_the_first() {
    let mut registry =
        ExtensionRegistry::new(vec![stub("alpha", &["one"]), stub("alpha", &["two"])]);
    registry.load_all();

    assert_eq!(registry.unit_states().len(), 1);
    assert!(registry.command("one").is_some());
    assert!(registry.command("two").is_none());
}

#[test]
fn unload_then_reload_round_trip() {
    let mut registry = ExtensionRegistry::new(vec![stub("alpha", &["a"])]);
    registry.load_all();

    registry.unload("alpha").unwrap();
    assert!(registry.command("a").is_none());
    assert_eq!(registry.unit_states()[0].1, LoadState::Unloaded);

    // A second unload has nothing to act on.
    assert!(registry.unload("alpha").is_err());

    registry.load("alpha").unwrap();
    assert!(registry.command("a").is_some());

    registry.reload("alpha").unwrap();
    assert!(registry.command("a").is_some());

    assert!(registry.load("alpha").is_err());
    assert!(registry.load("nonsense").is_err());
    assert!(registry.unload("nonsense").is_err());
}

#[test]
fn failed_unit_can_be_retried_with_load() {
    let mut registry =
        ExtensionRegistry::new(vec![stub("alpha", &["ping"]), stub("beta", &["ping"])]);
    registry.load_all();
    assert_eq!(registry.unit_states()[1].1, LoadState::Failed);

    // Once the colliding name is gone the retry goes through.
    registry.unload("alpha").unwrap();
    registry.load("beta").unwrap();
    assert_eq!(registry.unit_states()[1].1, LoadState::Loaded);
    assert!(registry.command("ping").is_some());
}
