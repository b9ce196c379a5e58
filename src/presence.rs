use rand::seq::SliceRandom;
use serenity::all::ActivityData;
use std::time::Duration;

pub const STATUSES: [&str; 3] = ["with you!", "with cogs!", "with humans!"];

const ROTATION_INTERVAL: Duration = Duration::from_secs(60);

pub fn pick_status() -> &'static str {
    let mut rng = rand::thread_rng();
    STATUSES.choose(&mut rng).copied().unwrap_or(STATUSES[0])
}

/// Rotate the displayed activity once a minute, chosen uniformly at random.
/// Runs for the rest of the process lifetime.
pub fn spawn_rotation(ctx: serenity::all::Context) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(ROTATION_INTERVAL);
        loop {
            interval.tick().await;
            ctx.set_activity(Some(ActivityData::playing(pick_status())));
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_only_uses_known_statuses() {
        for _ in 0..50 {
            assert!(STATUSES.contains(&pick_status()));
        }
    }
}
