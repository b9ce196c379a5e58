use serenity::all::UserId;
use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

/// Per-user, per-command invocation timestamps. Lost across restarts.
pub struct Cooldowns(HashMap<(UserId, &'static str), Instant>);

impl Cooldowns {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Check whether `user` may run `command` at `now` and, if so, record the
    /// invocation. Returns the remaining wait when the window has not elapsed.
    /// A refused invocation does not extend the window.
    pub fn check(
        &mut self,
        user: UserId,
        command: &'static str,
        window: Duration,
        now: Instant,
    ) -> Result<(), Duration> {
        match self.0.get(&(user, command)) {
            Some(last) if now.duration_since(*last) < window => {
                Err(window - now.duration_since(*last))
            }
            _ => {
                self.0.insert((user, command), now);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(60);

    #[test]
    fn first_invocation_passes() {
        let mut cooldowns = Cooldowns::new();
        assert!(cooldowns
            .check(UserId::new(1), "randomfact", WINDOW, Instant::now())
            .is_ok());
    }

    #[test]
    fn invocation_within_window_reports_remaining_time() {
        let mut cooldowns = Cooldowns::new();
        let t0 = Instant::now();

        assert!(cooldowns.check(UserId::new(1), "randomfact", WINDOW, t0).is_ok());
        let remaining = cooldowns
            .check(UserId::new(1), "randomfact", WINDOW, t0 + Duration::from_secs(10))
            .unwrap_err();
        assert_eq!(remaining, Duration::from_secs(50));
    }

    #[test]
    fn refusal_does_not_extend_the_window() {
        let mut cooldowns = Cooldowns::new();
        let t0 = Instant::now();

        assert!(cooldowns.check(UserId::new(1), "randomfact", WINDOW, t0).is_ok());
        let _ = cooldowns.check(UserId::new(1), "randomfact", WINDOW, t0 + Duration::from_secs(30));
        // still measured from t0, so the full window has elapsed here
        assert!(cooldowns
            .check(UserId::new(1), "randomfact", WINDOW, t0 + WINDOW)
            .is_ok());
    }

    #[test]
    fn users_and_commands_have_independent_windows() {
        let mut cooldowns = Cooldowns::new();
        let t0 = Instant::now();

        assert!(cooldowns.check(UserId::new(1), "randomfact", WINDOW, t0).is_ok());
        assert!(cooldowns.check(UserId::new(2), "randomfact", WINDOW, t0).is_ok());
        assert!(cooldowns.check(UserId::new(1), "coinflip", WINDOW, t0).is_ok());
        assert!(cooldowns
            .check(UserId::new(1), "randomfact", WINDOW, t0)
            .is_err());
    }
}
