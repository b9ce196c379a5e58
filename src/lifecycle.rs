use anyhow::Result;
use serenity::http::HttpError;
use serenity::Client;

/// What to do after the gateway loop exits with an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitAction {
    /// Rate-limited by the platform. Rate-limit state can be entangled with
    /// the connection's internal state, so only a fresh process guarantees a
    /// clean slate.
    Restart,
    /// Anything else is fatal.
    Fail,
}

/// Classify a gateway error. Only the platform's rate-limit signal warrants
/// the restart path.
pub fn exit_action(err: &serenity::Error) -> ExitAction {
    match err {
        serenity::Error::Http(HttpError::UnsuccessfulRequest(response))
            if response.status_code.as_u16() == 429 =>
        {
            ExitAction::Restart
        }
        serenity::Error::Http(HttpError::RateLimitI64F64 | HttpError::RateLimitUtf8) => {
            ExitAction::Restart
        }
        _ => ExitAction::Fail,
    }
}

/// Spawn a fresh instance of this executable. The caller exits right after,
/// so the replacement never coexists with a live gateway connection.
pub fn restart() -> Result<()> {
    let exe = std::env::current_exe()?;
    std::process::Command::new(exe).spawn()?;
    Ok(())
}

/// Drive the gateway until it stops, applying the crash/restart policy.
pub async fn run(mut client: Client) -> Result<()> {
    if let Err(err) = client.start().await {
        match exit_action(&err) {
            ExitAction::Restart => {
                eprintln!("\n\n\nBLOCKED BY RATE LIMITS\nRESTARTING NOW\n\n\n");
                restart()?;
                std::process::exit(1);
            }
            ExitAction::Fail => return Err(err.into()),
        }
    }
    Ok(())
}
