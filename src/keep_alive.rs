use anyhow::Result;
use axum::{routing::get, Router};
use tokio::net::TcpListener;

const BIND_ADDR: &str = "0.0.0.0:8080";

async fn alive() -> &'static str {
    "Bot is alive!"
}

/// Liveness endpoint for external uptime monitors. Binding happens before
/// this returns, so a taken port fails startup; serving then runs for the
/// rest of the process lifetime.
pub async fn spawn() -> Result<()> {
    let app = Router::new().route("/", get(alive));
    let listener = TcpListener::bind(BIND_ADDR).await?;
    tracing::info!("Keep-alive endpoint listening on {BIND_ADDR}");

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Keep-alive endpoint failed: {e}");
        }
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn liveness_reply_is_fixed() {
        assert_eq!(alive().await, "Bot is alive!");
    }
}
