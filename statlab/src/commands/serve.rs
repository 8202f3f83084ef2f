// statlab/src/commands/serve.rs
//! The `serve` command: bind, print the banner, run until Ctrl-C.

use anyhow::{Context, Result};
use log::{info, warn};
use tokio::net::TcpListener;

use statlab_core::SessionMode;

use crate::cli::ServeCommand;
use crate::server::{router, AppState};
use crate::ui::output;

use super::resolve_config;

/// Runs the web server until interrupted.
pub async fn run_serve(cmd: ServeCommand) -> Result<()> {
    let config = resolve_config(cmd.settings.config.as_deref(), cmd.overrides())?;
    let bind = config.bind_address();

    let listener = TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    let addr = listener.local_addr().context("Failed to read the bound address")?;

    output::print_banner(addr, &config);
    if config.session.mode == SessionMode::Shared {
        output::warn_msg("Shared sessions: every browser edits the same tables.");
    }
    info!("Serving on {} with {} sessions", addr, config.session.mode);

    let app = router(AppState::new(config));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
