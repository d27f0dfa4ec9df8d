//! Reload signaling for script hot-swap.

use std::sync::Arc;

use crate::engine::ScriptEngine;

/// Spawn a SIGUSR2 handler that runs the full reload sequence on each
/// signal.
///
/// Must be called from within a tokio runtime. The handler stops once the
/// engine has been dropped.
#[cfg(unix)]
pub fn setup_reload_signal_handler(engine: &Arc<ScriptEngine>) {
    use tracing::{error, info};

    let engine = Arc::downgrade(engine);
    tokio::spawn(async move {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigusr2 = match signal(SignalKind::user_defined2()) {
            Ok(signal) => signal,
            Err(err) => {
                error!(target: "scripting", "Failed to register SIGUSR2 handler: {err}");
                return;
            }
        };

        loop {
            if sigusr2.recv().await.is_none() {
                break;
            }
            let Some(engine) = engine.upgrade() else {
                info!(target: "scripting", "Engine dropped, stopping SIGUSR2 handler");
                break;
            };
            info!(target: "scripting", "Received SIGUSR2, reloading scripts");
            match tokio::task::spawn_blocking(move || engine.reload_scripts()).await {
                Ok(Ok(count)) => {
                    info!(target: "scripting", "Reloaded {count} script(s)");
                }
                Ok(Err(err)) => {
                    error!(target: "scripting", "Script reload failed: {err}");
                }
                Err(err) => {
                    error!(target: "scripting", "Script reload task failed: {err}");
                }
            }
        }
    });
}

/// SIGUSR2 is unavailable off Unix; reloads still work through
/// [`ScriptEngine::reload_scripts`].
#[cfg(not(unix))]
pub fn setup_reload_signal_handler(_engine: &Arc<ScriptEngine>) {
    tracing::warn!(target: "scripting", "SIGUSR2 reload is not supported on this platform");
}
