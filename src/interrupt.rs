//! Process-wide Ctrl-C handling.
//!
//! One listener is installed at startup and lives for the whole process. Each
//! statement arms a fresh [`CancellationToken`]; an interrupt cancels only the
//! most recently armed token.

use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Routes Ctrl-C to the statement currently running.
pub struct Interrupts {
    armed: Arc<Mutex<CancellationToken>>,
    listener: Option<JoinHandle<()>>,
}

impl Interrupts {
    /// Installs the SIGINT listener. Must be called inside the runtime.
    pub fn install() -> Self {
        let mut interrupts = Self::detached();
        let armed = interrupts.armed.clone();
        interrupts.listener = Some(tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                debug!("Interrupt received");
                cancel_armed(&armed);
            }
        }));
        interrupts
    }

    /// Interrupt routing without a signal listener; [`Self::trigger`] is the
    /// only way to fire it.
    pub fn detached() -> Self {
        Self {
            armed: Arc::new(Mutex::new(CancellationToken::new())),
            listener: None,
        }
    }

    /// Returns a fresh token that the next interrupt cancels.
    pub fn arm(&self) -> CancellationToken {
        let token = CancellationToken::new();
        if let Ok(mut armed) = self.armed.lock() {
            *armed = token.clone();
        }
        token
    }

    /// Cancels the armed token, as a Ctrl-C does.
    pub fn trigger(&self) {
        cancel_armed(&self.armed);
    }
}

impl Drop for Interrupts {
    fn drop(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }
    }
}

fn cancel_armed(armed: &Mutex<CancellationToken>) {
    if let Ok(token) = armed.lock() {
        token.cancel();
    }
}
