//! Readiness flag
//!
//! The flag flips once, after a fixed delay, independently of whether the
//! platform is actually reachable. It is a stand-in for a "connection
//! established" signal and can report readiness too early (backend still
//! unreachable) or too late (backend usable before the delay elapses).
//! Nothing else in the crate is gated on it.

use std::time::Duration;
use tokio::sync::watch;

/// Delay after initialization before `is_ready()` reports true
pub const READY_DELAY: Duration = Duration::from_millis(500);

/// Process-wide readiness flag shared by the services of one `App`
#[derive(Clone, Debug)]
pub struct Readiness {
    rx: watch::Receiver<bool>,
}

impl Readiness {
    /// Start a one-shot timer that marks the flag ready after `delay`
    ///
    /// Must be called from within a tokio runtime.
    pub fn after(delay: Duration) -> Self {
        let (tx, rx) = watch::channel(false);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tracing::debug!(delay_ms = delay.as_millis() as u64, "platform marked ready");
            // Keep the sender alive until the flag is set
            let _ = tx.send(true);
        });
        Self { rx }
    }

    /// A flag that is already set
    pub fn ready() -> Self {
        let (_tx, rx) = watch::channel(true);
        Self { rx }
    }

    /// Current value of the flag
    pub fn is_ready(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait until the flag is set
    pub async fn wait(&self) {
        let mut rx = self.rx.clone();
        // Err means the timer task is gone; the last value stays observable
        let _ = rx.wait_for(|ready| *ready).await;
    }
}
