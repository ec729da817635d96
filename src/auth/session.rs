//! Current session and change notifications
//!
//! Shared by the auth facade (which publishes sign-in results) and the REST
//! document store (which reads the ID token).

use crate::auth::types::User;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::mpsc;

/// Receiving end of a session subscription
///
/// Unbounded, so a slow subscriber never misses a change.
pub type SessionReceiver = mpsc::UnboundedReceiver<Option<Arc<User>>>;

/// Session state of one `App`
#[derive(Clone)]
pub struct SessionState {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    slot: RwLock<SessionSlot>,
}

#[derive(Default)]
struct SessionSlot {
    current: Option<Arc<User>>,
    subscribers: Vec<mpsc::UnboundedSender<Option<Arc<User>>>>,
}

impl SessionState {
    /// No user signed in
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SessionInner {
                slot: RwLock::new(SessionSlot::default()),
            }),
        }
    }

    /// Snapshot of the current session
    pub fn current(&self) -> Option<Arc<User>> {
        self.inner
            .slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .current
            .clone()
    }

    /// Replace the current session and notify subscribers
    ///
    /// Subscribers whose receiver was dropped are forgotten.
    pub(crate) fn publish(&self, user: Option<Arc<User>>) {
        let mut slot = self
            .inner
            .slot
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        slot.current = user.clone();

        // Sent under the write lock so `subscribe` never sees a change twice
        slot.subscribers.retain(|tx| tx.send(user.clone()).is_ok());
    }

    /// Current session plus a receiver for every later change
    ///
    /// The receiver ends once every handle to this session is dropped.
    pub fn subscribe(&self) -> (Option<Arc<User>>, SessionReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut slot = self
            .inner
            .slot
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        slot.subscribers.push(tx);
        (slot.current.clone(), rx)
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .subscribers
            .iter()
            .filter(|tx| !tx.is_closed())
            .count()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState")
            .field("uid", &self.current().map(|u| u.uid.clone()))
            .finish()
    }
}
