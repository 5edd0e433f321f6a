//! Auto-expiring user-facing notifications.
//!
//! Every notification is removed by a timer after the configured TTL unless
//! it was dismissed first. Timer expiry and manual dismissal may race;
//! removal by id is idempotent so either order leaves the same list.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;

use storeloom_core::{NotificationId, NotificationKind};

/// Default time a notification stays visible.
pub const DEFAULT_TTL: Duration = Duration::from_millis(3000);

/// A message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub kind: NotificationKind,
}

#[derive(Default)]
struct State {
    entries: Vec<Notification>,
    timers: HashMap<NotificationId, AbortHandle>,
}

struct Inner {
    state: Mutex<State>,
    ttl: Duration,
    runtime: Handle,
}

/// Shared notification list with scheduled expiry.
///
/// Cheap to clone; clones share the same list.
#[derive(Clone)]
pub struct NotificationCenter {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for NotificationCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationCenter")
            .field("ttl", &self.inner.ttl)
            .field("pending", &self.lock().entries.len())
            .finish_non_exhaustive()
    }
}

impl NotificationCenter {
    /// Create a center whose expiry timers run on `runtime`.
    #[must_use]
    pub fn new(runtime: Handle, ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State::default()),
                ttl,
                runtime,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a notification and schedule its removal.
    pub fn notify(&self, message: impl Into<String>, kind: NotificationKind) -> NotificationId {
        let message = message.into();
        let id = NotificationId::new(uuid::Uuid::new_v4().simple().to_string());

        match kind {
            NotificationKind::Error => tracing::warn!(notification_id = %id, "{message}"),
            NotificationKind::Success | NotificationKind::Info => {
                tracing::info!(notification_id = %id, "{message}");
            }
        }

        let mut state = self.lock();
        state.entries.push(Notification {
            id: id.clone(),
            message,
            kind,
        });

        // Registered under the lock so a fired timer always finds its handle
        // entry, or none if dismissed first.
        let center = self.clone();
        let expiring = id.clone();
        let ttl = self.inner.ttl;
        let task = self.inner.runtime.spawn(async move {
            tokio::time::sleep(ttl).await;
            center.expire(&expiring);
        });
        state.timers.insert(id.clone(), task.abort_handle());

        id
    }

    /// Shorthand for a success notification.
    pub fn success(&self, message: impl Into<String>) -> NotificationId {
        self.notify(message, NotificationKind::Success)
    }

    /// Shorthand for an error notification.
    pub fn error(&self, message: impl Into<String>) -> NotificationId {
        self.notify(message, NotificationKind::Error)
    }

    /// Shorthand for an info notification.
    pub fn info(&self, message: impl Into<String>) -> NotificationId {
        self.notify(message, NotificationKind::Info)
    }

    /// Remove a notification. Unknown ids are ignored.
    pub fn dismiss(&self, id: &NotificationId) {
        let mut state = self.lock();
        state.entries.retain(|n| &n.id != id);
        if let Some(timer) = state.timers.remove(id) {
            timer.abort();
        }
    }

    /// Timer-driven removal; the timer's own handle is dropped, not aborted.
    fn expire(&self, id: &NotificationId) {
        let mut state = self.lock();
        state.entries.retain(|n| &n.id != id);
        state.timers.remove(id);
    }

    /// Current notifications in the order they were raised.
    #[must_use]
    pub fn list(&self) -> Vec<Notification> {
        self.lock().entries.clone()
    }

    /// Messages of the current notifications of one kind.
    #[must_use]
    pub fn messages(&self, kind: NotificationKind) -> Vec<String> {
        self.lock()
            .entries
            .iter()
            .filter(|n| n.kind == kind)
            .map(|n| n.message.clone())
            .collect()
    }

    /// Number of visible notifications.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }
}
