//! Change events and the observer channel.
//!
//! Editors with logging enabled report every mutating call, and the workspace reports saves and
//! closes, as a [`WorkspaceEvent`]. Events are delivered synchronously, in registration order, to
//! every [`Observer`] registered on the workspace's [`Notifier`].
//!
//! Any `Fn(&WorkspaceEvent) + Send + Sync` closure is an observer:
//!
//! ```rust
//! use lined_core::{EventKind, Notifier, Observer, WorkspaceEvent};
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let count = Arc::new(AtomicUsize::new(0));
//! let seen = count.clone();
//! let observer: Arc<dyn Observer> = Arc::new(move |_: &WorkspaceEvent| {
//!     seen.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! let notifier = Notifier::new();
//! notifier.register(observer);
//! notifier.notify(&WorkspaceEvent::new("files/a.txt", EventKind::Save, "Save files/a.txt"));
//! assert_eq!(count.load(Ordering::SeqCst), 1);
//! ```

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Kind of change carried by a [`WorkspaceEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// A line was appended.
    Append,
    /// Text was inserted.
    Insert,
    /// Text was deleted.
    Delete,
    /// Text was replaced.
    Replace,
    /// The file was written to disk.
    Save,
    /// The file was closed.
    Close,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::Append => "Append",
            EventKind::Insert => "Insert",
            EventKind::Delete => "Delete",
            EventKind::Replace => "Replace",
            EventKind::Save => "Save",
            EventKind::Close => "Close",
        };
        f.write_str(name)
    }
}

/// A structured change notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceEvent {
    /// File the event originates from.
    pub file_path: PathBuf,
    /// Event kind.
    pub kind: EventKind,
    /// Human-readable reconstruction of the originating call (e.g. `Delete 1,2,3`).
    pub command: String,
    /// Call arguments; `Value::Null` when there are none.
    pub data: Value,
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: i64,
}

impl WorkspaceEvent {
    /// Create an event stamped with the current time and no payload.
    pub fn new(file_path: impl Into<PathBuf>, kind: EventKind, command: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            kind,
            command: command.into(),
            data: Value::Null,
            timestamp_ms: now_millis(),
        }
    }

    /// Attach a payload.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }
}

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// A listener for [`WorkspaceEvent`]s.
pub trait Observer: Send + Sync {
    /// Handle one event. Runs synchronously on the caller's thread.
    fn update(&self, event: &WorkspaceEvent);
}

impl<F> Observer for F
where
    F: Fn(&WorkspaceEvent) + Send + Sync,
{
    fn update(&self, event: &WorkspaceEvent) {
        self(event)
    }
}

/// Shared handle to an ordered observer list.
///
/// The workspace owns one `Notifier` and hands clones to the editors it creates, so an editor can
/// broadcast without holding a reference back to the workspace. Clones share the same list.
#[derive(Clone, Default)]
pub struct Notifier {
    observers: Arc<RwLock<Vec<Arc<dyn Observer>>>>,
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("observer_count", &self.len())
            .finish()
    }
}

fn same_observer(a: &Arc<dyn Observer>, b: &Arc<dyn Observer>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

impl Notifier {
    /// Create a notifier with no observers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer at the end of the list.
    ///
    /// Returns `false` (and changes nothing) if this exact observer is already registered.
    pub fn register(&self, observer: Arc<dyn Observer>) -> bool {
        let mut observers = self.observers.write();
        if observers.iter().any(|o| same_observer(o, &observer)) {
            return false;
        }
        observers.push(observer);
        true
    }

    /// Remove an observer by identity. Returns whether it was registered.
    pub fn remove(&self, observer: &Arc<dyn Observer>) -> bool {
        let mut observers = self.observers.write();
        match observers.iter().position(|o| same_observer(o, observer)) {
            Some(idx) => {
                observers.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Deliver `event` to every observer, in registration order.
    pub fn notify(&self, event: &WorkspaceEvent) {
        // Snapshot so observers may (un)register from inside `update`.
        let observers: Vec<Arc<dyn Observer>> = self.observers.read().clone();
        tracing::debug!(
            kind = %event.kind,
            path = %event.file_path.display(),
            observers = observers.len(),
            "dispatching workspace event"
        );
        for observer in observers {
            observer.update(event);
        }
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        self.observers.read().len()
    }

    /// Returns `true` if no observer is registered.
    pub fn is_empty(&self) -> bool {
        self.observers.read().is_empty()
    }
}

/// An observer that keeps every event in memory.
#[derive(Debug, Default)]
pub struct EventRecorder {
    events: Mutex<Vec<WorkspaceEvent>>,
}

impl EventRecorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the recorded events, oldest first.
    pub fn events(&self) -> Vec<WorkspaceEvent> {
        self.events.lock().clone()
    }

    /// Drain the recorded events.
    pub fn take(&self) -> Vec<WorkspaceEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl Observer for EventRecorder {
    fn update(&self, event: &WorkspaceEvent) {
        self.events.lock().push(event.clone());
    }
}
