use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, PoisonError, RwLock};

/// The severity of a hazard alert, in increasing order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    #[default]
    None,
    Warning,
    Danger,
    Death,
}

/// The current alert, as shown to the driver.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertState {
    pub level: AlertLevel,
    pub message: String,
}

impl AlertState {
    /// Creates an alert state.
    pub fn new(level: AlertLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlertLevel::None => "none",
            AlertLevel::Warning => "warning",
            AlertLevel::Danger => "danger",
            AlertLevel::Death => "death",
        };
        f.write_str(name)
    }
}

/// Receives alerts raised by the horizon monitor, e.g. to update a label or play a prompt.
///
/// Notification is fire-and-forget: implementations must not block.
pub trait AlertSink {
    fn notify(&mut self, level: AlertLevel, message: &str);
}

/// Controls active guidance.
pub trait NavigationControl {
    /// Halts active guidance.
    fn stop(&mut self);
}

impl<T: AlertSink + ?Sized> AlertSink for &mut T {
    fn notify(&mut self, level: AlertLevel, message: &str) {
        (**self).notify(level, message)
    }
}

impl<T: NavigationControl + ?Sized> NavigationControl for &mut T {
    fn stop(&mut self) {
        (**self).stop()
    }
}

/// Records every alert in order.
impl AlertSink for Vec<AlertState> {
    fn notify(&mut self, level: AlertLevel, message: &str) {
        self.push(AlertState::new(level, message));
    }
}

/// Forwards alerts to another thread. A disconnected receiver is ignored.
impl AlertSink for Sender<AlertState> {
    fn notify(&mut self, level: AlertLevel, message: &str) {
        let _ = self.send(AlertState::new(level, message));
    }
}

/// An alert state cell with a single writer and any number of readers,
/// which may live on other threads.
#[derive(Clone, Debug, Default)]
pub struct SharedAlertState(Arc<RwLock<AlertState>>);

impl SharedAlertState {
    /// Creates a cell holding [AlertLevel::None].
    pub fn new() -> Self {
        Default::default()
    }

    /// Gets a copy of the latest alert.
    pub fn snapshot(&self) -> AlertState {
        self.0.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Gets the latest alert level.
    pub fn level(&self) -> AlertLevel {
        self.0.read().unwrap_or_else(PoisonError::into_inner).level
    }
}

impl AlertSink for SharedAlertState {
    fn notify(&mut self, level: AlertLevel, message: &str) {
        let mut state = self.0.write().unwrap_or_else(PoisonError::into_inner);
        state.level = level;
        state.message.clear();
        state.message.push_str(message);
    }
}

/// A [NavigationControl] which records stop requests,
/// for the owner of the guidance session to poll.
#[derive(Clone, Debug, Default)]
pub struct StopFlag {
    stopped: Arc<AtomicBool>,
    count: Arc<AtomicUsize>,
}

impl StopFlag {
    /// Creates a flag which has not been stopped.
    pub fn new() -> Self {
        Default::default()
    }

    /// Whether guidance has been stopped.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// The number of times `stop` was called.
    pub fn stop_count(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }
}

impl NavigationControl for StopFlag {
    fn stop(&mut self) {
        self.count.fetch_add(1, Ordering::AcqRel);
        self.stopped.store(true, Ordering::Release);
    }
}
