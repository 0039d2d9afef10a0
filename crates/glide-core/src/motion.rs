//! Process-wide reduced-motion preference
//!
//! The preference is read once from the platform at startup and afterwards
//! changes only through [`MotionPreference::platform_changed`], the single
//! platform listener. Components receive a clone of the handle instead of
//! reading a global, so tests can inject either state.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;
use tracing::{debug, info};

use crate::config::MotionConfig;

/// Platform capability that reports the user's reduced-motion setting
pub trait MotionQuery {
    /// `None` when the platform cannot report the preference
    fn prefers_reduced_motion(&self) -> Option<bool>;
}

impl<F> MotionQuery for F
where
    F: Fn() -> Option<bool>,
{
    fn prefers_reduced_motion(&self) -> Option<bool> {
        self()
    }
}

/// Reads the preference from an environment variable ("1"/"true"/"reduce")
#[derive(Debug, Clone)]
pub struct EnvMotionQuery {
    var: String,
}

impl EnvMotionQuery {
    pub const DEFAULT_VAR: &'static str = "GLIDE_REDUCED_MOTION";

    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvMotionQuery {
    fn default() -> Self {
        Self::new(Self::DEFAULT_VAR)
    }
}

impl MotionQuery for EnvMotionQuery {
    fn prefers_reduced_motion(&self) -> Option<bool> {
        let value = std::env::var(&self.var).ok()?;
        match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "reduce" => Some(true),
            "0" | "false" | "no" | "no-preference" => Some(false),
            _ => None,
        }
    }
}

/// Identifies a change callback registered with [`MotionPreference::on_change`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type ChangeCallback = Arc<dyn Fn(bool) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, ChangeCallback)>,
}

struct Inner {
    state: watch::Sender<bool>,
    listeners: Mutex<Listeners>,
    attached: AtomicBool,
}

/// Shared handle to the reduced-motion flag
#[derive(Clone)]
pub struct MotionPreference {
    inner: Arc<Inner>,
}

impl MotionPreference {
    /// Create a preference with a fixed initial value
    pub fn new(reduced: bool) -> Self {
        let (state, _) = watch::channel(reduced);
        Self {
            inner: Arc::new(Inner {
                state,
                listeners: Mutex::new(Listeners::default()),
                attached: AtomicBool::new(true),
            }),
        }
    }

    /// Query the platform once; motion stays enabled if it cannot answer
    pub fn from_platform(query: &dyn MotionQuery) -> Self {
        let reduced = match query.prefers_reduced_motion() {
            Some(reduced) => reduced,
            None => {
                debug!("Platform did not report a motion preference, enabling motion");
                false
            }
        };
        Self::new(reduced)
    }

    /// Resolve the initial value from config, consulting the platform only
    /// when no override is set
    pub fn from_config(config: &MotionConfig, query: &dyn MotionQuery) -> Self {
        match config.force_reduced {
            Some(reduced) => {
                info!("Reduced motion forced by configuration: {}", reduced);
                Self::new(reduced)
            }
            None => Self::from_platform(query),
        }
    }

    #[inline]
    pub fn is_reduced(&self) -> bool {
        *self.inner.state.borrow()
    }

    /// Receiver that observes every future change
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.inner.state.subscribe()
    }

    /// Register a callback invoked with the new value on every change
    pub fn on_change<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        let mut listeners = self.listeners();
        let id = ListenerId(listeners.next_id);
        listeners.next_id += 1;
        if !self.is_attached() {
            debug!("Motion preference detached, listener {:?} will never fire", id);
            return id;
        }
        listeners.entries.push((id, Arc::new(callback)));
        id
    }

    /// Remove a single callback; unknown ids are ignored
    pub fn remove_listener(&self, id: ListenerId) {
        self.listeners().entries.retain(|(entry, _)| *entry != id);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners().entries.len()
    }

    /// Platform change notification
    ///
    /// Subscribers and callbacks are only notified when the value differs
    /// from the current one. Ignored after [`teardown`](Self::teardown).
    pub fn platform_changed(&self, reduced: bool) {
        if !self.is_attached() {
            debug!("Ignoring motion preference change after teardown");
            return;
        }

        let changed = self.inner.state.send_if_modified(|current| {
            if *current == reduced {
                false
            } else {
                *current = reduced;
                true
            }
        });
        if !changed {
            return;
        }

        info!("Reduced motion preference changed: {}", reduced);

        // Callbacks run without the lock held so they may register or
        // remove listeners themselves.
        let callbacks: Vec<ChangeCallback> = self
            .listeners()
            .entries
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        for callback in callbacks {
            callback(reduced);
        }
    }

    #[inline]
    pub fn is_attached(&self) -> bool {
        self.inner.attached.load(Ordering::Acquire)
    }

    /// Detach from the platform and drop every listener
    pub fn teardown(&self) {
        if self.inner.attached.swap(false, Ordering::AcqRel) {
            self.listeners().entries.clear();
            debug!("Motion preference detached from platform");
        }
    }

    fn listeners(&self) -> MutexGuard<'_, Listeners> {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MotionPreference {
    fn default() -> Self {
        Self::new(false)
    }
}

impl fmt::Debug for MotionPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MotionPreference")
            .field("reduced", &self.is_reduced())
            .field("attached", &self.is_attached())
            .field("listeners", &self.listener_count())
            .finish()
    }
}
