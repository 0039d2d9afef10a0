//! Lifecycle shared by every animation loop

use std::time::Instant;

use serde::Serialize;

/// Coarse lifecycle of a tick loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverState {
    /// Never started, or refused to start
    #[default]
    Idle,
    Running,
    /// Paused by the reduced-motion gate; may resume
    Suspended,
    /// Torn down; final
    Stopped,
}

impl DriverState {
    #[inline]
    pub fn is_running(self) -> bool {
        self == DriverState::Running
    }

    #[inline]
    pub fn is_stopped(self) -> bool {
        self == DriverState::Stopped
    }
}

/// One independently scheduled animation loop
///
/// Drivers never block: `tick` does a bounded amount of work and returns.
/// `stop` must be safe to call any number of times.
pub trait AnimationDriver {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Whether the loop currently needs frames
    fn is_running(&self) -> bool;

    /// Advance one frame
    fn tick(&mut self, now: Instant);

    /// Stop the loop and release everything it holds
    fn stop(&mut self, now: Instant);
}
