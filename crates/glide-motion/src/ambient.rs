//! Drifting background gradient
//!
//! A phase accumulator advanced by a fixed step per tick drives two
//! gradient anchors along slow Lissajous paths. The animator watches the
//! reduced-motion flag on every tick and freezes while it is set.

use std::time::Instant;

use glide_core::{AmbientConfig, MotionPreference};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::driver::{AnimationDriver, DriverState};

/// Gradient centre in percent of the viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradientAnchor {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AmbientFrame {
    pub primary: GradientAnchor,
    pub secondary: GradientAnchor,
    pub phase: f64,
}

impl AmbientFrame {
    pub fn at_phase(phase: f64) -> Self {
        Self {
            primary: GradientAnchor {
                x: 30.0 + phase.sin() * 15.0,
                y: 20.0 + (phase * 0.7).cos() * 10.0,
            },
            secondary: GradientAnchor {
                x: 70.0 + (phase * 0.5).cos() * 20.0,
                y: 80.0 + (phase * 0.8).sin() * 15.0,
            },
            phase,
        }
    }
}

#[derive(Debug)]
pub struct AmbientAnimator {
    config: AmbientConfig,
    reduced: watch::Receiver<bool>,
    state: DriverState,
    phase: f64,
}

impl AmbientAnimator {
    pub fn new(config: AmbientConfig, motion: &MotionPreference) -> Self {
        Self {
            config,
            reduced: motion.subscribe(),
            state: DriverState::Idle,
            phase: 0.0,
        }
    }

    pub fn start(&mut self) {
        if self.state != DriverState::Idle {
            return;
        }
        if !self.config.enabled {
            info!("Ambient background disabled by configuration");
            self.state = DriverState::Stopped;
            return;
        }
        self.state = if *self.reduced.borrow_and_update() {
            info!("Reduced motion preferred, ambient background suspended");
            DriverState::Suspended
        } else {
            DriverState::Running
        };
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Current anchors; `None` whenever nothing should be drawn
    pub fn frame(&self) -> Option<AmbientFrame> {
        self.state
            .is_running()
            .then(|| AmbientFrame::at_phase(self.phase))
    }

    fn apply_preference(&mut self) {
        if !matches!(self.reduced.has_changed(), Ok(true)) {
            return;
        }
        let reduced = *self.reduced.borrow_and_update();
        match (self.state, reduced) {
            (DriverState::Running, true) => {
                debug!("Ambient background suspended at phase {:.5}", self.phase);
                self.state = DriverState::Suspended;
            }
            (DriverState::Suspended, false) => {
                debug!("Ambient background resumed at phase {:.5}", self.phase);
                self.state = DriverState::Running;
            }
            _ => {}
        }
    }
}

impl AnimationDriver for AmbientAnimator {
    fn name(&self) -> &'static str {
        "ambient"
    }

    fn is_running(&self) -> bool {
        matches!(self.state, DriverState::Running | DriverState::Suspended)
    }

    fn tick(&mut self, _now: Instant) {
        self.apply_preference();
        if self.state.is_running() {
            self.phase += self.config.phase_step;
        }
    }

    fn stop(&mut self, _now: Instant) {
        if self.state.is_stopped() {
            return;
        }
        self.state = DriverState::Stopped;
        debug!("Ambient background stopped");
    }
}
