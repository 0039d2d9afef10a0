//! Short loading indicator shown after each content swap

use std::time::{Duration, Instant};

use glide_core::MotionPreference;

use crate::driver::AnimationDriver;

#[derive(Debug)]
pub struct PageLoader {
    duration: Duration,
    motion: MotionPreference,
    visible_until: Option<Instant>,
}

impl PageLoader {
    pub fn new(duration: Duration, motion: MotionPreference) -> Self {
        Self {
            duration,
            motion,
            visible_until: None,
        }
    }

    /// Restart the indicator; a later swap replaces the earlier timer
    pub fn show(&mut self, now: Instant) {
        if self.motion.is_reduced() || self.duration.is_zero() {
            self.visible_until = None;
            return;
        }
        self.visible_until = Some(now + self.duration);
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        self.visible_until.is_some_and(|until| now < until)
    }
}

impl AnimationDriver for PageLoader {
    fn name(&self) -> &'static str {
        "loader"
    }

    fn is_running(&self) -> bool {
        self.visible_until.is_some()
    }

    fn tick(&mut self, now: Instant) {
        if !self.is_visible(now) {
            self.visible_until = None;
        }
    }

    fn stop(&mut self, _now: Instant) {
        self.visible_until = None;
    }
}
