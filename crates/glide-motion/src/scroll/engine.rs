//! L3 Molecular Layer: Inertial scroll engine
//!
//! Combines easing functions and timing utilities into a scroll model that
//! replaces native scroll physics. Input deltas are batched per frame and
//! every tween starts from the live position, carrying the live velocity.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use glide_core::MotionPreference;
use serde::Serialize;
use tracing::{debug, info};

use super::config::{ScrollConfig, ScrollConfigExt};
use super::easing::{EasingType, EasingTypeExt};
use super::timing::{elapsed, is_complete, lerp, progress};
use crate::driver::{AnimationDriver, DriverState};

/// Scroll position state read by the renderer every frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScrollModel {
    /// Where the current tween ends
    pub target_offset: f64,
    /// Eased offset to apply to the viewport
    pub current_offset: f64,
    /// Pixels per second, measured between ticks
    pub velocity: f64,
}

/// Options for [`InertialScrollEngine::scroll_to`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollRequest {
    /// Added to the target before clamping
    pub offset_adjustment: f64,
    /// Tween duration; the configured duration when unset
    pub duration: Option<Duration>,
}

/// Whether the engine took over an input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputDisposition {
    /// Handled here; the platform default must be prevented
    Consumed,
    /// Leave the event to native handling
    Passthrough,
}

/// Resolves in-page anchor ids to document offsets
pub trait SectionLookup {
    fn section_offset(&self, id: &str) -> Option<f64>;
}

impl SectionLookup for HashMap<String, f64> {
    fn section_offset(&self, id: &str) -> Option<f64> {
        self.get(id).copied()
    }
}

/// Active tween state
#[derive(Debug, Clone)]
struct Tween {
    start: Instant,
    from: f64,
    to: f64,
    duration: Duration,
    easing: EasingType,
    /// Velocity at the start of the tween, decayed to zero by the end
    carry_velocity: f64,
}

impl Tween {
    fn position(&self, now: Instant) -> f64 {
        let t = progress(self.start, now, self.duration);
        let base = lerp(self.from, self.to, self.easing.apply(t));
        // t(1-t)² has slope 1 at t=0 and vanishes at t=1, so the carried
        // velocity matches at the start and leaves the end point untouched.
        let carry = t * (1.0 - t) * (1.0 - t);
        base + self.carry_velocity * self.duration.as_secs_f64() * carry
    }
}

/// Inertial scroll engine
///
/// Call [`start`](Self::start) once, feed input through the `on_*`
/// methods, and call `tick()` each frame to advance the scroll model.
#[derive(Debug)]
pub struct InertialScrollEngine {
    config: ScrollConfig,
    motion: MotionPreference,
    state: DriverState,
    model: ScrollModel,
    tween: Option<Tween>,
    /// Input delta accumulated since the last tick
    pending_delta: f64,
    /// Largest reachable offset
    limit: f64,
    last_tick: Option<Instant>,
}

impl InertialScrollEngine {
    pub fn new(config: ScrollConfig, motion: MotionPreference) -> Self {
        Self {
            config,
            motion,
            state: DriverState::Idle,
            model: ScrollModel::default(),
            tween: None,
            pending_delta: 0.0,
            limit: f64::INFINITY,
            last_tick: None,
        }
    }

    /// Take over scrolling unless reduced motion or configuration says no
    ///
    /// The preference is read here only; later changes never restart it.
    pub fn start(&mut self, now: Instant) {
        if self.state != DriverState::Idle {
            return;
        }
        if self.motion.is_reduced() {
            info!("Reduced motion preferred, leaving native scrolling in place");
            return;
        }
        if !self.config.is_smooth() {
            info!("Smooth scrolling disabled by configuration");
            return;
        }
        self.state = DriverState::Running;
        self.last_tick = Some(now);
        debug!(
            "Inertial scroll started: duration={}ms easing={:?}",
            self.config.animation_duration_ms, self.config.easing
        );
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn model(&self) -> ScrollModel {
        self.model
    }

    #[inline]
    pub fn current_offset(&self) -> f64 {
        self.model.current_offset
    }

    /// Check if a tween is in progress
    #[inline]
    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    /// Check if there's pending work (tween or pending delta)
    #[inline]
    pub fn needs_update(&self) -> bool {
        self.tween.is_some() || self.pending_delta != 0.0
    }

    /// Set the largest reachable offset (document height minus viewport)
    pub fn set_limit(&mut self, limit: f64) {
        self.limit = limit.max(0.0);
        if self.model.current_offset > self.limit {
            self.model.current_offset = self.limit;
        }
        self.model.target_offset = self.model.target_offset.min(self.limit);
    }

    /// Ease toward `target` from the live position
    pub fn scroll_to(&mut self, target: f64, request: ScrollRequest, now: Instant) {
        let target = self.clamp(target + request.offset_adjustment);

        if !self.animates() {
            self.jump_to(target);
            return;
        }

        let duration = request
            .duration
            .unwrap_or_else(|| self.config.animation_duration());
        self.begin_tween(target, duration, now);
    }

    /// Mirror a native scroll position while the engine is not driving
    pub fn sync_native(&mut self, offset: f64) {
        if self.state.is_running() {
            return;
        }
        self.jump_to(self.clamp(offset));
    }

    /// Wheel delta in pixels; positive scrolls down
    pub fn on_wheel(&mut self, delta: f64) -> InputDisposition {
        self.accumulate(delta * self.config.wheel_multiplier)
    }

    /// Touch drag delta in pixels; positive scrolls down
    pub fn on_touch(&mut self, delta: f64) -> InputDisposition {
        self.accumulate(delta * self.config.touch_multiplier)
    }

    /// Intercept an in-page anchor click and ease to its section instead of
    /// the platform's instant jump
    pub fn on_anchor_click(
        &mut self,
        href: &str,
        sections: &dyn SectionLookup,
        now: Instant,
    ) -> InputDisposition {
        let Some(id) = href.strip_prefix('#') else {
            return InputDisposition::Passthrough;
        };
        if !self.state.is_running() {
            return InputDisposition::Passthrough;
        }

        match sections.section_offset(id) {
            Some(offset) => {
                debug!("Anchor #{} intercepted, easing to {}", id, offset);
                self.scroll_to(
                    offset,
                    ScrollRequest {
                        offset_adjustment: self.config.anchor_offset,
                        duration: Some(self.config.anchor_duration()),
                    },
                    now,
                );
            }
            None => debug!("Anchor #{} has no matching section", id),
        }
        InputDisposition::Consumed
    }

    /// Return to the top with no residual motion
    ///
    /// Tween, pending input and velocity are cleared together so the next
    /// tick cannot drift away from zero.
    pub fn reset_to_top(&mut self) {
        self.tween = None;
        self.pending_delta = 0.0;
        self.model = ScrollModel::default();
    }

    /// Cancel any tween and stop at the current position
    pub fn cancel(&mut self) {
        self.tween = None;
        self.pending_delta = 0.0;
        self.model.velocity = 0.0;
        self.model.target_offset = self.model.current_offset;
    }

    fn accumulate(&mut self, delta: f64) -> InputDisposition {
        if !self.state.is_running() {
            return InputDisposition::Passthrough;
        }
        if self.motion.is_reduced() {
            // Preference flipped mid-session: move, but never animate
            let target = self.clamp(self.model.current_offset + delta);
            self.jump_to(target);
        } else {
            self.pending_delta += delta;
        }
        InputDisposition::Consumed
    }

    fn animates(&self) -> bool {
        self.state.is_running() && !self.motion.is_reduced()
    }

    fn clamp(&self, offset: f64) -> f64 {
        offset.clamp(0.0, self.limit)
    }

    fn jump_to(&mut self, offset: f64) {
        self.tween = None;
        self.pending_delta = 0.0;
        self.model = ScrollModel {
            target_offset: offset,
            current_offset: offset,
            velocity: 0.0,
        };
    }

    fn begin_tween(&mut self, target: f64, duration: Duration, now: Instant) {
        let from = self.model.current_offset;
        if (from - target).abs() < f64::EPSILON && self.model.velocity == 0.0 {
            self.tween = None;
            self.model.target_offset = target;
            return;
        }

        self.tween = Some(Tween {
            start: now,
            from,
            to: target,
            duration,
            easing: self.config.easing,
            carry_velocity: self.model.velocity,
        });
        self.model.target_offset = target;
    }
}

impl AnimationDriver for InertialScrollEngine {
    fn name(&self) -> &'static str {
        "inertial-scroll"
    }

    fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Advance the scroll model by one frame
    fn tick(&mut self, now: Instant) {
        if !self.state.is_running() {
            return;
        }

        // Process any pending input delta
        if self.pending_delta != 0.0 {
            let base = self.model.target_offset;
            let target = self.clamp(base + self.pending_delta);
            self.pending_delta = 0.0;
            if self.motion.is_reduced() {
                // Batched before the preference flipped
                self.jump_to(target);
            } else {
                self.begin_tween(target, self.config.animation_duration(), now);
            }
        }

        let previous = self.model.current_offset;
        let dt = self
            .last_tick
            .map(|last| elapsed(last, now).as_secs_f64())
            .unwrap_or(0.0);
        self.last_tick = Some(now);

        if let Some(ref tween) = self.tween {
            if is_complete(tween.start, now, tween.duration) {
                self.model.current_offset = self.clamp(tween.to);
                self.model.velocity = 0.0;
                self.tween = None;
                return;
            }
            self.model.current_offset = self.clamp(tween.position(now));
        }

        self.model.velocity = if dt > 0.0 {
            (self.model.current_offset - previous) / dt
        } else {
            self.model.velocity
        };
        if self.tween.is_none() {
            self.model.velocity = 0.0;
        }
    }

    /// Stop driving scroll and drop input intercepts
    fn stop(&mut self, _now: Instant) {
        if self.state.is_stopped() {
            return;
        }
        self.cancel();
        self.state = DriverState::Stopped;
        debug!("Inertial scroll stopped at {}", self.model.current_offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn running_engine(t0: Instant) -> InertialScrollEngine {
        let mut engine = InertialScrollEngine::new(ScrollConfig::default(), MotionPreference::new(false));
        engine.start(t0);
        engine
    }

    #[test]
    fn test_reduced_motion_never_starts() {
        let t0 = Instant::now();
        let mut engine = InertialScrollEngine::new(ScrollConfig::default(), MotionPreference::new(true));
        engine.start(t0);
        assert!(!engine.is_running());

        assert_eq!(engine.on_wheel(120.0), InputDisposition::Passthrough);
        let sections: HashMap<String, f64> = [("contact".to_string(), 900.0)].into();
        assert_eq!(engine.on_anchor_click("#contact", &sections, t0), InputDisposition::Passthrough);

        engine.tick(t0 + ms(16));
        assert!(!engine.is_animating());
    }

    #[test]
    fn test_disabled_config_never_starts() {
        let t0 = Instant::now();
        let config = ScrollConfig {
            smooth_enabled: false,
            ..Default::default()
        };
        let mut engine = InertialScrollEngine::new(config, MotionPreference::new(false));
        engine.start(t0);
        assert_eq!(engine.state(), DriverState::Idle);

        engine.scroll_to(300.0, ScrollRequest::default(), t0);
        assert_eq!(engine.current_offset(), 300.0);
    }

    #[test]
    fn test_scroll_to_eases_and_lands() {
        let t0 = Instant::now();
        let mut engine = running_engine(t0);

        engine.scroll_to(1000.0, ScrollRequest::default(), t0);
        assert!(engine.is_animating());

        engine.tick(t0 + ms(700));
        let mid = engine.current_offset();
        assert!((mid - 500.0).abs() < 1.0, "mid = {}", mid);
        assert!(engine.model().velocity > 0.0);

        engine.tick(t0 + ms(1400));
        assert_eq!(engine.current_offset(), 1000.0);
        assert_eq!(engine.model().velocity, 0.0);
        assert!(!engine.is_animating());
    }

    #[test]
    fn test_retarget_mid_flight_is_continuous() {
        let t0 = Instant::now();
        let mut engine = running_engine(t0);
        engine.scroll_to(1000.0, ScrollRequest::default(), t0);

        // Tick densely up to roughly the 500px mark
        let mut now = t0;
        for _ in 0..44 {
            now += ms(16);
            engine.tick(now);
        }
        let before = engine.model();
        assert!(before.velocity > 0.0);
        assert!(before.current_offset > 400.0 && before.current_offset < 600.0);

        engine.scroll_to(2000.0, ScrollRequest {
            duration: Some(ms(1200)),
            ..Default::default()
        }, now);
        // Nothing moves at the instant of the call
        assert_eq!(engine.current_offset(), before.current_offset);

        // The next frame continues at roughly the prior speed
        now += ms(16);
        engine.tick(now);
        let step = engine.current_offset() - before.current_offset;
        let expected = before.velocity * 0.016;
        assert!(step > 0.0);
        assert!((step - expected).abs() < expected * 0.5 + 1.0, "step={} expected={}", step, expected);

        engine.tick(now + ms(1200));
        assert_eq!(engine.current_offset(), 2000.0);
    }

    #[test]
    fn test_wheel_batching() {
        let t0 = Instant::now();
        let mut engine = running_engine(t0);

        assert_eq!(engine.on_wheel(100.0), InputDisposition::Consumed);
        engine.on_wheel(100.0);
        engine.on_touch(100.0);
        assert!(engine.needs_update());

        engine.tick(t0 + ms(16));
        // 0.8 * 200 + 1.5 * 100
        assert!((engine.model().target_offset - 310.0).abs() < 1e-9);
    }

    #[test]
    fn test_clamped_to_limit() {
        let t0 = Instant::now();
        let mut engine = running_engine(t0);
        engine.set_limit(500.0);

        engine.scroll_to(900.0, ScrollRequest::default(), t0);
        assert_eq!(engine.model().target_offset, 500.0);

        engine.on_wheel(-5000.0);
        engine.tick(t0 + ms(16));
        assert_eq!(engine.model().target_offset, 0.0);
    }

    #[test]
    fn test_anchor_click_applies_offset() {
        let t0 = Instant::now();
        let mut engine = running_engine(t0);
        let sections: HashMap<String, f64> = [("services".to_string(), 1200.0)].into();

        assert_eq!(engine.on_anchor_click("/about", &sections, t0), InputDisposition::Passthrough);
        assert_eq!(engine.on_anchor_click("#services", &sections, t0), InputDisposition::Consumed);
        assert_eq!(engine.model().target_offset, 1120.0);

        // Unknown anchors are still kept from jumping natively
        assert_eq!(engine.on_anchor_click("#missing", &sections, t0), InputDisposition::Consumed);
        assert_eq!(engine.model().target_offset, 1120.0);

        engine.tick(t0 + ms(1200));
        assert_eq!(engine.current_offset(), 1120.0);
    }

    #[test]
    fn test_reset_zeroes_velocity_before_next_tick() {
        let t0 = Instant::now();
        let mut engine = running_engine(t0);
        engine.scroll_to(3000.0, ScrollRequest::default(), t0);
        engine.tick(t0 + ms(300));
        engine.on_wheel(400.0);

        engine.reset_to_top();
        assert_eq!(engine.model(), ScrollModel::default());

        engine.tick(t0 + ms(316));
        assert_eq!(engine.current_offset(), 0.0);
        assert_eq!(engine.model().velocity, 0.0);
    }

    #[test]
    fn test_reduced_mid_session_never_animates() {
        let t0 = Instant::now();
        let motion = MotionPreference::new(false);
        let mut engine = InertialScrollEngine::new(ScrollConfig::default(), motion.clone());
        engine.start(t0);

        motion.platform_changed(true);
        engine.scroll_to(800.0, ScrollRequest::default(), t0);
        assert!(!engine.is_animating());
        assert_eq!(engine.current_offset(), 800.0);

        engine.on_wheel(100.0);
        assert!(!engine.needs_update());
        assert_eq!(engine.current_offset(), 880.0);
    }

    #[test]
    fn test_delta_batched_before_reduced_flip_jumps() {
        let t0 = Instant::now();
        let motion = MotionPreference::new(false);
        let mut engine = InertialScrollEngine::new(ScrollConfig::default(), motion.clone());
        engine.start(t0);

        engine.on_wheel(500.0);
        motion.platform_changed(true);
        engine.tick(t0 + ms(16));

        assert!(!engine.is_animating());
        assert!(engine.current_offset() > 0.0);
        assert_eq!(engine.current_offset(), engine.model().target_offset);
        assert_eq!(engine.model().velocity, 0.0);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let t0 = Instant::now();
        let mut engine = running_engine(t0);
        engine.scroll_to(600.0, ScrollRequest::default(), t0);

        engine.stop(t0);
        engine.stop(t0);
        assert_eq!(engine.state(), DriverState::Stopped);
        assert!(!engine.is_animating());
        assert_eq!(engine.on_wheel(10.0), InputDisposition::Passthrough);

        // A stopped engine can't be restarted
        engine.start(t0);
        assert_eq!(engine.state(), DriverState::Stopped);
    }
}
