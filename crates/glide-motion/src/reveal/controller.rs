//! Scroll reveal controller
//!
//! Owns every reveal registration, turns observer crossings into one-shot
//! visibility, schedules staggered activation and computes the decaying
//! depth offset.

use std::time::{Duration, Instant};

use glide_core::{RevealConfig, ViewKey};
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use tracing::{debug, warn};

use super::observer::{Bounds, RevealObserver, Viewport};
use super::RevealHandle;
use crate::driver::AnimationDriver;

/// Depth layer of a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Depth {
    #[default]
    Front,
    Mid,
    Back,
}

/// Per-region reveal options supplied by the content layer
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealOptions {
    /// Overrides the configured intersection threshold
    pub threshold: Option<f64>,
    /// Position in the stagger cascade
    pub stagger_index: u32,
    pub depth: Depth,
}

/// Crossing state of one registration; only ever moves forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crossing {
    NotCrossed,
    Crossed { at: Instant },
}

/// Something the presentation layer may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealEvent {
    Crossed { handle: RevealHandle },
    Activated { handle: RevealHandle },
}

/// Render state of one region
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RevealView {
    /// Crossed the visibility threshold
    pub visible: bool,
    /// Stagger delay elapsed; the reveal effect is playing or done
    pub active: bool,
    #[serde(serialize_with = "serialize_millis")]
    pub stagger_delay: Duration,
    pub depth_offset_px: f64,
}

fn serialize_millis<S: serde::Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(value.as_millis() as u64)
}

#[derive(Debug, Clone)]
struct RevealState {
    view: ViewKey,
    bounds: Option<Bounds>,
    threshold: f64,
    stagger_delay: Duration,
    depth_px: f64,
    crossing: Crossing,
    activated: bool,
    depth_offset: f64,
}

impl RevealState {
    fn activates_at(&self) -> Option<Instant> {
        match self.crossing {
            Crossing::Crossed { at } => Some(at + self.stagger_delay),
            Crossing::NotCrossed => None,
        }
    }

    fn is_active(&self, now: Instant) -> bool {
        self.activates_at().is_some_and(|at| now >= at)
    }
}

/// Controller for staggered, one-shot scroll reveals
#[derive(Debug)]
pub struct ScrollRevealController {
    config: RevealConfig,
    registrations: SlotMap<RevealHandle, RevealState>,
    observer: RevealObserver,
    /// Latest scroll sample not yet processed; later samples overwrite it
    pending_sample: Option<Option<Viewport>>,
    last_viewport: Option<Viewport>,
    events: Vec<RevealEvent>,
}

impl ScrollRevealController {
    const MIN_THRESHOLD: f64 = 0.01;
    const MAX_THRESHOLD: f64 = 0.99;

    pub fn new(config: RevealConfig) -> Self {
        Self {
            config,
            registrations: SlotMap::with_key(),
            observer: RevealObserver::new(),
            pending_sample: None,
            last_viewport: None,
            events: Vec::new(),
        }
    }

    /// Effective threshold; non-finite values fall back to the configured one
    fn threshold(&self, requested: Option<f64>) -> f64 {
        let threshold = requested
            .filter(|t| t.is_finite())
            .unwrap_or(self.config.threshold);
        if threshold.is_finite() {
            threshold.clamp(Self::MIN_THRESHOLD, Self::MAX_THRESHOLD)
        } else {
            Self::MIN_THRESHOLD
        }
    }

    /// Register a region of `view`
    ///
    /// Regions whose bounds cannot be measured are revealed immediately.
    pub fn register(
        &mut self,
        view: &ViewKey,
        bounds: Option<Bounds>,
        options: RevealOptions,
        now: Instant,
    ) -> RevealHandle {
        let threshold = self.threshold(options.threshold);
        let depth_px = self.depth_px(options.depth);

        let handle = self.registrations.insert(RevealState {
            view: view.clone(),
            bounds,
            threshold,
            stagger_delay: self.stagger_delay(options.stagger_index),
            depth_px,
            crossing: Crossing::NotCrossed,
            activated: false,
            depth_offset: depth_px,
        });

        match bounds {
            Some(bounds) => self.observer.observe(handle, bounds, threshold),
            None => {
                warn!("Region of {} has no measurable bounds, revealing immediately", view);
                self.mark_crossed(handle, now);
            }
        }
        handle
    }

    /// Forget a region; later events never mention it
    pub fn unregister(&mut self, handle: RevealHandle) -> bool {
        self.observer.unobserve(handle);
        self.registrations.remove(handle).is_some()
    }

    /// Drop every registration owned by `view`
    pub fn unregister_view(&mut self, view: &ViewKey) -> usize {
        let handles: Vec<RevealHandle> = self
            .registrations
            .iter()
            .filter(|(_, state)| &state.view == view)
            .map(|(handle, _)| handle)
            .collect();
        for handle in &handles {
            self.unregister(*handle);
        }
        if !handles.is_empty() {
            debug!("Discarded {} reveal registrations of {}", handles.len(), view);
        }
        handles.len()
    }

    /// Layout moved a region
    pub fn update_bounds(&mut self, handle: RevealHandle, bounds: Bounds) {
        if let Some(state) = self.registrations.get_mut(handle) {
            state.bounds = Some(bounds);
            self.observer.update_bounds(handle, bounds);
        }
    }

    /// Queue a scroll sample; at most one is processed per tick
    ///
    /// `None` means the viewport could not be measured.
    pub fn on_scroll_sample(&mut self, viewport: Option<Viewport>) {
        self.pending_sample = Some(viewport);
    }

    /// Externally measured intersection for one region
    ///
    /// A `None` ratio means measurement failed and the region fails open.
    /// Returns whether this report made the region visible.
    pub fn report_intersection(
        &mut self,
        handle: RevealHandle,
        ratio: Option<f64>,
        now: Instant,
    ) -> bool {
        let Some(state) = self.registrations.get(handle) else {
            return false;
        };
        if state.crossing != Crossing::NotCrossed {
            return false;
        }
        if ratio.is_some_and(|ratio| ratio < state.threshold) {
            return false;
        }
        self.observer.unobserve(handle);
        self.mark_crossed(handle, now);
        true
    }

    /// Render state of a region, `None` once unregistered
    pub fn view(&self, handle: RevealHandle, now: Instant) -> Option<RevealView> {
        self.registrations.get(handle).map(|state| RevealView {
            visible: state.crossing != Crossing::NotCrossed,
            active: state.is_active(now),
            stagger_delay: state.stagger_delay,
            depth_offset_px: state.depth_offset,
        })
    }

    pub fn crossing(&self, handle: RevealHandle) -> Option<Crossing> {
        self.registrations.get(handle).map(|state| state.crossing)
    }

    /// Every live registration with its render state
    pub fn views(&self, now: Instant) -> Vec<(RevealHandle, RevealView)> {
        self.registrations
            .keys()
            .filter_map(|handle| self.view(handle, now).map(|view| (handle, view)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    pub fn take_events(&mut self) -> Vec<RevealEvent> {
        std::mem::take(&mut self.events)
    }

    /// Delay for a stagger index, capped by configuration
    pub fn stagger_delay(&self, index: u32) -> Duration {
        let millis = (index as u64)
            .saturating_mul(self.config.stagger_unit_ms)
            .min(self.config.max_stagger_ms);
        Duration::from_millis(millis)
    }

    fn depth_px(&self, depth: Depth) -> f64 {
        match depth {
            Depth::Front => 0.0,
            Depth::Mid => self.config.mid_depth_px,
            Depth::Back => self.config.back_depth_px,
        }
    }

    fn mark_crossed(&mut self, handle: RevealHandle, now: Instant) {
        if let Some(state) = self.registrations.get_mut(handle) {
            if state.crossing == Crossing::NotCrossed {
                state.crossing = Crossing::Crossed { at: now };
                self.events.push(RevealEvent::Crossed { handle });
            }
        }
    }

    fn settle_window(&self) -> Duration {
        Duration::from_millis(self.config.depth_settle_ms)
    }

    fn update_depth(&mut self, now: Instant) {
        let window = self.settle_window();
        let viewport = self.last_viewport;
        for state in self.registrations.values_mut() {
            let Some(activates_at) = state.activates_at() else {
                // Hidden regions keep their resting offset until they cross
                continue;
            };
            if state.depth_offset == 0.0 {
                continue;
            }
            if now >= activates_at + window {
                state.depth_offset = 0.0;
                continue;
            }
            if let (Some(viewport), Some(bounds)) = (viewport, state.bounds) {
                state.depth_offset = state.depth_px * (1.0 - viewport.penetration(&bounds));
            }
        }
    }

    /// Crossed regions still waiting to activate or to settle their depth
    fn is_settling(&self) -> bool {
        self.registrations.values().any(|state| {
            state.crossing != Crossing::NotCrossed
                && (!state.activated || state.depth_offset != 0.0)
        })
    }
}

impl AnimationDriver for ScrollRevealController {
    fn name(&self) -> &'static str {
        "scroll-reveal"
    }

    /// Running while anything is observed, staggering or settling
    fn is_running(&self) -> bool {
        !self.observer.is_empty() || self.pending_sample.is_some() || self.is_settling()
    }

    fn tick(&mut self, now: Instant) {
        if let Some(sample) = self.pending_sample.take() {
            if sample.is_some() {
                self.last_viewport = sample;
            }
            for intersection in self.observer.measure(sample) {
                self.mark_crossed(intersection.handle, now);
            }
        }

        if self.is_settling() {
            self.update_depth(now);
        }

        for (handle, state) in self.registrations.iter_mut() {
            if !state.activated && state.is_active(now) {
                state.activated = true;
                self.events.push(RevealEvent::Activated { handle });
            }
        }
    }

    /// Drop every registration and pending stagger activation
    fn stop(&mut self, _now: Instant) {
        if self.registrations.is_empty() && self.pending_sample.is_none() {
            return;
        }
        debug!("Scroll reveal stopped, dropping {} registrations", self.registrations.len());
        self.registrations.clear();
        self.observer.clear();
        self.pending_sample = None;
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn controller() -> ScrollRevealController {
        ScrollRevealController::new(RevealConfig::default())
    }

    fn home() -> ViewKey {
        ViewKey::from_path("/")
    }

    #[test]
    fn test_stagger_counts_from_crossing_time() {
        let t0 = Instant::now();
        let mut reveal = controller();
        let handle = reveal.register(
            &home(),
            Some(Bounds::new(2000.0, 300.0)),
            RevealOptions {
                stagger_index: 3,
                ..Default::default()
            },
            t0,
        );

        // Mounted but off-screen for the first second
        reveal.on_scroll_sample(Some(Viewport::new(0.0, 800.0)));
        reveal.tick(t0 + ms(16));
        assert!(!reveal.view(handle, t0 + ms(16)).unwrap().visible);

        let crossed_at = t0 + ms(1000);
        reveal.on_scroll_sample(Some(Viewport::new(1500.0, 800.0)));
        reveal.tick(crossed_at);
        let view = reveal.view(handle, crossed_at).unwrap();
        assert!(view.visible);
        assert!(!view.active);
        assert_eq!(view.stagger_delay, ms(240));

        assert!(!reveal.view(handle, t0 + ms(1239)).unwrap().active);
        assert!(reveal.view(handle, t0 + ms(1240)).unwrap().active);

        reveal.tick(t0 + ms(1240));
        let events = reveal.take_events();
        assert_eq!(
            events,
            vec![
                RevealEvent::Crossed { handle },
                RevealEvent::Activated { handle },
            ]
        );
    }

    #[test]
    fn test_visible_never_reverts() {
        let t0 = Instant::now();
        let mut reveal = controller();
        let handle = reveal.register(&home(), Some(Bounds::new(100.0, 200.0)), RevealOptions::default(), t0);

        reveal.on_scroll_sample(Some(Viewport::new(0.0, 800.0)));
        reveal.tick(t0);
        assert!(reveal.view(handle, t0).unwrap().visible);

        // Scroll far past and back; the region stays revealed
        for (i, offset) in [5000.0, 0.0, 9000.0, 50.0].into_iter().enumerate() {
            let now = t0 + ms(100 * (i as u64 + 1));
            reveal.on_scroll_sample(Some(Viewport::new(offset, 800.0)));
            reveal.tick(now);
            assert!(reveal.view(handle, now).unwrap().visible);
            assert!(!reveal.report_intersection(handle, Some(0.0), now));
        }
        assert_eq!(reveal.crossing(handle), Some(Crossing::Crossed { at: t0 }));
    }

    #[test]
    fn test_nan_threshold_uses_configured_one() {
        let t0 = Instant::now();
        let mut reveal = controller();
        let handle = reveal.register(
            &home(),
            Some(Bounds::new(100.0, 200.0)),
            RevealOptions {
                threshold: Some(f64::NAN),
                ..Default::default()
            },
            t0,
        );

        reveal.on_scroll_sample(Some(Viewport::new(0.0, 800.0)));
        reveal.tick(t0);
        assert!(reveal.view(handle, t0).unwrap().visible);
    }

    #[test]
    fn test_unregister_stops_events() {
        let t0 = Instant::now();
        let mut reveal = controller();
        let kept = reveal.register(&home(), Some(Bounds::new(100.0, 100.0)), RevealOptions::default(), t0);
        let dropped = reveal.register(
            &home(),
            Some(Bounds::new(200.0, 100.0)),
            RevealOptions {
                stagger_index: 2,
                ..Default::default()
            },
            t0,
        );

        reveal.on_scroll_sample(Some(Viewport::new(0.0, 800.0)));
        reveal.tick(t0);
        reveal.take_events();

        // Pending stagger activation is cancelled with the registration
        assert!(reveal.unregister(dropped));
        assert!(!reveal.unregister(dropped));
        reveal.tick(t0 + ms(500));

        let events = reveal.take_events();
        assert!(events.iter().all(|event| match event {
            RevealEvent::Crossed { handle } | RevealEvent::Activated { handle } => *handle == kept,
        }));
        assert!(reveal.view(dropped, t0 + ms(500)).is_none());
        assert!(!reveal.report_intersection(dropped, Some(1.0), t0));
    }

    #[test]
    fn test_stale_handle_does_not_alias_new_registration() {
        let t0 = Instant::now();
        let mut reveal = controller();
        let old = reveal.register(&home(), Some(Bounds::new(5000.0, 100.0)), RevealOptions::default(), t0);
        reveal.unregister(old);
        let fresh = reveal.register(&home(), Some(Bounds::new(5000.0, 100.0)), RevealOptions::default(), t0);

        assert_ne!(old, fresh);
        assert!(!reveal.report_intersection(old, Some(1.0), t0));
        assert!(!reveal.view(fresh, t0).unwrap().visible);
    }

    #[test]
    fn test_unregister_view_only_touches_that_view() {
        let t0 = Instant::now();
        let mut reveal = controller();
        let about = ViewKey::from_path("/about");
        reveal.register(&home(), Some(Bounds::new(0.0, 10.0)), RevealOptions::default(), t0);
        reveal.register(&home(), Some(Bounds::new(0.0, 10.0)), RevealOptions::default(), t0);
        let keep = reveal.register(&about, Some(Bounds::new(0.0, 10.0)), RevealOptions::default(), t0);

        assert_eq!(reveal.unregister_view(&home()), 2);
        assert_eq!(reveal.len(), 1);
        assert!(reveal.view(keep, t0).is_some());
    }

    #[test]
    fn test_unmeasurable_regions_fail_open() {
        let t0 = Instant::now();
        let mut reveal = controller();
        let no_bounds = reveal.register(&home(), None, RevealOptions::default(), t0);
        assert!(reveal.view(no_bounds, t0).unwrap().visible);

        let far = reveal.register(&home(), Some(Bounds::new(9000.0, 100.0)), RevealOptions::default(), t0);
        reveal.on_scroll_sample(None);
        reveal.tick(t0 + ms(16));
        assert!(reveal.view(far, t0 + ms(16)).unwrap().active);
    }

    #[test]
    fn test_scroll_sample_before_crossing_leaves_depth_inert() {
        let t0 = Instant::now();
        let mut reveal = controller();
        let handle = reveal.register(
            &home(),
            Some(Bounds::new(3000.0, 200.0)),
            RevealOptions {
                depth: Depth::Back,
                ..Default::default()
            },
            t0,
        );

        reveal.on_scroll_sample(Some(Viewport::new(100.0, 800.0)));
        reveal.tick(t0);
        let hidden = reveal.view(handle, t0).unwrap();
        assert!(!hidden.visible);
        assert_eq!(hidden.depth_offset_px, 4.0);

        // A late external crossing followed by the next frame
        assert!(reveal.report_intersection(handle, Some(0.5), t0 + ms(50)));
        reveal.on_scroll_sample(Some(Viewport::new(2500.0, 800.0)));
        reveal.tick(t0 + ms(66));
        let view = reveal.view(handle, t0 + ms(66)).unwrap();
        assert!(view.visible);
        // Top edge 300px above the bottom of an 800px viewport
        assert!((view.depth_offset_px - 4.0 * (1.0 - 300.0 / 800.0)).abs() < 1e-9);
    }

    #[test]
    fn test_depth_decays_then_pins_to_zero() {
        let t0 = Instant::now();
        let mut reveal = controller();
        let handle = reveal.register(
            &home(),
            Some(Bounds::new(700.0, 400.0)),
            RevealOptions {
                depth: Depth::Mid,
                ..Default::default()
            },
            t0,
        );

        reveal.on_scroll_sample(Some(Viewport::new(0.0, 800.0)));
        reveal.tick(t0);
        let first = reveal.view(handle, t0).unwrap().depth_offset_px;
        assert!((first - 2.0 * (1.0 - 100.0 / 800.0)).abs() < 1e-9);

        reveal.on_scroll_sample(Some(Viewport::new(300.0, 800.0)));
        reveal.tick(t0 + ms(100));
        let second = reveal.view(handle, t0 + ms(100)).unwrap().depth_offset_px;
        assert!(second < first);

        reveal.tick(t0 + ms(1300));
        assert_eq!(reveal.view(handle, t0 + ms(1300)).unwrap().depth_offset_px, 0.0);
        assert!(!reveal.is_running());
    }

    #[test]
    fn test_stagger_is_capped() {
        let reveal = controller();
        assert_eq!(reveal.stagger_delay(0), Duration::ZERO);
        assert_eq!(reveal.stagger_delay(4), ms(320));
        assert_eq!(reveal.stagger_delay(40), ms(360));
    }

    #[test]
    fn test_stop_is_idempotent() {
        let t0 = Instant::now();
        let mut reveal = controller();
        reveal.register(&home(), Some(Bounds::new(0.0, 10.0)), RevealOptions::default(), t0);
        reveal.stop(t0);
        reveal.stop(t0);
        assert!(reveal.is_empty());
        assert!(!reveal.is_running());
    }
}
