//! Page transition state machine
//!
//! `Idle → Exiting → (swap) → Entering → Idle`. Navigation requests that
//! arrive mid-cycle overwrite a single "latest destination" slot that is
//! read when the running phase reaches its natural end.

use std::time::{Duration, Instant};

use glide_core::{EasingType, MotionPreference, TransitionConfig, ViewKey};
use serde::Serialize;
use tracing::{debug, info};

use crate::driver::AnimationDriver;
use crate::scroll::timing::{elapsed, is_complete};

/// Phase reported to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPhase {
    #[default]
    Idle,
    Exiting,
    Entering,
}

/// Ordered lifecycle notifications
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TransitionEvent {
    ExitStarted { from: ViewKey },
    /// Outgoing content is gone and the new view mounts now
    Swapped { from: ViewKey, to: ViewKey },
    EnterStarted { view: ViewKey },
    Settled { view: ViewKey },
}

#[derive(Debug, Clone, Copy)]
struct Timed {
    started: Instant,
    duration: Duration,
}

impl Timed {
    fn end(&self) -> Instant {
        self.started + self.duration
    }
}

#[derive(Debug, Clone, Copy)]
enum State {
    Idle,
    Exiting(Timed),
    Entering(Timed),
}

/// Sequences exit, content swap and enter for navigation events
#[derive(Debug)]
pub struct TransitionCoordinator {
    config: TransitionConfig,
    motion: MotionPreference,
    effects_available: bool,
    state: State,
    current: ViewKey,
    /// Latest requested destination; intermediate requests are overwritten
    pending: Option<ViewKey>,
    /// Durations collapsed for the cycle in flight
    instant_cycle: bool,
    stopped: bool,
    events: Vec<TransitionEvent>,
}

impl TransitionCoordinator {
    pub fn new(config: TransitionConfig, motion: MotionPreference, initial: ViewKey) -> Self {
        Self {
            config,
            motion,
            effects_available: true,
            state: State::Idle,
            current: initial,
            pending: None,
            instant_cycle: false,
            stopped: false,
            events: Vec::new(),
        }
    }

    /// Report whether the presentation layer can render transition effects
    pub fn set_effects_available(&mut self, available: bool) {
        if !available && self.effects_available {
            info!("Transition effects unavailable, swapping views instantly");
        }
        self.effects_available = available;
    }

    pub fn phase(&self) -> TransitionPhase {
        match self.state {
            State::Idle => TransitionPhase::Idle,
            State::Exiting(_) => TransitionPhase::Exiting,
            State::Entering(_) => TransitionPhase::Entering,
        }
    }

    /// Curve applied to overlay progress
    pub fn easing(&self) -> EasingType {
        self.config.easing
    }

    pub fn current_view(&self) -> &ViewKey {
        &self.current
    }

    pub fn pending_view(&self) -> Option<&ViewKey> {
        self.pending.as_ref()
    }

    /// Raw progress (0.0-1.0) of the running phase and time spent in it
    pub fn phase_progress(&self, now: Instant) -> (TransitionPhase, f64, Duration) {
        let timed = match self.state {
            State::Idle => return (TransitionPhase::Idle, 1.0, Duration::ZERO),
            State::Exiting(timed) | State::Entering(timed) => timed,
        };
        let spent = elapsed(timed.started, now);
        let t = if timed.duration.is_zero() {
            1.0
        } else {
            (spent.as_secs_f64() / timed.duration.as_secs_f64()).clamp(0.0, 1.0)
        };
        (self.phase(), t, spent)
    }

    /// Ask for `next` to become the current view
    ///
    /// Starts an exit when idle; otherwise only the destination slot is
    /// updated and the running phase continues undisturbed.
    pub fn request_transition(&mut self, next: ViewKey, now: Instant) {
        match self.state {
            State::Idle => {
                if next == self.current {
                    debug!("Already showing {}, ignoring navigation", next);
                    return;
                }
                self.pending = Some(next);
                self.begin_exit(now);
            }
            State::Exiting(_) | State::Entering(_) => {
                if let Some(discarded) = self.pending.replace(next.clone()) {
                    if discarded != next {
                        debug!("Coalesced navigation: {} superseded by {}", discarded, next);
                    }
                } else {
                    debug!("Queued navigation to {} behind running transition", next);
                }
            }
        }
        self.advance(now);
    }

    /// Drain lifecycle events in the order they happened
    pub fn take_events(&mut self) -> Vec<TransitionEvent> {
        std::mem::take(&mut self.events)
    }

    fn collapses(&self) -> bool {
        self.stopped
            || !self.effects_available
            || !self.config.effects_enabled
            || self.motion.is_reduced()
    }

    fn begin_exit(&mut self, now: Instant) {
        self.instant_cycle = self.collapses();
        let duration = if self.instant_cycle {
            Duration::ZERO
        } else {
            Duration::from_millis(self.config.exit_duration_ms)
        };
        self.state = State::Exiting(Timed {
            started: now,
            duration,
        });
        debug!("Exit of {} started ({}ms)", self.current, duration.as_millis());
        self.events.push(TransitionEvent::ExitStarted {
            from: self.current.clone(),
        });
    }

    fn swap_and_enter(&mut self, at: Instant) {
        let to = self.pending.take().unwrap_or_else(|| self.current.clone());
        let from = std::mem::replace(&mut self.current, to.clone());
        info!("Swapped view {} -> {}", from, to);
        self.events.push(TransitionEvent::Swapped { from, to: to.clone() });

        let duration = if self.instant_cycle || self.stopped {
            Duration::ZERO
        } else {
            Duration::from_millis(self.config.enter_duration_ms)
        };
        self.state = State::Entering(Timed {
            started: at,
            duration,
        });
        self.events.push(TransitionEvent::EnterStarted { view: to });
    }

    fn settle(&mut self, at: Instant) {
        self.state = State::Idle;
        self.events.push(TransitionEvent::Settled {
            view: self.current.clone(),
        });

        match self.pending.take() {
            Some(next) if next != self.current => {
                debug!("Starting queued transition to {}", next);
                self.pending = Some(next);
                self.begin_exit(at);
            }
            _ => {}
        }
    }

    /// Run every phase boundary that has passed by `now`
    ///
    /// Each phase has a deadline, so repeated calls always reach Idle.
    fn advance(&mut self, now: Instant) {
        loop {
            match self.state {
                State::Idle => break,
                State::Exiting(timed) => {
                    if !is_complete(timed.started, now, timed.duration) {
                        break;
                    }
                    self.swap_and_enter(timed.end());
                }
                State::Entering(timed) => {
                    if !is_complete(timed.started, now, timed.duration) {
                        break;
                    }
                    self.settle(timed.end());
                }
            }
        }
    }
}

impl AnimationDriver for TransitionCoordinator {
    fn name(&self) -> &'static str {
        "transition"
    }

    fn is_running(&self) -> bool {
        !matches!(self.state, State::Idle)
    }

    fn tick(&mut self, now: Instant) {
        self.advance(now);
    }

    /// Finish any in-flight cycle immediately
    ///
    /// Later requests still swap content, without effects.
    fn stop(&mut self, now: Instant) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        match self.state {
            State::Idle => {}
            State::Exiting(_) => {
                self.swap_and_enter(now);
                self.settle(now);
            }
            State::Entering(_) => self.settle(now),
        }
        self.advance(now);
        debug!("Transition coordinator stopped on {}", self.current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn view(path: &str) -> ViewKey {
        ViewKey::from_path(path)
    }

    fn coordinator(reduced: bool) -> TransitionCoordinator {
        TransitionCoordinator::new(
            TransitionConfig::default(),
            MotionPreference::new(reduced),
            view("/"),
        )
    }

    fn full_cycle(from: &str, to: &str) -> Vec<TransitionEvent> {
        vec![
            TransitionEvent::ExitStarted { from: view(from) },
            TransitionEvent::Swapped {
                from: view(from),
                to: view(to),
            },
            TransitionEvent::EnterStarted { view: view(to) },
            TransitionEvent::Settled { view: view(to) },
        ]
    }

    #[test]
    fn test_single_cycle_phases() {
        let t0 = Instant::now();
        let mut tc = coordinator(false);

        tc.request_transition(view("/about"), t0);
        assert_eq!(tc.phase(), TransitionPhase::Exiting);

        tc.tick(t0 + ms(399));
        assert_eq!(tc.phase(), TransitionPhase::Exiting);
        assert_eq!(tc.current_view(), &view("/"));

        tc.tick(t0 + ms(400));
        assert_eq!(tc.phase(), TransitionPhase::Entering);
        assert_eq!(tc.current_view(), &view("/about"));

        tc.tick(t0 + ms(1000));
        assert_eq!(tc.phase(), TransitionPhase::Idle);
        assert_eq!(tc.take_events(), full_cycle("/", "/about"));
    }

    #[test]
    fn test_burst_coalesces_to_last() {
        let t0 = Instant::now();
        let mut tc = coordinator(false);

        tc.request_transition(view("/services"), t0);
        tc.request_transition(view("/testimonials"), t0 + ms(20));
        tc.request_transition(view("/contact"), t0 + ms(45));

        let mut now = t0;
        while now < t0 + ms(2000) {
            now += ms(16);
            tc.tick(now);
        }

        // One exit of the original view, one swap straight to the last target
        assert_eq!(tc.take_events(), full_cycle("/", "/contact"));
        assert_eq!(tc.phase(), TransitionPhase::Idle);
    }

    #[test]
    fn test_request_during_enter_runs_one_more_cycle() {
        let t0 = Instant::now();
        let mut tc = coordinator(false);
        tc.request_transition(view("/about"), t0);
        tc.tick(t0 + ms(500));
        assert_eq!(tc.phase(), TransitionPhase::Entering);
        tc.take_events();

        tc.request_transition(view("/services"), t0 + ms(600));
        tc.request_transition(view("/contact"), t0 + ms(610));
        // The enter finishes naturally before the next exit begins
        tc.tick(t0 + ms(999));
        assert_eq!(tc.phase(), TransitionPhase::Entering);

        tc.tick(t0 + ms(3000));
        let mut expected = vec![TransitionEvent::Settled { view: view("/about") }];
        expected.extend(full_cycle("/about", "/contact"));
        assert_eq!(tc.take_events(), expected);
    }

    #[test]
    fn test_navigating_back_mid_enter_is_dropped() {
        let t0 = Instant::now();
        let mut tc = coordinator(false);
        tc.request_transition(view("/about"), t0);
        tc.tick(t0 + ms(450));
        tc.take_events();

        tc.request_transition(view("/about"), t0 + ms(500));
        tc.tick(t0 + ms(2000));
        assert_eq!(
            tc.take_events(),
            vec![TransitionEvent::Settled { view: view("/about") }]
        );
    }

    #[test]
    fn test_exiting_always_precedes_entering() {
        let t0 = Instant::now();
        let mut tc = coordinator(false);
        let targets = ["/a", "/b", "/", "/c", "/c", "/d"];
        let mut now = t0;
        for (i, target) in targets.iter().enumerate() {
            tc.request_transition(view(target), now);
            now += ms(130 * (i as u64 + 1));
            tc.tick(now);
        }
        tc.tick(now + ms(5000));

        let mut last_phase = TransitionPhase::Idle;
        for event in tc.take_events() {
            match event {
                TransitionEvent::ExitStarted { .. } => {
                    assert_eq!(last_phase, TransitionPhase::Idle);
                    last_phase = TransitionPhase::Exiting;
                }
                TransitionEvent::Swapped { .. } => assert_eq!(last_phase, TransitionPhase::Exiting),
                TransitionEvent::EnterStarted { .. } => {
                    assert_eq!(last_phase, TransitionPhase::Exiting);
                    last_phase = TransitionPhase::Entering;
                }
                TransitionEvent::Settled { .. } => {
                    assert_eq!(last_phase, TransitionPhase::Entering);
                    last_phase = TransitionPhase::Idle;
                }
            }
        }
        assert_eq!(last_phase, TransitionPhase::Idle);
    }

    #[test]
    fn test_reduced_motion_collapses_but_keeps_order() {
        let t0 = Instant::now();
        let mut tc = coordinator(true);

        tc.request_transition(view("/contact"), t0);
        assert_eq!(tc.phase(), TransitionPhase::Idle);
        assert_eq!(tc.current_view(), &view("/contact"));
        assert_eq!(tc.take_events(), full_cycle("/", "/contact"));
    }

    #[test]
    fn test_missing_effects_degrade_to_instant_swap() {
        let t0 = Instant::now();
        let mut tc = coordinator(false);
        tc.set_effects_available(false);

        tc.request_transition(view("/about"), t0);
        assert_eq!(tc.phase(), TransitionPhase::Idle);
        assert_eq!(tc.take_events(), full_cycle("/", "/about"));
    }

    #[test]
    fn test_same_view_request_is_ignored() {
        let t0 = Instant::now();
        let mut tc = coordinator(false);
        tc.request_transition(view("/"), t0);
        assert_eq!(tc.phase(), TransitionPhase::Idle);
        assert!(tc.take_events().is_empty());
    }

    #[test]
    fn test_late_tick_catches_up_in_order() {
        let t0 = Instant::now();
        let mut tc = coordinator(false);
        tc.request_transition(view("/about"), t0);

        // A stalled frame loop must not leave the machine stuck
        tc.tick(t0 + ms(60_000));
        assert_eq!(tc.phase(), TransitionPhase::Idle);
        assert_eq!(tc.take_events(), full_cycle("/", "/about"));
    }

    #[test]
    fn test_stop_finishes_cycle_and_is_idempotent() {
        let t0 = Instant::now();
        let mut tc = coordinator(false);
        tc.request_transition(view("/about"), t0);
        tc.request_transition(view("/contact"), t0 + ms(10));

        tc.stop(t0 + ms(100));
        tc.stop(t0 + ms(200));
        assert_eq!(tc.phase(), TransitionPhase::Idle);
        assert_eq!(tc.current_view(), &view("/contact"));
        assert_eq!(tc.take_events(), full_cycle("/", "/contact"));

        // After stop, navigation still swaps content, instantly
        tc.request_transition(view("/services"), t0 + ms(300));
        assert_eq!(tc.phase(), TransitionPhase::Idle);
        assert_eq!(tc.take_events(), full_cycle("/contact", "/services"));
    }

    #[test]
    fn test_phase_progress() {
        let t0 = Instant::now();
        let mut tc = coordinator(false);
        tc.request_transition(view("/about"), t0);

        let (phase, t, spent) = tc.phase_progress(t0 + ms(200));
        assert_eq!(phase, TransitionPhase::Exiting);
        assert!((t - 0.5).abs() < 1e-9);
        assert_eq!(spent, ms(200));
    }
}
