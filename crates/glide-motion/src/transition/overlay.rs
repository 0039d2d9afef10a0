//! Overlay values for the dissolve, wipe and scan-line treatment
//!
//! Pure functions of the coordinator phase and its raw progress, so the
//! presentation layer only has to paint what it is handed.

use std::time::{Duration, Instant};

use glide_core::EasingType;
use serde::Serialize;

use super::coordinator::{TransitionCoordinator, TransitionPhase};
use crate::scroll::easing::EasingTypeExt;
use crate::scroll::timing::lerp;

/// Content blur while fully outside the viewport
pub const MAX_BLUR_PX: f64 = 8.0;

const WIPE_ENTER_DELAY: Duration = Duration::from_millis(100);
const WIPE_ENTER_DURATION: Duration = Duration::from_millis(500);
const SCAN_DELAY: Duration = Duration::from_millis(100);
const SCAN_DURATION: Duration = Duration::from_millis(400);

/// Edge the wipe overlay grows from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WipeOrigin {
    Left,
    Right,
}

/// Everything needed to paint one frame of a page transition
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransitionFrame {
    pub phase: TransitionPhase,
    /// Eased progress of the running phase
    pub progress: f64,
    pub content_opacity: f64,
    pub blur_px: f64,
    /// Clip insets of the content, as fractions of its width
    pub clip_left: f64,
    pub clip_right: f64,
    pub wipe_scale_x: f64,
    pub wipe_origin: WipeOrigin,
    /// Vertical position of the scan line (0.0 top, 1.0 bottom), if drawn
    pub scan_line: Option<f64>,
}

impl TransitionFrame {
    /// Content at rest, no overlay
    pub fn idle() -> Self {
        Self {
            phase: TransitionPhase::Idle,
            progress: 1.0,
            content_opacity: 1.0,
            blur_px: 0.0,
            clip_left: 0.0,
            clip_right: 0.0,
            wipe_scale_x: 0.0,
            wipe_origin: WipeOrigin::Left,
            scan_line: None,
        }
    }

    /// Compute a frame from the raw phase progress and time spent in it
    pub fn compute(phase: TransitionPhase, raw: f64, spent: Duration, easing: EasingType) -> Self {
        let eased = easing.apply(raw);
        match phase {
            TransitionPhase::Idle => Self::idle(),
            TransitionPhase::Exiting => Self {
                phase,
                progress: eased,
                content_opacity: 1.0 - eased,
                blur_px: lerp(0.0, MAX_BLUR_PX, eased),
                // Content is clipped away towards the right edge
                clip_left: eased,
                clip_right: 0.0,
                wipe_scale_x: eased,
                wipe_origin: WipeOrigin::Left,
                scan_line: None,
            },
            TransitionPhase::Entering => {
                let wipe = easing.apply(delayed(spent, WIPE_ENTER_DELAY, WIPE_ENTER_DURATION));
                let scan = spent
                    .checked_sub(SCAN_DELAY)
                    .filter(|since| *since < SCAN_DURATION)
                    .map(|since| since.as_secs_f64() / SCAN_DURATION.as_secs_f64());
                Self {
                    phase,
                    progress: eased,
                    content_opacity: eased,
                    blur_px: lerp(MAX_BLUR_PX, 0.0, eased),
                    clip_left: 0.0,
                    clip_right: 1.0 - eased,
                    wipe_scale_x: 1.0 - wipe,
                    wipe_origin: WipeOrigin::Right,
                    scan_line: scan,
                }
            }
        }
    }
}

/// Progress of a sub-animation that starts `delay` into the phase
fn delayed(spent: Duration, delay: Duration, duration: Duration) -> f64 {
    match spent.checked_sub(delay) {
        Some(since) if !duration.is_zero() => {
            (since.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
        }
        Some(_) => 1.0,
        None => 0.0,
    }
}

impl TransitionCoordinator {
    /// Overlay frame for the current phase
    pub fn frame(&self, now: Instant) -> TransitionFrame {
        let (phase, raw, spent) = self.phase_progress(now);
        TransitionFrame::compute(phase, raw, spent, self.easing())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_idle_frame_is_at_rest() {
        let frame = TransitionFrame::compute(TransitionPhase::Idle, 0.3, ms(10), EasingType::Standard);
        assert_eq!(frame, TransitionFrame::idle());
    }

    #[test]
    fn test_exit_dissolves_out() {
        let start = TransitionFrame::compute(TransitionPhase::Exiting, 0.0, ms(0), EasingType::Linear);
        assert_eq!(start.content_opacity, 1.0);
        assert_eq!(start.blur_px, 0.0);
        assert_eq!(start.wipe_scale_x, 0.0);

        let end = TransitionFrame::compute(TransitionPhase::Exiting, 1.0, ms(400), EasingType::Linear);
        assert_eq!(end.content_opacity, 0.0);
        assert_eq!(end.blur_px, MAX_BLUR_PX);
        assert_eq!(end.wipe_scale_x, 1.0);
        assert_eq!(end.wipe_origin, WipeOrigin::Left);
        assert_eq!(end.scan_line, None);
    }

    #[test]
    fn test_enter_wipe_and_scan_are_delayed() {
        let early = TransitionFrame::compute(TransitionPhase::Entering, 0.05, ms(30), EasingType::Linear);
        assert_eq!(early.wipe_scale_x, 1.0);
        assert_eq!(early.wipe_origin, WipeOrigin::Right);
        assert_eq!(early.scan_line, None);

        let mid = TransitionFrame::compute(TransitionPhase::Entering, 0.5, ms(300), EasingType::Linear);
        assert!((mid.scan_line.unwrap_or(-1.0) - 0.5).abs() < 1e-9);
        assert!((mid.wipe_scale_x - 0.6).abs() < 1e-9);
        assert!((mid.blur_px - 4.0).abs() < 1e-9);

        // Scan line is gone once it reaches the bottom
        let late = TransitionFrame::compute(TransitionPhase::Entering, 0.95, ms(570), EasingType::Linear);
        assert_eq!(late.scan_line, None);
    }

    #[test]
    fn test_coordinator_frame_follows_phase() {
        use glide_core::{MotionPreference, TransitionConfig, ViewKey};

        let t0 = Instant::now();
        let mut coordinator = TransitionCoordinator::new(
            TransitionConfig::default(),
            MotionPreference::new(false),
            ViewKey::root(),
        );
        assert_eq!(coordinator.frame(t0), TransitionFrame::idle());

        coordinator.request_transition(ViewKey::from_path("/about"), t0);
        let exiting = coordinator.frame(t0 + ms(200));
        assert_eq!(exiting.phase, TransitionPhase::Exiting);
        assert!(exiting.content_opacity < 1.0);

        let entering = coordinator.frame(t0 + ms(400));
        // Frames are read-only; the phase only moves on tick
        assert_eq!(entering.phase, TransitionPhase::Exiting);
        assert_eq!(entering.content_opacity, 0.0);
    }

    #[test]
    fn test_standard_easing_leads_linear() {
        let linear = TransitionFrame::compute(TransitionPhase::Exiting, 0.5, ms(200), EasingType::Linear);
        let standard = TransitionFrame::compute(TransitionPhase::Exiting, 0.5, ms(200), EasingType::Standard);
        assert!(standard.progress > linear.progress);
    }
}
