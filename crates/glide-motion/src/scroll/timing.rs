//! L4 Atomic Layer: Time calculation utilities for animations
//!
//! All functions take the current instant explicitly so callers can drive
//! them from a frame clock or a test clock.

use std::time::{Duration, Instant};

/// Calculate animation progress (0.0 to 1.0) from start time and duration
///
/// # Arguments
/// * `start` - Animation start time
/// * `now` - Current frame time
/// * `duration` - Total animation duration
///
/// # Returns
/// Progress value clamped to [0.0, 1.0]
#[inline]
pub fn progress(start: Instant, now: Instant, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let ratio = elapsed(start, now).as_secs_f64() / duration.as_secs_f64();
    ratio.clamp(0.0, 1.0)
}

/// Check if animation is complete
#[inline]
pub fn is_complete(start: Instant, now: Instant, duration: Duration) -> bool {
    elapsed(start, now) >= duration
}

/// Time since `start`, zero if `now` is earlier
#[inline]
pub fn elapsed(start: Instant, now: Instant) -> Duration {
    now.saturating_duration_since(start)
}

/// Linear interpolation between two values
///
/// # Arguments
/// * `from` - Start value
/// * `to` - End value
/// * `t` - Interpolation factor [0.0, 1.0]
///
/// # Returns
/// Interpolated value
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}
