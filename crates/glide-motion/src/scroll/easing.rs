//! L4 Atomic Layer: Pure easing functions
//!
//! Maps progress in [0, 1] to eased progress in [0, 1].

pub use glide_core::EasingType;

/// Extension trait for EasingType with calculation methods
pub trait EasingTypeExt {
    /// Apply the easing function to a progress value
    ///
    /// # Arguments
    /// * `t` - Progress value in range [0, 1]
    ///
    /// # Returns
    /// Eased value in range [0, 1]
    fn apply(&self, t: f64) -> f64;
}

impl EasingTypeExt for EasingType {
    #[inline]
    fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingType::None => if t < 1.0 { 0.0 } else { 1.0 },
            EasingType::Linear => t,
            EasingType::Cubic => cubic_ease_out(t),
            EasingType::Quintic => quintic_ease_out(t),
            EasingType::EaseOut => exponential_ease_out(t),
            EasingType::EaseInOutCubic => ease_in_out_cubic(t),
            EasingType::Standard => CubicBezier::STANDARD.solve(t),
        }
    }
}

/// Cubic ease-out: f(t) = 1 - (1-t)³
#[inline]
fn cubic_ease_out(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

/// Quintic ease-out: f(t) = 1 - (1-t)⁵
#[inline]
fn quintic_ease_out(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv * inv * inv
}

/// Exponential ease-out: f(t) = 1 - 2^(-10t)
#[inline]
fn exponential_ease_out(t: f64) -> f64 {
    if t >= 1.0 {
        1.0
    } else {
        1.0 - 2.0_f64.powf(-10.0 * t)
    }
}

/// Symmetric cubic ease-in/out: 4t³ below the midpoint, 1 - (-2t+2)³/2 above
#[inline]
pub fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// CSS-style cubic bezier through (0,0), (x1,y1), (x2,y2), (1,1)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl CubicBezier {
    pub const STANDARD: CubicBezier = CubicBezier::new(0.25, 0.46, 0.45, 0.94);

    const NEWTON_ITERATIONS: usize = 8;
    const EPSILON: f64 = 1e-7;

    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Eased output for time `t`
    pub fn solve(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        let s = self.parameter_for_x(t);
        Self::sample(self.y1, self.y2, s)
    }

    fn sample(p1: f64, p2: f64, s: f64) -> f64 {
        let inv = 1.0 - s;
        3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
    }

    fn slope(p1: f64, p2: f64, s: f64) -> f64 {
        let inv = 1.0 - s;
        3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
    }

    fn parameter_for_x(&self, x: f64) -> f64 {
        // Newton-Raphson first, bisection when the slope flattens out
        let mut s = x;
        for _ in 0..Self::NEWTON_ITERATIONS {
            let err = Self::sample(self.x1, self.x2, s) - x;
            if err.abs() < Self::EPSILON {
                return s;
            }
            let d = Self::slope(self.x1, self.x2, s);
            if d.abs() < 1e-6 {
                break;
            }
            s -= err / d;
        }

        let (mut lo, mut hi) = (0.0, 1.0);
        s = x;
        while hi - lo > Self::EPSILON {
            let value = Self::sample(self.x1, self.x2, s);
            if (value - x).abs() < Self::EPSILON {
                break;
            }
            if value < x {
                lo = s;
            } else {
                hi = s;
            }
            s = (lo + hi) / 2.0;
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [EasingType; 7] = [
        EasingType::None,
        EasingType::Linear,
        EasingType::Cubic,
        EasingType::Quintic,
        EasingType::EaseOut,
        EasingType::EaseInOutCubic,
        EasingType::Standard,
    ];

    #[test]
    fn test_easing_boundaries() {
        for easing in ALL {
            // t=0 should give 0 (except None which jumps)
            if easing != EasingType::None {
                assert!((easing.apply(0.0) - 0.0).abs() < 0.001, "{:?} at t=0", easing);
            }
            // t=1 should give 1
            assert!((easing.apply(1.0) - 1.0).abs() < 0.001, "{:?} at t=1", easing);
        }
    }

    #[test]
    fn test_easing_monotonic() {
        for easing in ALL.into_iter().filter(|e| *e != EasingType::None) {
            let mut prev = 0.0;
            for i in 0..=20 {
                let t = i as f64 / 20.0;
                let v = easing.apply(t);
                assert!(v >= prev - 1e-9, "{:?} not monotonic at t={}", easing, t);
                prev = v;
            }
        }
    }

    #[test]
    fn test_in_out_cubic_is_symmetric() {
        assert!((ease_in_out_cubic(0.5) - 0.5).abs() < 1e-9);
        assert!((ease_in_out_cubic(0.25) - 0.0625).abs() < 1e-9);
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            let mirrored = 1.0 - ease_in_out_cubic(1.0 - t);
            assert!((ease_in_out_cubic(t) - mirrored).abs() < 1e-9);
        }
    }

    #[test]
    fn test_bezier_matches_known_points() {
        // A linear bezier must reproduce its input
        let linear = CubicBezier::new(1.0 / 3.0, 1.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0);
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            assert!((linear.solve(t) - t).abs() < 1e-4);
        }

        // The standard curve is an ease-out: ahead of linear at the midpoint
        let mid = CubicBezier::STANDARD.solve(0.5);
        assert!(mid > 0.5 && mid < 1.0, "mid = {}", mid);
    }
}
