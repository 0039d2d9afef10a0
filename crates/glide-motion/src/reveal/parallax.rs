//! Scroll-linked parallax values
//!
//! Piecewise-linear mappings from scroll progress to translation, opacity
//! and scale, used for the hero block and for parallax sections.

use serde::{Deserialize, Serialize};

use super::observer::{Bounds, Viewport};

/// Map `input` through matching breakpoint ranges, clamping at both ends
///
/// `input_range` must be ascending and the same length as `output_range`.
pub fn interpolate(input: f64, input_range: &[f64], output_range: &[f64]) -> f64 {
    let points = input_range.len().min(output_range.len());
    if points == 0 {
        return input;
    }
    if points == 1 || input <= input_range[0] {
        return output_range[0];
    }
    if input >= input_range[points - 1] {
        return output_range[points - 1];
    }

    for i in 1..points {
        let (x0, x1) = (input_range[i - 1], input_range[i]);
        if input <= x1 {
            let span = x1 - x0;
            let t = if span > 0.0 { (input - x0) / span } else { 1.0 };
            return output_range[i - 1] + (output_range[i] - output_range[i - 1]) * t;
        }
    }
    output_range[points - 1]
}

/// Progress of a region through the viewport: 0.0 when its top meets the
/// viewport bottom, 1.0 when its bottom leaves through the viewport top
pub fn scroll_progress(viewport: &Viewport, bounds: &Bounds) -> f64 {
    let travel = viewport.height + bounds.height;
    if travel <= 0.0 {
        return 0.0;
    }
    ((viewport.bottom() - bounds.top) / travel).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParallaxDirection {
    #[default]
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallaxOptions {
    pub speed: f64,
    pub direction: ParallaxDirection,
}

impl Default for ParallaxOptions {
    fn default() -> Self {
        Self {
            speed: 0.5,
            direction: ParallaxDirection::Up,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParallaxFrame {
    pub y: f64,
    pub opacity: f64,
    pub scale: f64,
}

impl ParallaxOptions {
    pub fn frame(&self, progress: f64) -> ParallaxFrame {
        let sign = match self.direction {
            ParallaxDirection::Up => -1.0,
            ParallaxDirection::Down => 1.0,
        };
        let travel = 100.0 * self.speed * sign;
        ParallaxFrame {
            y: interpolate(progress, &[0.0, 1.0], &[travel, -travel]),
            opacity: interpolate(progress, &[0.0, 0.2, 0.8, 1.0], &[0.6, 1.0, 1.0, 0.6]),
            scale: interpolate(progress, &[0.0, 0.5, 1.0], &[0.95, 1.0, 0.95]),
        }
    }
}

/// Layered offsets for the landing hero; deeper layers move further
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeroParallax {
    pub title_y: f64,
    pub subtitle_y: f64,
    pub cta_y: f64,
    pub opacity: f64,
    pub scale: f64,
}

impl HeroParallax {
    pub fn at(scroll_y: f64) -> Self {
        Self {
            title_y: interpolate(scroll_y, &[0.0, 500.0], &[0.0, 50.0]),
            subtitle_y: interpolate(scroll_y, &[0.0, 500.0], &[0.0, 75.0]),
            cta_y: interpolate(scroll_y, &[0.0, 500.0], &[0.0, 100.0]),
            opacity: interpolate(scroll_y, &[0.0, 300.0], &[1.0, 0.0]),
            scale: interpolate(scroll_y, &[0.0, 300.0], &[1.0, 0.95]),
        }
    }
}
