//! Geometry-based visibility observer
//!
//! Tracks the bounds of observed regions and reports the first time each
//! one intersects the viewport by at least its threshold. A region stops
//! being observed as soon as it has been reported.

use serde::{Deserialize, Serialize};
use slotmap::SecondaryMap;
use tracing::warn;

use super::RevealHandle;

/// Region position in document coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub top: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Visible window in document coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    /// Scroll offset of the top edge
    pub offset: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(offset: f64, height: f64) -> Self {
        Self { offset, height }
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.offset + self.height
    }

    /// Fraction of `bounds` inside the viewport (0.0-1.0)
    pub fn intersection_ratio(&self, bounds: &Bounds) -> f64 {
        if bounds.height <= 0.0 {
            let inside = bounds.top >= self.offset && bounds.top <= self.bottom();
            return if inside { 1.0 } else { 0.0 };
        }
        let visible = self.bottom().min(bounds.bottom()) - self.offset.max(bounds.top);
        (visible / bounds.height).clamp(0.0, 1.0)
    }

    /// How far the top edge of `bounds` has travelled up into the viewport,
    /// 0.0 at the bottom edge and 1.0 at the top edge
    pub fn penetration(&self, bounds: &Bounds) -> f64 {
        if self.height <= 0.0 {
            return 1.0;
        }
        ((self.bottom() - bounds.top) / self.height).clamp(0.0, 1.0)
    }
}

/// A region reaching its threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub handle: RevealHandle,
    /// `None` when the crossing was forced because measurement failed
    pub ratio: Option<f64>,
}

#[derive(Debug, Clone, Copy)]
struct Target {
    bounds: Bounds,
    threshold: f64,
}

/// One-shot intersection observer
#[derive(Debug, Default)]
pub struct RevealObserver {
    targets: SecondaryMap<RevealHandle, Target>,
}

impl RevealObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, handle: RevealHandle, bounds: Bounds, threshold: f64) {
        self.targets.insert(handle, Target { bounds, threshold });
    }

    pub fn unobserve(&mut self, handle: RevealHandle) {
        self.targets.remove(handle);
    }

    /// Layout moved a region; ignored for regions no longer observed
    pub fn update_bounds(&mut self, handle: RevealHandle, bounds: Bounds) {
        if let Some(target) = self.targets.get_mut(handle) {
            target.bounds = bounds;
        }
    }

    pub fn is_observing(&self, handle: RevealHandle) -> bool {
        self.targets.contains_key(handle)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Measure every observed region against `viewport`
    ///
    /// Regions at or past their threshold are reported once and dropped
    /// from observation. Without a viewport every region is reported, so
    /// content is never left hidden by a measurement failure.
    pub fn measure(&mut self, viewport: Option<Viewport>) -> Vec<Intersection> {
        let crossed: Vec<Intersection> = match viewport {
            Some(viewport) => self
                .targets
                .iter()
                .filter_map(|(handle, target)| {
                    let ratio = viewport.intersection_ratio(&target.bounds);
                    (ratio >= target.threshold).then_some(Intersection {
                        handle,
                        ratio: Some(ratio),
                    })
                })
                .collect(),
            None => {
                if !self.targets.is_empty() {
                    warn!(
                        "Viewport measurement unavailable, revealing {} regions",
                        self.targets.len()
                    );
                }
                self.targets
                    .keys()
                    .map(|handle| Intersection { handle, ratio: None })
                    .collect()
            }
        };

        for intersection in &crossed {
            self.targets.remove(intersection.handle);
        }
        crossed
    }

    pub fn clear(&mut self) {
        self.targets.clear();
    }
}
