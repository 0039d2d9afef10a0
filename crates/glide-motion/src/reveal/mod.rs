//! Progressive reveal of content regions as they scroll into view
//!
//! - `observer` - geometry and one-shot threshold crossings
//! - `controller` - registrations, stagger and depth offset
//! - `parallax` - scroll-linked translation/opacity/scale helpers

pub mod controller;
pub mod observer;
pub mod parallax;

slotmap::new_key_type! {
    /// Handle to a reveal registration; stale handles never alias new ones
    pub struct RevealHandle;
}

pub use controller::{Crossing, Depth, RevealEvent, RevealOptions, RevealView, ScrollRevealController};
pub use observer::{Bounds, Intersection, RevealObserver, Viewport};
pub use parallax::{HeroParallax, ParallaxDirection, ParallaxFrame, ParallaxOptions};
