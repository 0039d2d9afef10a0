//! Inertial scrolling
//!
//! Replaces native scroll physics with an eased scroll model.
//!
//! ## L4 Atomic Layer
//! - `easing` - Pure easing functions (cubic, in/out cubic, bezier)
//! - `timing` - Time calculation utilities (progress, interpolation)
//! - `config` - Configuration types and defaults (re-exported from glide-core)
//!
//! ## L3 Molecular Layer
//! - `engine` - Scroll engine combining atoms
//!
//! # Usage
//!
//! ```ignore
//! use glide_motion::scroll::{InertialScrollEngine, ScrollRequest};
//!
//! let mut engine = InertialScrollEngine::new(config.scroll.clone(), motion.clone());
//! engine.start(now);
//!
//! engine.on_wheel(120.0);
//! engine.scroll_to(2000.0, ScrollRequest::default(), now);
//!
//! // In the frame loop, tick and read the eased offset
//! engine.tick(now);
//! let offset = engine.current_offset();
//! ```

// L4 Atomic Layer
pub mod config;
pub mod easing;
pub mod timing;

// L3 Molecular Layer
pub mod engine;

// Re-exports for convenient access
pub use config::{ScrollConfig, ScrollConfigExt};
pub use easing::{CubicBezier, EasingType, EasingTypeExt};
pub use engine::{InertialScrollEngine, InputDisposition, ScrollModel, ScrollRequest, SectionLookup};
