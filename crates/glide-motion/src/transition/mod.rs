//! Page transitions
//!
//! - `coordinator` - exit / swap / enter state machine with request coalescing
//! - `overlay` - per-frame dissolve, wipe and scan-line values
//! - `loader` - loading indicator timer started on every swap

pub mod coordinator;
pub mod loader;
pub mod overlay;

pub use coordinator::{TransitionCoordinator, TransitionEvent, TransitionPhase};
pub use loader::PageLoader;
pub use overlay::{TransitionFrame, WipeOrigin};
