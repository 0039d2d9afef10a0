//! Animation drivers for page transitions, scroll reveals, inertial
//! scrolling and the ambient background.
//!
//! Every driver is plain single-threaded state advanced by an explicit
//! `tick(now)`; [`runtime::MotionRuntime`] owns one of each and
//! [`runtime::FrameLoop`] ticks it from a tokio interval.

pub mod ambient;
pub mod driver;
pub mod reveal;
pub mod runtime;
pub mod scroll;
pub mod transition;

pub use ambient::{AmbientAnimator, AmbientFrame};
pub use driver::{AnimationDriver, DriverState};
pub use reveal::{Bounds, Depth, RevealHandle, RevealOptions, RevealView, ScrollRevealController, Viewport};
pub use runtime::{ContentSource, FrameLoop, FrameSnapshot, MotionRuntime, RegionSpec, RuntimeCommand, StaticContent};
pub use scroll::{InertialScrollEngine, InputDisposition, ScrollModel, ScrollRequest};
pub use transition::{PageLoader, TransitionCoordinator, TransitionEvent, TransitionFrame, TransitionPhase};
