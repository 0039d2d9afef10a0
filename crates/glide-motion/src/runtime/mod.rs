//! Driver ownership and real-time scheduling
//!
//! - `content` - regions each page mounts
//! - `orchestrator` - [`MotionRuntime`], one instance of every driver plus event routing
//! - `snapshot` - serializable frame output
//! - `frame_loop` - tokio loop that ticks the runtime and applies host commands

pub mod content;
pub mod frame_loop;
pub mod orchestrator;
pub mod snapshot;

pub use content::{ContentSource, RegionSpec, StaticContent};
pub use frame_loop::{FrameLoop, RuntimeCommand};
pub use orchestrator::MotionRuntime;
pub use snapshot::{FrameSnapshot, RegionFrame};
