pub mod config;
pub mod error;
pub mod motion;
pub mod route;

pub use config::{
    AmbientConfig, AppConfig, EasingType, MotionConfig, RevealConfig, ScrollConfig,
    TransitionConfig,
};
pub use error::{Error, Result};
pub use motion::{EnvMotionQuery, ListenerId, MotionPreference, MotionQuery};
pub use route::{Page, RouteTable, ViewKey};
