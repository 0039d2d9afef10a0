use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub reveal: RevealConfig,
    #[serde(default)]
    pub transition: TransitionConfig,
    #[serde(default)]
    pub ambient: AmbientConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Override the platform reduced-motion answer (unset = ask the platform)
    #[serde(default)]
    pub force_reduced: Option<bool>,
}

/// Easing curve selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    /// Jump to the end value
    None,
    Linear,
    /// Cubic ease-out: 1 - (1-t)³
    Cubic,
    /// Quintic ease-out: 1 - (1-t)⁵
    Quintic,
    /// Exponential ease-out
    EaseOut,
    /// Symmetric cubic ease-in/out
    EaseInOutCubic,
    /// cubic-bezier(0.25, 0.46, 0.45, 0.94), used by page transitions
    Standard,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Replace native scrolling with the inertial engine
    #[serde(default = "default_true")]
    pub smooth_enabled: bool,
    /// Duration of a scroll tween in milliseconds
    #[serde(default = "default_scroll_duration")]
    pub animation_duration_ms: u64,
    /// Easing curve for scroll tweens
    #[serde(default = "default_scroll_easing")]
    pub easing: EasingType,
    /// Duration of an anchor jump in milliseconds
    #[serde(default = "default_anchor_duration")]
    pub anchor_duration_ms: u64,
    /// Offset applied to anchor targets (negative leaves room for the header)
    #[serde(default = "default_anchor_offset")]
    pub anchor_offset: f64,
    /// Multiplier applied to wheel deltas
    #[serde(default = "default_wheel_multiplier")]
    pub wheel_multiplier: f64,
    /// Multiplier applied to touch deltas
    #[serde(default = "default_touch_multiplier")]
    pub touch_multiplier: f64,
    /// Frame rate of the animation loop
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smooth_enabled: default_true(),
            animation_duration_ms: default_scroll_duration(),
            easing: default_scroll_easing(),
            anchor_duration_ms: default_anchor_duration(),
            anchor_offset: default_anchor_offset(),
            wheel_multiplier: default_wheel_multiplier(),
            touch_multiplier: default_touch_multiplier(),
            animation_fps: default_animation_fps(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealConfig {
    /// Intersection fraction at which a region reveals (0.0-1.0)
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Delay per stagger index in milliseconds
    #[serde(default = "default_stagger_unit")]
    pub stagger_unit_ms: u64,
    /// Upper bound for any stagger delay
    #[serde(default = "default_max_stagger")]
    pub max_stagger_ms: u64,
    /// Residual offset for mid-depth regions, in pixels
    #[serde(default = "default_mid_depth")]
    pub mid_depth_px: f64,
    /// Residual offset for back-depth regions, in pixels
    #[serde(default = "default_back_depth")]
    pub back_depth_px: f64,
    /// How long after activation the depth offset keeps being recomputed
    #[serde(default = "default_depth_settle")]
    pub depth_settle_ms: u64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            stagger_unit_ms: default_stagger_unit(),
            max_stagger_ms: default_max_stagger(),
            mid_depth_px: default_mid_depth(),
            back_depth_px: default_back_depth(),
            depth_settle_ms: default_depth_settle(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionConfig {
    /// Play exit/enter effects (false = instant swaps)
    #[serde(default = "default_true")]
    pub effects_enabled: bool,
    /// Exit phase duration in milliseconds
    #[serde(default = "default_exit_duration")]
    pub exit_duration_ms: u64,
    /// Enter phase duration in milliseconds
    #[serde(default = "default_enter_duration")]
    pub enter_duration_ms: u64,
    /// Easing curve for overlay progress
    #[serde(default = "default_transition_easing")]
    pub easing: EasingType,
    /// How long the loading indicator stays up after a swap
    #[serde(default = "default_loader_duration")]
    pub loader_duration_ms: u64,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            effects_enabled: default_true(),
            exit_duration_ms: default_exit_duration(),
            enter_duration_ms: default_enter_duration(),
            easing: default_transition_easing(),
            loader_duration_ms: default_loader_duration(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmbientConfig {
    /// Draw the drifting background
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Phase advance per tick (radians)
    #[serde(default = "default_phase_step")]
    pub phase_step: f64,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            phase_step: default_phase_step(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_scroll_duration() -> u64 {
    1400
}

fn default_scroll_easing() -> EasingType {
    EasingType::EaseInOutCubic
}

fn default_anchor_duration() -> u64 {
    1200
}

fn default_anchor_offset() -> f64 {
    -80.0 // Height of the fixed header
}

fn default_wheel_multiplier() -> f64 {
    0.8
}

fn default_touch_multiplier() -> f64 {
    1.5
}

fn default_animation_fps() -> u32 {
    60
}

fn default_threshold() -> f64 {
    0.15
}

fn default_stagger_unit() -> u64 {
    80
}

fn default_max_stagger() -> u64 {
    360
}

fn default_mid_depth() -> f64 {
    2.0
}

fn default_back_depth() -> f64 {
    4.0
}

fn default_depth_settle() -> u64 {
    1200
}

fn default_exit_duration() -> u64 {
    400
}

fn default_enter_duration() -> u64 {
    600
}

fn default_transition_easing() -> EasingType {
    EasingType::Standard
}

fn default_loader_duration() -> u64 {
    300
}

fn default_phase_step() -> f64 {
    0.00008 // Full drift cycle takes several minutes at 60fps
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, falling back to defaults
    /// when the file does not exist
    pub fn load_from(path: &std::path::Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&config_path, self.to_toml()?)?;

        Ok(())
    }

    /// Render configuration as pretty TOML
    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/glide/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("glide")
            .join("config.toml")
    }
}
