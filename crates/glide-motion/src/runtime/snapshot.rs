//! Serializable view of one rendered frame

use glide_core::{Page, Result, ViewKey};
use serde::Serialize;

use crate::ambient::AmbientFrame;
use crate::reveal::{HeroParallax, ParallaxFrame, RevealView};
use crate::scroll::ScrollModel;
use crate::transition::{TransitionEvent, TransitionFrame};

/// Render state of one mounted region
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionFrame {
    pub id: String,
    #[serde(flatten)]
    pub reveal: RevealView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallax: Option<ParallaxFrame>,
}

/// Everything the presentation layer paints for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSnapshot {
    /// Milliseconds since the runtime started
    pub at_ms: u64,
    pub view: ViewKey,
    pub page: Page,
    pub transition: TransitionFrame,
    pub loader_visible: bool,
    pub scroll: ScrollModel,
    pub ambient: Option<AmbientFrame>,
    /// Only on the home page
    pub hero: Option<HeroParallax>,
    pub regions: Vec<RegionFrame>,
    /// Transition events routed since the previous snapshot
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<TransitionEvent>,
}

impl FrameSnapshot {
    pub fn visible_regions(&self) -> usize {
        self.regions.iter().filter(|region| region.reveal.visible).count()
    }

    /// One JSON object per line
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| glide_core::Error::Other(e.to_string()))
    }
}
