//! Scripted input for `glide simulate`
//!
//! ```toml
//! duration_ms = 2500
//! viewport_height = 800.0
//!
//! [[steps]]
//! at_ms = 100
//! action = "navigate"
//! path = "/services"
//!
//! [[steps]]
//! at_ms = 900
//! action = "wheel"
//! delta = 240.0
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use glide_core::{Error, Page, Result};
use glide_motion::{RegionSpec, RuntimeCommand, StaticContent};

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Navigate { path: String },
    Wheel { delta: f64 },
    Touch { delta: f64 },
    Anchor { href: String },
    ReducedMotion { reduced: bool },
    Viewport { height: Option<f64> },
    EffectsAvailable { available: bool },
}

impl From<Action> for RuntimeCommand {
    fn from(action: Action) -> Self {
        match action {
            Action::Navigate { path } => RuntimeCommand::Navigate { path },
            Action::Wheel { delta } => RuntimeCommand::Wheel { delta },
            Action::Touch { delta } => RuntimeCommand::Touch { delta },
            Action::Anchor { href } => RuntimeCommand::Anchor { href },
            Action::ReducedMotion { reduced } => RuntimeCommand::ReducedMotion(reduced),
            Action::Viewport { height } => RuntimeCommand::Viewport(height),
            Action::EffectsAvailable { available } => RuntimeCommand::EffectsAvailable(available),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    pub at_ms: u64,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default = "default_name")]
    pub name: String,
    /// Total run time; defaults to one second past the last step
    #[serde(default)]
    pub duration_ms: Option<u64>,
    #[serde(default = "default_viewport_height")]
    pub viewport_height: Option<f64>,
    #[serde(default)]
    pub steps: Vec<Step>,
    /// Page layouts replacing the built-in ones
    #[serde(default)]
    pub pages: PageOverrides,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PageOverrides {
    pub home: Option<Vec<RegionSpec>>,
    pub services: Option<Vec<RegionSpec>>,
    pub testimonials: Option<Vec<RegionSpec>>,
    pub about: Option<Vec<RegionSpec>>,
    pub contact: Option<Vec<RegionSpec>>,
    pub not_found: Option<Vec<RegionSpec>>,
}

impl PageOverrides {
    fn iter(&self) -> impl Iterator<Item = (Page, &Vec<RegionSpec>)> {
        [
            (Page::Home, &self.home),
            (Page::Services, &self.services),
            (Page::Testimonials, &self.testimonials),
            (Page::About, &self.about),
            (Page::Contact, &self.contact),
            (Page::NotFound, &self.not_found),
        ]
        .into_iter()
        .filter_map(|(page, regions)| regions.as_ref().map(|regions| (page, regions)))
    }
}

fn default_name() -> String {
    "scenario".to_string()
}

fn default_viewport_height() -> Option<f64> {
    Some(800.0)
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let mut scenario: Scenario =
            toml::from_str(content).map_err(|e| Error::Scenario(e.to_string()))?;
        scenario.steps.sort_by_key(|step| step.at_ms);
        Ok(scenario)
    }

    /// Three navigations inside 50 ms, then some scrolling on the last page
    pub fn burst() -> Self {
        let step = |at_ms, action| Step { at_ms, action };
        let navigate = |path: &str| Action::Navigate {
            path: path.to_string(),
        };
        Self {
            name: "navigation burst".to_string(),
            duration_ms: Some(3000),
            viewport_height: default_viewport_height(),
            steps: vec![
                step(200, navigate("/services")),
                step(220, navigate("/testimonials")),
                step(245, navigate("/contact")),
                step(1600, Action::Wheel { delta: 300.0 }),
                step(1700, Action::Anchor {
                    href: "#form".to_string(),
                }),
            ],
            pages: PageOverrides::default(),
        }
    }

    pub fn duration(&self) -> Duration {
        let millis = self.duration_ms.unwrap_or_else(|| {
            self.steps.last().map(|step| step.at_ms).unwrap_or(0) + 1000
        });
        Duration::from_millis(millis)
    }

    /// Built-in site with this scenario's page overrides applied
    pub fn content(&self, base: StaticContent) -> StaticContent {
        self.pages
            .iter()
            .fold(base, |content, (page, regions)| content.with_page(page, regions.clone()))
    }
}
