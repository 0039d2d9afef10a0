//! Revealable regions supplied by the content layer

use std::collections::HashMap;

use glide_core::Page;
use serde::Deserialize;

use crate::reveal::{Bounds, ParallaxOptions, RevealOptions};

/// One revealable region of a page
#[derive(Debug, Clone, Deserialize)]
pub struct RegionSpec {
    /// Anchor id; also the section name used for `#id` links
    pub id: String,
    /// Document position, `None` when layout cannot be measured
    #[serde(default)]
    pub bounds: Option<Bounds>,
    #[serde(default, flatten)]
    pub options: RevealOptions,
    #[serde(default)]
    pub parallax: Option<ParallaxOptions>,
}

impl RegionSpec {
    pub fn new(id: impl Into<String>, top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            bounds: Some(Bounds::new(top, height)),
            options: RevealOptions::default(),
            parallax: None,
        }
    }

    pub fn with_options(mut self, options: RevealOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_parallax(mut self, parallax: ParallaxOptions) -> Self {
        self.parallax = Some(parallax);
        self
    }
}

/// Supplies the regions a page mounts
pub trait ContentSource {
    fn regions(&self, page: Page) -> Vec<RegionSpec>;
}

/// Fixed page layouts
#[derive(Debug, Clone, Default)]
pub struct StaticContent {
    pages: HashMap<Page, Vec<RegionSpec>>,
}

impl StaticContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: Page, regions: Vec<RegionSpec>) -> Self {
        self.pages.insert(page, regions);
        self
    }
}

impl ContentSource for StaticContent {
    fn regions(&self, page: Page) -> Vec<RegionSpec> {
        self.pages.get(&page).cloned().unwrap_or_default()
    }
}
