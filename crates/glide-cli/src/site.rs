//! Built-in page layouts used when a scenario does not supply its own

use glide_core::Page;
use glide_motion::reveal::{Depth, ParallaxOptions, RevealOptions};
use glide_motion::{RegionSpec, StaticContent};

fn region(id: &str, top: f64, height: f64, stagger_index: u32, depth: Depth) -> RegionSpec {
    RegionSpec::new(id, top, height).with_options(RevealOptions {
        threshold: None,
        stagger_index,
        depth,
    })
}

pub fn default_site() -> StaticContent {
    StaticContent::new()
        .with_page(
            Page::Home,
            vec![
                region("hero", 0.0, 720.0, 0, Depth::Front),
                region("intro", 820.0, 480.0, 1, Depth::Mid),
                region("capabilities", 1400.0, 720.0, 2, Depth::Back)
                    .with_parallax(ParallaxOptions::default()),
                region("contact-cta", 2240.0, 420.0, 3, Depth::Mid),
            ],
        )
        .with_page(
            Page::Services,
            vec![
                region("header", 0.0, 420.0, 0, Depth::Front),
                region("services", 520.0, 1400.0, 1, Depth::Mid),
                region("options", 2020.0, 600.0, 2, Depth::Back),
            ],
        )
        .with_page(
            Page::Testimonials,
            vec![
                region("header", 0.0, 420.0, 0, Depth::Front),
                region("quotes", 520.0, 1600.0, 1, Depth::Mid),
            ],
        )
        .with_page(
            Page::About,
            vec![
                region("header", 0.0, 420.0, 0, Depth::Front),
                region("story", 520.0, 900.0, 1, Depth::Mid),
            ],
        )
        .with_page(
            Page::Contact,
            vec![
                region("header", 0.0, 420.0, 0, Depth::Front),
                region("form", 520.0, 760.0, 1, Depth::Mid),
            ],
        )
        .with_page(
            Page::NotFound,
            vec![region("message", 0.0, 600.0, 0, Depth::Front)],
        )
}
