//! Ownership tree of the animation drivers
//!
//! The runtime owns one instance of every driver, routes transition events
//! to the reveal controller and scroll engine inside the same tick, and
//! cascades teardown to all of them.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use glide_core::{AppConfig, MotionPreference, Page, RouteTable, ViewKey};
use tracing::{debug, info};

use super::content::ContentSource;
use super::snapshot::{FrameSnapshot, RegionFrame};
use crate::ambient::AmbientAnimator;
use crate::driver::AnimationDriver;
use crate::reveal::parallax::scroll_progress;
use crate::reveal::{Bounds, HeroParallax, ParallaxOptions, RevealHandle, ScrollRevealController, Viewport};
use crate::scroll::{InertialScrollEngine, InputDisposition, ScrollRequest};
use crate::transition::{PageLoader, TransitionCoordinator, TransitionEvent, TransitionFrame};

#[derive(Debug, Clone)]
struct MountedRegion {
    id: String,
    handle: RevealHandle,
    bounds: Option<Bounds>,
    parallax: Option<ParallaxOptions>,
}

pub struct MotionRuntime {
    motion: MotionPreference,
    routes: RouteTable,
    content: Box<dyn ContentSource + Send>,

    transition: TransitionCoordinator,
    reveal: ScrollRevealController,
    scroll: InertialScrollEngine,
    ambient: AmbientAnimator,
    loader: PageLoader,

    started_at: Option<Instant>,
    viewport_height: Option<f64>,
    mounted: Vec<MountedRegion>,
    sections: HashMap<String, f64>,
    /// Routed but not yet reported through a snapshot
    recent_events: Vec<TransitionEvent>,
    torn_down: bool,
}

impl MotionRuntime {
    pub fn new(
        config: &AppConfig,
        motion: MotionPreference,
        content: Box<dyn ContentSource + Send>,
    ) -> Self {
        let transition = TransitionCoordinator::new(
            config.transition.clone(),
            motion.clone(),
            ViewKey::root(),
        );
        Self {
            routes: RouteTable::default(),
            content,
            transition,
            reveal: ScrollRevealController::new(config.reveal.clone()),
            scroll: InertialScrollEngine::new(config.scroll.clone(), motion.clone()),
            ambient: AmbientAnimator::new(config.ambient.clone(), &motion),
            loader: PageLoader::new(
                Duration::from_millis(config.transition.loader_duration_ms),
                motion.clone(),
            ),
            motion,
            started_at: None,
            viewport_height: None,
            mounted: Vec::new(),
            sections: HashMap::new(),
            recent_events: Vec::new(),
            torn_down: false,
        }
    }

    /// Start every driver and mount the initial view
    pub fn start(&mut self, now: Instant) {
        if self.started_at.is_some() || self.torn_down {
            return;
        }
        self.started_at = Some(now);
        self.scroll.start(now);
        self.ambient.start();
        let view = self.transition.current_view().clone();
        self.mount(&view, now);
        info!(
            "Motion runtime started on {} (reduced motion: {})",
            view,
            self.motion.is_reduced()
        );
    }

    pub fn current_view(&self) -> &ViewKey {
        self.transition.current_view()
    }

    pub fn current_page(&self) -> Page {
        self.routes.page(self.transition.current_view())
    }

    pub fn motion(&self) -> &MotionPreference {
        &self.motion
    }

    pub fn transition(&self) -> &TransitionCoordinator {
        &self.transition
    }

    pub fn reveal(&self) -> &ScrollRevealController {
        &self.reveal
    }

    pub fn scroll(&self) -> &InertialScrollEngine {
        &self.scroll
    }

    pub fn ambient(&self) -> &AmbientAnimator {
        &self.ambient
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Navigation event from the router
    ///
    /// Returns the transition events that completed within this call,
    /// which is the whole cycle when motion is reduced.
    pub fn navigate(&mut self, previous: &str, next: &str, now: Instant) -> Vec<TransitionEvent> {
        if self.torn_down {
            return Vec::new();
        }
        match self.routes.navigation(previous, next) {
            Some(view) => {
                debug!("Navigation {} -> {}", previous, view);
                self.transition.request_transition(view, now);
                self.route_transition_events(now)
            }
            None => Vec::new(),
        }
    }

    /// Navigate from the latest requested view
    ///
    /// While a transition runs that is the pending destination, so going
    /// back to the outgoing view mid-exit still replaces the slot.
    pub fn navigate_to(&mut self, path: &str, now: Instant) -> Vec<TransitionEvent> {
        let latest = self
            .transition
            .pending_view()
            .unwrap_or_else(|| self.transition.current_view())
            .to_string();
        self.navigate(&latest, path, now)
    }

    /// Advance every driver by one frame
    ///
    /// Transition phases run first so a swap resets the scroll model
    /// before the engine ticks again.
    pub fn tick(&mut self, now: Instant) -> Vec<TransitionEvent> {
        if self.torn_down {
            return Vec::new();
        }
        self.transition.tick(now);
        let events = self.route_transition_events(now);

        self.scroll.tick(now);
        self.reveal.on_scroll_sample(self.viewport());
        self.reveal.tick(now);
        for event in self.reveal.take_events() {
            debug!("Reveal {:?}", event);
        }
        self.ambient.tick(now);
        self.loader.tick(now);
        events
    }

    pub fn wheel(&mut self, delta: f64) -> InputDisposition {
        self.scroll.on_wheel(delta)
    }

    pub fn touch(&mut self, delta: f64) -> InputDisposition {
        self.scroll.on_touch(delta)
    }

    pub fn anchor_click(&mut self, href: &str, now: Instant) -> InputDisposition {
        self.scroll.on_anchor_click(href, &self.sections, now)
    }

    pub fn scroll_to(&mut self, target: f64, request: ScrollRequest, now: Instant) {
        self.scroll.scroll_to(target, request, now);
    }

    /// Native scroll position, used while the engine is not driving
    pub fn sync_native(&mut self, offset: f64) {
        self.scroll.sync_native(offset);
    }

    /// Viewport height in pixels; `None` when it cannot be measured
    pub fn set_viewport(&mut self, height: Option<f64>) {
        self.viewport_height = height;
        self.update_scroll_limit();
    }

    /// Whether the presentation layer can render transition effects
    pub fn set_effects_available(&mut self, available: bool) {
        self.transition.set_effects_available(available);
    }

    /// Forward a platform reduced-motion change
    pub fn platform_motion_changed(&mut self, reduced: bool) {
        self.motion.platform_changed(reduced);
    }

    /// Current frame; drains the events routed since the last snapshot
    pub fn snapshot(&mut self, now: Instant) -> FrameSnapshot {
        let viewport = self.viewport();
        let scroll = self.scroll.model();
        let page = self.current_page();

        let regions = self
            .mounted
            .iter()
            .filter_map(|region| {
                let reveal = self.reveal.view(region.handle, now)?;
                let parallax = match (region.parallax, region.bounds, viewport) {
                    (Some(options), Some(bounds), Some(viewport)) => {
                        Some(options.frame(scroll_progress(&viewport, &bounds)))
                    }
                    _ => None,
                };
                Some(RegionFrame {
                    id: region.id.clone(),
                    reveal,
                    parallax,
                })
            })
            .collect();

        let transition = if self.torn_down {
            TransitionFrame::idle()
        } else {
            self.transition.frame(now)
        };

        FrameSnapshot {
            at_ms: self
                .started_at
                .map(|start| now.saturating_duration_since(start).as_millis() as u64)
                .unwrap_or(0),
            view: self.transition.current_view().clone(),
            page,
            transition,
            loader_visible: self.loader.is_visible(now),
            scroll,
            ambient: self.ambient.frame(),
            hero: (page == Page::Home).then(|| HeroParallax::at(scroll.current_offset)),
            regions,
            events: std::mem::take(&mut self.recent_events),
        }
    }

    /// Stop every driver, drop every registration and detach from the
    /// platform preference; safe to call repeatedly
    pub fn teardown(&mut self, now: Instant) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        let drivers: [&mut dyn AnimationDriver; 5] = [
            &mut self.transition,
            &mut self.scroll,
            &mut self.reveal,
            &mut self.ambient,
            &mut self.loader,
        ];
        for driver in drivers {
            debug!("Stopping {} driver", driver.name());
            driver.stop(now);
        }
        // Stopping the coordinator may finish a cycle; nothing is mounted
        // any more so its events are dropped.
        self.transition.take_events();
        self.mounted.clear();
        self.sections.clear();
        self.motion.teardown();
        info!("Motion runtime torn down");
    }

    fn viewport(&self) -> Option<Viewport> {
        self.viewport_height
            .map(|height| Viewport::new(self.scroll.current_offset(), height))
    }

    fn route_transition_events(&mut self, now: Instant) -> Vec<TransitionEvent> {
        let events = self.transition.take_events();
        for event in &events {
            if let TransitionEvent::Swapped { from, to } = event {
                self.swap(from, to, now);
            }
        }
        self.recent_events.extend(events.iter().cloned());
        events
    }

    fn swap(&mut self, from: &ViewKey, to: &ViewKey, now: Instant) {
        self.reveal.unregister_view(from);
        self.mounted.clear();
        self.sections.clear();
        self.scroll.reset_to_top();
        self.loader.show(now);
        self.mount(to, now);
    }

    fn mount(&mut self, view: &ViewKey, now: Instant) {
        let page = self.routes.page(view);
        for region in self.content.regions(page) {
            let handle = self.reveal.register(view, region.bounds, region.options, now);
            if let Some(bounds) = region.bounds {
                self.sections.insert(region.id.clone(), bounds.top);
            }
            self.mounted.push(MountedRegion {
                id: region.id,
                handle,
                bounds: region.bounds,
                parallax: region.parallax,
            });
        }
        debug!("Mounted {} regions for {} ({:?})", self.mounted.len(), view, page);
        self.update_scroll_limit();
    }

    fn update_scroll_limit(&mut self) {
        let Some(height) = self.viewport_height else {
            return;
        };
        let document = self
            .mounted
            .iter()
            .filter_map(|region| region.bounds.map(|bounds| bounds.bottom()))
            .fold(0.0_f64, f64::max);
        self.scroll.set_limit(document - height);
    }
}

impl Drop for MotionRuntime {
    fn drop(&mut self) {
        self.teardown(Instant::now());
    }
}
