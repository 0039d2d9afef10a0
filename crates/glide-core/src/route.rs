//! Routed views and the navigation path → [`ViewKey`] mapping

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

/// Base used to resolve relative navigation paths
const PATH_BASE: &str = "http://glide.invalid/";

/// Identity of the routed view currently on screen
///
/// Derived from the normalized navigation path, so two paths that differ
/// only by query string, fragment or trailing slash name the same view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ViewKey(String);

impl ViewKey {
    /// Build a key from a raw navigation path
    pub fn from_path(path: &str) -> Self {
        Self(normalize_path(path))
    }

    pub fn root() -> Self {
        Self("/".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ViewKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Page rendered for a view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Home,
    Services,
    Testimonials,
    About,
    Contact,
    NotFound,
}

/// Known routes of the site with a catch-all fallback
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<(ViewKey, Page)>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new([
            ("/", Page::Home),
            ("/services", Page::Services),
            ("/testimonials", Page::Testimonials),
            ("/about", Page::About),
            ("/contact", Page::Contact),
        ])
    }
}

impl RouteTable {
    pub fn new<'a>(routes: impl IntoIterator<Item = (&'a str, Page)>) -> Self {
        Self {
            routes: routes
                .into_iter()
                .map(|(path, page)| (ViewKey::from_path(path), page))
                .collect(),
        }
    }

    /// Page for a view; unknown views render the not-found page
    pub fn page(&self, view: &ViewKey) -> Page {
        self.routes
            .iter()
            .find(|(key, _)| key == view)
            .map(|(_, page)| *page)
            .unwrap_or(Page::NotFound)
    }

    /// View and page for a raw navigation path
    pub fn resolve(&self, path: &str) -> (ViewKey, Page) {
        let view = ViewKey::from_path(path);
        let page = self.page(&view);
        (view, page)
    }

    /// Resolve a navigation event to the view it should show
    ///
    /// Returns `None` when both paths name the same view, in which case no
    /// transition should play.
    pub fn navigation(&self, previous: &str, next: &str) -> Option<ViewKey> {
        let previous = ViewKey::from_path(previous);
        let next = ViewKey::from_path(next);
        (previous != next).then_some(next)
    }
}

fn normalize_path(path: &str) -> String {
    let resolved = Url::parse(PATH_BASE)
        .and_then(|base| base.join(path.trim()))
        .map(|url| url.path().to_string())
        .unwrap_or_else(|_| strip_query_and_fragment(path.trim()).to_string());

    let trimmed = resolved.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

fn strip_query_and_fragment(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}
