use log::debug;

use crate::config::BehaviorConfig;
use crate::surface::{Surface, NAV_ID};

/// Id referenced by an in-page anchor. A bare `#` and non-fragment links
/// yield `None`.
pub fn anchor_target_id(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

/// Scroll position that puts `target_top` just below the fixed nav.
pub fn scroll_offset(target_top: f64, nav_height: f64, margin: f64) -> f64 {
    (target_top - nav_height - margin).max(0.0)
}

#[derive(Debug)]
pub struct SmoothScroll<N> {
    nav: Option<N>,
}

impl<N: Clone + PartialEq> SmoothScroll<N> {
    pub fn locate<S: Surface<Node = N>>(surface: &S) -> Self {
        Self {
            nav: surface.element_by_id(NAV_ID),
        }
    }

    /// Handles a click whose target sits inside an in-page anchor. Returns
    /// whether the click was taken over, in which case the default jump must
    /// be suppressed.
    pub fn on_click<S: Surface<Node = N>>(&self, surface: &S, target: &N, config: &BehaviorConfig) -> bool {
        let Some(href) = surface
            .closest_link(target)
            .and_then(|link| surface.attribute(&link, "href"))
        else {
            return false;
        };
        let Some(id) = anchor_target_id(href.trim()) else {
            return false;
        };
        let Some(destination) = surface.element_by_id(id) else {
            debug!("anchor #{id} has no target; leaving click to the browser");
            return false;
        };

        let top = scroll_offset(
            surface.offset_top(&destination),
            self.nav_height(surface, config),
            config.scroll_margin,
        );
        surface.scroll_to(top);
        true
    }

    fn nav_height<S: Surface<Node = N>>(&self, surface: &S, config: &BehaviorConfig) -> f64 {
        self.nav
            .as_ref()
            .map(|nav| surface.offset_height(nav))
            .filter(|height| *height > 0.0)
            .unwrap_or(config.nav_fallback_height)
    }
}
