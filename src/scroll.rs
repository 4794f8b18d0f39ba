use log::debug;

use crate::config::BehaviorConfig;
use crate::surface::{
    non_empty_attribute, set_class, Surface, ACTIVE_CLASS, NAV_DROPDOWN_CLASS, NAV_ID,
    NAV_LINK_CLASS, SCROLLED_CLASS, SECTION_ATTR,
};

pub fn is_scrolled(offset: f64, threshold: f64) -> bool {
    offset >= threshold
}

/// Document-space y of the line a section's top must cross to become active.
pub fn trigger_line(scroll_y: f64, viewport_height: f64, ratio: f64) -> f64 {
    scroll_y + viewport_height * ratio
}

/// Index of the last section, in document order, whose top is at or above
/// `line`.
pub fn active_index<I>(tops: I, line: f64) -> Option<usize>
where
    I: IntoIterator<Item = f64>,
{
    tops.into_iter()
        .enumerate()
        .filter(|(_, top)| *top <= line)
        .map(|(index, _)| index)
        .last()
}

/// Nav chrome and link highlighting derived from the scroll position.
#[derive(Debug)]
pub struct ScrollTracker<N> {
    nav: Option<N>,
    sections: Vec<(N, String)>,
    links: Vec<N>,
    group_parent: Option<N>,
    active: Option<String>,
}

impl<N: Clone + PartialEq> ScrollTracker<N> {
    pub fn locate<S: Surface<Node = N>>(surface: &S) -> Self {
        let sections = surface
            .sections()
            .into_iter()
            .filter_map(|section| {
                let id = non_empty_attribute(surface, &section, "id")?;
                Some((section, id))
            })
            .collect();
        let group_parent = surface
            .elements_with_class(NAV_DROPDOWN_CLASS)
            .first()
            .and_then(|item| surface.descendant_with_class(item, NAV_LINK_CLASS));

        Self {
            nav: surface.element_by_id(NAV_ID),
            sections,
            links: surface.elements_with_class(NAV_LINK_CLASS),
            group_parent,
            active: None,
        }
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn active_section(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Recomputes the scrolled flag and the active link from live layout.
    pub fn update<S: Surface<Node = N>>(&mut self, surface: &S, config: &BehaviorConfig) {
        let scroll_y = surface.scroll_y();

        if let Some(nav) = &self.nav {
            set_class(surface, nav, SCROLLED_CLASS, is_scrolled(scroll_y, config.scroll_threshold));
        }

        let line = trigger_line(scroll_y, surface.viewport_height(), config.section_line_ratio);
        let active = active_index(
            self.sections.iter().map(|(section, _)| surface.offset_top(section)),
            line,
        )
        .map(|index| self.sections[index].1.clone());

        for link in &self.links {
            surface.remove_class(link, ACTIVE_CLASS);
        }
        if let Some(parent) = &self.group_parent {
            surface.remove_class(parent, ACTIVE_CLASS);
        }

        if let Some(active_id) = active.as_deref() {
            for link in &self.links {
                if surface.attribute(link, SECTION_ATTR).as_deref() == Some(active_id) {
                    surface.add_class(link, ACTIVE_CLASS);
                }
            }

            let grouped = config.work_section_ids.iter().any(|id| id == active_id);
            if let Some(parent) = self.group_parent.as_ref().filter(|_| grouped) {
                surface.add_class(parent, ACTIVE_CLASS);
            }
        }

        if active != self.active {
            debug!("active section: {:?} -> {:?}", self.active, active);
            self.active = active;
        }
    }
}
