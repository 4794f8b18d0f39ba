use log::debug;

use crate::surface::{
    set_class, Surface, ACTIVE_CLASS, NAV_ID, NAV_LINKS_ID, NAV_LINK_CLASS, NAV_TOGGLE_ID,
    OPEN_CLASS,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavState {
    Closed,
    Open,
}

impl NavState {
    fn toggled(self) -> Self {
        match self {
            Self::Closed => Self::Open,
            Self::Open => Self::Closed,
        }
    }

    fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Mobile nav drawer.
#[derive(Debug)]
pub struct NavToggle<N> {
    nav: N,
    toggle: N,
    links: N,
    state: NavState,
}

impl<N: Clone + PartialEq> NavToggle<N> {
    pub fn locate<S: Surface<Node = N>>(surface: &S) -> Option<Self> {
        Some(Self {
            nav: surface.element_by_id(NAV_ID)?,
            toggle: surface.element_by_id(NAV_TOGGLE_ID)?,
            links: surface.element_by_id(NAV_LINKS_ID)?,
            state: NavState::Closed,
        })
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    pub fn toggle<S: Surface<Node = N>>(&mut self, surface: &S) {
        self.set_state(surface, self.state.toggled());
    }

    pub fn close<S: Surface<Node = N>>(&mut self, surface: &S) {
        if self.is_open() {
            self.set_state(surface, NavState::Closed);
        }
    }

    /// Routes a document click: the toggle button flips the drawer; a nav
    /// link or anything outside the nav closes an open drawer.
    pub fn on_click<S: Surface<Node = N>>(&mut self, surface: &S, target: &N) {
        if surface.contains(&self.toggle, target) {
            self.toggle(surface);
            return;
        }

        if !self.is_open() {
            return;
        }

        let on_link = surface.closest_with_class(target, NAV_LINK_CLASS).is_some();
        if on_link || !surface.contains(&self.nav, target) {
            self.close(surface);
        }
    }

    fn set_state<S: Surface<Node = N>>(&mut self, surface: &S, state: NavState) {
        let open = state.is_open();
        set_class(surface, &self.toggle, ACTIVE_CLASS, open);
        set_class(surface, &self.links, OPEN_CLASS, open);
        surface.set_attribute(&self.toggle, "aria-expanded", if open { "true" } else { "false" });
        debug!("nav drawer {}", if open { "opened" } else { "closed" });
        self.state = state;
    }
}
