use log::info;

use crate::config::BehaviorConfig;
use crate::frame::FrameGate;
use crate::modal::ModalController;
use crate::nav::NavToggle;
use crate::parallax::Parallax;
use crate::reveal::RevealAnimator;
use crate::scroll::ScrollTracker;
use crate::smooth_scroll::SmoothScroll;
use crate::surface::{Surface, WORK_CARD_CLASS};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Tab,
    Escape,
    Enter,
    Space,
    Other,
}

impl Key {
    /// Maps a `KeyboardEvent.key` value.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Tab" => Self::Tab,
            "Escape" | "Esc" => Self::Escape,
            "Enter" => Self::Enter,
            " " | "Spacebar" => Self::Space,
            _ => Self::Other,
        }
    }
}

/// Input the page reacts to, already stripped of browser types.
#[derive(Clone, Debug, PartialEq)]
pub enum UiEvent<N> {
    Scroll,
    Resize,
    /// The animation frame requested through [`Outcome::request_frame`].
    Frame,
    Click {
        target: N,
    },
    KeyDown {
        key: Key,
        shift: bool,
        target: Option<N>,
    },
    Intersection {
        target: N,
        intersecting: bool,
    },
}

/// What the browser glue must do after a dispatch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    pub prevent_default: bool,
    pub request_frame: bool,
    pub stop_observing: bool,
}

/// Owns every behaviour and all of their state for one page session.
pub struct Page<S: Surface> {
    surface: S,
    config: BehaviorConfig,
    frame: FrameGate,
    scroll: ScrollTracker<S::Node>,
    parallax: Option<Parallax<S::Node>>,
    reveal: RevealAnimator<S::Node>,
    nav: Option<NavToggle<S::Node>>,
    modal: Option<ModalController<S::Node>>,
    smooth: SmoothScroll<S::Node>,
}

impl<S: Surface> Page<S> {
    /// Locates every behaviour's markup and brings scroll-derived state up to
    /// date. Without intersection observation, reveal targets are shown now.
    pub fn start(surface: S, config: BehaviorConfig, observe_intersections: bool) -> Self {
        let mut page = Self {
            scroll: ScrollTracker::locate(&surface),
            parallax: Parallax::locate(&surface),
            reveal: RevealAnimator::locate(&surface),
            nav: NavToggle::locate(&surface),
            modal: ModalController::locate(&surface),
            smooth: SmoothScroll::locate(&surface),
            frame: FrameGate::default(),
            config,
            surface,
        };

        info!(
            "page ready: {} sections, {} work cards, {} reveal targets",
            page.scroll.section_count(),
            page.surface.elements_with_class(WORK_CARD_CLASS).len(),
            page.reveal.pending().len()
        );

        if !observe_intersections {
            page.reveal.reveal_all(&page.surface);
        }
        page.recompute();
        page
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn config(&self) -> &BehaviorConfig {
        &self.config
    }

    /// Elements still waiting for their first intersection.
    pub fn reveal_targets(&self) -> &[S::Node] {
        self.reveal.pending()
    }

    pub fn nav_open(&self) -> bool {
        self.nav.as_ref().is_some_and(NavToggle::is_open)
    }

    pub fn modal_open(&self) -> bool {
        self.modal.as_ref().is_some_and(ModalController::is_open)
    }

    pub fn active_section(&self) -> Option<&str> {
        self.scroll.active_section()
    }

    pub fn dispatch(&mut self, event: UiEvent<S::Node>) -> Outcome {
        let mut outcome = Outcome::default();

        match event {
            UiEvent::Scroll | UiEvent::Resize => {
                outcome.request_frame = self.frame.request();
            }
            UiEvent::Frame => {
                if self.frame.complete() {
                    self.recompute();
                }
            }
            UiEvent::Click { target } => {
                outcome.prevent_default = self.on_click(&target);
            }
            UiEvent::KeyDown { key, shift, target } => {
                outcome.prevent_default = self.on_key(key, shift, target.as_ref());
            }
            UiEvent::Intersection {
                target,
                intersecting,
            } => {
                outcome.stop_observing =
                    self.reveal
                        .on_intersection(&self.surface, &target, intersecting);
            }
        }

        outcome
    }

    fn recompute(&mut self) {
        self.scroll.update(&self.surface, &self.config);
        if let Some(parallax) = &mut self.parallax {
            parallax.update(&self.surface, &self.config.parallax);
        }
    }

    fn on_click(&mut self, target: &S::Node) -> bool {
        if let Some(nav) = &mut self.nav {
            nav.on_click(&self.surface, target);
        }

        let prevent_default = self.smooth.on_click(&self.surface, target, &self.config);

        if let Some(modal) = &mut self.modal {
            if modal.is_open() {
                if modal.is_dismiss_target(&self.surface, target) {
                    modal.close(&self.surface);
                }
            } else if let Some(card) = self.surface.closest_with_class(target, WORK_CARD_CLASS) {
                modal.open(&self.surface, &card, &self.config);
            }
        }

        prevent_default
    }

    fn on_key(&mut self, key: Key, shift: bool, target: Option<&S::Node>) -> bool {
        let Some(modal) = &mut self.modal else {
            return false;
        };

        match key {
            Key::Escape => {
                modal.close(&self.surface);
                false
            }
            Key::Tab => modal.trap_tab(&self.surface, shift),
            Key::Enter | Key::Space if !modal.is_open() => {
                let Some(card) =
                    target.filter(|node| self.surface.has_class(node, WORK_CARD_CLASS))
                else {
                    return false;
                };
                modal.open(&self.surface, card, &self.config);
                true
            }
            _ => false,
        }
    }
}
