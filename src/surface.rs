use std::fmt;

pub const NAV_ID: &str = "nav";
pub const NAV_TOGGLE_ID: &str = "navToggle";
pub const NAV_LINKS_ID: &str = "navLinks";
pub const PARALLAX_ID: &str = "heroParallax";
pub const MODAL_ID: &str = "modal";
pub const MODAL_BACKDROP_ID: &str = "modalBackdrop";
pub const MODAL_CLOSE_ID: &str = "modalClose";
pub const MODAL_MEDIA_ID: &str = "modalMedia";
pub const MODAL_IFRAME_ID: &str = "modalIframe";
pub const MODAL_IMAGE_ID: &str = "modalImage";
pub const MODAL_TITLE_ID: &str = "modalTitle";
pub const MODAL_YEAR_ID: &str = "modalYear";
pub const MODAL_DESCRIPTION_ID: &str = "modalDescription";
pub const MODAL_CREDITS_ID: &str = "modalCredits";
pub const MODAL_DETAIL_ID: &str = "modalDetail";
pub const MODAL_LINKS_ID: &str = "modalLinks";
pub const CONFIG_SCRIPT_ID: &str = "behaviorConfig";

pub const SCROLLED_CLASS: &str = "nav--scrolled";
pub const NAV_LINK_CLASS: &str = "nav__link";
pub const NAV_DROPDOWN_CLASS: &str = "nav__item--dropdown";
pub const ACTIVE_CLASS: &str = "active";
pub const OPEN_CLASS: &str = "open";
pub const REVEAL_CLASSES: [&str; 2] = ["anim-reveal", "anim-fade-up"];
pub const VISIBLE_CLASS: &str = "visible";
pub const WORK_CARD_CLASS: &str = "work__card";
pub const DETAIL_TEMPLATE_CLASS: &str = "work__detail";
pub const SCROLL_LOCK_CLASS: &str = "modal-open";
pub const MODAL_LINK_CLASS: &str = "modal__link";

pub const VIDEO_ATTR: &str = "data-vimeo";
pub const TITLE_ATTR: &str = "data-title";
pub const YEAR_ATTR: &str = "data-year";
pub const DESCRIPTION_ATTR: &str = "data-description";
pub const CREDITS_ATTR: &str = "data-credits";
pub const LINKS_ATTR: &str = "data-links";
pub const SECTION_ATTR: &str = "data-section";
pub const HIDDEN_ATTR: &str = "hidden";

/// The slice of the document the behaviours read and mutate.
///
/// Writes take `&self`: the browser's DOM is shared and mutable behind
/// handles, and the test fake mirrors that with interior mutability.
/// Write failures are swallowed by implementations; nothing here reports
/// errors back to the behaviours.
pub trait Surface {
    type Node: Clone + PartialEq + fmt::Debug;

    fn element_by_id(&self, id: &str) -> Option<Self::Node>;
    /// Attached elements carrying `class`, in document order.
    fn elements_with_class(&self, class: &str) -> Vec<Self::Node>;
    /// `section` elements with an id, in document order.
    fn sections(&self) -> Vec<Self::Node>;
    fn body(&self) -> Option<Self::Node>;

    fn descendant_with_class(&self, node: &Self::Node, class: &str) -> Option<Self::Node>;
    fn descendant_image(&self, node: &Self::Node) -> Option<Self::Node>;
    /// Keyboard-focusable descendants in tab order, skipping hidden subtrees.
    fn focusable_descendants(&self, node: &Self::Node) -> Vec<Self::Node>;
    fn closest_with_class(&self, node: &Self::Node, class: &str) -> Option<Self::Node>;
    /// Nearest ancestor-or-self carrying an `href`.
    fn closest_link(&self, node: &Self::Node) -> Option<Self::Node>;
    /// True when `node` is `ancestor` or lives inside it.
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str);
    fn remove_attribute(&self, node: &Self::Node, name: &str);
    fn has_class(&self, node: &Self::Node, class: &str) -> bool;
    fn add_class(&self, node: &Self::Node, class: &str);
    fn remove_class(&self, node: &Self::Node, class: &str);
    fn set_text(&self, node: &Self::Node, text: &str);
    fn set_style(&self, node: &Self::Node, property: &str, value: &str);

    fn clear_children(&self, node: &Self::Node);
    /// Deep-clones the content of a `<template>` into `container`.
    fn append_template(&self, template: &Self::Node, container: &Self::Node);
    /// Appends an external link opening in a new tab.
    fn append_link(&self, container: &Self::Node, href: &str, label: &str);

    fn focus(&self, node: &Self::Node);
    fn active_element(&self) -> Option<Self::Node>;

    fn scroll_y(&self) -> f64;
    fn viewport_height(&self) -> f64;
    fn offset_top(&self, node: &Self::Node) -> f64;
    fn offset_height(&self, node: &Self::Node) -> f64;
    /// Smoothly scrolls the window to `top`.
    fn scroll_to(&self, top: f64);
}

/// Trimmed attribute value, `None` when missing or blank.
pub fn non_empty_attribute<S: Surface>(surface: &S, node: &S::Node, name: &str) -> Option<String> {
    surface
        .attribute(node, name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn set_hidden<S: Surface>(surface: &S, node: &S::Node, hidden: bool) {
    if hidden {
        surface.set_attribute(node, HIDDEN_ATTR, "");
    } else {
        surface.remove_attribute(node, HIDDEN_ATTR);
    }
}

pub fn set_class<S: Surface>(surface: &S, node: &S::Node, class: &str, on: bool) {
    if on {
        surface.add_class(node, class);
    } else {
        surface.remove_class(node, class);
    }
}
