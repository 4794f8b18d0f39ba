//! In-memory page used by the unit tests.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use crate::surface::Surface;

const ROOT: usize = 0;
const BODY: usize = 1;
const FOCUSABLE_TAGS: [&str; 5] = ["button", "iframe", "input", "select", "textarea"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct NodeRef(usize);

#[derive(Clone, Debug, Default)]
struct FakeNode {
    tag: String,
    parent: Option<usize>,
    children: Vec<usize>,
    attributes: BTreeMap<String, String>,
    classes: BTreeSet<String>,
    text: String,
    style: BTreeMap<String, String>,
    offset_top: f64,
    offset_height: f64,
}

#[derive(Debug)]
struct FakeDocument {
    nodes: Vec<FakeNode>,
    active: Option<usize>,
    scroll_y: f64,
    viewport_height: f64,
    scroll_requests: Vec<f64>,
}

impl FakeDocument {
    fn push(&mut self, parent: Option<usize>, tag: &str) -> usize {
        let index = self.nodes.len();
        self.nodes.push(FakeNode {
            tag: tag.to_string(),
            parent,
            ..FakeNode::default()
        });
        if let Some(parent) = parent {
            self.nodes[parent].children.push(index);
        }
        index
    }

    /// Preorder descendants of `from`, not entering `<template>` content.
    fn descendants(&self, from: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack: Vec<usize> = self.nodes[from].children.iter().rev().copied().collect();
        while let Some(index) = stack.pop() {
            out.push(index);
            if self.nodes[index].tag != "template" {
                stack.extend(self.nodes[index].children.iter().rev().copied());
            }
        }
        out
    }

    fn ancestors_or_self(&self, from: usize) -> Vec<usize> {
        let mut out = vec![from];
        let mut current = self.nodes[from].parent;
        while let Some(index) = current {
            out.push(index);
            current = self.nodes[index].parent;
        }
        out
    }

    fn is_hidden(&self, index: usize) -> bool {
        self.ancestors_or_self(index)
            .into_iter()
            .any(|i| self.nodes[i].attributes.contains_key("hidden"))
    }

    fn is_focusable(&self, index: usize) -> bool {
        let node = &self.nodes[index];
        let by_tag = FOCUSABLE_TAGS.contains(&node.tag.as_str())
            || (node.tag == "a" && node.attributes.contains_key("href"));
        let by_tabindex = node
            .attributes
            .get("tabindex")
            .is_some_and(|value| value != "-1");
        (by_tag || by_tabindex) && !self.is_hidden(index)
    }

    fn deep_clone(&mut self, source: usize, parent: usize) {
        let copy = self.nodes[source].clone();
        let index = self.push(Some(parent), &copy.tag);
        self.nodes[index].attributes = copy.attributes;
        self.nodes[index].classes = copy.classes;
        self.nodes[index].text = copy.text;
        for child in copy.children {
            self.deep_clone(child, index);
        }
    }
}

pub struct FakeSurface {
    doc: RefCell<FakeDocument>,
}

impl FakeSurface {
    pub fn new() -> Self {
        let mut doc = FakeDocument {
            nodes: Vec::new(),
            active: None,
            scroll_y: 0.0,
            viewport_height: 900.0,
            scroll_requests: Vec::new(),
        };
        doc.push(None, "html");
        doc.push(Some(ROOT), "body");
        Self {
            doc: RefCell::new(doc),
        }
    }

    pub fn body_node(&self) -> NodeRef {
        NodeRef(BODY)
    }

    /// Appends an element; a `class` entry is split into individual classes.
    pub fn el(&self, parent: NodeRef, tag: &str, attributes: &[(&str, &str)]) -> NodeRef {
        let mut doc = self.doc.borrow_mut();
        let index = doc.push(Some(parent.0), tag);
        for (name, value) in attributes {
            if *name == "class" {
                doc.nodes[index]
                    .classes
                    .extend(value.split_whitespace().map(ToString::to_string));
            } else {
                doc.nodes[index]
                    .attributes
                    .insert(name.to_string(), value.to_string());
            }
        }
        NodeRef(index)
    }

    pub fn set_layout(&self, node: NodeRef, top: f64, height: f64) {
        let mut doc = self.doc.borrow_mut();
        doc.nodes[node.0].offset_top = top;
        doc.nodes[node.0].offset_height = height;
    }

    pub fn set_scroll(&self, y: f64) {
        self.doc.borrow_mut().scroll_y = y;
    }

    pub fn scroll_requests(&self) -> Vec<f64> {
        self.doc.borrow().scroll_requests.clone()
    }

    pub fn text(&self, node: &NodeRef) -> String {
        self.doc.borrow().nodes[node.0].text.clone()
    }

    pub fn style(&self, node: &NodeRef, property: &str) -> Option<String> {
        self.doc.borrow().nodes[node.0].style.get(property).cloned()
    }

    pub fn children(&self, node: &NodeRef) -> Vec<NodeRef> {
        self.doc.borrow().nodes[node.0]
            .children
            .iter()
            .map(|&index| NodeRef(index))
            .collect()
    }

    /// Every attached element carrying `class`, including template clones.
    pub fn count_with_class(&self, class: &str) -> usize {
        self.elements_with_class(class).len()
    }

    pub fn is_hidden(&self, node: &NodeRef) -> bool {
        self.doc.borrow().is_hidden(node.0)
    }

    pub fn by_id(&self, id: &str) -> NodeRef {
        self.element_by_id(id)
            .unwrap_or_else(|| panic!("fixture has no #{id}"))
    }
}

impl Surface for FakeSurface {
    type Node = NodeRef;

    fn element_by_id(&self, id: &str) -> Option<NodeRef> {
        let doc = self.doc.borrow();
        doc.descendants(ROOT)
            .into_iter()
            .find(|&index| doc.nodes[index].attributes.get("id").map(String::as_str) == Some(id))
            .map(NodeRef)
    }

    fn elements_with_class(&self, class: &str) -> Vec<NodeRef> {
        let doc = self.doc.borrow();
        doc.descendants(ROOT)
            .into_iter()
            .filter(|&index| doc.nodes[index].classes.contains(class))
            .map(NodeRef)
            .collect()
    }

    fn sections(&self) -> Vec<NodeRef> {
        let doc = self.doc.borrow();
        doc.descendants(ROOT)
            .into_iter()
            .filter(|&index| {
                doc.nodes[index].tag == "section" && doc.nodes[index].attributes.contains_key("id")
            })
            .map(NodeRef)
            .collect()
    }

    fn body(&self) -> Option<NodeRef> {
        Some(NodeRef(BODY))
    }

    fn descendant_with_class(&self, node: &NodeRef, class: &str) -> Option<NodeRef> {
        let doc = self.doc.borrow();
        doc.descendants(node.0)
            .into_iter()
            .find(|&index| doc.nodes[index].classes.contains(class))
            .map(NodeRef)
    }

    fn descendant_image(&self, node: &NodeRef) -> Option<NodeRef> {
        let doc = self.doc.borrow();
        doc.descendants(node.0)
            .into_iter()
            .find(|&index| doc.nodes[index].tag == "img")
            .map(NodeRef)
    }

    fn focusable_descendants(&self, node: &NodeRef) -> Vec<NodeRef> {
        let doc = self.doc.borrow();
        doc.descendants(node.0)
            .into_iter()
            .filter(|&index| doc.is_focusable(index))
            .map(NodeRef)
            .collect()
    }

    fn closest_with_class(&self, node: &NodeRef, class: &str) -> Option<NodeRef> {
        let doc = self.doc.borrow();
        doc.ancestors_or_self(node.0)
            .into_iter()
            .find(|&index| doc.nodes[index].classes.contains(class))
            .map(NodeRef)
    }

    fn closest_link(&self, node: &NodeRef) -> Option<NodeRef> {
        let doc = self.doc.borrow();
        doc.ancestors_or_self(node.0)
            .into_iter()
            .find(|&index| doc.nodes[index].attributes.contains_key("href"))
            .map(NodeRef)
    }

    fn contains(&self, ancestor: &NodeRef, node: &NodeRef) -> bool {
        self.doc.borrow().ancestors_or_self(node.0).contains(&ancestor.0)
    }

    fn attribute(&self, node: &NodeRef, name: &str) -> Option<String> {
        self.doc.borrow().nodes[node.0].attributes.get(name).cloned()
    }

    fn set_attribute(&self, node: &NodeRef, name: &str, value: &str) {
        self.doc.borrow_mut().nodes[node.0]
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn remove_attribute(&self, node: &NodeRef, name: &str) {
        self.doc.borrow_mut().nodes[node.0].attributes.remove(name);
    }

    fn has_class(&self, node: &NodeRef, class: &str) -> bool {
        self.doc.borrow().nodes[node.0].classes.contains(class)
    }

    fn add_class(&self, node: &NodeRef, class: &str) {
        self.doc.borrow_mut().nodes[node.0]
            .classes
            .insert(class.to_string());
    }

    fn remove_class(&self, node: &NodeRef, class: &str) {
        self.doc.borrow_mut().nodes[node.0].classes.remove(class);
    }

    fn set_text(&self, node: &NodeRef, text: &str) {
        self.clear_children(node);
        self.doc.borrow_mut().nodes[node.0].text = text.to_string();
    }

    fn set_style(&self, node: &NodeRef, property: &str, value: &str) {
        self.doc.borrow_mut().nodes[node.0]
            .style
            .insert(property.to_string(), value.to_string());
    }

    fn clear_children(&self, node: &NodeRef) {
        let mut doc = self.doc.borrow_mut();
        let children = std::mem::take(&mut doc.nodes[node.0].children);
        for child in children {
            doc.nodes[child].parent = None;
        }
    }

    fn append_template(&self, template: &NodeRef, container: &NodeRef) {
        let mut doc = self.doc.borrow_mut();
        let sources = doc.nodes[template.0].children.clone();
        for source in sources {
            doc.deep_clone(source, container.0);
        }
    }

    fn append_link(&self, container: &NodeRef, href: &str, label: &str) {
        let link = self.el(
            *container,
            "a",
            &[
                ("class", crate::surface::MODAL_LINK_CLASS),
                ("href", href),
                ("target", "_blank"),
                ("rel", "noopener noreferrer"),
            ],
        );
        self.doc.borrow_mut().nodes[link.0].text = label.to_string();
    }

    fn focus(&self, node: &NodeRef) {
        self.doc.borrow_mut().active = Some(node.0);
    }

    fn active_element(&self) -> Option<NodeRef> {
        Some(NodeRef(self.doc.borrow().active.unwrap_or(BODY)))
    }

    fn scroll_y(&self) -> f64 {
        self.doc.borrow().scroll_y
    }

    fn viewport_height(&self) -> f64 {
        self.doc.borrow().viewport_height
    }

    fn offset_top(&self, node: &NodeRef) -> f64 {
        self.doc.borrow().nodes[node.0].offset_top
    }

    fn offset_height(&self, node: &NodeRef) -> f64 {
        self.doc.borrow().nodes[node.0].offset_height
    }

    fn scroll_to(&self, top: f64) {
        let mut doc = self.doc.borrow_mut();
        doc.scroll_requests.push(top);
        doc.scroll_y = top;
    }
}

/// The showreel page: nav with a grouped "work" dropdown, a hero, four
/// sections, three work cards (video, image-only, bare), reveal targets
/// and the modal shell.
pub fn showreel_page() -> FakeSurface {
    let page = FakeSurface::new();
    let body = page.body_node();

    let nav = page.el(body, "nav", &[("id", "nav")]);
    page.set_layout(nav, 0.0, 72.0);
    page.el(nav, "button", &[("id", "navToggle"), ("aria-expanded", "false")]);
    let links = page.el(nav, "ul", &[("id", "navLinks")]);
    let about_item = page.el(links, "li", &[]);
    page.el(
        about_item,
        "a",
        &[("id", "linkAbout"), ("class", "nav__link"), ("href", "#about"), ("data-section", "about")],
    );
    let dropdown = page.el(links, "li", &[("class", "nav__item--dropdown")]);
    page.el(dropdown, "a", &[("id", "linkWork"), ("class", "nav__link"), ("href", "#filmmaking")]);
    let sub = page.el(dropdown, "ul", &[]);
    let film_item = page.el(sub, "li", &[]);
    page.el(
        film_item,
        "a",
        &[
            ("id", "linkFilmmaking"),
            ("class", "nav__link"),
            ("href", "#filmmaking"),
            ("data-section", "filmmaking"),
        ],
    );
    let theatre_item = page.el(sub, "li", &[]);
    page.el(
        theatre_item,
        "a",
        &[
            ("id", "linkTheatre"),
            ("class", "nav__link"),
            ("href", "#theatre"),
            ("data-section", "theatre"),
        ],
    );
    let contact_item = page.el(links, "li", &[]);
    let contact_link = page.el(
        contact_item,
        "a",
        &[
            ("id", "linkContact"),
            ("class", "nav__link"),
            ("href", "#contact"),
            ("data-section", "contact"),
        ],
    );
    page.el(contact_link, "span", &[("id", "linkContactLabel")]);

    let hero = page.el(body, "header", &[("id", "hero")]);
    page.el(hero, "div", &[("id", "heroParallax")]);

    let about = page.el(body, "section", &[("id", "about")]);
    page.set_layout(about, 600.0, 800.0);
    page.el(about, "div", &[("id", "revealA"), ("class", "anim-reveal")]);
    page.el(about, "div", &[("id", "revealB"), ("class", "anim-fade-up")]);
    page.el(about, "div", &[("id", "revealC"), ("class", "anim-reveal anim-fade-up")]);

    let film = page.el(body, "section", &[("id", "filmmaking")]);
    page.set_layout(film, 1400.0, 900.0);
    let video_card = page.el(
        film,
        "div",
        &[
            ("id", "cardFilm"),
            ("class", "work__card"),
            ("tabindex", "0"),
            ("data-vimeo", "76979871"),
            ("data-title", "Night Swim"),
            ("data-year", "2023"),
            ("data-description", "A short about a lake at midnight."),
            ("data-credits", "Director: J. Held"),
            (
                "data-links",
                "filmfreeway:https://filmfreeway.com/NightSwim, Press Kit:https://example.com/press:kit",
            ),
        ],
    );
    page.el(
        video_card,
        "img",
        &[("src", "/img/night-swim.jpg"), ("alt", "Night Swim still")],
    );
    let overlay = page.el(video_card, "div", &[("class", "work__overlay")]);
    page.el(overlay, "span", &[("id", "cardFilmCaption")]);
    let video_detail = page.el(video_card, "template", &[("class", "work__detail")]);
    page.el(video_detail, "p", &[("class", "detail__festival")]);
    page.el(video_detail, "p", &[("class", "detail__festival")]);

    let theatre = page.el(body, "section", &[("id", "theatre")]);
    page.set_layout(theatre, 2300.0, 700.0);
    let image_card = page.el(
        theatre,
        "div",
        &[
            ("id", "cardStill"),
            ("class", "work__card"),
            ("tabindex", "0"),
            ("data-title", "Still Life"),
            ("data-year", "2021"),
            ("data-links", "Programme:https://example.com/programme"),
        ],
    );
    page.el(image_card, "img", &[("src", "/img/still-life.jpg")]);
    let image_detail = page.el(image_card, "template", &[("class", "work__detail")]);
    page.el(image_detail, "ul", &[("class", "detail__cast")]);
    page.el(
        theatre,
        "div",
        &[
            ("id", "cardBare"),
            ("class", "work__card"),
            ("tabindex", "0"),
            ("data-title", "Untitled"),
            ("data-year", "2019"),
        ],
    );

    let contact = page.el(body, "section", &[("id", "contact")]);
    page.set_layout(contact, 3000.0, 500.0);
    page.el(contact, "a", &[("id", "backToTop"), ("href", "#")]);
    page.el(contact, "a", &[("id", "missingAnchor"), ("href", "#nowhere")]);
    page.el(contact, "a", &[("id", "externalLink"), ("href", "https://example.com")]);
    page.el(contact, "p", &[("id", "outside")]);

    let modal = page.el(body, "div", &[("id", "modal"), ("aria-hidden", "true")]);
    page.el(modal, "div", &[("id", "modalBackdrop")]);
    let dialog = page.el(modal, "div", &[("id", "modalDialog")]);
    page.el(dialog, "button", &[("id", "modalClose")]);
    let media = page.el(dialog, "div", &[("id", "modalMedia")]);
    page.el(media, "iframe", &[("id", "modalIframe")]);
    page.el(media, "img", &[("id", "modalImage"), ("hidden", "")]);
    page.el(dialog, "h2", &[("id", "modalTitle")]);
    page.el(dialog, "span", &[("id", "modalYear")]);
    page.el(dialog, "p", &[("id", "modalDescription")]);
    page.el(dialog, "p", &[("id", "modalCredits")]);
    page.el(dialog, "div", &[("id", "modalDetail")]);
    page.el(dialog, "div", &[("id", "modalLinks")]);

    page
}
