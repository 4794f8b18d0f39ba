use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Function, Reflect};
use log::{error, info, warn, Level};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    window, AddEventListenerOptions, Document, Element, Event, EventTarget, HtmlElement,
    HtmlTemplateElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, KeyboardEvent, ScrollBehavior, ScrollToOptions, Window,
};

use crate::config::BehaviorConfig;
use crate::error::SetupError;
use crate::page::{Key, Outcome, Page, UiEvent};
use crate::surface::{Surface, CONFIG_SCRIPT_ID, HIDDEN_ATTR, MODAL_LINK_CLASS};

const FOCUSABLE_SELECTOR: &str =
    "button:not([disabled]), [href], iframe, input, select, textarea, [tabindex]:not([tabindex=\"-1\"])";
const FALLBACK_VIEWPORT_HEIGHT: f64 = 720.0;

type SharedPage = Rc<RefCell<Page<WebSurface>>>;

/// [`Surface`] over the live document.
pub struct WebSurface {
    window: Window,
    document: Document,
}

impl WebSurface {
    fn new(window: Window, document: Document) -> Self {
        Self { window, document }
    }

    fn query_all(&self, selector: &str) -> Vec<Element> {
        let Ok(list) = self.document.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|index| list.get(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }
}

fn as_html(element: &Element) -> Option<&HtmlElement> {
    element.dyn_ref::<HtmlElement>()
}

impl Surface for WebSurface {
    type Node = Element;

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn elements_with_class(&self, class: &str) -> Vec<Element> {
        self.query_all(&format!(".{class}"))
    }

    fn sections(&self) -> Vec<Element> {
        self.query_all("section[id]")
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Into::into)
    }

    fn descendant_with_class(&self, node: &Element, class: &str) -> Option<Element> {
        node.query_selector(&format!(".{class}")).ok().flatten()
    }

    fn descendant_image(&self, node: &Element) -> Option<Element> {
        node.query_selector("img").ok().flatten()
    }

    fn focusable_descendants(&self, node: &Element) -> Vec<Element> {
        let Ok(list) = node.query_selector_all(FOCUSABLE_SELECTOR) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|index| list.get(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .filter(|element| {
                element
                    .closest(&format!("[{HIDDEN_ATTR}]"))
                    .ok()
                    .flatten()
                    .is_none()
            })
            .collect()
    }

    fn closest_with_class(&self, node: &Element, class: &str) -> Option<Element> {
        node.closest(&format!(".{class}")).ok().flatten()
    }

    fn closest_link(&self, node: &Element) -> Option<Element> {
        node.closest("[href]").ok().flatten()
    }

    fn contains(&self, ancestor: &Element, node: &Element) -> bool {
        ancestor.contains(Some(node.as_ref()))
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&self, node: &Element, name: &str, value: &str) {
        let _ = node.set_attribute(name, value);
    }

    fn remove_attribute(&self, node: &Element, name: &str) {
        let _ = node.remove_attribute(name);
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn add_class(&self, node: &Element, class: &str) {
        let _ = node.class_list().add_1(class);
    }

    fn remove_class(&self, node: &Element, class: &str) {
        let _ = node.class_list().remove_1(class);
    }

    fn set_text(&self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn set_style(&self, node: &Element, property: &str, value: &str) {
        if let Some(html) = as_html(node) {
            let _ = html.style().set_property(property, value);
        }
    }

    fn clear_children(&self, node: &Element) {
        node.set_inner_html("");
    }

    fn append_template(&self, template: &Element, container: &Element) {
        let Some(template) = template.dyn_ref::<HtmlTemplateElement>() else {
            return;
        };
        if let Ok(fragment) = template.content().clone_node_with_deep(true) {
            let _ = container.append_child(&fragment);
        }
    }

    fn append_link(&self, container: &Element, href: &str, label: &str) {
        let Ok(link) = self.document.create_element("a") else {
            return;
        };
        let _ = link.set_attribute("class", MODAL_LINK_CLASS);
        let _ = link.set_attribute("href", href);
        let _ = link.set_attribute("target", "_blank");
        let _ = link.set_attribute("rel", "noopener noreferrer");
        link.set_text_content(Some(label));
        let _ = container.append_child(&link);
    }

    fn focus(&self, node: &Element) {
        if let Some(html) = as_html(node) {
            let _ = html.focus();
        }
    }

    fn active_element(&self) -> Option<Element> {
        self.document.active_element()
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn viewport_height(&self) -> f64 {
        self.window
            .inner_height()
            .ok()
            .and_then(|value| value.as_f64())
            .unwrap_or(FALLBACK_VIEWPORT_HEIGHT)
    }

    fn offset_top(&self, node: &Element) -> f64 {
        as_html(node).map(|html| f64::from(html.offset_top())).unwrap_or(0.0)
    }

    fn offset_height(&self, node: &Element) -> f64 {
        as_html(node).map(|html| f64::from(html.offset_height())).unwrap_or(0.0)
    }

    fn scroll_to(&self, top: f64) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }
}

fn js_error(context: &'static str, value: JsValue) -> SetupError {
    SetupError::Js {
        context,
        message: value
            .as_string()
            .unwrap_or_else(|| format!("{value:?}")),
    }
}

fn read_config(document: &Document) -> BehaviorConfig {
    let Some(raw) = document
        .get_element_by_id(CONFIG_SCRIPT_ID)
        .and_then(|script| script.text_content())
    else {
        return BehaviorConfig::default();
    };

    match BehaviorConfig::from_json(&raw) {
        Ok(config) => config,
        Err(err) => {
            warn!("{err}; using default behavior config");
            BehaviorConfig::default()
        }
    }
}

fn intersection_observer_supported(window: &Window) -> bool {
    Reflect::get(window.as_ref(), &JsValue::from_str("IntersectionObserver"))
        .map(|value| value.is_function())
        .unwrap_or(false)
}

fn event_element(event: &Event) -> Option<Element> {
    event.target()?.dyn_into::<Element>().ok()
}

fn apply(event: &Event, outcome: Outcome) {
    if outcome.prevent_default {
        event.prevent_default();
    }
}

fn listen(
    target: &EventTarget,
    kind: &str,
    passive: bool,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), SetupError> {
    let callback = Closure::<dyn FnMut(Event)>::new(handler);
    let options = AddEventListenerOptions::new();
    options.set_passive(passive);
    target
        .add_event_listener_with_callback_and_add_event_listener_options(
            kind,
            callback.as_ref().unchecked_ref(),
            &options,
        )
        .map_err(|err| js_error("adding event listener", err))?;
    callback.forget();
    Ok(())
}

/// Builds the frame callback once; every scheduled frame reuses it.
fn frame_callback(page: &SharedPage) -> Function {
    let page = page.clone();
    let callback = Closure::<dyn FnMut(f64)>::new(move |_timestamp: f64| {
        page.borrow_mut().dispatch(UiEvent::Frame);
    });
    let function: Function = callback.as_ref().unchecked_ref::<Function>().clone();
    callback.forget();
    function
}

fn schedule_frame(window: &Window, on_frame: &Function, page: &SharedPage, outcome: Outcome) {
    if !outcome.request_frame {
        return;
    }
    if window.request_animation_frame(on_frame).is_err() {
        page.borrow_mut().dispatch(UiEvent::Frame);
    }
}

fn observe_reveals(page: &SharedPage) -> Result<(), SetupError> {
    let handler_page = page.clone();
    let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
        move |entries: Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                let target = entry.target();
                let outcome = handler_page.borrow_mut().dispatch(UiEvent::Intersection {
                    target: target.clone(),
                    intersecting: entry.is_intersecting(),
                });
                if outcome.stop_observing {
                    observer.unobserve(&target);
                }
            }
        },
    );

    let options = IntersectionObserverInit::new();
    {
        let page = page.borrow();
        let reveal = &page.config().reveal;
        options.set_threshold(&JsValue::from_f64(reveal.threshold));
        options.set_root_margin(&reveal.root_margin);
    }

    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)
            .map_err(|err| js_error("creating intersection observer", err))?;
    callback.forget();

    for target in page.borrow().reveal_targets() {
        observer.observe(target);
    }
    Ok(())
}

fn start() -> Result<(), SetupError> {
    let window = window().ok_or(SetupError::NoWindow)?;
    let document = window.document().ok_or(SetupError::NoDocument)?;

    let config = read_config(&document);
    let observe = intersection_observer_supported(&window);
    let surface = WebSurface::new(window.clone(), document.clone());
    let page: SharedPage = Rc::new(RefCell::new(Page::start(surface, config, observe)));

    if observe {
        observe_reveals(&page)?;
    }

    let on_frame = frame_callback(&page);
    for kind in ["scroll", "resize"] {
        let page = page.clone();
        let window_handle = window.clone();
        let on_frame = on_frame.clone();
        listen(window.as_ref(), kind, true, move |_event: Event| {
            let event = if kind == "scroll" {
                UiEvent::Scroll
            } else {
                UiEvent::Resize
            };
            let outcome = page.borrow_mut().dispatch(event);
            schedule_frame(&window_handle, &on_frame, &page, outcome);
        })?;
    }

    {
        let page = page.clone();
        listen(document.as_ref(), "click", false, move |event: Event| {
            let Some(target) = event_element(&event) else {
                return;
            };
            let outcome = page.borrow_mut().dispatch(UiEvent::Click { target });
            apply(&event, outcome);
        })?;
    }

    {
        let page = page.clone();
        listen(document.as_ref(), "keydown", false, move |event: Event| {
            let Some(keyboard) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            let outcome = page.borrow_mut().dispatch(UiEvent::KeyDown {
                key: Key::from_name(&keyboard.key()),
                shift: keyboard.shift_key(),
                target: event_element(&event),
            });
            apply(&event, outcome);
        })?;
    }

    info!("showreel behaviour attached");
    Ok(())
}

pub fn run() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(Level::Info);

    if let Err(err) = start() {
        error!("page behaviour not started: {err}");
    }
}
