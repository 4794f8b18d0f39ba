use log::{debug, warn};

use crate::config::{embed_url, BehaviorConfig};
use crate::links::{parse_external_links, ExternalLink};
use crate::surface::{
    non_empty_attribute, set_class, set_hidden, Surface, ACTIVE_CLASS, CREDITS_ATTR,
    DESCRIPTION_ATTR, DETAIL_TEMPLATE_CLASS, LINKS_ATTR, MODAL_BACKDROP_ID, MODAL_CLOSE_ID,
    MODAL_CREDITS_ID, MODAL_DESCRIPTION_ID, MODAL_DETAIL_ID, MODAL_ID, MODAL_IFRAME_ID,
    MODAL_IMAGE_ID, MODAL_LINKS_ID, MODAL_MEDIA_ID, MODAL_TITLE_ID, MODAL_YEAR_ID,
    SCROLL_LOCK_CLASS, TITLE_ATTR, VIDEO_ATTR, YEAR_ATTR,
};

#[derive(Clone, Debug, PartialEq)]
pub enum Media {
    Video { embed_url: String },
    Image { src: String, alt: String },
    None,
}

/// Everything the modal shows for one work card, read from its markup.
#[derive(Clone, Debug, PartialEq)]
pub struct CardContent<N> {
    pub title: String,
    pub year: String,
    pub description: String,
    pub credits: String,
    pub media: Media,
    pub links: Vec<ExternalLink>,
    pub detail_template: Option<N>,
}

impl<N: Clone + PartialEq> CardContent<N> {
    pub fn read<S: Surface<Node = N>>(surface: &S, card: &N, config: &BehaviorConfig) -> Self {
        let text = |name: &str| non_empty_attribute(surface, card, name).unwrap_or_default();
        let title = text(TITLE_ATTR);

        let video = non_empty_attribute(surface, card, VIDEO_ATTR).and_then(|id| {
            let url = embed_url(&config.video_embed_base, &id);
            if url.is_none() {
                warn!("ignoring malformed video id {id:?} on card {title:?}");
            }
            url
        });
        let media = match video {
            Some(url) => Media::Video {
                embed_url: url.to_string(),
            },
            None => surface
                .descendant_image(card)
                .and_then(|image| {
                    let src = non_empty_attribute(surface, &image, "src")?;
                    let alt = non_empty_attribute(surface, &image, "alt")
                        .unwrap_or_else(|| title.clone());
                    Some(Media::Image { src, alt })
                })
                .unwrap_or(Media::None),
        };

        Self {
            year: text(YEAR_ATTR),
            description: text(DESCRIPTION_ATTR),
            credits: text(CREDITS_ATTR),
            media,
            links: parse_external_links(&text(LINKS_ATTR)),
            detail_template: surface.descendant_with_class(card, DETAIL_TEMPLATE_CLASS),
            title,
        }
    }
}

/// Element to focus when Tab would leave the modal, or `None` to let the
/// browser move focus itself.
///
/// Tab on the last focusable wraps to the first; Shift+Tab on the first wraps
/// to the last. Focus outside the list is pulled back in at the matching end.
pub fn trap_focus<N: Clone + PartialEq>(focusable: &[N], active: Option<&N>, backwards: bool) -> Option<N> {
    let first = focusable.first()?;
    let last = focusable.last()?;
    let position = active.and_then(|active| focusable.iter().position(|node| node == active));

    match position {
        None if backwards => Some(last.clone()),
        None => Some(first.clone()),
        Some(0) if backwards => Some(last.clone()),
        Some(index) if !backwards && index + 1 == focusable.len() => Some(first.clone()),
        Some(_) => None,
    }
}

#[derive(Debug)]
struct ModalElements<N> {
    root: N,
    close: N,
    backdrop: Option<N>,
    media: Option<N>,
    iframe: Option<N>,
    image: Option<N>,
    title: Option<N>,
    year: Option<N>,
    description: Option<N>,
    credits: Option<N>,
    detail: Option<N>,
    links: Option<N>,
    body: Option<N>,
}

/// The single work modal: open/closed flag, the card it shows, and where
/// focus goes back to on close.
#[derive(Debug)]
pub struct ModalController<N> {
    elements: ModalElements<N>,
    open: bool,
    content: Option<CardContent<N>>,
    return_focus: Option<N>,
}

impl<N: Clone + PartialEq> ModalController<N> {
    pub fn locate<S: Surface<Node = N>>(surface: &S) -> Option<Self> {
        let (Some(root), Some(close)) = (
            surface.element_by_id(MODAL_ID),
            surface.element_by_id(MODAL_CLOSE_ID),
        ) else {
            warn!("modal markup missing; work cards will not open");
            return None;
        };

        let elements = ModalElements {
            root,
            close,
            backdrop: surface.element_by_id(MODAL_BACKDROP_ID),
            media: surface.element_by_id(MODAL_MEDIA_ID),
            iframe: surface.element_by_id(MODAL_IFRAME_ID),
            image: surface.element_by_id(MODAL_IMAGE_ID),
            title: surface.element_by_id(MODAL_TITLE_ID),
            year: surface.element_by_id(MODAL_YEAR_ID),
            description: surface.element_by_id(MODAL_DESCRIPTION_ID),
            credits: surface.element_by_id(MODAL_CREDITS_ID),
            detail: surface.element_by_id(MODAL_DETAIL_ID),
            links: surface.element_by_id(MODAL_LINKS_ID),
            body: surface.body(),
        };

        Some(Self {
            elements,
            open: false,
            content: None,
            return_focus: None,
        })
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn content(&self) -> Option<&CardContent<N>> {
        self.content.as_ref()
    }

    pub fn open<S: Surface<Node = N>>(&mut self, surface: &S, card: &N, config: &BehaviorConfig) {
        let content = CardContent::read(surface, card, config);

        self.show_media(surface, &content);
        self.fill_text(surface, &content);
        self.clear_injected(surface);
        if let (Some(template), Some(detail)) = (&content.detail_template, &self.elements.detail) {
            surface.append_template(template, detail);
        }
        self.show_links(surface, &content.links);

        if !self.open {
            let previous = surface
                .active_element()
                .filter(|active| surface.body().as_ref() != Some(active));
            self.return_focus = previous.or_else(|| Some(card.clone()));
        }

        self.set_open(surface, true);
        surface.focus(&self.elements.close);
        debug!("modal opened for {:?}", content.title);
        self.content = Some(content);
    }

    /// Closes the modal, stopping playback and handing focus back. A no-op
    /// while already closed.
    pub fn close<S: Surface<Node = N>>(&mut self, surface: &S) -> bool {
        if !self.open {
            return false;
        }

        self.set_open(surface, false);
        if let Some(iframe) = &self.elements.iframe {
            surface.remove_attribute(iframe, "src");
        }
        if let Some(image) = &self.elements.image {
            surface.remove_attribute(image, "src");
            set_hidden(surface, image, true);
        }
        self.clear_injected(surface);

        if let Some(target) = self.return_focus.take() {
            surface.focus(&target);
        }
        if let Some(content) = self.content.take() {
            debug!("modal closed for {:?}", content.title);
        }
        true
    }

    /// Clicks on the close control or the backdrop dismiss the modal.
    pub fn is_dismiss_target<S: Surface<Node = N>>(&self, surface: &S, target: &N) -> bool {
        surface.contains(&self.elements.close, target)
            || self
                .elements
                .backdrop
                .as_ref()
                .is_some_and(|backdrop| surface.contains(backdrop, target))
    }

    /// Keeps Tab cycling inside the modal. Returns whether focus was moved,
    /// in which case the key's default must be suppressed.
    pub fn trap_tab<S: Surface<Node = N>>(&self, surface: &S, backwards: bool) -> bool {
        if !self.open {
            return false;
        }

        let focusable = surface.focusable_descendants(&self.elements.root);
        let active = surface.active_element();
        match trap_focus(&focusable, active.as_ref(), backwards) {
            Some(next) => {
                surface.focus(&next);
                true
            }
            None => false,
        }
    }

    /// The open flag and the body scroll lock always move together.
    fn set_open<S: Surface<Node = N>>(&mut self, surface: &S, open: bool) {
        set_class(surface, &self.elements.root, ACTIVE_CLASS, open);
        surface.set_attribute(&self.elements.root, "aria-hidden", if open { "false" } else { "true" });
        if let Some(body) = &self.elements.body {
            set_class(surface, body, SCROLL_LOCK_CLASS, open);
        }
        self.open = open;
    }

    fn show_media<S: Surface<Node = N>>(&self, surface: &S, content: &CardContent<N>) {
        let elements = &self.elements;
        match &content.media {
            Media::Video { embed_url } => {
                if let Some(iframe) = &elements.iframe {
                    surface.set_attribute(iframe, "src", embed_url);
                    surface.set_attribute(iframe, "title", &format!("{} video player", content.title));
                    set_hidden(surface, iframe, false);
                }
                if let Some(image) = &elements.image {
                    surface.remove_attribute(image, "src");
                    set_hidden(surface, image, true);
                }
            }
            Media::Image { src, alt } => {
                if let Some(iframe) = &elements.iframe {
                    surface.remove_attribute(iframe, "src");
                    set_hidden(surface, iframe, true);
                }
                if let Some(image) = &elements.image {
                    surface.set_attribute(image, "src", src);
                    surface.set_attribute(image, "alt", alt);
                    set_hidden(surface, image, false);
                }
            }
            Media::None => {
                if let Some(iframe) = &elements.iframe {
                    surface.remove_attribute(iframe, "src");
                }
                if let Some(image) = &elements.image {
                    surface.remove_attribute(image, "src");
                }
            }
        }

        if let Some(media) = &elements.media {
            set_hidden(surface, media, content.media == Media::None);
        }
    }

    fn fill_text<S: Surface<Node = N>>(&self, surface: &S, content: &CardContent<N>) {
        let fields = [
            (&self.elements.title, &content.title),
            (&self.elements.year, &content.year),
            (&self.elements.description, &content.description),
            (&self.elements.credits, &content.credits),
        ];
        for (node, value) in fields {
            if let Some(node) = node {
                surface.set_text(node, value);
            }
        }
    }

    fn show_links<S: Surface<Node = N>>(&self, surface: &S, links: &[ExternalLink]) {
        let Some(container) = &self.elements.links else {
            return;
        };
        for link in links {
            surface.append_link(container, &link.url, &link.display_label());
        }
        set_hidden(surface, container, links.is_empty());
    }

    /// Drops injected clones; the card's own template is never touched.
    fn clear_injected<S: Surface<Node = N>>(&self, surface: &S) {
        if let Some(detail) = &self.elements.detail {
            surface.clear_children(detail);
        }
        if let Some(links) = &self.elements.links {
            surface.clear_children(links);
        }
    }
}
