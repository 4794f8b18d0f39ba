use url::Url;

/// An external link declared on a work card as `label:url`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExternalLink {
    pub label: String,
    pub url: String,
}

impl ExternalLink {
    /// Text shown for the link. Known festival platforms get a friendlier
    /// phrase; anything else is shown as written.
    pub fn display_label(&self) -> String {
        if self.label.eq_ignore_ascii_case("filmfreeway") {
            return "View on FilmFreeway".to_string();
        }
        self.label.clone()
    }
}

/// Parses `label:url, label:url`. Each entry splits on its first colon only,
/// so URLs keep their own colons. Entries without a label, or whose URL is
/// not http(s), are dropped.
pub fn parse_external_links(raw: &str) -> Vec<ExternalLink> {
    raw.split(',')
        .filter_map(|entry| {
            let (label, url) = entry.trim().split_once(':')?;
            let label = label.trim();
            let url = url.trim();
            if label.is_empty() || !is_web_url(url) {
                return None;
            }
            Some(ExternalLink {
                label: label.to_string(),
                url: url.to_string(),
            })
        })
        .collect()
}

fn is_web_url(value: &str) -> bool {
    Url::parse(value)
        .map(|url| url.scheme() == "http" || url.scheme() == "https")
        .unwrap_or(false)
}
