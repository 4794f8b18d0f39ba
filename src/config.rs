use serde::Deserialize;
use url::Url;

use crate::error::SetupError;

const DEFAULT_SCROLL_THRESHOLD: f64 = 50.0;
const DEFAULT_SECTION_LINE_RATIO: f64 = 1.0 / 3.0;
const DEFAULT_NAV_FALLBACK_HEIGHT: f64 = 72.0;
const DEFAULT_SCROLL_MARGIN: f64 = 8.0;
const DEFAULT_VIDEO_EMBED_BASE: &str = "https://player.vimeo.com/video/";
const DEFAULT_WORK_SECTION_IDS: [&str; 3] = ["filmmaking", "theatre", "commercial"];
const DEFAULT_PARALLAX_ROTATE_PER_PX: f64 = 0.02;
const DEFAULT_PARALLAX_MAX_ROTATE_DEG: f64 = 24.0;
const DEFAULT_PARALLAX_SCALE_PER_PX: f64 = 0.0002;
const DEFAULT_PARALLAX_MIN_SCALE: f64 = 0.9;
const DEFAULT_PARALLAX_FADE_DISTANCE: f64 = 600.0;
const DEFAULT_REVEAL_THRESHOLD: f64 = 0.1;
const DEFAULT_REVEAL_ROOT_MARGIN: &str = "0px 0px -40px 0px";

const SCROLL_THRESHOLD_BOUNDS: (f64, f64) = (0.0, 2_000.0);
const SECTION_LINE_RATIO_BOUNDS: (f64, f64) = (0.0, 1.0);
const NAV_FALLBACK_HEIGHT_BOUNDS: (f64, f64) = (0.0, 400.0);
const SCROLL_MARGIN_BOUNDS: (f64, f64) = (0.0, 200.0);
const PARALLAX_ROTATE_PER_PX_BOUNDS: (f64, f64) = (0.0, 1.0);
const PARALLAX_MAX_ROTATE_DEG_BOUNDS: (f64, f64) = (0.0, 360.0);
const PARALLAX_SCALE_PER_PX_BOUNDS: (f64, f64) = (0.0, 0.01);
const PARALLAX_MIN_SCALE_BOUNDS: (f64, f64) = (0.5, 1.0);
const PARALLAX_FADE_DISTANCE_BOUNDS: (f64, f64) = (1.0, 10_000.0);
const REVEAL_THRESHOLD_BOUNDS: (f64, f64) = (0.0, 1.0);

/// Tunables for every behaviour. The page may override any subset through
/// a JSON block; whatever is missing keeps its default.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BehaviorConfig {
    /// Scroll offset at which the nav is styled as scrolled. Inclusive.
    pub scroll_threshold: f64,
    /// Where the section trigger line sits, as a fraction of viewport height.
    pub section_line_ratio: f64,
    pub nav_fallback_height: f64,
    pub scroll_margin: f64,
    pub video_embed_base: String,
    /// Sections that also light up the dropdown parent link.
    pub work_section_ids: Vec<String>,
    pub parallax: ParallaxConfig,
    pub reveal: RevealConfig,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParallaxConfig {
    pub rotate_per_px: f64,
    pub max_rotate_deg: f64,
    pub scale_per_px: f64,
    pub min_scale: f64,
    pub fade_distance: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RevealConfig {
    pub threshold: f64,
    pub root_margin: String,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
            section_line_ratio: DEFAULT_SECTION_LINE_RATIO,
            nav_fallback_height: DEFAULT_NAV_FALLBACK_HEIGHT,
            scroll_margin: DEFAULT_SCROLL_MARGIN,
            video_embed_base: DEFAULT_VIDEO_EMBED_BASE.to_string(),
            work_section_ids: DEFAULT_WORK_SECTION_IDS
                .iter()
                .map(ToString::to_string)
                .collect(),
            parallax: ParallaxConfig::default(),
            reveal: RevealConfig::default(),
        }
    }
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            rotate_per_px: DEFAULT_PARALLAX_ROTATE_PER_PX,
            max_rotate_deg: DEFAULT_PARALLAX_MAX_ROTATE_DEG,
            scale_per_px: DEFAULT_PARALLAX_SCALE_PER_PX,
            min_scale: DEFAULT_PARALLAX_MIN_SCALE,
            fade_distance: DEFAULT_PARALLAX_FADE_DISTANCE,
        }
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_REVEAL_THRESHOLD,
            root_margin: DEFAULT_REVEAL_ROOT_MARGIN.to_string(),
        }
    }
}

impl BehaviorConfig {
    /// Parses an override block and sanitizes it.
    pub fn from_json(raw: &str) -> Result<Self, SetupError> {
        let parsed: Self = serde_json::from_str(raw)?;
        Ok(parsed.sanitized())
    }

    /// Replaces out-of-range values with their defaults.
    pub fn sanitized(self) -> Self {
        let parallax = ParallaxConfig {
            rotate_per_px: within_bounds(
                self.parallax.rotate_per_px,
                DEFAULT_PARALLAX_ROTATE_PER_PX,
                PARALLAX_ROTATE_PER_PX_BOUNDS,
            ),
            max_rotate_deg: within_bounds(
                self.parallax.max_rotate_deg,
                DEFAULT_PARALLAX_MAX_ROTATE_DEG,
                PARALLAX_MAX_ROTATE_DEG_BOUNDS,
            ),
            scale_per_px: within_bounds(
                self.parallax.scale_per_px,
                DEFAULT_PARALLAX_SCALE_PER_PX,
                PARALLAX_SCALE_PER_PX_BOUNDS,
            ),
            min_scale: within_bounds(
                self.parallax.min_scale,
                DEFAULT_PARALLAX_MIN_SCALE,
                PARALLAX_MIN_SCALE_BOUNDS,
            ),
            fade_distance: within_bounds(
                self.parallax.fade_distance,
                DEFAULT_PARALLAX_FADE_DISTANCE,
                PARALLAX_FADE_DISTANCE_BOUNDS,
            ),
        };

        let root_margin = Some(self.reveal.root_margin.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_REVEAL_ROOT_MARGIN.to_string());
        let reveal = RevealConfig {
            threshold: within_bounds(
                self.reveal.threshold,
                DEFAULT_REVEAL_THRESHOLD,
                REVEAL_THRESHOLD_BOUNDS,
            ),
            root_margin,
        };

        Self {
            scroll_threshold: within_bounds(
                self.scroll_threshold,
                DEFAULT_SCROLL_THRESHOLD,
                SCROLL_THRESHOLD_BOUNDS,
            ),
            section_line_ratio: within_bounds(
                self.section_line_ratio,
                DEFAULT_SECTION_LINE_RATIO,
                SECTION_LINE_RATIO_BOUNDS,
            ),
            nav_fallback_height: within_bounds(
                self.nav_fallback_height,
                DEFAULT_NAV_FALLBACK_HEIGHT,
                NAV_FALLBACK_HEIGHT_BOUNDS,
            ),
            scroll_margin: within_bounds(
                self.scroll_margin,
                DEFAULT_SCROLL_MARGIN,
                SCROLL_MARGIN_BOUNDS,
            ),
            video_embed_base: normalize_embed_base(&self.video_embed_base),
            work_section_ids: self
                .work_section_ids
                .into_iter()
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty())
                .collect(),
            parallax,
            reveal,
        }
    }
}

fn within_bounds(value: f64, default: f64, bounds: (f64, f64)) -> f64 {
    Some(value)
        .filter(|value| value.is_finite() && (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

fn normalize_embed_base(raw: &str) -> String {
    let Ok(parsed) = Url::parse(raw.trim()) else {
        return DEFAULT_VIDEO_EMBED_BASE.to_string();
    };

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return DEFAULT_VIDEO_EMBED_BASE.to_string();
    }

    let mut base = parsed.to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    base
}

/// Builds the player URL for `video_id` with autoplay on and player chrome
/// suppressed. Returns `None` for ids that are not a plain token.
pub fn embed_url(base: &str, video_id: &str) -> Option<Url> {
    let video_id = video_id.trim();
    let plain_token = !video_id.is_empty()
        && video_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !plain_token {
        return None;
    }

    let mut url = Url::parse(base).ok()?.join(video_id).ok()?;
    url.query_pairs_mut()
        .append_pair("autoplay", "1")
        .append_pair("title", "0")
        .append_pair("byline", "0")
        .append_pair("portrait", "0");
    Some(url)
}
