use crate::config::ParallaxConfig;
use crate::surface::{Surface, PARALLAX_ID};

/// Transform applied to the hero mark for one scroll offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParallaxFrame {
    pub rotate_deg: f64,
    pub scale: f64,
    pub opacity: f64,
}

impl ParallaxFrame {
    /// Each component moves monotonically with the offset and stops at its
    /// floor or cap. Negative offsets (overscroll) count as zero.
    pub fn at(offset: f64, config: &ParallaxConfig) -> Self {
        let offset = offset.max(0.0);
        Self {
            rotate_deg: (offset * config.rotate_per_px).min(config.max_rotate_deg),
            scale: (1.0 - offset * config.scale_per_px).max(config.min_scale),
            opacity: (1.0 - offset / config.fade_distance).clamp(0.0, 1.0),
        }
    }

    pub fn css_transform(&self) -> String {
        format!("rotate({:.2}deg) scale({:.4})", self.rotate_deg, self.scale)
    }

    pub fn css_opacity(&self) -> String {
        format!("{:.3}", self.opacity)
    }
}

#[derive(Debug)]
pub struct Parallax<N> {
    element: N,
    last: Option<ParallaxFrame>,
}

impl<N: Clone + PartialEq> Parallax<N> {
    pub fn locate<S: Surface<Node = N>>(surface: &S) -> Option<Self> {
        let element = surface.element_by_id(PARALLAX_ID)?;
        Some(Self {
            element,
            last: None,
        })
    }

    pub fn update<S: Surface<Node = N>>(&mut self, surface: &S, config: &ParallaxConfig) {
        let frame = ParallaxFrame::at(surface.scroll_y(), config);
        if self.last == Some(frame) {
            return;
        }

        surface.set_style(&self.element, "transform", &frame.css_transform());
        surface.set_style(&self.element, "opacity", &frame.css_opacity());
        self.last = Some(frame);
    }
}
