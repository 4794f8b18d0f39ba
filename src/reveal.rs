use log::debug;

use crate::surface::{Surface, REVEAL_CLASSES, VISIBLE_CLASS};

/// One-shot reveal: every tagged element starts pending and leaves the set
/// the first time it intersects the viewport.
#[derive(Debug)]
pub struct RevealAnimator<N> {
    pending: Vec<N>,
}

impl<N: Clone + PartialEq> RevealAnimator<N> {
    pub fn locate<S: Surface<Node = N>>(surface: &S) -> Self {
        let mut pending: Vec<N> = Vec::new();
        for class in REVEAL_CLASSES {
            for element in surface.elements_with_class(class) {
                if !pending.contains(&element) && !surface.has_class(&element, VISIBLE_CLASS) {
                    pending.push(element);
                }
            }
        }
        Self { pending }
    }

    pub fn pending(&self) -> &[N] {
        &self.pending
    }

    /// Marks `element` visible if it is still pending. Returns whether it was
    /// consumed, in which case the caller should stop observing it.
    pub fn on_intersection<S: Surface<Node = N>>(
        &mut self,
        surface: &S,
        element: &N,
        intersecting: bool,
    ) -> bool {
        if !intersecting {
            return false;
        }
        let Some(position) = self.pending.iter().position(|node| node == element) else {
            return false;
        };

        let element = self.pending.remove(position);
        surface.add_class(&element, VISIBLE_CLASS);
        true
    }

    /// Fallback when the browser cannot observe intersections: show all.
    pub fn reveal_all<S: Surface<Node = N>>(&mut self, surface: &S) -> usize {
        let count = self.pending.len();
        for element in self.pending.drain(..) {
            surface.add_class(&element, VISIBLE_CLASS);
        }
        debug!("revealed {count} elements without intersection observer");
        count
    }
}
