/// Coalesces bursts of scroll and resize events into one recompute per
/// animation frame.
#[derive(Debug, Default)]
pub struct FrameGate {
    pending: bool,
}

impl FrameGate {
    /// Returns `true` when the caller should schedule a frame; `false` when
    /// one is already in flight.
    pub fn request(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    /// Consumes the in-flight frame. Returns `false` for a frame nobody asked for.
    pub fn complete(&mut self) -> bool {
        std::mem::replace(&mut self.pending, false)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}
