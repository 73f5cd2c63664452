//! Surface owners that keep a diagram in sync with its inputs.

mod local_loop;
mod network;

pub use local_loop::LocalLoopView;
pub use network::{NetworkInputs, NetworkView};

/// Pixel size of the area a view draws into.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether anything can be drawn at this size.
    pub fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}
