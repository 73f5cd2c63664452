//! Retained-mode drawing: a scene of styled shapes, a virtual clock that
//! animates it, and SVG export.

mod ease;
mod scene;
mod surface;
mod svg;
mod timeline;

pub use ease::Ease;
pub use scene::{
    Element, ElementId, GradientStop, Layer, Paint, Resource, Scene, Shape, Style, TextAnchor,
};
pub use surface::Surface;
pub use svg::to_svg;
pub use timeline::{Job, JobContext, Motion, Start, TaskHandle, TickReport, Timeline, Tween};
