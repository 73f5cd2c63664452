//! Pure geometry: everything here maps a topology and a viewport to
//! positions, with no drawing and no clock.

mod breakpoint;
mod curve;
mod geometry;
mod local_loop;
mod point;
mod scale;

pub use breakpoint::{Breakpoint, BreakpointPolicy};
pub use curve::{catmull_rom, Cubic, CurvePath};
pub use geometry::{compute_geometry, Margins, NetworkGeometry, NetworkProfile};
pub use local_loop::{compute_loop_geometry, LoopGeometry};
pub use point::Point;
pub use scale::PointScale;
