//! Animated diagrams contrasting global backpropagation with local
//! predictive coding.
//!
//! Layout is pure ([`layout`]), drawing is retained and clock-driven
//! ([`render`]), and views ([`view`]) tie the two together under a
//! cancel-then-rebuild lifecycle. Hosts advance time with `tick`.

pub mod animate;
pub mod clock;
pub mod config;
pub mod error;
pub mod layout;
pub mod model;
pub mod render;
pub mod view;

pub use clock::{PhaseClock, PhaseTick};
pub use config::{Palette, Rgb, Signal, Timing, VizConfig};
pub use error::{Result, VizError};
pub use model::{Phase, SampleData, SampleSource, Topology, Variant};
pub use view::{LocalLoopView, NetworkInputs, NetworkView, Viewport};
