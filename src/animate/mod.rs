//! Turns phases and loop cycles into scheduled particle tweens.

mod local_loop;
mod phase;

pub use local_loop::{LocalLoopAnimator, LoopHandle};
pub use phase::{animate_phase, plan_phase, ParticlePlan};
