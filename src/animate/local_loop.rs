use std::{sync::Arc, time::Duration};

use log::debug;

use crate::{
    config::{Palette, Rgb, Signal},
    layout::{CurvePath, LoopGeometry, Point},
    render::{Ease, JobContext, Layer, Shape, Start, Style, Surface, TaskHandle, Tween},
};

/// Travel time of a particle along its path.
const TRAVEL: Duration = Duration::from_millis(1700);
/// How far a trailing ghost lags its dot.
const GHOST_LAG: Duration = Duration::from_millis(90);
const GHOST_SCALE: f64 = 1.7;
const GHOST_OPACITY: f64 = 0.2;
const DOT_OPACITY: f64 = 0.95;
/// Radius of the second emission of each pair, relative to the first.
const TRAILING_SCALE: f64 = 0.65;

const PULSE: Duration = Duration::from_millis(1100);
const PULSE_OPACITY: f64 = 0.6;
const PULSE_WIDTH: f64 = 1.5;

/// Emission offsets within one cycle. Prediction and state arrive first, the
/// error only leaves the comparator after both have landed.
const PREDICTION_AT: [u64; 2] = [0, 320];
const STATE_AT: [u64; 2] = [150, 470];
const ERROR_AT: [u64; 2] = [2100, 2420];

/// A path particles travel, with the hue they carry.
#[derive(Debug, Clone)]
struct Lane {
    path: Arc<CurvePath>,
    signal: Signal,
    color: Rgb,
    offsets: [u64; 2],
}

/// One emission cycle: a dot and a ghost per spawn, on every lane.
struct EmitCycle {
    lanes: Vec<Lane>,
    radius: f64,
}

impl EmitCycle {
    fn run(&mut self, ctx: &mut JobContext<'_>) {
        for lane in &self.lanes {
            for (i, &offset) in lane.offsets.iter().enumerate() {
                let r = if i == 0 { self.radius } else { self.radius * TRAILING_SCALE };
                spawn(ctx, lane, Duration::from_millis(offset), r);
            }
        }
    }
}

fn spawn(ctx: &mut JobContext<'_>, lane: &Lane, delay: Duration, radius: f64) {
    let start = lane.path.start().unwrap_or_default();

    let dot = ctx.scene().add(
        Layer::Particles,
        Shape::circle(start, radius),
        Style::filled(lane.color).filter(lane.signal.glow_id()).opacity(0.0),
    );
    let ghost = ctx.scene().add(
        Layer::Particles,
        Shape::circle(start, radius * GHOST_SCALE),
        Style::filled(lane.color).opacity(0.0),
    );

    ctx.animate(
        Tween::new(dot, TRAVEL)
            .delay(delay)
            .ease(Ease::SinInOut)
            .move_along(Arc::clone(&lane.path))
            .opacity(DOT_OPACITY, DOT_OPACITY)
            .remove_on_end(),
    );
    ctx.animate(
        Tween::new(ghost, TRAVEL)
            .delay(delay + GHOST_LAG)
            .ease(Ease::SinInOut)
            .move_along(Arc::clone(&lane.path))
            .opacity(GHOST_OPACITY, GHOST_OPACITY)
            .remove_on_end(),
    );
}

/// Expanding, fading ring around the comparator.
struct Pulse {
    center: Point,
    radius: f64,
    growth: f64,
    color: Rgb,
}

impl Pulse {
    fn run(&mut self, ctx: &mut JobContext<'_>) {
        let ring = ctx.scene().add(
            Layer::Particles,
            Shape::circle(self.center, self.radius),
            Style::stroked(self.color, PULSE_WIDTH).opacity(PULSE_OPACITY),
        );
        ctx.animate(
            Tween::new(ring, PULSE)
                .ease(Ease::QuadOut)
                .radius(self.radius, self.radius + self.growth)
                .opacity(PULSE_OPACITY, 0.0)
                .remove_on_end(),
        );
    }
}

/// Drives the repeating emission cycle of the local loop diagram.
pub struct LocalLoopAnimator;

impl LocalLoopAnimator {
    /// Starts both repeating schedules; the first cycle and pulse run now.
    ///
    /// # Args
    /// * `geometry` - Paths and comparator to animate.
    /// * `palette` - Lane and pulse colors.
    /// * `period` - Time between cycles.
    /// * `surface` - Where particles are drawn.
    pub fn start(
        geometry: &LoopGeometry,
        palette: &Palette,
        period: Duration,
        surface: &mut Surface,
    ) -> LoopHandle {
        let lanes = vec![
            Lane {
                path: Arc::new(geometry.prediction.clone()),
                signal: Signal::Prediction,
                color: palette.prediction,
                offsets: PREDICTION_AT,
            },
            Lane {
                path: Arc::new(geometry.state.clone()),
                signal: Signal::Activation,
                color: palette.activation,
                offsets: STATE_AT,
            },
            Lane {
                path: Arc::new(geometry.error.clone()),
                signal: Signal::Error,
                color: palette.error,
                offsets: ERROR_AT,
            },
        ];

        let mut cycle = EmitCycle {
            lanes,
            radius: geometry.particle_radius,
        };
        let mut pulse = Pulse {
            center: geometry.comparator_center,
            radius: geometry.comparator_radius,
            growth: geometry.pulse_growth,
            color: palette.error,
        };

        let cycle = surface.every(
            period,
            move |ctx: &mut JobContext<'_>| cycle.run(ctx),
            Start::Now,
        );
        let pulse = surface.every(
            period,
            move |ctx: &mut JobContext<'_>| pulse.run(ctx),
            Start::Now,
        );
        debug!("local loop started, period {period:?}");

        LoopHandle { cycle, pulse }
    }
}

/// Keeps a running local loop alive; [`LoopHandle::stop`] ends it.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "dropping the handle leaves the loop running until the surface is cleared"]
pub struct LoopHandle {
    cycle: TaskHandle,
    pulse: TaskHandle,
}

impl LoopHandle {
    pub fn handles(&self) -> [TaskHandle; 2] {
        [self.cycle, self.pulse]
    }

    /// Cancels both schedules and every particle they spawned.
    pub fn stop(self, surface: &mut Surface) {
        surface.cancel(self.cycle);
        surface.cancel(self.pulse);
        debug!("local loop stopped");
    }
}
