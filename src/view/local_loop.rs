use std::time::Duration;

use log::{debug, warn};

use super::Viewport;
use crate::{
    animate::{LocalLoopAnimator, LoopHandle},
    config::{Palette, Rgb, Signal, Timing, VizConfig},
    layout::{compute_loop_geometry, BreakpointPolicy, LoopGeometry, Point},
    render::{
        GradientStop, Layer, Paint, Resource, Scene, Shape, Style, Surface, TaskHandle, TickReport,
    },
};

const GLOW_STRENGTH: f64 = 0.6;
const GRID_OPACITY: f64 = 0.03;

/// Owns the surface of the local error loop diagram.
///
/// Nothing is drawn until the mount delay elapses; from then on every
/// resize stops the running loop, rebuilds the frame and restarts it.
#[derive(Debug)]
pub struct LocalLoopView {
    viewport: Viewport,
    palette: Palette,
    policy: BreakpointPolicy,
    period: Duration,
    surface: Surface,
    geometry: Option<LoopGeometry>,
    running: Option<LoopHandle>,
    mount: Option<TaskHandle>,
    visible: bool,
    torn_down: bool,
}

impl LocalLoopView {
    pub fn new(
        viewport: Viewport,
        palette: Palette,
        policy: BreakpointPolicy,
        timing: Timing,
    ) -> Self {
        let mut surface = Surface::new(viewport.width, viewport.height, palette.background);
        let mount = surface.after(timing.mount_delay());

        Self {
            viewport,
            palette,
            policy,
            period: timing.loop_period(),
            surface,
            geometry: None,
            running: None,
            mount: Some(mount),
            visible: false,
            torn_down: false,
        }
    }

    pub fn from_config(config: &VizConfig, viewport: Viewport) -> Self {
        Self::new(viewport, config.palette, config.loop_breakpoints, config.timing)
    }

    /// Whether the mount delay has elapsed.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn geometry(&self) -> Option<&LoopGeometry> {
        self.geometry.as_ref()
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn scene(&self) -> &Scene {
        self.surface.scene()
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        if self.torn_down || viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        self.redraw();
    }

    /// Stops the loop, rebuilds the frame and restarts the loop. Does
    /// nothing before the diagram is mounted.
    pub fn redraw(&mut self) {
        if self.torn_down || !self.visible {
            return;
        }
        self.stop_loop();
        self.surface.cancel_all();
        self.surface.clear();

        let Viewport { width, height } = self.viewport;
        self.surface.resize(width, height);
        let Some(geometry) = compute_loop_geometry(width, height, &self.policy) else {
            warn!("viewport {width}x{height} too small for the local loop, deferring draw");
            self.geometry = None;
            return;
        };

        draw_loop(&mut self.surface, &geometry, &self.palette);
        self.running = Some(LocalLoopAnimator::start(
            &geometry,
            &self.palette,
            self.period,
            &mut self.surface,
        ));
        debug!("local loop drawn at {width}x{height} ({:?})", geometry.breakpoint);
        self.geometry = Some(geometry);
    }

    /// Cancels the mount timer, the loop and every particle, and empties the
    /// surface. Later calls are no-ops.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.stop_loop();
        self.mount = None;
        self.surface.cancel_all();
        self.surface.clear();
        self.torn_down = true;
        debug!("local loop view torn down");
    }

    /// Advances the animation clock, mounting the diagram when its delay
    /// elapses.
    pub fn tick(&mut self, dt: Duration) -> TickReport {
        if self.torn_down {
            return TickReport::default();
        }
        let report = self.surface.tick(dt);
        if self.mount.is_some_and(|m| report.has_fired(m)) {
            self.mount = None;
            self.visible = true;
            self.redraw();
        }
        report
    }

    pub fn svg(&self) -> String {
        self.surface.svg()
    }

    fn stop_loop(&mut self) {
        if let Some(handle) = self.running.take() {
            handle.stop(&mut self.surface);
        }
    }
}

impl Drop for LocalLoopView {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Picks the compact or the regular value.
fn size(g: &LoopGeometry, compact: f64, regular: f64) -> f64 {
    if g.is_compact() {
        compact
    } else {
        regular
    }
}

fn draw_loop(surface: &mut Surface, g: &LoopGeometry, palette: &Palette) {
    define_resources(surface, g, palette);
    draw_grid(surface, g);

    draw_box(
        surface,
        g,
        g.lower_center,
        ("LOWER LAYER", "(Sensory / L)"),
        palette.activation,
        Signal::Activation,
        "box-lower",
    );
    draw_box(
        surface,
        g,
        g.higher_center,
        ("HIGHER LAYER", "(Abstract / L+1)"),
        palette.prediction,
        Signal::Prediction,
        "box-higher",
    );

    draw_comparator(surface, g, palette.error);
    draw_paths(surface, g, palette);
}

fn define_resources(surface: &mut Surface, g: &LoopGeometry, palette: &Palette) {
    for signal in Signal::ALL {
        surface.define(
            signal.glow_id(),
            Resource::Glow {
                color: palette.signal(signal),
                blur: g.glow_blur,
                strength: GLOW_STRENGTH,
            },
        );
    }

    let box_gradient = |color: Rgb| {
        Resource::LinearGradient(vec![
            GradientStop::new(0.0, color, 0.12),
            GradientStop::new(1.0, Palette::PANEL, 0.9),
        ])
    };
    surface.define("box-lower", box_gradient(palette.activation));
    surface.define("box-higher", box_gradient(palette.prediction));
    surface.define(
        "comp-grad",
        Resource::RadialGradient(vec![
            GradientStop::new(0.0, palette.error, 0.18),
            GradientStop::new(1.0, Palette::PANEL, 1.0),
        ]),
    );

    let arrow = size(g, 4.0, 5.0);
    for (id, color) in [
        ("arr-pred", palette.prediction),
        ("arr-state", palette.activation),
        ("arr-error", palette.error),
    ] {
        surface.define(id, Resource::Arrow { color, size: arrow });
    }
}

fn draw_grid(surface: &mut Surface, g: &LoopGeometry) {
    let origin = Point::new(g.margins.left, g.margins.top);
    let cols = (g.inner_width / g.grid_step).floor() as usize;
    let rows = (g.inner_height / g.grid_step).floor() as usize;

    for i in 0..=cols {
        for j in 0..=rows {
            let at = origin + Point::new(i as f64 * g.grid_step, j as f64 * g.grid_step);
            surface.add(
                Layer::Backdrop,
                Shape::circle(at, 1.0),
                Style::filled(Palette::GRID_DOT).opacity(GRID_OPACITY),
            );
        }
    }
}

fn draw_box(
    surface: &mut Surface,
    g: &LoopGeometry,
    center: Point,
    (label, sublabel): (&str, &str),
    color: Rgb,
    signal: Signal,
    gradient: &str,
) {
    let origin = g.box_origin(center);
    let (w, h) = (g.box_width, g.box_height);

    surface.add(
        Layer::Nodes,
        Shape::rect(origin - Point::new(6.0, 6.0), w + 12.0, h + 12.0, 14.0),
        Style::filled(color).opacity(0.05).filter(signal.glow_id()),
    );
    surface.add(
        Layer::Nodes,
        Shape::rect(origin, w, h, 10.0),
        Style::stroked(color, 1.0)
            .fill(Paint::Gradient(gradient.to_string()))
            .stroke_opacity(0.45),
    );
    surface.add(
        Layer::Nodes,
        Shape::rect(origin + Point::new(1.0, 1.0), w - 2.0, 3.0, 9.0),
        Style::filled(color).opacity(0.7),
    );

    let dot_r = g.cell_radius();
    let spacing = w / 3.0;
    for (i, cell) in g.box_cells(center).into_iter().enumerate() {
        // Wire each left-column cell to its right neighbour.
        if i % 2 == 0 {
            surface.add(
                Layer::Nodes,
                Shape::line(cell + Point::new(dot_r, 0.0), cell + Point::new(spacing - dot_r, 0.0)),
                Style::stroked(color, 0.5).opacity(0.2),
            );
        }
        surface.add(
            Layer::Nodes,
            Shape::circle(cell, dot_r),
            Style::stroked(color, 1.0).opacity(0.4),
        );
        surface.add(
            Layer::Nodes,
            Shape::circle(cell, size(g, 1.2, 1.8)),
            Style::filled(color).opacity(0.65),
        );
    }

    let bottom = origin.y + h;
    surface.add(
        Layer::Labels,
        Shape::text(
            Point::new(center.x, bottom + size(g, 14.0, 20.0)),
            label,
            size(g, 8.0, 10.0),
        )
        .bold(),
        Style::filled(color),
    );
    surface.add(
        Layer::Labels,
        Shape::text(
            Point::new(center.x, bottom + size(g, 24.0, 34.0)),
            sublabel,
            size(g, 7.0, 9.0),
        ),
        Style::filled(Palette::LABEL),
    );
}

fn draw_comparator(surface: &mut Surface, g: &LoopGeometry, error: Rgb) {
    let c = g.comparator_center;
    let r = g.comparator_radius;

    surface.add(
        Layer::Nodes,
        Shape::circle(c, r + 12.0),
        Style::filled(error).opacity(0.04).filter(Signal::Error.glow_id()),
    );
    surface.add(
        Layer::Nodes,
        Shape::circle(c, r + 4.0),
        Style::stroked(error, 0.5).dashed(3.0, 5.0).opacity(0.3),
    );
    surface.add(
        Layer::Nodes,
        Shape::circle(c, r),
        Style::stroked(error, 1.2)
            .fill(Paint::Gradient("comp-grad".to_string()))
            .stroke_opacity(0.6),
    );
    surface.add(Layer::Labels, Shape::text(c, "Σ", size(g, 16.0, 24.0)), Style::filled(error));

    let (badge_w, badge_h) = (size(g, 60.0, 88.0), size(g, 14.0, 18.0));
    let badge = Point::new(c.x, c.y - r - size(g, 18.0, 26.0));
    surface.add(
        Layer::Labels,
        Shape::rect(badge - Point::new(badge_w / 2.0, badge_h / 2.0), badge_w, badge_h, 4.0),
        Style::stroked(error, 0.7)
            .fill(Paint::Solid(error))
            .fill_opacity(0.1)
            .stroke_opacity(0.4),
    );
    surface.add(
        Layer::Labels,
        Shape::text(badge, "ERROR UNIT", size(g, 6.0, 8.0)).bold(),
        Style::filled(error),
    );
}

fn draw_paths(surface: &mut Surface, g: &LoopGeometry, palette: &Palette) {
    let lanes = [
        (&g.prediction, palette.prediction, Signal::Prediction, "arr-pred"),
        (&g.state, palette.activation, Signal::Activation, "arr-state"),
        (&g.error, palette.error, Signal::Error, "arr-error"),
    ];
    for (path, color, signal, marker) in lanes {
        surface.add(
            Layer::Links,
            Shape::Path(path.clone()),
            Style::stroked(color, g.path_width)
                .marker_end(marker)
                .filter(signal.glow_id()),
        );
    }

    surface.add(
        Layer::Labels,
        Shape::text(g.prediction_label, g.prediction_caption(), g.label_font_px).bold(),
        Style::filled(palette.prediction),
    );
    surface.add(
        Layer::Labels,
        Shape::text(g.state_label, g.state_caption(), g.label_font_px).bold(),
        Style::filled(palette.activation),
    );

    let pill_w = size(g, 70.0, 108.0);
    surface.add(
        Layer::Labels,
        Shape::rect(g.error_badge - Point::new(pill_w / 2.0, 8.0), pill_w, 16.0, 7.0),
        Style::stroked(palette.error, 0.7)
            .fill(Paint::Solid(palette.background))
            .stroke_opacity(0.5),
    );
    surface.add(
        Layer::Labels,
        Shape::text(g.error_badge, "RESIDUAL ERROR", size(g, 6.5, 8.0)).bold(),
        Style::filled(palette.error),
    );
}
