use std::time::Duration;

use log::{debug, warn};
use rand::{rngs::StdRng, SeedableRng};

use super::Viewport;
use crate::{
    animate::{animate_phase, plan_phase},
    config::{Palette, Signal, VizConfig},
    error::Result,
    layout::{compute_geometry, BreakpointPolicy, NetworkGeometry},
    model::{build_graph, EdgeDirection, Graph, Phase, SampleData, Topology, Variant},
    render::{Layer, Paint, Resource, Scene, Shape, Style, Surface, TaskHandle, TickReport},
};

const GLOW_STRENGTH: f64 = 0.7;
const ACTIVATION_FILL: f64 = 0.72;
const ACTIVATION_OPACITY: f64 = 0.45;
const ERROR_RING_OPACITY: f64 = 0.55;
/// Errors at or below this magnitude get no ring.
const ERROR_RING_THRESHOLD: f32 = 0.05;

/// Everything the coordinator feeds into the network diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkInputs {
    pub topology: Topology,
    pub variant: Variant,
    pub phase: Phase,
    /// When false, no new particles are launched.
    pub animating: bool,
    pub data: SampleData,
}

impl NetworkInputs {
    pub fn new(topology: Topology, variant: Variant) -> Self {
        Self {
            topology,
            variant,
            phase: Phase::Idle,
            animating: true,
            data: SampleData::default(),
        }
    }
}

/// Owns the surface of the layered network diagram and keeps it in sync
/// with its inputs.
///
/// Every change cancels outstanding particles and rebuilds from scratch,
/// except while paused: a phase or data change then redraws only the static
/// layers and lets in-flight particles finish.
#[derive(Debug)]
pub struct NetworkView {
    inputs: NetworkInputs,
    viewport: Viewport,
    palette: Palette,
    policy: BreakpointPolicy,
    rng: StdRng,
    graph: Graph,
    geometry: NetworkGeometry,
    surface: Surface,
    particles: Vec<TaskHandle>,
    torn_down: bool,
}

impl NetworkView {
    /// Builds the graph and draws the first frame.
    ///
    /// # Args
    /// * `inputs` - Initial topology, variant, phase, pause flag and data.
    /// * `viewport` - Initial size; a degenerate size draws nothing yet.
    /// * `palette` - Theme colors.
    /// * `policy` - Width thresholds for the responsive profiles.
    /// * `seed` - Seed for decorative edge weights.
    pub fn new(
        inputs: NetworkInputs,
        viewport: Viewport,
        palette: Palette,
        policy: BreakpointPolicy,
        seed: Option<u64>,
    ) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let graph = build_graph(&inputs.topology, inputs.variant, &inputs.data, &mut rng);

        let mut view = Self {
            inputs,
            viewport,
            palette,
            policy,
            rng,
            graph,
            geometry: NetworkGeometry::empty(0.0, 0.0, policy.classify(0.0)),
            surface: Surface::new(viewport.width, viewport.height, palette.background),
            particles: Vec::new(),
            torn_down: false,
        };
        view.redraw();
        view
    }

    /// A view over the configured topology and theme.
    ///
    /// # Errors
    /// Returns an error if the configured topology is invalid.
    pub fn from_config(config: &VizConfig, variant: Variant, viewport: Viewport) -> Result<Self> {
        let inputs = NetworkInputs::new(config.topology()?, variant);
        Ok(Self::new(
            inputs,
            viewport,
            config.palette,
            config.network_breakpoints,
            config.seed,
        ))
    }

    pub fn inputs(&self) -> &NetworkInputs {
        &self.inputs
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn geometry(&self) -> &NetworkGeometry {
        &self.geometry
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn scene(&self) -> &Scene {
        self.surface.scene()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Particles still scheduled or travelling.
    pub fn active_particles(&self) -> usize {
        self.particles.len()
    }

    /// Status line for the current phase.
    pub fn status(&self) -> &'static str {
        self.inputs.phase.describe(self.inputs.variant)
    }

    pub fn caption(&self) -> &'static str {
        self.inputs.variant.caption()
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        if self.torn_down || viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        self.redraw();
    }

    pub fn set_topology(&mut self, topology: Topology) {
        if self.torn_down || topology == self.inputs.topology {
            return;
        }
        self.inputs.topology = topology;
        self.rebuild_graph();
        self.redraw();
    }

    pub fn set_variant(&mut self, variant: Variant) {
        if self.torn_down || variant == self.inputs.variant {
            return;
        }
        self.inputs.variant = variant;
        self.rebuild_graph();
        self.redraw();
    }

    pub fn set_phase(&mut self, phase: Phase) {
        if self.torn_down || phase == self.inputs.phase {
            return;
        }
        self.inputs.phase = phase;
        self.refresh();
    }

    pub fn set_data(&mut self, data: SampleData) {
        if self.torn_down || data == self.inputs.data {
            return;
        }
        self.graph = self.graph.with_data(&self.inputs.topology, &data);
        self.inputs.data = data;
        self.refresh();
    }

    /// Pausing keeps in-flight particles; resuming redraws and launches the
    /// current phase.
    pub fn set_animating(&mut self, animating: bool) {
        if self.torn_down || animating == self.inputs.animating {
            return;
        }
        self.inputs.animating = animating;
        if animating {
            self.redraw();
        } else {
            debug!("paused with {} particle(s) in flight", self.particles.len());
        }
    }

    /// Applies every field of `next` that differs from the current inputs.
    ///
    /// A pause is applied before anything else and a resume after
    /// everything else, so the other changes never launch particles
    /// while `next.animating` is false.
    pub fn update(&mut self, next: NetworkInputs) {
        let NetworkInputs {
            topology,
            variant,
            phase,
            animating,
            data,
        } = next;
        if !animating {
            self.set_animating(false);
        }
        self.set_topology(topology);
        self.set_variant(variant);
        self.set_data(data);
        self.set_phase(phase);
        if animating {
            self.set_animating(true);
        }
    }

    /// Cancels all outstanding work and rebuilds the whole frame.
    pub fn redraw(&mut self) {
        if self.torn_down {
            return;
        }
        self.surface.cancel_each(&mut self.particles);
        self.surface.cancel_all();
        debug_assert!(self.surface.is_idle(), "stale tasks survived a redraw");
        self.surface.clear();

        if !self.draw_static() {
            return;
        }
        if self.inputs.animating {
            self.launch();
        }
        debug!(
            "redrew {} {} at {}x{} ({:?}, {:?})",
            self.inputs.variant,
            self.inputs.topology,
            self.viewport.width,
            self.viewport.height,
            self.geometry.breakpoint(),
            self.inputs.phase
        );
    }

    /// Cancels every timer and empties the surface. Later calls are no-ops.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.surface.cancel_each(&mut self.particles);
        self.surface.cancel_all();
        self.surface.clear();
        self.torn_down = true;
        debug!("network view torn down");
    }

    /// Advances the animation clock.
    pub fn tick(&mut self, dt: Duration) -> TickReport {
        if self.torn_down {
            return TickReport::default();
        }
        let report = self.surface.tick(dt);
        let timeline = self.surface.timeline();
        self.particles.retain(|&h| timeline.contains(h));
        report
    }

    pub fn svg(&self) -> String {
        self.surface.svg()
    }

    fn rebuild_graph(&mut self) {
        self.graph = build_graph(
            &self.inputs.topology,
            self.inputs.variant,
            &self.inputs.data,
            &mut self.rng,
        );
    }

    /// Redraw after a phase or data change.
    fn refresh(&mut self) {
        if self.inputs.animating {
            self.redraw();
            return;
        }
        self.surface.clear_static();
        self.draw_static();
    }

    fn draw_static(&mut self) -> bool {
        let Viewport { width, height } = self.viewport;
        self.surface.resize(width, height);
        self.geometry = compute_geometry(&self.inputs.topology, width, height, &self.policy);
        if self.geometry.is_empty() {
            warn!(
                "viewport {width}x{height} too small for {}, deferring draw",
                self.inputs.topology
            );
            return false;
        }

        draw_network(&mut self.surface, &self.graph, &self.geometry, &self.palette);
        true
    }

    fn launch(&mut self) {
        let plan = plan_phase(self.inputs.phase, &self.graph, &self.geometry.profile);
        self.particles = animate_phase(&plan, &self.geometry, &self.palette, &mut self.surface);
    }
}

impl Drop for NetworkView {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn layer_label(layer: usize, last: usize) -> String {
    match layer {
        0 => "Input".to_string(),
        l if l == last => "Output".to_string(),
        l => format!("H{l}"),
    }
}

/// Glow filters, layer labels, links and neurons.
fn draw_network(
    surface: &mut Surface,
    graph: &Graph,
    geometry: &NetworkGeometry,
    palette: &Palette,
) {
    let profile = &geometry.profile;

    for signal in Signal::ALL {
        surface.define(
            signal.glow_id(),
            Resource::Glow {
                color: palette.signal(signal),
                blur: profile.glow_blur,
                strength: GLOW_STRENGTH,
            },
        );
    }

    let last = graph.nodes().last().map_or(0, |n| n.id.layer);
    for layer in 0..=last {
        if !(profile.label_hidden_layers || layer == 0 || layer == last) {
            continue;
        }
        if let Some(anchor) = geometry.label_anchor(layer) {
            surface.add(
                Layer::Labels,
                Shape::text(anchor, layer_label(layer, last), profile.label_font_px),
                Style::filled(Palette::LABEL),
            );
        }
    }

    for edge in graph.edges() {
        let (Some(from), Some(to)) =
            (geometry.position(edge.source), geometry.position(edge.target))
        else {
            continue;
        };
        let style = match edge.direction {
            EdgeDirection::Forward => Style::stroked(palette.neutral, profile.link_width),
            EdgeDirection::Up => Style::stroked(palette.error, profile.link_width),
            EdgeDirection::Down => {
                Style::stroked(palette.prediction, profile.link_width).dashed(4.0, 4.0)
            }
        };
        surface.add(Layer::Links, Shape::line(from, to), style.opacity(profile.link_opacity));
    }

    let r = geometry.node_radius;
    for neuron in graph.nodes() {
        let Some(center) = geometry.position(neuron.id) else {
            continue;
        };

        surface.add(
            Layer::Nodes,
            Shape::circle(center, r),
            Style::filled(palette.background)
                .stroke(Paint::Solid(Palette::NODE_STROKE), profile.node_stroke_width),
        );

        let fill_r = r * ACTIVATION_FILL * f64::from(neuron.activation.abs());
        if fill_r > 0.0 {
            surface.add(
                Layer::Nodes,
                Shape::circle(center, fill_r),
                Style::filled(palette.activation).opacity(ACTIVATION_OPACITY),
            );
        }

        let error = neuron.error.abs();
        if error > ERROR_RING_THRESHOLD {
            surface.add(
                Layer::Nodes,
                Shape::circle(center, r + profile.error_ring_offset),
                Style::stroked(palette.error, profile.error_ring_width * f64::from(error))
                    .opacity(ERROR_RING_OPACITY),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_name_input_hidden_and_output() {
        assert_eq!(layer_label(0, 3), "Input");
        assert_eq!(layer_label(2, 3), "H2");
        assert_eq!(layer_label(3, 3), "Output");
        assert_eq!(layer_label(0, 0), "Input");
    }

    #[test]
    fn compact_layout_drops_hidden_layer_labels() {
        let inputs = NetworkInputs::new(Topology::default(), Variant::Backprop);
        let labels = |w: f64| {
            let view = NetworkView::new(
                inputs.clone(),
                Viewport::new(w, 360.0),
                Palette::default(),
                BreakpointPolicy::NETWORK,
                Some(1),
            );
            view.scene().count_in(Layer::Labels)
        };
        assert_eq!(labels(400.0), 2);
        assert_eq!(labels(1000.0), 4);
    }

    #[test]
    fn predictive_links_are_colored_by_direction() {
        let inputs = NetworkInputs::new(Topology::default(), Variant::Predictive);
        let view = NetworkView::new(
            inputs,
            Viewport::new(1000.0, 400.0),
            Palette::default(),
            BreakpointPolicy::NETWORK,
            Some(1),
        );
        let links: Vec<_> = view
            .scene()
            .elements()
            .into_iter()
            .filter(|e| e.layer == Layer::Links)
            .collect();
        assert_eq!(links.len(), 72);
        let dashed = links.iter().filter(|e| e.style.dash.is_some()).count();
        assert_eq!(dashed, 36);
    }
}
