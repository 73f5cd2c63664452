use std::time::Duration;

use super::{Breakpoint, BreakpointPolicy, Point, PointScale};
use crate::model::{NeuronId, Topology};

/// Fraction of the inner height the neuron band may use when sizing nodes.
const BAND_FRACTION: f64 = 0.55;
/// Vertical extent of the neuron band, as fractions of the inner height.
const BAND_TOP: f64 = 0.2;
const BAND_BOTTOM: f64 = 0.8;
/// Node diameter plus gap, in radii.
const RADII_PER_NODE: f64 = 2.4;
/// Label baseline above the inner area.
const LABEL_OFFSET: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

/// Sizing policy of the network diagram for one breakpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetworkProfile {
    pub breakpoint: Breakpoint,
    pub margins: Margins,
    pub radius_min: f64,
    pub radius_max: f64,
    /// Outer padding of the layer (horizontal) scale.
    pub layer_padding: f64,
    /// Outer padding of the in-layer (vertical) scales.
    pub neuron_padding: f64,
    pub label_font_px: f64,
    /// Whether hidden layers get a label; compact layouts only label input and output.
    pub label_hidden_layers: bool,
    pub link_opacity: f64,
    pub link_width: f64,
    pub node_stroke_width: f64,
    pub particle_radius: f64,
    pub particle_duration: Duration,
    /// Delay between successive layer boundaries of a cascading sweep.
    pub delay_step: Duration,
    pub glow_blur: f64,
    pub error_ring_offset: f64,
    pub error_ring_width: f64,
}

impl NetworkProfile {
    pub fn for_breakpoint(breakpoint: Breakpoint) -> Self {
        match breakpoint {
            Breakpoint::Compact => Self {
                breakpoint,
                margins: Margins::new(24.0, 16.0, 10.0, 16.0),
                radius_min: 5.0,
                radius_max: 9.0,
                layer_padding: 0.3,
                neuron_padding: 0.8,
                label_font_px: 8.0,
                label_hidden_layers: false,
                link_opacity: 0.08,
                link_width: 0.6,
                node_stroke_width: 0.8,
                particle_radius: 2.0,
                particle_duration: Duration::from_millis(550),
                delay_step: Duration::from_millis(400),
                glow_blur: 2.0,
                error_ring_offset: 2.0,
                error_ring_width: 1.2,
            },
            Breakpoint::Medium => Self {
                breakpoint,
                margins: Margins::new(28.0, 28.0, 14.0, 28.0),
                ..Self::wide()
            },
            Breakpoint::Wide => Self::wide(),
        }
    }

    fn wide() -> Self {
        Self {
            breakpoint: Breakpoint::Wide,
            margins: Margins::new(32.0, 40.0, 16.0, 40.0),
            radius_min: 7.0,
            radius_max: 13.0,
            layer_padding: 0.2,
            neuron_padding: 0.7,
            label_font_px: 10.0,
            label_hidden_layers: true,
            link_opacity: 0.15,
            link_width: 1.0,
            node_stroke_width: 1.0,
            particle_radius: 3.0,
            particle_duration: Duration::from_millis(800),
            delay_step: Duration::from_millis(600),
            glow_blur: 3.0,
            error_ring_offset: 3.0,
            error_ring_width: 2.0,
        }
    }
}

/// Node placement of a layered network inside a viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkGeometry {
    pub width: f64,
    pub height: f64,
    pub profile: NetworkProfile,
    pub node_radius: f64,
    layer_x: Vec<f64>,
    layer_offsets: Vec<usize>,
    positions: Vec<Point>,
}

impl NetworkGeometry {
    /// A geometry with nothing to draw.
    pub fn empty(width: f64, height: f64, breakpoint: Breakpoint) -> Self {
        Self {
            width,
            height,
            profile: NetworkProfile::for_breakpoint(breakpoint),
            node_radius: 0.0,
            layer_x: Vec::new(),
            layer_offsets: Vec::new(),
            positions: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn breakpoint(&self) -> Breakpoint {
        self.profile.breakpoint
    }

    pub fn margins(&self) -> Margins {
        self.profile.margins
    }

    /// Centre of a neuron in surface coordinates.
    pub fn position(&self, id: NeuronId) -> Option<Point> {
        let offset = self.layer_offsets.get(id.layer)?;
        let next = self
            .layer_offsets
            .get(id.layer + 1)
            .copied()
            .unwrap_or(self.positions.len());
        if offset + id.index >= next {
            return None;
        }
        self.positions.get(offset + id.index).copied()
    }

    /// All neuron centres in layer/index order.
    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    /// Horizontal centre of a layer.
    pub fn layer_x(&self, layer: usize) -> Option<f64> {
        self.layer_x.get(layer).copied()
    }

    /// Anchor of the caption above a layer.
    pub fn label_anchor(&self, layer: usize) -> Option<Point> {
        let x = self.layer_x(layer)?;
        Some(Point::new(x, self.profile.margins.top - LABEL_OFFSET))
    }
}

/// Lays out `topology` in a `width` × `height` viewport.
///
/// Pure: identical inputs always give identical positions. Non-finite or
/// too-small viewports give an empty geometry.
pub fn compute_geometry(
    topology: &Topology,
    width: f64,
    height: f64,
    policy: &BreakpointPolicy,
) -> NetworkGeometry {
    if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
        return NetworkGeometry::empty(0.0, 0.0, Breakpoint::Compact);
    }

    let breakpoint = policy.classify(width);
    let profile = NetworkProfile::for_breakpoint(breakpoint);
    let m = profile.margins;
    let inner_w = width - m.left - m.right;
    let inner_h = height - m.top - m.bottom;
    if inner_w <= 0.0 || inner_h <= 0.0 {
        return NetworkGeometry::empty(width, height, breakpoint);
    }

    let widest = topology.widest_layer().max(1) as f64;
    let radius_from_height = inner_h * BAND_FRACTION / (widest * RADII_PER_NODE);
    let node_radius = radius_from_height.clamp(profile.radius_min, profile.radius_max);

    let xs = PointScale::new(topology.layer_count(), (0.0, inner_w), profile.layer_padding);
    let band = (inner_h * BAND_TOP, inner_h * BAND_BOTTOM);

    let mut layer_x = Vec::with_capacity(topology.layer_count());
    let mut layer_offsets = Vec::with_capacity(topology.layer_count());
    let mut positions = Vec::with_capacity(topology.neuron_count());

    for (layer, &count) in topology.sizes().iter().enumerate() {
        let x = m.left + xs.position(layer).unwrap_or(0.0);
        let ys = PointScale::new(count, band, profile.neuron_padding);

        layer_x.push(x);
        layer_offsets.push(positions.len());
        positions.extend((0..count).map(|i| Point::new(x, m.top + ys.position(i).unwrap_or(0.0))));
    }

    NetworkGeometry {
        width,
        height,
        profile,
        node_radius,
        layer_x,
        layer_offsets,
        positions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLICY: BreakpointPolicy = BreakpointPolicy::NETWORK;

    #[test]
    fn deterministic() {
        let t = Topology::default();
        let a = compute_geometry(&t, 900.0, 400.0, &POLICY);
        let b = compute_geometry(&t, 900.0, 400.0, &POLICY);
        assert_eq!(a, b);
        assert_eq!(a.positions().len(), t.neuron_count());
    }

    #[test]
    fn compact_differs_from_wide() {
        let t = Topology::default();
        let narrow = compute_geometry(&t, 400.0, 360.0, &POLICY);
        let wide = compute_geometry(&t, 1000.0, 360.0, &POLICY);

        assert_eq!(narrow.breakpoint(), Breakpoint::Compact);
        assert_eq!(wide.breakpoint(), Breakpoint::Wide);
        assert_ne!(narrow.margins(), wide.margins());
        assert!(narrow.node_radius <= 9.0);
        assert!(wide.node_radius >= 7.0);
        assert!(narrow.profile.particle_radius < wide.profile.particle_radius);
        assert!(narrow.profile.particle_duration < wide.profile.particle_duration);
    }

    #[test]
    fn every_breakpoint_has_its_own_margins() {
        let c = NetworkProfile::for_breakpoint(Breakpoint::Compact).margins;
        let m = NetworkProfile::for_breakpoint(Breakpoint::Medium).margins;
        let w = NetworkProfile::for_breakpoint(Breakpoint::Wide).margins;
        assert_ne!(c, m);
        assert_ne!(m, w);
    }

    #[test]
    fn radius_is_clamped() {
        let t = Topology::new(vec![40, 40]).unwrap();
        let crowded = compute_geometry(&t, 1000.0, 200.0, &POLICY);
        assert_eq!(crowded.node_radius, 7.0);

        let t = Topology::new(vec![1, 1]).unwrap();
        let roomy = compute_geometry(&t, 1000.0, 2000.0, &POLICY);
        assert_eq!(roomy.node_radius, 13.0);
    }

    #[test]
    fn layers_are_evenly_spread_and_inset() {
        let t = Topology::default();
        let g = compute_geometry(&t, 1000.0, 400.0, &POLICY);
        let xs: Vec<f64> = (0..4).map(|l| g.layer_x(l).unwrap()).collect();

        let gaps: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
        assert!(gaps.iter().all(|g| (g - gaps[0]).abs() < 1e-9));
        assert!(xs[0] > g.margins().left);
        assert!(xs[3] < 1000.0 - g.margins().right);
    }

    #[test]
    fn neurons_stay_in_compressed_band() {
        let t = Topology::default();
        let g = compute_geometry(&t, 1000.0, 400.0, &POLICY);
        let m = g.margins();
        let inner_h = 400.0 - m.top - m.bottom;
        let lo = m.top + inner_h * BAND_TOP;
        let hi = m.top + inner_h * BAND_BOTTOM;

        for p in g.positions() {
            assert!(p.is_finite());
            assert!(p.y > lo && p.y < hi, "{p:?} outside {lo}..{hi}");
        }

        // Layers are vertically centred on the same axis.
        let mid = |layer: usize, n: usize| {
            let ys: Vec<f64> = (0..n)
                .map(|i| g.position(NeuronId::new(layer, i)).unwrap().y)
                .collect();
            (ys[0] + ys[n - 1]) / 2.0
        };
        assert!((mid(0, 3) - mid(1, 4)).abs() < 1e-9);
        assert!((mid(3, 2) - mid(1, 4)).abs() < 1e-9);
    }

    #[test]
    fn degenerate_viewports_are_empty() {
        let t = Topology::default();
        for (w, h) in [(0.0, 300.0), (300.0, 0.0), (20.0, 20.0), (f64::NAN, 300.0), (-5.0, 10.0)] {
            let g = compute_geometry(&t, w, h, &POLICY);
            assert!(g.is_empty(), "{w}x{h}");
            assert_eq!(g.position(NeuronId::new(0, 0)), None);
        }
    }

    #[test]
    fn position_rejects_out_of_layer_index() {
        let t = Topology::default();
        let g = compute_geometry(&t, 1000.0, 400.0, &POLICY);
        assert!(g.position(NeuronId::new(0, 2)).is_some());
        assert!(g.position(NeuronId::new(0, 3)).is_none());
        assert!(g.position(NeuronId::new(4, 0)).is_none());
    }
}
