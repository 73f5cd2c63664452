use std::time::Duration;

use log::{debug, trace};

use crate::{
    config::{Palette, Signal},
    layout::{NetworkGeometry, NetworkProfile},
    model::{EdgeDirection, Graph, NeuronId, Phase, Variant},
    render::{Ease, Layer, Shape, Style, Surface, TaskHandle, Tween},
};

const PARTICLE_OPACITY: f64 = 0.9;

/// One animation token to launch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticlePlan {
    /// Index into [`Graph::edges`].
    pub edge: usize,
    pub from: NeuronId,
    pub to: NeuronId,
    pub signal: Signal,
    pub delay: Duration,
}

/// Decides which edges animate in `phase`, in which direction, when and in
/// which hue.
///
/// Backprop cascades one boundary per `profile.delay_step`: left to right in
/// Phase1, right to left (edges traversed backwards) in Phase2. Predictive
/// coding fires every edge of one direction at once.
pub fn plan_phase(phase: Phase, graph: &Graph, profile: &NetworkProfile) -> Vec<ParticlePlan> {
    let edges = graph.edges().iter().enumerate();
    let step = profile.delay_step;

    match (graph.variant(), phase) {
        (_, Phase::Idle) => Vec::new(),

        (Variant::Backprop, Phase::Phase1) => {
            let mut plan: Vec<ParticlePlan> = edges
                .filter(|(_, e)| e.direction == EdgeDirection::Forward)
                .map(|(i, e)| ParticlePlan {
                    edge: i,
                    from: e.source,
                    to: e.target,
                    signal: Signal::Activation,
                    delay: step * e.boundary() as u32,
                })
                .collect();
            plan.sort_by_key(|p| p.delay);
            plan
        }

        (Variant::Backprop, Phase::Phase2) => {
            let last = graph
                .edges()
                .iter()
                .map(|e| e.boundary())
                .max()
                .unwrap_or(0);
            let mut plan: Vec<ParticlePlan> = edges
                .filter(|(_, e)| e.direction == EdgeDirection::Forward)
                .map(|(i, e)| ParticlePlan {
                    edge: i,
                    from: e.target,
                    to: e.source,
                    signal: Signal::Error,
                    delay: step * (last - e.boundary()) as u32,
                })
                .collect();
            plan.sort_by_key(|p| p.delay);
            plan
        }

        (Variant::Predictive, Phase::Phase1) => edges
            .filter(|(_, e)| e.direction == EdgeDirection::Down)
            .map(|(i, e)| ParticlePlan {
                edge: i,
                from: e.source,
                to: e.target,
                signal: Signal::Prediction,
                delay: Duration::ZERO,
            })
            .collect(),

        (Variant::Predictive, Phase::Phase2) => edges
            .filter(|(_, e)| e.direction == EdgeDirection::Up)
            .map(|(i, e)| ParticlePlan {
                edge: i,
                from: e.source,
                to: e.target,
                signal: Signal::Error,
                delay: Duration::ZERO,
            })
            .collect(),
    }
}

/// Launches `plan` on `surface`.
///
/// Each token starts on its source neuron, glides to its target with a
/// cubic in-out ease while fading out, then removes itself.
///
/// # Returns
/// One cancellation handle per launched token.
pub fn animate_phase(
    plan: &[ParticlePlan],
    geometry: &NetworkGeometry,
    palette: &Palette,
    surface: &mut Surface,
) -> Vec<TaskHandle> {
    let profile = &geometry.profile;
    let mut handles = Vec::with_capacity(plan.len());

    for p in plan {
        let (Some(from), Some(to)) = (geometry.position(p.from), geometry.position(p.to)) else {
            trace!("no position for {} -> {}, skipping", p.from, p.to);
            continue;
        };

        let id = surface.add(
            Layer::Particles,
            Shape::circle(from, profile.particle_radius),
            Style::filled(palette.signal(p.signal))
                .filter(p.signal.glow_id())
                .opacity(PARTICLE_OPACITY),
        );
        handles.push(
            surface.animate(
                Tween::new(id, profile.particle_duration)
                    .delay(p.delay)
                    .ease(Ease::CubicInOut)
                    .move_line(from, to)
                    .opacity(PARTICLE_OPACITY, 0.0)
                    .remove_on_end(),
            ),
        );
    }

    debug!("launched {} particle(s)", handles.len());
    handles
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::{
        layout::{compute_geometry, Breakpoint, BreakpointPolicy},
        model::{build_graph, SampleData, Topology},
    };

    fn graph(variant: Variant) -> Graph {
        let mut rng = StdRng::seed_from_u64(11);
        build_graph(&Topology::default(), variant, &SampleData::default(), &mut rng)
    }

    fn wide() -> NetworkProfile {
        NetworkProfile::for_breakpoint(Breakpoint::Wide)
    }

    fn by_delay(plan: &[ParticlePlan]) -> BTreeMap<u128, usize> {
        let mut out = BTreeMap::new();
        for p in plan {
            *out.entry(p.delay.as_millis()).or_insert(0) += 1;
        }
        out
    }

    #[test]
    fn idle_plans_nothing() {
        for v in [Variant::Backprop, Variant::Predictive] {
            assert!(plan_phase(Phase::Idle, &graph(v), &wide()).is_empty());
        }
    }

    #[test]
    fn backprop_forward_cascades_left_to_right() {
        let plan = plan_phase(Phase::Phase1, &graph(Variant::Backprop), &wide());
        assert_eq!(plan.len(), 36);
        assert_eq!(by_delay(&plan), BTreeMap::from([(0, 12), (600, 16), (1200, 8)]));
        assert!(plan.iter().all(|p| p.signal == Signal::Activation));
        assert!(plan.iter().all(|p| p.to.layer == p.from.layer + 1));
    }

    #[test]
    fn backprop_backward_cascades_right_to_left() {
        let plan = plan_phase(Phase::Phase2, &graph(Variant::Backprop), &wide());
        assert_eq!(plan.len(), 36);
        // Output boundary (4×2) first, input boundary (3×4) last.
        assert_eq!(by_delay(&plan), BTreeMap::from([(0, 8), (600, 16), (1200, 12)]));
        assert!(plan.iter().all(|p| p.signal == Signal::Error));
        assert!(plan.iter().all(|p| p.from.layer == p.to.layer + 1));
    }

    #[test]
    fn compact_profile_uses_shorter_step() {
        let compact = NetworkProfile::for_breakpoint(Breakpoint::Compact);
        let plan = plan_phase(Phase::Phase1, &graph(Variant::Backprop), &compact);
        assert_eq!(by_delay(&plan), BTreeMap::from([(0, 12), (400, 16), (800, 8)]));
    }

    #[test]
    fn predictive_waves_are_simultaneous() {
        let g = graph(Variant::Predictive);

        let down = plan_phase(Phase::Phase1, &g, &wide());
        assert_eq!(down.len(), 36);
        assert!(down.iter().all(|p| p.delay.is_zero() && p.signal == Signal::Prediction));
        assert!(down.iter().all(|p| p.from.layer == p.to.layer + 1));

        let up = plan_phase(Phase::Phase2, &g, &wide());
        assert_eq!(up.len(), 36);
        assert!(up.iter().all(|p| p.delay.is_zero() && p.signal == Signal::Error));
        assert!(up.iter().all(|p| p.to.layer == p.from.layer + 1));
    }

    #[test]
    fn plans_reference_real_edges() {
        let g = graph(Variant::Predictive);
        for phase in [Phase::Phase1, Phase::Phase2] {
            for p in plan_phase(phase, &g, &wide()) {
                let e = g.edges()[p.edge];
                assert_eq!((e.source, e.target), (p.from, p.to));
            }
        }
    }

    #[test]
    fn particles_remove_themselves() {
        let palette = Palette::default();
        let geometry =
            compute_geometry(&Topology::default(), 1000.0, 400.0, &BreakpointPolicy::NETWORK);
        let plan = plan_phase(Phase::Phase1, &graph(Variant::Backprop), &geometry.profile);
        let mut surface = Surface::new(1000.0, 400.0, palette.background);

        let handles = animate_phase(&plan, &geometry, &palette, &mut surface);
        assert_eq!(handles.len(), 36);
        assert_eq!(surface.scene().count_in(Layer::Particles), 36);

        // Last boundary starts at 1200 ms and lasts 800 ms.
        surface.tick(Duration::from_millis(1999));
        assert_eq!(surface.scene().count_in(Layer::Particles), 8);
        surface.tick(Duration::from_millis(1));
        assert_eq!(surface.scene().count_in(Layer::Particles), 0);
        assert!(surface.is_idle());
    }

    #[test]
    fn empty_geometry_launches_nothing() {
        let palette = Palette::default();
        let geometry = NetworkGeometry::empty(0.0, 0.0, Breakpoint::Compact);
        let plan = plan_phase(Phase::Phase1, &graph(Variant::Backprop), &wide());
        let mut surface = Surface::new(0.0, 0.0, palette.background);
        assert!(animate_phase(&plan, &geometry, &palette, &mut surface).is_empty());
        assert!(surface.scene().is_empty());
    }
}
