use std::time::Duration;

use neuroflow::{
    layout::BreakpointPolicy,
    model::{RandomSource, SampleData},
    render::Layer,
    NetworkInputs, NetworkView, Palette, Phase, SampleSource, Topology, Variant, Viewport,
};

const WIDE: Viewport = Viewport::new(1000.0, 400.0);

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn view(variant: Variant, phase: Phase, viewport: Viewport) -> NetworkView {
    let topology = Topology::default();
    let data = RandomSource::new(Some(3)).sample(&topology);
    let inputs = NetworkInputs {
        topology,
        variant,
        phase,
        animating: true,
        data,
    };
    NetworkView::new(inputs, viewport, Palette::default(), BreakpointPolicy::NETWORK, Some(3))
}

fn particles(view: &NetworkView) -> usize {
    view.scene().count_in(Layer::Particles)
}

#[test]
fn same_seed_renders_the_same_frame() {
    let a = view(Variant::Predictive, Phase::Phase1, WIDE);
    let b = view(Variant::Predictive, Phase::Phase1, WIDE);
    assert_eq!(a.svg(), b.svg());
}

#[test]
fn idle_draws_the_network_without_particles() {
    let v = view(Variant::Backprop, Phase::Idle, WIDE);
    assert_eq!(v.scene().count_in(Layer::Links), 36);
    assert!(v.scene().count_in(Layer::Nodes) >= 13);
    assert_eq!(particles(&v), 0);
    assert!(v.surface().is_idle());
}

#[test]
fn backprop_cascade_drains_in_order() {
    let mut v = view(Variant::Backprop, Phase::Phase1, WIDE);
    assert_eq!(particles(&v), 36);

    v.tick(ms(800));
    assert_eq!(particles(&v), 24);
    v.tick(ms(600));
    assert_eq!(particles(&v), 8);
    v.tick(ms(600));
    assert_eq!(particles(&v), 0);
    assert_eq!(v.active_particles(), 0);
}

#[test]
fn teardown_leaves_nothing_scheduled() {
    let mut v = view(Variant::Backprop, Phase::Phase1, WIDE);
    v.tick(ms(300));

    v.teardown();
    assert!(v.is_torn_down());
    assert!(v.surface().is_idle());
    assert!(v.scene().is_empty());

    let report = v.tick(ms(10_000));
    assert_eq!(report.completed, 0);
    assert!(v.scene().is_empty());

    v.set_phase(Phase::Phase2);
    v.set_viewport(Viewport::new(500.0, 300.0));
    assert!(v.scene().is_empty());
}

#[test]
fn resize_mid_flight_restarts_cleanly() {
    let mut v = view(Variant::Backprop, Phase::Phase1, WIDE);
    v.tick(ms(700));

    v.set_viewport(Viewport::new(400.0, 300.0));
    assert_eq!(v.geometry().breakpoint(), neuroflow::layout::Breakpoint::Compact);
    // Only the fresh launch is scheduled.
    assert_eq!(v.surface().timeline().len(), 36);
    assert_eq!(particles(&v), 36);

    // Compact step is 400 ms and travel 550 ms.
    v.tick(ms(550));
    assert_eq!(particles(&v), 24);
    v.tick(ms(800));
    assert_eq!(particles(&v), 0);
}

#[test]
fn degenerate_viewport_defers_drawing() {
    let mut v = view(Variant::Predictive, Phase::Phase1, Viewport::new(0.0, 0.0));
    assert!(v.scene().is_empty());
    assert!(v.geometry().is_empty());
    assert!(v.surface().is_idle());

    v.set_viewport(Viewport::new(30.0, 20.0));
    assert!(v.scene().is_empty());

    v.set_viewport(WIDE);
    assert_eq!(particles(&v), 36);
}

#[test]
fn pausing_lets_in_flight_particles_finish() {
    let mut v = view(Variant::Backprop, Phase::Phase1, WIDE);
    v.tick(ms(900));
    assert_eq!(particles(&v), 24);

    v.set_animating(false);
    assert_eq!(particles(&v), 24);

    let nodes = v.scene().count_in(Layer::Nodes);
    v.set_phase(Phase::Phase2);
    assert_eq!(v.status(), Phase::Phase2.describe(Variant::Backprop));
    assert_eq!(particles(&v), 24);
    assert_eq!(v.scene().count_in(Layer::Nodes), nodes);

    v.tick(ms(1200));
    assert_eq!(particles(&v), 0);
    assert!(v.surface().is_idle());

    // Nothing new launches while paused.
    v.set_phase(Phase::Phase1);
    assert_eq!(particles(&v), 0);
}

#[test]
fn resuming_launches_the_current_phase() {
    let mut v = view(Variant::Predictive, Phase::Idle, WIDE);
    v.set_animating(false);
    v.set_phase(Phase::Phase2);
    assert_eq!(particles(&v), 0);

    v.set_animating(true);
    assert_eq!(particles(&v), 36);
}

#[test]
fn new_data_while_paused_redraws_statics_only() {
    let mut v = view(Variant::Backprop, Phase::Phase1, WIDE);
    v.set_animating(false);

    let topology = Topology::default();
    let zero = SampleData {
        activations: topology.sizes().iter().map(|&n| vec![0.0; n]).collect(),
        errors: topology.sizes().iter().map(|&n| vec![0.0; n]).collect(),
    };
    v.set_data(zero);

    // Outline only: no activation fills, no error rings.
    assert_eq!(v.scene().count_in(Layer::Nodes), 13);
    assert_eq!(particles(&v), 36);
}

#[test]
fn switching_variant_rebuilds_edges() {
    let mut v = view(Variant::Backprop, Phase::Phase1, WIDE);
    v.tick(ms(100));

    v.set_variant(Variant::Predictive);
    assert_eq!(v.graph().edges().len(), 72);
    assert_eq!(v.scene().count_in(Layer::Links), 72);
    assert_eq!(particles(&v), 36);
    assert_eq!(v.surface().timeline().len(), 36);
}

#[test]
fn update_applies_only_what_changed() {
    let mut v = view(Variant::Backprop, Phase::Phase1, WIDE);
    v.tick(ms(300));

    // Identical inputs: no redraw, the cascade keeps its progress.
    v.update(v.inputs().clone());
    v.tick(ms(500));
    assert_eq!(particles(&v), 24);

    let mut next = v.inputs().clone();
    next.phase = Phase::Phase2;
    v.update(next);
    assert_eq!(particles(&v), 36);
}

#[test]
fn update_pausing_with_a_phase_change_launches_nothing() {
    let mut v = view(Variant::Backprop, Phase::Idle, WIDE);

    let mut next = v.inputs().clone();
    next.phase = Phase::Phase1;
    next.animating = false;
    v.update(next);

    assert!(!v.inputs().animating);
    assert_eq!(v.status(), Phase::Phase1.describe(Variant::Backprop));
    assert_eq!(particles(&v), 0);
    assert_eq!(v.active_particles(), 0);
    assert!(v.surface().is_idle());

    v.tick(ms(5_000));
    assert_eq!(particles(&v), 0);
}

#[test]
fn update_pausing_with_a_variant_change_launches_nothing() {
    let mut v = view(Variant::Backprop, Phase::Phase1, WIDE);
    v.tick(ms(300));

    let mut next = v.inputs().clone();
    next.variant = Variant::Predictive;
    next.animating = false;
    v.update(next);

    assert_eq!(v.graph().edges().len(), 72);
    assert_eq!(v.scene().count_in(Layer::Links), 72);
    assert_eq!(particles(&v), 0);
    assert!(v.surface().is_idle());
}

#[test]
fn update_resuming_with_a_phase_change_launches_once() {
    let mut v = view(Variant::Predictive, Phase::Idle, WIDE);
    v.set_animating(false);

    let mut next = v.inputs().clone();
    next.phase = Phase::Phase2;
    next.animating = true;
    v.update(next);

    assert_eq!(particles(&v), 36);
    assert_eq!(v.surface().timeline().len(), 36);
}
