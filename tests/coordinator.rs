use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use neuroflow::{
    model::RandomSource, render::Layer, NetworkInputs, NetworkView, Phase, PhaseClock, SampleSource,
    Topology, Variant, Viewport, VizConfig,
};

/// Clock ticks drive the view through a whole cycle, with a fresh sample on wrap.
#[tokio::test(start_paused = true)]
async fn phase_clock_drives_the_network_view() {
    let config = VizConfig::default();
    let topology = Topology::default();
    let mut source = RandomSource::new(Some(9));

    let mut inputs = NetworkInputs::new(topology.clone(), Variant::Backprop);
    inputs.data = source.sample(&topology);
    let mut view = NetworkView::new(
        inputs,
        Viewport::new(1000.0, 400.0),
        config.palette,
        config.network_breakpoints,
        Some(9),
    );

    let (tx, mut rx) = mpsc::channel(4);
    let (_pause_tx, pause_rx) = watch::channel(false);
    let cancel = CancellationToken::new();
    let clock = PhaseClock::new(config.timing.phase_period());
    let clock = tokio::spawn(clock.run(tx, pause_rx, cancel.clone()));

    let mut seen = Vec::new();
    let first_sample = view.inputs().data.clone();
    for _ in 0..3 {
        let tick = rx.recv().await.unwrap();
        if tick.regenerate {
            view.set_data(source.sample(&topology));
        }
        view.set_phase(tick.phase);
        seen.push((tick.phase, view.scene().count_in(Layer::Particles)));
        view.tick(Duration::from_millis(5000));
    }

    assert_eq!(seen, [(Phase::Phase1, 36), (Phase::Phase2, 36), (Phase::Idle, 0)]);
    assert_ne!(view.inputs().data, first_sample);

    cancel.cancel();
    clock.await.unwrap();
    view.teardown();
    assert!(view.surface().is_idle());
}
