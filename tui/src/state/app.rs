use std::time::Duration;

use log::{debug, info};
use neuroflow::{
    model::RandomSource, render::Scene, LocalLoopView, NetworkInputs, NetworkView, Phase, PhaseTick,
    SampleSource, Topology, Variant, Viewport, VizConfig,
};

use super::Tab;

/// Requests the host acts on, from keys or from calls to action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    SwitchTab(Tab),
    NextTab,
    PrevTab,
    TogglePause,
    Quit,
}

/// What the run loop should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    /// The pause flag changed; the clock must be told.
    Paused(bool),
    Quit,
}

/// Everything the coordinator owns: tab, phase, pause flag, sample data
/// and the views.
pub struct AppState {
    config: VizConfig,
    topology: Topology,
    source: RandomSource,
    tab: Tab,
    paused: bool,
    viewport: Viewport,
    network: NetworkView,
    local_loop: Option<LocalLoopView>,
}

impl AppState {
    /// # Errors
    /// Returns an error if the configured topology is invalid.
    pub fn new(config: VizConfig, viewport: Viewport) -> neuroflow::Result<Self> {
        let topology = config.topology()?;
        let mut source = RandomSource::new(config.seed);

        let mut inputs = NetworkInputs::new(topology.clone(), Variant::Backprop);
        inputs.data = source.sample(&topology);
        let network = NetworkView::new(
            inputs,
            viewport,
            config.palette,
            config.network_breakpoints,
            config.seed,
        );

        Ok(Self {
            config,
            topology,
            source,
            tab: Tab::Backprop,
            paused: false,
            viewport,
            network,
            local_loop: None,
        })
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn phase(&self) -> Phase {
        self.network.inputs().phase
    }

    pub fn config(&self) -> &VizConfig {
        &self.config
    }

    pub fn network(&self) -> &NetworkView {
        &self.network
    }

    /// Scene of the active tab, if it has anything drawn.
    pub fn scene(&self) -> Option<&Scene> {
        match self.tab {
            Tab::LocalLoop => self
                .local_loop
                .as_ref()
                .filter(|v| v.is_visible())
                .map(|v| v.scene()),
            _ => Some(self.network.scene()),
        }
    }

    /// Status line under the diagram.
    pub fn status(&self) -> &'static str {
        match self.tab {
            Tab::LocalLoop => {
                "Each layer only compares its prediction with the state below and sends the residual up."
            }
            _ => self.network.status(),
        }
    }

    pub fn caption(&self) -> &'static str {
        match self.tab {
            Tab::LocalLoop => "LOCAL ERROR LOOP",
            _ => self.network.caption(),
        }
    }

    pub fn handle(&mut self, event: HostEvent) -> Action {
        match event {
            HostEvent::SwitchTab(tab) => self.switch_tab(tab),
            HostEvent::NextTab => self.switch_tab(self.tab.next()),
            HostEvent::PrevTab => self.switch_tab(self.tab.prev()),
            HostEvent::TogglePause => {
                self.paused = !self.paused;
                self.network.set_animating(!self.paused);
                info!("{}", if self.paused { "paused" } else { "resumed" });
                return Action::Paused(self.paused);
            }
            HostEvent::Quit => return Action::Quit,
        }
        Action::None
    }

    /// Applies a phase clock tick, drawing a fresh sample when the cycle wraps.
    pub fn on_phase(&mut self, tick: PhaseTick) {
        if tick.regenerate {
            let data = self.source.sample(&self.topology);
            self.network.set_data(data);
        }
        self.network.set_phase(tick.phase);
        debug!("phase {:?}", tick.phase);
    }

    pub fn resize(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        if !viewport.is_drawable() {
            debug!("terminal too small, diagrams wait for a resize");
        }
        self.viewport = viewport;
        self.network.set_viewport(viewport);
        if let Some(view) = &mut self.local_loop {
            view.set_viewport(viewport);
        }
    }

    pub fn tick(&mut self, dt: Duration) {
        self.network.tick(dt);
        if let Some(view) = &mut self.local_loop {
            view.tick(dt);
        }
    }

    /// Tears every view down.
    pub fn shutdown(&mut self) {
        if let Some(mut view) = self.local_loop.take() {
            view.teardown();
        }
        self.network.teardown();
    }

    fn switch_tab(&mut self, tab: Tab) {
        if tab == self.tab {
            return;
        }
        self.tab = tab;

        match tab.variant() {
            Some(variant) => {
                if let Some(mut view) = self.local_loop.take() {
                    view.teardown();
                }
                self.network.set_variant(variant);
            }
            None => {
                self.local_loop = Some(LocalLoopView::from_config(&self.config, self.viewport));
            }
        }
        info!("switched to {}", tab.title());
    }
}
