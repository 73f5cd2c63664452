use std::{
    io,
    time::{Duration, Instant},
};

use anyhow::Result;
use crossterm::{
    cursor,
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use log::{info, warn};
use neuroflow::{PhaseClock, VizConfig};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::{
    sync::{mpsc, watch},
    time::{self, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::{
    state::{Action, AppState, HostEvent, Tab},
    ui,
};

const FRAME: Duration = Duration::from_millis(33);

/// Raw mode, alternate screen and a hidden cursor for as long as the
/// diagrams are on screen. Restored on drop, also when `run` errors out.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, cursor::Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show) {
            warn!("failed to restore the screen: {e}");
        }
        if let Err(e) = disable_raw_mode() {
            warn!("failed to leave raw mode: {e}");
        }
    }
}

/// Maps a key press to a host event.
fn map_key(key: KeyEvent) -> Option<HostEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let event = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => HostEvent::Quit,
        KeyCode::Char(' ') => HostEvent::TogglePause,
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => HostEvent::NextTab,
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => HostEvent::PrevTab,
        KeyCode::Char('1') => HostEvent::SwitchTab(Tab::Backprop),
        KeyCode::Char('2') | KeyCode::Char('p') => HostEvent::SwitchTab(Tab::Predictive),
        KeyCode::Char('3') => HostEvent::SwitchTab(Tab::LocalLoop),
        _ => return None,
    };
    Some(event)
}

/// Runs the TUI application.
///
/// The frame interval, terminal events and the phase clock are multiplexed on
/// the current task; the clock itself runs as a separate task until cancelled.
///
/// # Errors
/// Returns an error if terminal setup or rendering fails.
pub async fn run(config: VizConfig) -> Result<()> {
    let _guard = TerminalGuard::enter()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let viewport = ui::diagram_viewport(terminal.size()?);
    let period = config.timing.phase_period();
    let mut state = AppState::new(config, viewport)?;

    let (phase_tx, mut phase_rx) = mpsc::channel(4);
    let (pause_tx, pause_rx) = watch::channel(false);
    let cancel = CancellationToken::new();
    let clock = tokio::spawn(PhaseClock::new(period).run(phase_tx, pause_rx, cancel.clone()));

    let mut events = EventStream::new();
    let mut frames = time::interval(FRAME);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last = Instant::now();

    info!("tui started at {}x{}", viewport.width, viewport.height);

    loop {
        tokio::select! {
            _ = frames.tick() => {
                let now = Instant::now();
                state.tick(now - last);
                last = now;
                terminal.draw(|f| ui::draw(f, &state))?;
            }

            event = events.next() => {
                let Some(event) = event else {
                    break;
                };
                match event? {
                    Event::Key(key) => {
                        let Some(host_event) = map_key(key) else {
                            continue;
                        };
                        match state.handle(host_event) {
                            Action::Quit => break,
                            Action::Paused(paused) => {
                                let _ = pause_tx.send(paused);
                            }
                            Action::None => {}
                        }
                    }
                    Event::Resize(cols, rows) => {
                        let area = ratatui::layout::Rect::new(0, 0, cols, rows);
                        state.resize(ui::diagram_viewport(area));
                    }
                    _ => {}
                }
            }

            Some(tick) = phase_rx.recv() => {
                state.on_phase(tick);
            }
        }
    }

    cancel.cancel();
    if let Err(e) = clock.await {
        warn!("phase clock ended abnormally: {e}");
    }
    state.shutdown();
    Ok(())
}
