//! The coordinator's phase clock.

use std::time::Duration;

use log::{debug, trace};
use tokio::{
    sync::{mpsc, watch},
    time::{self, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::model::Phase;

/// One phase advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTick {
    pub phase: Phase,
    /// Set when the cycle wraps back to idle; hosts draw a fresh sample then.
    pub regenerate: bool,
}

/// Steps Idle → Phase1 → Phase2 → Idle once per period while not paused.
#[derive(Debug, Clone)]
pub struct PhaseClock {
    period: Duration,
    phase: Phase,
}

impl PhaseClock {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            phase: Phase::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Moves to the next phase.
    pub fn advance(&mut self) -> PhaseTick {
        let regenerate = self.phase == Phase::Phase2;
        self.phase = self.phase.next();
        PhaseTick {
            phase: self.phase,
            regenerate,
        }
    }

    /// Sends one [`PhaseTick`] per period to `tx` until `cancel` fires or the
    /// receiver goes away.
    ///
    /// While `paused` holds `true` no ticks are sent; resuming waits a full
    /// period before the next one.
    ///
    /// # Args
    /// * `tx` - Where phase changes are delivered.
    /// * `paused` - Pause flag owned by the host.
    /// * `cancel` - Stops the clock.
    pub async fn run(
        mut self,
        tx: mpsc::Sender<PhaseTick>,
        mut paused: watch::Receiver<bool>,
        cancel: CancellationToken,
    ) {
        loop {
            while *paused.borrow_and_update() {
                tokio::select! {
                    _ = cancel.cancelled() => return,
                    changed = paused.changed() => {
                        if changed.is_err() {
                            return;
                        }
                    }
                }
            }

            let mut ticker = time::interval_at(Instant::now() + self.period, self.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            debug!("phase clock running, period {:?}", self.period);

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!("phase clock cancelled");
                        return;
                    }
                    changed = paused.changed() => {
                        if changed.is_err() {
                            return;
                        }
                        if *paused.borrow_and_update() {
                            debug!("phase clock paused at {:?}", self.phase);
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        let tick = self.advance();
                        trace!("phase -> {:?}", tick.phase);
                        if tx.send(tick).await.is_err() {
                            return;
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: Duration = Duration::from_millis(5000);

    fn spawn_clock(
        paused: bool,
    ) -> (
        mpsc::Receiver<PhaseTick>,
        watch::Sender<bool>,
        CancellationToken,
        tokio::task::JoinHandle<()>,
    ) {
        let (tx, rx) = mpsc::channel(8);
        let (pause_tx, pause_rx) = watch::channel(paused);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(PhaseClock::new(PERIOD).run(tx, pause_rx, cancel.clone()));
        (rx, pause_tx, cancel, handle)
    }

    #[test]
    fn advance_cycles_and_flags_wrap() {
        let mut clock = PhaseClock::new(PERIOD);
        let ticks: Vec<_> = (0..4).map(|_| clock.advance()).collect();
        assert_eq!(
            ticks.iter().map(|t| t.phase).collect::<Vec<_>>(),
            [Phase::Phase1, Phase::Phase2, Phase::Idle, Phase::Phase1]
        );
        assert_eq!(
            ticks.iter().map(|t| t.regenerate).collect::<Vec<_>>(),
            [false, false, true, false]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period() {
        let (mut rx, _pause, _cancel, _handle) = spawn_clock(false);
        let start = Instant::now();

        let first = rx.recv().await.unwrap();
        assert_eq!(first.phase, Phase::Phase1);
        assert_eq!(start.elapsed(), PERIOD);

        rx.recv().await.unwrap();
        let wrap = rx.recv().await.unwrap();
        assert_eq!(wrap.phase, Phase::Idle);
        assert!(wrap.regenerate);
        assert_eq!(start.elapsed(), PERIOD * 3);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_holds_and_resume_waits_a_full_period() {
        let (mut rx, pause, _cancel, _handle) = spawn_clock(false);
        let start = Instant::now();

        time::sleep(Duration::from_millis(2000)).await;
        pause.send(true).unwrap();
        time::sleep(Duration::from_millis(20_000)).await;
        assert!(rx.try_recv().is_err());

        pause.send(false).unwrap();
        let tick = rx.recv().await.unwrap();
        assert_eq!(tick.phase, Phase::Phase1);
        assert_eq!(start.elapsed(), Duration::from_millis(22_000) + PERIOD);
    }

    #[tokio::test(start_paused = true)]
    async fn starts_paused_until_resumed() {
        let (mut rx, pause, _cancel, _handle) = spawn_clock(true);
        time::sleep(PERIOD * 2).await;
        assert!(rx.try_recv().is_err());

        pause.send(false).unwrap();
        assert_eq!(rx.recv().await.unwrap().phase, Phase::Phase1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_the_task() {
        let (mut rx, _pause, cancel, handle) = spawn_clock(false);
        cancel.cancel();
        handle.await.unwrap();
        assert!(rx.recv().await.is_none());
    }
}
