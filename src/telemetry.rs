//! Background telemetry
//!
//! The simulation thread publishes immutable [`Snapshot`] copies on a
//! bounded one-way channel. The telemetry thread only reads them: it logs
//! score changes and keeps a running summary. Publishing never blocks; a
//! full channel drops the snapshot.

use std::sync::mpsc::{Receiver, SyncSender, TrySendError, sync_channel};
use std::thread::JoinHandle;

use crate::sim::{GamePhase, GameState};

/// Snapshots buffered before the simulation starts dropping them
const CHANNEL_CAPACITY: usize = 16;

/// A read-only copy of the interesting parts of the game state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub tick: u64,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    pub wave: u32,
    pub balls_alive: usize,
    pub blocks_alive: usize,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            tick: state.time_ticks,
            phase: state.phase,
            score: state.score,
            lives: state.lives,
            wave: state.wave_index,
            balls_alive: state.registry.alive_ball_count(),
            blocks_alive: state.registry.alive_block_count(),
        }
    }
}

/// What the telemetry thread saw over its lifetime
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetrySummary {
    pub snapshots: u64,
    pub peak_score: u64,
    pub last: Option<Snapshot>,
}

/// Owning handle for the telemetry thread
pub struct Telemetry {
    sender: Option<SyncSender<Snapshot>>,
    handle: Option<JoinHandle<TelemetrySummary>>,
    dropped: u64,
}

impl Telemetry {
    /// Start the telemetry thread
    pub fn spawn() -> std::io::Result<Self> {
        let (sender, receiver) = sync_channel(CHANNEL_CAPACITY);
        let handle = std::thread::Builder::new()
            .name("telemetry".into())
            .spawn(move || consume(receiver))?;
        Ok(Self {
            sender: Some(sender),
            handle: Some(handle),
            dropped: 0,
        })
    }

    /// Hand a snapshot to the telemetry thread without blocking
    pub fn publish(&mut self, snapshot: Snapshot) {
        let Some(sender) = &self.sender else {
            return;
        };
        match sender.try_send(snapshot) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => self.dropped += 1,
            Err(TrySendError::Disconnected(_)) => {
                log::warn!("Telemetry thread stopped; disabling telemetry");
                self.sender = None;
            }
        }
    }

    /// Snapshots dropped because the channel was full
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Close the channel and wait for the thread to drain it
    pub fn shutdown(mut self) -> TelemetrySummary {
        self.finish()
    }

    fn finish(&mut self) -> TelemetrySummary {
        self.sender = None;
        match self.handle.take().map(JoinHandle::join) {
            Some(Ok(summary)) => summary,
            Some(Err(_)) => {
                log::error!("Telemetry thread panicked");
                TelemetrySummary::default()
            }
            None => TelemetrySummary::default(),
        }
    }
}

impl Drop for Telemetry {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.finish();
        }
    }
}

fn consume(receiver: Receiver<Snapshot>) -> TelemetrySummary {
    let mut summary = TelemetrySummary::default();
    for snapshot in receiver {
        if summary.last.is_none_or(|last| last.score != snapshot.score) {
            log::info!(
                "Score {} (wave {}, {} balls, {} blocks)",
                snapshot.score,
                snapshot.wave + 1,
                snapshot.balls_alive,
                snapshot.blocks_alive
            );
        }
        summary.snapshots += 1;
        summary.peak_score = summary.peak_score.max(snapshot.score);
        summary.last = Some(snapshot);
    }
    log::debug!("Telemetry channel closed after {} snapshots", summary.snapshots);
    summary
}
