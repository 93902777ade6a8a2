//! Cycle scheduler
//!
//! Drives the sampling-and-transmission loop: capture inputs, encode, send,
//! sleep for the nominal interval, update running statistics. Strictly
//! single-threaded; each cycle completes in full before the next begins and
//! the sleep is the only suspension point.

use crate::frame;
use crate::input::InputSource;
use crate::transport::CanTransport;
use crate::types::{Result, SwitchboardError};
use std::time::{Duration, Instant};

/// Running statistics for the scheduling loop
///
/// Created at loop start, mutated once per cycle, discarded at process exit.
#[derive(Debug)]
pub struct CycleStats {
    /// Completed cycles since loop start
    pub cycles: u64,
    /// Successfully enqueued frames (failed sends are not counted)
    pub frames_sent: u64,
    started: Instant,
}

impl CycleStats {
    pub fn new() -> Self {
        Self {
            cycles: 0,
            frames_sent: 0,
            started: Instant::now(),
        }
    }

    /// Wall-clock time since loop start
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Observed cycle rate in cycles per second
    pub fn observed_hz(&self) -> f64 {
        let secs = self.elapsed().as_secs_f64();
        if secs > 0.0 {
            self.cycles as f64 / secs
        } else {
            0.0
        }
    }
}

impl Default for CycleStats {
    fn default() -> Self {
        Self::new()
    }
}

/// The switchboard bridge: input source, optional transport, and the loop
///
/// An absent transport is the intentional dry-run state, not an error: the
/// bus is never brought up and no send is ever attempted.
pub struct Bridge {
    source: Box<dyn InputSource>,
    transport: Option<Box<dyn CanTransport>>,
    interval: Duration,
    stats: CycleStats,
}

impl Bridge {
    /// Assemble a bridge from its collaborators
    pub fn new(
        source: Box<dyn InputSource>,
        transport: Option<Box<dyn CanTransport>>,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            transport,
            interval,
            stats: CycleStats::new(),
        }
    }

    /// Running statistics
    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }

    /// Execute one full cycle: capture, report, encode, send, count
    ///
    /// A send failure is logged and the cycle still completes; any other
    /// error (including an input read failure) is fatal and propagates.
    pub fn run_cycle(&mut self) -> Result<()> {
        let snapshot = self.source.capture_snapshot()?;
        log::debug!("switch states: {}", snapshot);

        if let Some(transport) = &mut self.transport {
            let can_frame = frame::encode(&snapshot);
            match transport.send(&can_frame) {
                Ok(()) => {
                    self.stats.frames_sent += 1;
                    log::debug!(
                        "sent frame {} (total sent: {})",
                        can_frame,
                        self.stats.frames_sent
                    );
                }
                Err(SwitchboardError::TransportSend(e)) => {
                    // Self-healing: the next cycle supersedes the lost frame
                    log::warn!("frame dropped: {}", e);
                }
                Err(e) => return Err(e),
            }
        }

        self.stats.cycles += 1;
        log::debug!("observed rate: {:.2} Hz", self.stats.observed_hz());
        Ok(())
    }

    /// Run the scheduling loop
    ///
    /// Brings the transport up first (when transmission is enabled), then
    /// alternates cycles with an uncompensated sleep of the nominal
    /// interval. With `max_cycles = None` the loop runs for the lifetime of
    /// the process; a bounded run is for tests and timed invocations. On any
    /// fatal error the transport is shut down before the error propagates,
    /// so the link layer is never left misconfigured for subsequent runs.
    pub fn run(&mut self, max_cycles: Option<u64>) -> Result<()> {
        if let Some(transport) = &mut self.transport {
            transport.bring_up()?;
        }
        self.stats = CycleStats::new();

        let result = self.run_loop(max_cycles);

        if let Some(transport) = &mut self.transport {
            if let Err(e) = transport.shutdown() {
                log::warn!("transport shutdown failed: {}", e);
            }
        }
        result
    }

    fn run_loop(&mut self, max_cycles: Option<u64>) -> Result<()> {
        loop {
            self.run_cycle()?;
            if let Some(max) = max_cycles {
                if self.stats.cycles >= max {
                    log::info!(
                        "stopping after {} cycles ({:.2} Hz observed)",
                        self.stats.cycles,
                        self.stats.observed_hz()
                    );
                    return Ok(());
                }
            }
            std::thread::sleep(self.interval);
        }
    }
}
