//! Scan acquisition engine
//!
//! Drives one scan over a [`ScanChannel`]: trigger, wait for results,
//! fetch them into a buffer that grows on demand, then decode.
//! Every failure leaves the engine in [`ScanPhase::Failed`] and returns
//! the reason without any records.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::channel::{ChannelError, FetchError, ReadySignal, ScanChannel};
use super::state::{ScanPhase, ScanStats};
use crate::ap::AccessPointRecord;
use crate::assembler::assemble;
use crate::error::ScanError;
use crate::wext::decode_events;

/// Engine tuning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Total deadline for results to become available
    pub timeout: Duration,
    /// First readiness wait after triggering
    pub initial_wait: Duration,
    /// Readiness wait after a "not ready" fetch
    pub poll_wait: Duration,
    pub initial_buffer_size: usize,
    /// Results larger than this fail the scan
    pub max_buffer_size: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            initial_wait: Duration::from_secs(2),
            poll_wait: Duration::from_secs(1),
            initial_buffer_size: 4096, // IW_SCAN_MAX_DATA
            max_buffer_size: 100_000,
        }
    }
}

/// Records of a successful scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    pub records: Vec<AccessPointRecord>,
    pub stats: ScanStats,
}

/// Runs scans over an exclusively owned channel
pub struct ScanEngine<C> {
    channel: C,
    config: ScanConfig,
    phase: ScanPhase,
}

impl<C: ScanChannel> ScanEngine<C> {
    pub fn new(channel: C, config: ScanConfig) -> Self {
        Self {
            channel,
            config,
            phase: ScanPhase::Idle,
        }
    }

    pub fn phase(&self) -> ScanPhase {
        self.phase
    }

    pub fn into_inner(self) -> C {
        self.channel
    }

    /// Run one complete scan
    pub fn run(&mut self) -> Result<ScanOutcome, ScanError> {
        self.phase = ScanPhase::Idle;
        let started = Instant::now();

        match self.scan(started) {
            Ok(outcome) => {
                info!(
                    "Scan found {} access points in {:?} ({} polls, {} byte buffer)",
                    outcome.records.len(),
                    started.elapsed(),
                    outcome.stats.polls,
                    outcome.stats.buffer_size
                );
                Ok(outcome)
            }
            Err(e) => {
                self.transition(ScanPhase::Failed);
                warn!("Scan failed after {:?} [{}]: {}", started.elapsed(), e.reason(), e);
                Err(e)
            }
        }
    }

    fn scan(&mut self, started: Instant) -> Result<ScanOutcome, ScanError> {
        let mut stats = ScanStats::default();

        let version = match self.channel.protocol_version() {
            Ok(0) => return Err(ScanError::Unsupported),
            Ok(version) => version,
            Err(e) => {
                debug!("Wireless extension version query failed: {}", e);
                return Err(ScanError::Unsupported);
            }
        };
        stats.protocol_version = version;

        self.channel.trigger().map_err(|e| match e {
            ChannelError::PermissionDenied => ScanError::PermissionDenied,
            other => ScanError::TriggerFailed(other),
        })?;
        self.transition(ScanPhase::Triggered);

        let mut buffer = vec![0u8; self.config.initial_buffer_size];
        let len = self.poll(&mut buffer, &mut stats, started)?;
        stats.buffer_size = buffer.len();
        stats.payload_len = len;

        self.transition(ScanPhase::Decoding);
        let records = assemble(decode_events(&buffer[..len], version));
        drop(buffer);

        self.transition(ScanPhase::Done);
        Ok(ScanOutcome { records, stats })
    }

    /// Wait and fetch until the results fit the buffer, returning their length
    fn poll(
        &mut self,
        buffer: &mut Vec<u8>,
        stats: &mut ScanStats,
        started: Instant,
    ) -> Result<usize, ScanError> {
        self.transition(ScanPhase::Polling);

        let budget = self.config.timeout;
        let mut remaining = budget;
        let mut wait = self.config.initial_wait.min(remaining);

        loop {
            if !wait.is_zero() {
                stats.polls += 1;
                debug!("Poll {}: waiting up to {:?} ({:?} left)", stats.polls, wait, remaining);

                let waiting = Instant::now();
                match self.channel.wait_ready(wait).map_err(ScanError::Wait)? {
                    ReadySignal::Ready | ReadySignal::TimedOut => {}
                    ReadySignal::Interrupted => {
                        // Only the time actually spent waiting counts
                        stats.interrupts += 1;
                        remaining = remaining.saturating_sub(waiting.elapsed());
                        if remaining.is_zero() || started.elapsed() >= budget {
                            return Err(ScanError::Timeout { budget });
                        }
                        wait = wait.min(remaining);
                        continue;
                    }
                }
            }

            match self.channel.fetch(buffer) {
                Ok(len) => return Ok(len.min(buffer.len())),
                Err(FetchError::TooSmall { required }) => {
                    let size = grown_size(buffer.len(), required, self.config.max_buffer_size)?;
                    debug!("Growing scan buffer {} -> {} bytes", buffer.len(), size);
                    buffer.resize(size, 0);
                    stats.resizes += 1;
                    // Results are already there, refetch straight away
                    wait = Duration::ZERO;
                }
                Err(FetchError::NotReady) => {
                    stats.not_ready += 1;
                    remaining = remaining.saturating_sub(wait);
                    if remaining.is_zero() || started.elapsed() >= budget {
                        return Err(ScanError::Timeout { budget });
                    }
                    wait = self.config.poll_wait.min(remaining);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn transition(&mut self, next: ScanPhase) {
        debug!("Scan phase {} -> {}", self.phase, next);
        self.phase = next;
    }
}

/// Next buffer size after a "too small" fetch.
///
/// A driver hint larger than the buffer is used as is; otherwise the
/// buffer doubles up to `limit`.
fn grown_size(current: usize, required: Option<usize>, limit: usize) -> Result<usize, ScanError> {
    match required {
        Some(required) if required > current => {
            if required > limit {
                Err(ScanError::BufferOverflow { required, limit })
            } else {
                Ok(required)
            }
        }
        _ if current >= limit => Err(ScanError::BufferOverflow {
            required: current.saturating_mul(2),
            limit,
        }),
        _ => Ok(current.saturating_mul(2).max(1).min(limit)),
    }
}
