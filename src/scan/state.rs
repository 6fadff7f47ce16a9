//! Per-scan phase and statistics

use std::fmt;

use serde::Serialize;

/// Where a scan currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    Idle,
    Triggered,
    Polling,
    Decoding,
    Done,
    Failed,
}

impl fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Triggered => "triggered",
            Self::Polling => "polling",
            Self::Decoding => "decoding",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Statistics for a single scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    /// Readiness waits issued
    pub polls: u32,
    pub interrupts: u32,
    /// Fetches answered with "not ready yet"
    pub not_ready: u32,
    /// Buffer growths
    pub resizes: u32,
    /// Final buffer size in bytes
    pub buffer_size: usize,
    /// Valid bytes in the final fetch
    pub payload_len: usize,
    pub protocol_version: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_json() {
        let stats = ScanStats {
            polls: 2,
            buffer_size: 4096,
            payload_len: 310,
            protocol_version: 22,
            ..Default::default()
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["polls"], 2);
        assert_eq!(json["buffer_size"], 4096);
        assert_eq!(json["protocol_version"], 22);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(ScanPhase::Triggered.to_string(), "triggered");
        assert_eq!(ScanPhase::Decoding.to_string(), "decoding");
    }
}
