//! Scan error types

use std::time::Duration;

use thiserror::Error;

use crate::scan::{ChannelError, FetchError};

/// Why a scan produced no records
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("scanning requires elevated privilege")]
    PermissionDenied,

    #[error("failed to trigger scan: {0}")]
    TriggerFailed(#[source] ChannelError),

    #[error("no scan results within {budget:?}")]
    Timeout { budget: Duration },

    #[error("scan results need {required} bytes, limit is {limit}")]
    BufferOverflow { required: usize, limit: usize },

    #[error("waiting for scan results failed: {0}")]
    Wait(#[source] ChannelError),

    #[error("fetching scan results failed: {0}")]
    Fetch(#[source] ChannelError),

    #[error("interface has no wireless extensions")]
    Unsupported,

    #[error("failed to open scan channel on {interface}: {source}")]
    Open {
        interface: String,
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Stable short code for logs and reports
    pub fn reason(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "permission_denied",
            Self::Timeout { .. } => "timeout",
            Self::BufferOverflow { .. } => "buffer_overflow",
            Self::Unsupported => "unsupported",
            Self::TriggerFailed(_) | Self::Wait(_) | Self::Fetch(_) | Self::Open { .. } => {
                "channel_error"
            }
        }
    }
}

impl From<FetchError> for ScanError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Other(inner) => Self::Fetch(inner),
            other => Self::Fetch(ChannelError::Other(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_codes() {
        assert_eq!(ScanError::PermissionDenied.reason(), "permission_denied");
        assert_eq!(
            ScanError::Timeout {
                budget: Duration::from_secs(15)
            }
            .reason(),
            "timeout"
        );
        assert_eq!(
            ScanError::BufferOverflow {
                required: 200_000,
                limit: 100_000
            }
            .reason(),
            "buffer_overflow"
        );
        assert_eq!(
            ScanError::Wait(ChannelError::Other("bad fd".into())).reason(),
            "channel_error"
        );
        assert_eq!(ScanError::Unsupported.reason(), "unsupported");
    }

    #[test]
    fn test_display() {
        let err = ScanError::BufferOverflow {
            required: 200_000,
            limit: 100_000,
        };
        assert_eq!(err.to_string(), "scan results need 200000 bytes, limit is 100000");

        let err: ScanError = FetchError::Other(ChannelError::Other("device gone".into())).into();
        assert_eq!(err.to_string(), "fetching scan results failed: device gone");
    }
}
