//! Scan channel capability
//!
//! A channel is whatever can start a scan, report when results may be
//! ready and copy the raw event stream out. The engine drives it without
//! knowing the backend.

use std::time::Duration;

use thiserror::Error;

use crate::wext::WE_VERSION_CURRENT;

/// Outcome of waiting for scan results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadySignal {
    /// The channel reported activity
    Ready,
    /// Nothing happened within the timeout
    TimedOut,
    /// The wait was cut short and may be retried
    Interrupted,
}

/// Failure of a trigger, wait or version query
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("operation requires elevated privilege")]
    PermissionDenied,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Failure of a result fetch
#[derive(Debug, Error)]
pub enum FetchError {
    /// Results do not fit, optionally with the size the driver asked for
    #[error("scan results do not fit the buffer (required: {required:?})")]
    TooSmall { required: Option<usize> },

    #[error("scan results not ready")]
    NotReady,

    #[error(transparent)]
    Other(#[from] ChannelError),
}

/// Access to one wireless interface's scan facility
///
/// A channel belongs to a single in-flight scan; scanning several
/// interfaces at once needs one channel per interface.
pub trait ScanChannel {
    /// Wireless extension version the driver was built with, 0 when the
    /// interface has none
    fn protocol_version(&mut self) -> Result<u8, ChannelError> {
        Ok(WE_VERSION_CURRENT)
    }

    /// Ask the driver to start a scan
    fn trigger(&mut self) -> Result<(), ChannelError>;

    /// Block until the channel signals activity or `timeout` elapses
    fn wait_ready(&mut self, timeout: Duration) -> Result<ReadySignal, ChannelError>;

    /// Copy the scan results into `buffer`, returning the valid length
    fn fetch(&mut self, buffer: &mut [u8]) -> Result<usize, FetchError>;
}

impl<C: ScanChannel + ?Sized> ScanChannel for &mut C {
    fn protocol_version(&mut self) -> Result<u8, ChannelError> {
        (**self).protocol_version()
    }

    fn trigger(&mut self) -> Result<(), ChannelError> {
        (**self).trigger()
    }

    fn wait_ready(&mut self, timeout: Duration) -> Result<ReadySignal, ChannelError> {
        (**self).wait_ready(timeout)
    }

    fn fetch(&mut self, buffer: &mut [u8]) -> Result<usize, FetchError> {
        (**self).fetch(buffer)
    }
}
