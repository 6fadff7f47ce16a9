//! Wireless access point scanner
//!
//! Triggers a scan on a wireless interface, collects the wireless-extension
//! event stream the driver returns and turns it into access point records
//! (BSSID, ESSID, signal level, channel and encryption).

pub mod ap;
pub mod assembler;
pub mod config;
pub mod error;
pub mod scan;
pub mod wext;

#[cfg(target_os = "linux")]
pub mod linux;

pub use ap::{AccessPointRecord, Encryption, MacAddress};
pub use assembler::{assemble, AccessPointAssembler};
pub use config::Config;
pub use error::ScanError;
pub use scan::{ScanChannel, ScanConfig, ScanEngine, ScanOutcome, ScanStats};

/// Run one scan on `interface` through the wireless extension ioctls
#[cfg(target_os = "linux")]
pub fn scan_interface(interface: &str, config: &ScanConfig) -> Result<ScanOutcome, ScanError> {
    let channel = linux::WextChannel::open(interface).map_err(|source| ScanError::Open {
        interface: interface.to_string(),
        source,
    })?;

    let span = tracing::info_span!("scan", interface);
    let _enter = span.enter();
    ScanEngine::new(channel, config.clone()).run()
}

/// Scanning needs the Linux wireless extensions
#[cfg(not(target_os = "linux"))]
pub fn scan_interface(_interface: &str, _config: &ScanConfig) -> Result<ScanOutcome, ScanError> {
    Err(ScanError::Unsupported)
}
