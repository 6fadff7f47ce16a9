//! Access point assembly
//!
//! Folds the decoded event stream into access point records. Drivers emit
//! roughly a dozen events per access point, always starting with the AP
//! address, so each address event closes the previous record.

use tracing::{debug, trace};

use crate::ap::{channel_for_frequency, AccessPointRecord, Encryption, MacAddress};
use crate::wext::{ie, ScanEvent, IW_MODE_ADHOC};

/// Fields collected for the access point currently being described
#[derive(Debug, Default)]
struct WorkingRecord {
    /// `None` before the first address event, or once the cell turned out
    /// to be ad-hoc
    mac: Option<MacAddress>,
    essid: Option<String>,
    signal_dbm: i32,
    encryption: Encryption,
    channel: u32,
}

impl WorkingRecord {
    fn for_mac(mac: MacAddress) -> Self {
        Self {
            mac: Some(mac),
            ..Default::default()
        }
    }

    fn finish(self) -> Option<AccessPointRecord> {
        let mac_address = self.mac?;
        Some(AccessPointRecord {
            essid: self.essid,
            mac_address,
            signal_dbm: self.signal_dbm,
            encryption: self.encryption,
            channel: self.channel,
        })
    }
}

/// Groups scan events into access point records, in address order
#[derive(Debug, Default)]
pub struct AccessPointAssembler {
    records: Vec<AccessPointRecord>,
    working: WorkingRecord,
    suppressed: usize,
}

impl AccessPointAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event to the record in progress
    pub fn push(&mut self, event: ScanEvent<'_>) {
        match event {
            ScanEvent::AccessPointMarker(mac) => {
                let previous = std::mem::replace(&mut self.working, WorkingRecord::for_mac(mac));
                self.flush(previous);
            }
            ScanEvent::OperatingMode(mode) => {
                if mode == IW_MODE_ADHOC {
                    if let Some(mac) = self.working.mac.take() {
                        trace!("Ignoring ad-hoc cell {}", mac);
                        self.suppressed += 1;
                    }
                }
            }
            ScanEvent::NetworkName(name) => {
                if !name.is_empty() {
                    self.working.essid = Some(name.into_owned());
                }
            }
            ScanEvent::SignalQuality(level) => {
                self.working.signal_dbm = level;
            }
            ScanEvent::Frequency { mantissa, exponent } => {
                self.working.channel = frequency_to_channel(mantissa, exponent);
            }
            ScanEvent::EncodingToken { enabled } => {
                if enabled && self.working.encryption == Encryption::None {
                    self.working.encryption = Encryption::Wep;
                }
            }
            ScanEvent::InformationElements(ies) => {
                self.working.encryption = ie::resolve_encryption(ies, self.working.encryption);
            }
        }
    }

    /// Close the last record and return everything collected
    pub fn finish(mut self) -> Vec<AccessPointRecord> {
        let last = std::mem::take(&mut self.working);
        self.flush(last);

        debug!(
            "Assembled {} access points ({} ad-hoc suppressed)",
            self.records.len(),
            self.suppressed
        );
        self.records
    }

    fn flush(&mut self, record: WorkingRecord) {
        if let Some(record) = record.finish() {
            self.records.push(record);
        }
    }
}

/// Assemble every record of an event stream
pub fn assemble<'a>(events: impl IntoIterator<Item = ScanEvent<'a>>) -> Vec<AccessPointRecord> {
    let mut assembler = AccessPointAssembler::new();
    for event in events {
        assembler.push(event);
    }
    assembler.finish()
}

/// Some drivers report the channel number in the frequency event instead
/// of a frequency, so anything up to 1000 is taken as the channel itself.
fn frequency_to_channel(mantissa: i32, exponent: i16) -> u32 {
    let freq = mantissa as f64 * 10f64.powi(exponent as i32);
    if freq > 1000.0 {
        channel_for_frequency(freq)
    } else {
        // Saturating cast, negative values become 0
        freq as u32
    }
}
