//! Wireless-extension scan event stream decoding

mod decoder;
pub mod ie;
mod types;

pub use decoder::{decode_events, EventStream};
pub use types::{EventCommand, ScanEvent, StreamLayout, IW_MODE_ADHOC, WE_VERSION_CURRENT};

#[cfg(test)]
pub(crate) mod testing;
