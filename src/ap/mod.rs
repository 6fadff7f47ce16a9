//! Access point records and the pure helpers that derive their fields

mod channel;
mod quality;
mod record;

pub use channel::channel_for_frequency;
pub use quality::quality;
pub use record::{AccessPointRecord, Encryption, MacAddress, MacParseError};
