//! Scan acquisition: the channel capability and the engine driving it

mod channel;
mod engine;
mod state;

pub use channel::{ChannelError, FetchError, ReadySignal, ScanChannel};
pub use engine::{ScanConfig, ScanEngine, ScanOutcome};
pub use state::{ScanPhase, ScanStats};
