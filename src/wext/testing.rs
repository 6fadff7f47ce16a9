//! Event stream writer for tests, laid out like the kernel writes scan results

use super::types::{EventCommand, StreamLayout, WE_VERSION_CURRENT};

pub(crate) struct StreamWriter {
    buf: Vec<u8>,
    layout: StreamLayout,
    version: u8,
}

impl StreamWriter {
    pub fn new() -> Self {
        Self::with_version(WE_VERSION_CURRENT)
    }

    pub fn with_version(version: u8) -> Self {
        Self {
            buf: Vec::new(),
            layout: StreamLayout::native(),
            version,
        }
    }

    pub fn access_point(self, mac: [u8; 6]) -> Self {
        // sockaddr: ARPHRD_ETHER family, address, zero padding to 16 bytes
        let mut value = [0u8; 16];
        value[..2].copy_from_slice(&1u16.to_ne_bytes());
        value[2..8].copy_from_slice(&mac);
        self.fixed(EventCommand::AccessPoint as u16, &value)
    }

    pub fn mode(self, mode: u32) -> Self {
        self.fixed(EventCommand::Mode as u16, &mode.to_ne_bytes())
    }

    /// `level` is the raw unsigned byte the driver stores (dBm + 256)
    pub fn quality(self, level: u8) -> Self {
        self.fixed(EventCommand::Quality as u16, &[0, level, 0, 0x0f])
    }

    pub fn frequency(self, mantissa: i32, exponent: i16) -> Self {
        let mut value = [0u8; 8];
        value[..4].copy_from_slice(&mantissa.to_ne_bytes());
        value[4..6].copy_from_slice(&exponent.to_ne_bytes());
        self.fixed(EventCommand::Frequency as u16, &value)
    }

    pub fn essid(self, name: &[u8]) -> Self {
        self.point(EventCommand::Essid as u16, name, 1)
    }

    pub fn encode(self, enabled: bool) -> Self {
        let flags = if enabled { 0x0800 } else { 0x8000 };
        self.point(EventCommand::Encode as u16, &[], flags)
    }

    pub fn generic_ie(self, ies: &[u8]) -> Self {
        self.point(EventCommand::GenericIe as u16, ies, 0)
    }

    pub fn custom(self, text: &[u8]) -> Self {
        self.point(EventCommand::Custom as u16, text, 0)
    }

    pub fn unknown(self, cmd: u16, value_len: usize) -> Self {
        self.fixed(cmd, &vec![0xAA; value_len])
    }

    pub fn build(self) -> Vec<u8> {
        self.buf
    }

    fn fixed(mut self, cmd: u16, value: &[u8]) -> Self {
        let mut event = self.header(cmd, self.layout.value_offset() + value.len());
        event[self.layout.value_offset()..].copy_from_slice(value);
        self.buf.extend_from_slice(&event);
        self
    }

    fn point(mut self, cmd: u16, payload: &[u8], flags: u16) -> Self {
        let descriptor = self.layout.descriptor_offset(self.version);
        let start = self.layout.payload_offset(self.version);

        let mut event = self.header(cmd, start + payload.len());
        event[descriptor..descriptor + 2].copy_from_slice(&(payload.len() as u16).to_ne_bytes());
        event[descriptor + 2..descriptor + 4].copy_from_slice(&flags.to_ne_bytes());
        event[start..].copy_from_slice(payload);
        self.buf.extend_from_slice(&event);
        self
    }

    fn header(&self, cmd: u16, len: usize) -> Vec<u8> {
        let mut event = vec![0u8; len];
        event[..2].copy_from_slice(&(len as u16).to_ne_bytes());
        event[2..4].copy_from_slice(&cmd.to_ne_bytes());
        event
    }
}
