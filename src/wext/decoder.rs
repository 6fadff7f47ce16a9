//! Scan result buffer decoder
//!
//! Walks the event stream returned by SIOCGIWSCAN. Each event is a
//! `len`/`cmd` header followed by a command-specific payload; fields are
//! read at explicit offsets in host byte order, so the buffer never needs
//! to be aligned.

use std::iter::FusedIterator;

use tracing::trace;

use super::types::{
    EventCommand, ScanEvent, StreamLayout, IW_ENCODE_DISABLED, IW_ESSID_MAX_SIZE,
};
use crate::ap::MacAddress;

/// Decode the valid part of a scan result buffer using the host layout
pub fn decode_events(buf: &[u8], version: u8) -> EventStream<'_> {
    EventStream::new(buf, version, StreamLayout::native())
}

/// Lazy iterator over the events of one scan result buffer
#[derive(Debug, Clone)]
pub struct EventStream<'a> {
    buf: &'a [u8],
    pos: usize,
    version: u8,
    layout: StreamLayout,
    done: bool,
}

impl<'a> EventStream<'a> {
    pub fn new(buf: &'a [u8], version: u8, layout: StreamLayout) -> Self {
        Self {
            buf,
            pos: 0,
            version,
            layout,
            done: false,
        }
    }

    /// Bytes consumed so far
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Slice out the next event, or end the stream
    fn next_raw(&mut self) -> Option<(u16, &'a [u8])> {
        if self.done {
            return None;
        }

        let remaining = &self.buf[self.pos..];
        if remaining.len() < self.layout.lcp_len {
            self.done = true;
            return None;
        }

        let (len, cmd) = match (read_u16(remaining, 0), read_u16(remaining, 2)) {
            (Some(len), Some(cmd)) => (len as usize, cmd),
            _ => {
                self.done = true;
                return None;
            }
        };

        // A zero or header-only length is the terminator
        if len <= self.layout.lcp_len {
            self.done = true;
            return None;
        }

        if len > remaining.len() {
            trace!(
                "Truncated event 0x{:04X} at offset {} ({} of {} bytes)",
                cmd,
                self.pos,
                remaining.len(),
                len
            );
            self.done = true;
            return None;
        }

        self.pos += len;
        Some((cmd, &remaining[..len]))
    }

    fn parse(&self, cmd: u16, event: &'a [u8]) -> Option<ScanEvent<'a>> {
        let command = EventCommand::from(cmd);
        if command.carries_point() {
            return self.parse_point(command, event);
        }

        let value = self.layout.value_offset();
        match command {
            EventCommand::AccessPoint => {
                // struct sockaddr: 2-byte family, then the hardware address
                let mac: [u8; 6] = event.get(value + 2..value + 8)?.try_into().ok()?;
                Some(ScanEvent::AccessPointMarker(MacAddress(mac)))
            }
            EventCommand::Mode => read_u32(event, value).map(ScanEvent::OperatingMode),
            EventCommand::Quality => {
                // struct iw_quality { qual, level, noise, updated }, level is
                // an 8-bit dBm value stored unsigned
                let level = *event.get(value + 1)?;
                Some(ScanEvent::SignalQuality(level as i32 - 0x100))
            }
            EventCommand::Frequency => {
                let mantissa = read_i32(event, value)?;
                let exponent = read_i16(event, value + 4)?;
                Some(ScanEvent::Frequency { mantissa, exponent })
            }
            _ => None,
        }
    }

    /// Events whose payload follows an iw_point descriptor
    fn parse_point(&self, command: EventCommand, event: &'a [u8]) -> Option<ScanEvent<'a>> {
        let (payload, flags) = self.point(event)?;

        match command {
            EventCommand::Essid => {
                let payload = &payload[..payload.len().min(IW_ESSID_MAX_SIZE)];
                // Drivers may pad the name with NULs
                let end = payload.iter().position(|&b| b == 0).unwrap_or(payload.len());
                Some(ScanEvent::NetworkName(String::from_utf8_lossy(&payload[..end])))
            }
            EventCommand::Encode => Some(ScanEvent::EncodingToken {
                enabled: flags & IW_ENCODE_DISABLED == 0,
            }),
            EventCommand::GenericIe => Some(ScanEvent::InformationElements(payload)),
            _ => None,
        }
    }

    /// Payload and flags of an iw_point event, clipped to the event length
    fn point(&self, event: &'a [u8]) -> Option<(&'a [u8], u16)> {
        let descriptor = self.layout.descriptor_offset(self.version);
        let length = read_u16(event, descriptor)? as usize;
        let flags = read_u16(event, descriptor + 2)?;

        let payload = event.get(self.layout.payload_offset(self.version)..)?;
        Some((&payload[..length.min(payload.len())], flags))
    }
}

impl<'a> Iterator for EventStream<'a> {
    type Item = ScanEvent<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((cmd, event)) = self.next_raw() {
            match self.parse(cmd, event) {
                Some(parsed) => return Some(parsed),
                None => trace!("Skipping event 0x{:04X} ({} bytes)", cmd, event.len()),
            }
        }
        None
    }
}

impl FusedIterator for EventStream<'_> {}

fn read_u16(buf: &[u8], offset: usize) -> Option<u16> {
    let bytes = buf.get(offset..offset + 2)?;
    Some(u16::from_ne_bytes(bytes.try_into().ok()?))
}

fn read_i16(buf: &[u8], offset: usize) -> Option<i16> {
    let bytes = buf.get(offset..offset + 2)?;
    Some(i16::from_ne_bytes(bytes.try_into().ok()?))
}

fn read_u32(buf: &[u8], offset: usize) -> Option<u32> {
    let bytes = buf.get(offset..offset + 4)?;
    Some(u32::from_ne_bytes(bytes.try_into().ok()?))
}

fn read_i32(buf: &[u8], offset: usize) -> Option<i32> {
    let bytes = buf.get(offset..offset + 4)?;
    Some(i32::from_ne_bytes(bytes.try_into().ok()?))
}
