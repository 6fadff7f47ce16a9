//! Wireless-extension event types and stream layout

use std::borrow::Cow;
use std::mem::size_of;

use crate::ap::MacAddress;

/// Wireless extension version of current kernels
pub const WE_VERSION_CURRENT: u8 = 22;

/// Last version that still carried the user pointer inside iw_point events
pub const WE_VERSION_POINTER_IN_STREAM: u8 = 18;

/// Operating mode reported for ad-hoc (IBSS) cells
pub const IW_MODE_ADHOC: u32 = 1;

/// Encoding flag set when the network has no encryption
pub const IW_ENCODE_DISABLED: u16 = 0x8000;

/// Longest ESSID a driver may report
pub const IW_ESSID_MAX_SIZE: usize = 32;

/// Event command codes (the ioctl numbers the events are named after)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum EventCommand {
    Frequency = 0x8B05,
    Mode = 0x8B07,
    AccessPoint = 0x8B15,
    Essid = 0x8B1B,
    Encode = 0x8B2B,
    Quality = 0x8C01,
    Custom = 0x8C02,
    GenericIe = 0x8C05,
    Unknown = 0xFFFF,
}

impl From<u16> for EventCommand {
    fn from(cmd: u16) -> Self {
        match cmd {
            0x8B05 => Self::Frequency,
            0x8B07 => Self::Mode,
            0x8B15 => Self::AccessPoint,
            0x8B1B => Self::Essid,
            0x8B2B => Self::Encode,
            0x8C01 => Self::Quality,
            0x8C02 => Self::Custom,
            0x8C05 => Self::GenericIe,
            _ => Self::Unknown,
        }
    }
}

impl EventCommand {
    /// Whether the event carries an iw_point descriptor (length + flags)
    /// followed by a variable-size payload
    pub fn carries_point(self) -> bool {
        matches!(
            self,
            Self::Essid | Self::Encode | Self::GenericIe | Self::Custom
        )
    }
}

/// One decoded entry of a scan result buffer
#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent<'a> {
    /// Starts the attribute group of a new access point
    AccessPointMarker(MacAddress),
    OperatingMode(u32),
    NetworkName(Cow<'a, str>),
    /// Signal level in dBm
    SignalQuality(i32),
    /// Frequency in Hz as `mantissa * 10^exponent`, or a bare channel number
    Frequency { mantissa: i32, exponent: i16 },
    EncodingToken { enabled: bool },
    /// Raw IEEE 802.11 information elements
    InformationElements(&'a [u8]),
}

/// Byte offsets of the event stream, which follow the kernel's native
/// struct layout (event header padded to pointer alignment).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamLayout {
    /// Event header length (len + cmd, padded)
    pub lcp_len: usize,
    /// Size of the user pointer inside iw_point
    pub pointer_len: usize,
}

impl StreamLayout {
    pub const LP64: Self = Self {
        lcp_len: 8,
        pointer_len: 8,
    };

    pub const ILP32: Self = Self {
        lcp_len: 4,
        pointer_len: 4,
    };

    pub const fn native() -> Self {
        if size_of::<usize>() == 8 {
            Self::LP64
        } else {
            Self::ILP32
        }
    }

    /// Offset of the fixed-size payload of non-pointer events
    pub fn value_offset(&self) -> usize {
        self.lcp_len
    }

    /// Offset of the iw_point length/flags pair
    pub fn descriptor_offset(&self, version: u8) -> usize {
        if version > WE_VERSION_POINTER_IN_STREAM {
            self.lcp_len
        } else {
            self.lcp_len + self.pointer_len
        }
    }

    /// Offset of the variable payload of iw_point events
    pub fn payload_offset(&self, version: u8) -> usize {
        let point_len = self.lcp_len + self.pointer_len;
        if version > WE_VERSION_POINTER_IN_STREAM {
            point_len
        } else {
            point_len + self.pointer_len
        }
    }
}

impl Default for StreamLayout {
    fn default() -> Self {
        Self::native()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_codes() {
        assert_eq!(EventCommand::from(0x8B15), EventCommand::AccessPoint);
        assert_eq!(EventCommand::from(0x8C05), EventCommand::GenericIe);
        assert_eq!(EventCommand::from(0x8B01), EventCommand::Unknown);
        assert!(EventCommand::Essid.carries_point());
        assert!(!EventCommand::Quality.carries_point());
    }

    #[test]
    fn test_lp64_offsets() {
        let layout = StreamLayout::LP64;
        assert_eq!(layout.descriptor_offset(22), 8);
        assert_eq!(layout.payload_offset(22), 16);
        assert_eq!(layout.descriptor_offset(18), 16);
        assert_eq!(layout.payload_offset(18), 24);
    }

    #[test]
    fn test_ilp32_offsets() {
        let layout = StreamLayout::ILP32;
        assert_eq!(layout.descriptor_offset(19), 4);
        assert_eq!(layout.payload_offset(19), 8);
        assert_eq!(layout.descriptor_offset(16), 8);
        assert_eq!(layout.payload_offset(16), 12);
    }
}
