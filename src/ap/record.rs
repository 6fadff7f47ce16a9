//! Access point record types

use std::fmt;
use std::str::FromStr;

use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;

use super::quality::quality;

/// Encryption advertised by an access point
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Encryption {
    #[default]
    None,
    Wep,
    Wpa,
    Wpa2,
}

impl fmt::Display for Encryption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Wep => write!(f, "WEP"),
            Self::Wpa => write!(f, "WPA"),
            Self::Wpa2 => write!(f, "WPA2"),
        }
    }
}

/// MAC address parse failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid MAC address '{input}': expected xx-xx-xx-xx-xx-xx")]
pub struct MacParseError {
    pub input: String,
}

/// 6-byte hardware address of an access point (BSSID)
///
/// Displays in lowercase hyphenated form, e.g. `00-1a-2b-3c-4d-5e`.
/// The all-zero address is the "unset" value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MacAddress(pub [u8; 6]);

impl MacAddress {
    pub const UNSET: MacAddress = MacAddress([0; 6]);

    pub fn is_unset(&self) -> bool {
        *self == Self::UNSET
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}-{b:02x}-{c:02x}-{d:02x}-{e:02x}-{g:02x}")
    }
}

impl FromStr for MacAddress {
    type Err = MacParseError;

    /// Accepts `-` or `:` separated hex octets.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || MacParseError { input: s.to_string() };

        let parts: Vec<&str> = s.split(|c| c == '-' || c == ':').collect();
        if parts.len() != 6 || parts.iter().any(|p| p.len() != 2) {
            return Err(err());
        }

        let bytes = hex::decode(parts.concat()).map_err(|_| err())?;
        let octets: [u8; 6] = bytes.try_into().map_err(|_| err())?;
        Ok(Self(octets))
    }
}

/// One observed network
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessPointRecord {
    /// Network name, `None` when hidden or not reported
    pub essid: Option<String>,
    pub mac_address: MacAddress,
    /// Signal level in dBm, 0 when unknown
    pub signal_dbm: i32,
    pub encryption: Encryption,
    /// 802.11 channel, 0 when unknown
    pub channel: u32,
}

impl AccessPointRecord {
    pub fn new(mac_address: MacAddress) -> Self {
        Self {
            mac_address,
            ..Default::default()
        }
    }

    /// Normalized 0-100 signal quality
    pub fn quality(&self) -> u8 {
        quality(self.signal_dbm)
    }

    /// Compact location-API JSON object for this access point
    pub fn to_json(&self) -> String {
        // Serializing a map of strings and integers cannot fail
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Serialize for AccessPointRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.mac_address.is_unset() {
            return serializer.serialize_map(Some(0))?.end();
        }

        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("mac_address", &self.mac_address.to_string())?;
        if let Some(essid) = self.essid.as_deref().filter(|s| !s.is_empty()) {
            map.serialize_entry("ssid", essid)?;
        }
        if self.signal_dbm < 0 {
            map.serialize_entry("signal_strength", &self.signal_dbm)?;
        }
        if self.channel != 0 {
            map.serialize_entry("channel", &self.channel)?;
        }
        map.end()
    }
}
