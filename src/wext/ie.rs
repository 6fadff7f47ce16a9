//! IEEE 802.11 information elements carried in IWEVGENIE events

use crate::ap::Encryption;

/// RSN element, present on WPA2 networks
pub const WLAN_EID_RSN: u8 = 0x30;

/// Vendor specific element, used for the WPA1 information element
pub const WLAN_EID_VENDOR_SPECIFIC: u8 = 0xDD;

/// Iterator over `(tag, value)` pairs of an information element run.
///
/// Stops at the first element whose declared length runs past the end.
#[derive(Debug, Clone)]
pub struct Elements<'a> {
    buf: &'a [u8],
}

pub fn elements(buf: &[u8]) -> Elements<'_> {
    Elements { buf }
}

impl<'a> Iterator for Elements<'a> {
    type Item = (u8, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        let (&tag, rest) = self.buf.split_first()?;
        let (&len, rest) = rest.split_first()?;
        let len = len as usize;

        // A truncated element ends the walk and its tag is not applied
        if len > rest.len() {
            self.buf = &[];
            return None;
        }

        let (value, rest) = rest.split_at(len);
        self.buf = rest;
        Some((tag, value))
    }
}

/// Upgrade `current` from the security elements found in `ies`.
///
/// An RSN element always wins; a vendor element only sets WPA when WPA2
/// has not already been seen.
pub fn resolve_encryption(ies: &[u8], current: Encryption) -> Encryption {
    elements(ies).fold(current, |encryption, (tag, _)| match tag {
        WLAN_EID_RSN => Encryption::Wpa2,
        WLAN_EID_VENDOR_SPECIFIC if encryption != Encryption::Wpa2 => Encryption::Wpa,
        _ => encryption,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // WPA1 vendor element: OUI 00:50:f2, type 1
    const WPA_IE: [u8; 8] = [0xdd, 0x06, 0x00, 0x50, 0xf2, 0x01, 0x01, 0x00];
    const RSN_IE: [u8; 4] = [0x30, 0x02, 0x01, 0x00];

    #[test]
    fn test_elements() {
        let ies = [0x00, 0x03, b'a', b'b', b'c', 0x01, 0x00, 0x30, 0x01, 0xff];
        let parsed: Vec<_> = elements(&ies).collect();
        let expected: Vec<(u8, &[u8])> =
            vec![(0x00, &b"abc"[..]), (0x01, &[][..]), (0x30, &[0xff][..])];
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_wpa_only() {
        assert_eq!(resolve_encryption(&WPA_IE, Encryption::None), Encryption::Wpa);
        assert_eq!(resolve_encryption(&WPA_IE, Encryption::Wep), Encryption::Wpa);
    }

    #[test]
    fn test_wpa_then_rsn() {
        let ies = [&WPA_IE[..], &RSN_IE[..]].concat();
        assert_eq!(resolve_encryption(&ies, Encryption::None), Encryption::Wpa2);
    }

    #[test]
    fn test_rsn_then_wpa_keeps_wpa2() {
        let ies = [&RSN_IE[..], &WPA_IE[..]].concat();
        assert_eq!(resolve_encryption(&ies, Encryption::None), Encryption::Wpa2);
        assert_eq!(resolve_encryption(&WPA_IE, Encryption::Wpa2), Encryption::Wpa2);
    }

    #[test]
    fn test_unrelated_elements() {
        let ies = [0x00, 0x04, b'h', b'o', b'm', b'e', 0x03, 0x01, 0x06];
        assert_eq!(resolve_encryption(&ies, Encryption::Wep), Encryption::Wep);
        assert_eq!(resolve_encryption(&[], Encryption::None), Encryption::None);
    }

    #[test]
    fn test_overlong_element_stops_walk() {
        // The second element claims 16 bytes but only 2 follow
        let ies = [0x00, 0x01, b'x', 0x30, 0x10, 0x01, 0x00];
        assert_eq!(elements(&ies).count(), 1);
        assert_eq!(resolve_encryption(&ies, Encryption::None), Encryption::None);
    }

    #[test]
    fn test_lone_tag_byte() {
        assert_eq!(elements(&[0x30]).count(), 0);
    }

    proptest! {
        #[test]
        fn walk_never_panics(ies in proptest::collection::vec(any::<u8>(), 0..256)) {
            let total: usize = elements(&ies).map(|(_, value)| value.len() + 2).sum();
            prop_assert!(total <= ies.len());
        }
    }
}
