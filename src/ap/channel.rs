//! Center frequency to 802.11 channel lookup

/// (MHz, channel) pairs for 802.11b/g and 802.11a, including the 5 GHz
/// turbo-mode channels some drivers still report.
const FREQ_CHANNEL_TABLE: [(u32, u32); 32] = [
    (2412, 1),
    (2417, 2),
    (2422, 3),
    (2427, 4),
    (2432, 5),
    (2437, 6),
    (2442, 7),
    (2447, 8),
    (2452, 9),
    (2457, 10),
    (2462, 11),
    (2467, 12),
    (2472, 13),
    (2484, 14),
    (5180, 36),
    (5200, 40),
    (5210, 42),
    (5220, 44),
    (5240, 48),
    (5250, 50),
    (5260, 52),
    (5280, 56),
    (5290, 58),
    (5300, 60),
    (5320, 64),
    (5745, 149),
    (5760, 152),
    (5765, 153),
    (5785, 157),
    (5800, 160),
    (5805, 161),
    (5825, 165),
];

/// Translate a center frequency in Hz into its channel number.
///
/// Returns 0 when the rounded MHz value is not in the table.
pub fn channel_for_frequency(freq_hz: f64) -> u32 {
    let mhz = (freq_hz / 1_000_000.0).round();
    if !mhz.is_finite() || mhz < 0.0 {
        return 0;
    }
    let mhz = mhz as u32;

    FREQ_CHANNEL_TABLE
        .iter()
        .find(|&&(freq, _)| freq == mhz)
        .map(|&(_, channel)| channel)
        .unwrap_or(0)
}
