//! dBm to percentage quality mapping

/// Segments of the Cisco signal strength table as
/// (lower bound in dBm, quality at the lower bound, quality ceiling).
///
/// The table's slopes overshoot the next breakpoint just below it, so each
/// segment is capped at the base of the segment above.
const SEGMENTS: [(i32, i32, i32); 5] = [
    (-20, 85, 100),
    (-30, 77, 85),
    (-60, 48, 77),
    (-98, 13, 48),
    (-112, 1, 13),
];

/// Normalize a signal level in dBm to a 0-100 quality score.
pub fn quality(dbm: i32) -> u8 {
    if dbm >= -10 {
        return 100;
    }

    SEGMENTS
        .iter()
        .find(|&&(floor, _, _)| dbm >= floor)
        .map(|&(floor, base, ceiling)| (base + (dbm - floor)).min(ceiling) as u8)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_breakpoints() {
        assert_eq!(quality(-10), 100);
        assert_eq!(quality(-20), 85);
        assert_eq!(quality(-30), 77);
        assert_eq!(quality(-60), 48);
        assert_eq!(quality(-98), 13);
        assert_eq!(quality(-112), 1);
        assert_eq!(quality(-113), 0);
    }

    #[test]
    fn test_clamps() {
        assert_eq!(quality(0), 100);
        assert_eq!(quality(30), 100);
        assert_eq!(quality(-200), 0);
        assert_eq!(quality(i32::MIN), 0);
        assert_eq!(quality(i32::MAX), 100);
    }

    #[test]
    fn test_between_breakpoints() {
        assert_eq!(quality(-15), 90);
        assert_eq!(quality(-45), 63);
        assert_eq!(quality(-75), 36);
        assert_eq!(quality(-105), 8);
    }

    #[test]
    fn test_no_overshoot_below_breakpoint() {
        // 77 + 9 would be 86, above the 85 reported at -20 dBm
        assert_eq!(quality(-21), 85);
        assert_eq!(quality(-61), 48);
        assert_eq!(quality(-99), 13);
    }

    proptest! {
        #[test]
        fn quality_is_monotonic(dbm in -200i32..50) {
            prop_assert!(quality(dbm) <= quality(dbm + 1));
        }

        #[test]
        fn quality_stays_in_range(dbm in any::<i32>()) {
            prop_assert!(quality(dbm) <= 100);
        }
    }
}
