/// Wound difficulty for a strength/endurance pair. First matching row wins:
///
/// | condition                  | difficulty |
/// |----------------------------|------------|
/// | strength >= 2 * endurance  | 2          |
/// | strength > endurance       | 3          |
/// | 2 * strength <= endurance  | 6          |
/// | strength < endurance       | 5          |
/// | strength == endurance      | 4          |
///
/// Total over all inputs; doubling is done in `u64` so large values cannot overflow.
pub fn derive_difficulty(strength: u32, endurance: u32) -> u8 {
    let (s, e) = (u64::from(strength), u64::from(endurance));
    match s.cmp(&e) {
        std::cmp::Ordering::Greater if s >= 2 * e => 2,
        std::cmp::Ordering::Greater => 3,
        std::cmp::Ordering::Less if 2 * s <= e => 6,
        std::cmp::Ordering::Less => 5,
        std::cmp::Ordering::Equal => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_pairs() {
        assert_eq!(derive_difficulty(10, 5), 2);
        assert_eq!(derive_difficulty(6, 5), 3);
        assert_eq!(derive_difficulty(5, 6), 5);
        assert_eq!(derive_difficulty(5, 11), 6);
        assert_eq!(derive_difficulty(5, 10), 6);
    }

    #[test]
    fn equal_values_are_four() {
        for s in [1, 2, 3, 7, 100, u32::MAX] {
            assert_eq!(derive_difficulty(s, s), 4, "strength == endurance == {s}");
        }
    }

    #[test]
    fn total_over_small_grid() {
        for s in 1..=40 {
            for e in 1..=40 {
                let d = derive_difficulty(s, e);
                assert!((2..=6).contains(&d), "derive({s}, {e}) = {d}");
            }
        }
    }

    #[test]
    fn extremes_do_not_overflow() {
        assert_eq!(derive_difficulty(u32::MAX, 1), 2);
        assert_eq!(derive_difficulty(1, u32::MAX), 6);
        assert_eq!(derive_difficulty(u32::MAX, u32::MAX - 1), 3);
        assert_eq!(derive_difficulty(u32::MAX - 1, u32::MAX), 5);
    }
}
