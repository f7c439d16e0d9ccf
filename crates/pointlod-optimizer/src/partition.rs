//! Linear partitioning of the position index space.

use std::ops::Range;

/// Splits `0..len` into `count` contiguous ranges of near-equal size.
///
/// Range `i` starts at `i * len / count`, so sizes differ by at most one and
/// the ranges cover `0..len` exactly once, in order. Ranges are empty when
/// `count > len`.
pub fn partition_ranges(len: usize, count: usize) -> Vec<Range<usize>> {
    if count == 0 {
        return Vec::new();
    }
    let boundary = |i: usize| {
        // u128 keeps `i * len` from overflowing on huge inputs
        usize::try_from(i as u128 * len as u128 / count as u128).unwrap_or(len)
    };
    (0..count).map(|i| boundary(i)..boundary(i + 1)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_even_split() {
        let ranges = partition_ranges(10_000, 4);
        assert_eq!(ranges, vec![0..2500, 2500..5000, 5000..7500, 7500..10_000]);
    }

    #[test]
    fn test_uneven_split() {
        let ranges = partition_ranges(10, 3);
        assert_eq!(ranges, vec![0..3, 3..6, 6..10]);
    }

    #[test]
    fn test_zero_count() {
        assert!(partition_ranges(10, 0).is_empty());
    }

    proptest! {
        #[test]
        fn ranges_cover_index_space_once(len in 1usize..100_000, count in 1usize..500) {
            prop_assume!(count <= len);
            let ranges = partition_ranges(len, count);
            prop_assert_eq!(ranges.len(), count);

            let mut next = 0;
            for range in &ranges {
                prop_assert_eq!(range.start, next);
                prop_assert!(!range.is_empty());
                next = range.end;
            }
            prop_assert_eq!(next, len);

            let min = ranges.iter().map(ExactSizeIterator::len).min().unwrap_or(0);
            let max = ranges.iter().map(ExactSizeIterator::len).max().unwrap_or(0);
            prop_assert!(max - min <= 1);
        }
    }
}
