//! Conversion of index-keyed records into dense, zero-based sequences.

use std::collections::BTreeMap;

/// Turns `index → value` entries into a `Vec` covering `0..n`.
///
/// Returns `Err(missing)` with the first absent index when the keys do not
/// form a contiguous range starting at zero.
pub(crate) fn densify<T>(entries: BTreeMap<usize, T>) -> Result<Vec<T>, usize> {
    let mut dense = Vec::with_capacity(entries.len());
    for (expected, (index, value)) in entries.into_iter().enumerate() {
        if index != expected {
            return Err(expected);
        }
        dense.push(value);
    }
    Ok(dense)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contiguous_keys_become_vec() {
        let entries: BTreeMap<usize, char> = [(2, 'c'), (0, 'a'), (1, 'b')].into_iter().collect();
        assert_eq!(densify(entries), Ok(vec!['a', 'b', 'c']));
    }

    #[test]
    fn gap_reports_first_missing_index() {
        let entries: BTreeMap<usize, u8> = [(0, 0), (1, 1), (3, 3)].into_iter().collect();
        assert_eq!(densify(entries), Err(2));
    }

    #[test]
    fn missing_zero_is_reported() {
        let entries: BTreeMap<usize, u8> = [(1, 1)].into_iter().collect();
        assert_eq!(densify(entries), Err(0));
    }

    #[test]
    fn empty_is_empty() {
        assert_eq!(densify(BTreeMap::<usize, u8>::new()), Ok(Vec::new()));
    }
}
