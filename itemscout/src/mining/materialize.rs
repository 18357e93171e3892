use super::bitset::Bitmask;

/// Labels whose bits are set in `item_mask`, in ascending bit order.
///
/// # Panics
///
/// Panics if `item_mask` has a bit set beyond the end of `items`.
pub fn materialize<T: Clone>(item_mask: &Bitmask, items: &[T]) -> Vec<T> {
    item_mask.ones().map(|bit| items[bit].clone()).collect()
}

/// Inverse of [`materialize`]: the mask selecting `labels` in a sorted index
/// table. Returns `None` if any label is missing from the table.
pub fn item_mask_of<T: Ord>(labels: &[T], items: &[T]) -> Option<Bitmask> {
    let mut mask = Bitmask::with_len(items.len());
    for label in labels {
        mask.set(items.binary_search(label).ok()?);
    }
    Some(mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Vec<String> {
        ["A", "C", "D", "T", "W"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_materialize_in_bit_order() {
        let items = table();
        let mut mask = Bitmask::with_len(items.len());
        mask.set(4);
        mask.set(0);
        mask.set(3);
        assert_eq!(materialize(&mask, &items), vec!["A", "T", "W"]);
    }

    #[test]
    fn test_round_trip_is_fixed_point() {
        let items = table();
        let labels = vec!["C".to_string(), "D".to_string(), "W".to_string()];
        let mask = item_mask_of(&labels, &items).unwrap();
        assert_eq!(materialize(&mask, &items), labels);
        assert_eq!(item_mask_of(&materialize(&mask, &items), &items), Some(mask));
    }

    #[test]
    fn test_unknown_label() {
        assert_eq!(item_mask_of(&["Z".to_string()], &table()), None);
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_mask() {
        let mask = Bitmask::single(8, 7);
        materialize(&mask, &table());
    }
}
