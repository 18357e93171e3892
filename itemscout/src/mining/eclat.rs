use super::vector::ItemsetVector;

/// Combines `anchor` with every vector in `rest` and keeps the combinations
/// that still meet `min_support`.
///
/// This is the single pairwise-intersection step shared by the sequential
/// search and by every parallel job. `rest` must hold only vectors whose items
/// sort after the anchor's, so each result extends the anchor's prefix forward.
pub fn extend_prefix(
    anchor: &ItemsetVector,
    rest: &[ItemsetVector],
    min_support: usize,
) -> Vec<ItemsetVector> {
    rest.iter()
        .map(|other| anchor.combine(other))
        .filter(|combined| combined.support() >= min_support)
        .collect()
}

/// Sequential Eclat over prefix-ordered vectors that all meet `min_support`.
///
/// Returns every frequent combination of the inputs, excluding the inputs
/// themselves. Each itemset is produced exactly once.
pub fn eclat(vectors: &[ItemsetVector], min_support: usize) -> Vec<ItemsetVector> {
    let mut found = Vec::new();
    for (i, anchor) in vectors.iter().enumerate() {
        let siblings = extend_prefix(anchor, &vectors[i + 1..], min_support);
        if !siblings.is_empty() {
            found.extend(eclat(&siblings, min_support));
            found.extend(siblings);
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mining::builder::build_vertical;
    use crate::mining::materialize::materialize;
    use crate::transactions::sample_transactions;

    #[test]
    fn test_extend_prefix_filters_by_support() {
        let index = build_vertical(&sample_transactions()).unwrap();
        // D against T and W: {D,T} has support 2, {D,W} has support 3
        let extended = extend_prefix(&index.base_vectors[2], &index.base_vectors[3..], 3);
        assert_eq!(extended.len(), 1);
        assert_eq!(materialize(extended[0].item_mask(), &index.items), vec!["D", "W"]);
        assert_eq!(extended[0].support(), 3);
    }

    #[test]
    fn test_eclat_sample() {
        let index = build_vertical(&sample_transactions()).unwrap();
        let base = index.frequent_base(3);
        let found = eclat(&base, 3);

        // 8 pairs, 5 triples and one quadruple
        assert_eq!(found.len(), 14);
        assert!(found.iter().all(|v| v.len() >= 2 && v.support() >= 3));

        let mut named: Vec<(Vec<String>, usize)> = found
            .iter()
            .map(|v| (materialize(v.item_mask(), &index.items), v.support()))
            .collect();
        named.sort();
        assert!(named.contains(&(vec!["A".into(), "C".into(), "T".into(), "W".into()], 3)));
        assert!(named.contains(&(vec!["A".into(), "C".into(), "W".into()], 4)));
        assert!(!named.iter().any(|(items, _)| items == &["A", "D"]));
    }

    #[test]
    fn test_eclat_no_combinations() {
        let index = build_vertical(&[vec!["a"], vec!["b"]]).unwrap();
        let base = index.frequent_base(1);
        assert!(eclat(&base, 1).is_empty());
        assert!(eclat(&[], 1).is_empty());
    }
}
