use std::collections::BTreeMap;
use tracing::debug;

use super::bitset::{Bitmask, MAX_BITS};
use super::vector::ItemsetVector;
use crate::errors::{MiningError, MiningResult};

/// Vertical representation of a transaction database.
///
/// `items[i]` is the label of bit `i` in every item mask, and `base_vectors[i]`
/// is the single-item vector for that label.
#[derive(Debug, Clone)]
pub struct VerticalIndex<T> {
    pub items: Vec<T>,
    pub base_vectors: Vec<ItemsetVector>,
    pub transaction_count: usize,
}

impl<T> VerticalIndex<T> {
    /// Number of distinct items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Base vectors meeting `min_support`, in bit order.
    pub fn frequent_base(&self, min_support: usize) -> Vec<ItemsetVector> {
        self.base_vectors
            .iter()
            .filter(|v| v.support() >= min_support)
            .cloned()
            .collect()
    }
}

/// Builds the per-item transaction masks for `transactions`.
///
/// Items are indexed in ascending order. An item repeated inside one
/// transaction counts once.
pub fn build_vertical<T: Ord + Clone>(transactions: &[Vec<T>]) -> MiningResult<VerticalIndex<T>> {
    if transactions.is_empty() {
        return Err(MiningError::EmptyTransactions);
    }
    if transactions.len() > MAX_BITS {
        return Err(MiningError::capacity_exceeded(
            "transactions",
            transactions.len(),
            MAX_BITS,
        ));
    }

    let transaction_count = transactions.len();
    let mut occurrences: BTreeMap<&T, Bitmask> = BTreeMap::new();
    for (tid, transaction) in transactions.iter().enumerate() {
        for item in transaction {
            occurrences
                .entry(item)
                .or_insert_with(|| Bitmask::with_len(transaction_count))
                .set(tid);
        }
    }

    let item_count = occurrences.len();
    if item_count > MAX_BITS {
        return Err(MiningError::capacity_exceeded("items", item_count, MAX_BITS));
    }

    let mut items = Vec::with_capacity(item_count);
    let mut base_vectors = Vec::with_capacity(item_count);
    for (bit, (item, transaction_mask)) in occurrences.into_iter().enumerate() {
        items.push(item.clone());
        base_vectors.push(ItemsetVector::new(
            Bitmask::single(item_count, bit),
            transaction_mask,
        ));
    }

    debug!(
        "Built vertical index: {} distinct items over {} transactions",
        item_count, transaction_count
    );

    Ok(VerticalIndex {
        items,
        base_vectors,
        transaction_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transactions::sample_transactions;

    #[test]
    fn test_sample_index() {
        let index = build_vertical(&sample_transactions()).unwrap();
        assert_eq!(index.items, vec!["A", "C", "D", "T", "W"]);
        assert_eq!(index.transaction_count, 6);

        let supports: Vec<usize> = index.base_vectors.iter().map(|v| v.support()).collect();
        assert_eq!(supports, vec![4, 6, 4, 4, 5]);

        for (bit, vector) in index.base_vectors.iter().enumerate() {
            assert_eq!(vector.item_mask().ones().collect::<Vec<_>>(), vec![bit]);
        }

        // D appears in transactions 1, 3, 4 and 5
        assert_eq!(
            index.base_vectors[2].transaction_mask().ones().collect::<Vec<_>>(),
            vec![1, 3, 4, 5]
        );
    }

    #[test]
    fn test_empty_transactions_rejected() {
        let transactions: Vec<Vec<String>> = Vec::new();
        assert!(matches!(
            build_vertical(&transactions),
            Err(MiningError::EmptyTransactions)
        ));
    }

    #[test]
    fn test_empty_rows_have_no_items() {
        let transactions: Vec<Vec<u32>> = vec![vec![], vec![]];
        let index = build_vertical(&transactions).unwrap();
        assert_eq!(index.item_count(), 0);
        assert!(index.base_vectors.is_empty());
        assert_eq!(index.transaction_count, 2);
    }

    #[test]
    fn test_duplicate_items_count_once() {
        let transactions = vec![vec!["x", "x", "y"], vec!["x"]];
        let index = build_vertical(&transactions).unwrap();
        assert_eq!(index.items, vec!["x", "y"]);
        assert_eq!(index.base_vectors[0].support(), 2);
        assert_eq!(index.base_vectors[1].support(), 1);
    }

    #[test]
    fn test_frequent_base_prunes() {
        let index = build_vertical(&sample_transactions()).unwrap();
        let frequent = index.frequent_base(5);
        assert_eq!(frequent.len(), 2);
        assert_eq!(frequent[0].support(), 6);
        assert_eq!(frequent[1].support(), 5);
    }
}
