use serde::Serialize;
use std::cmp::Ordering;

/// A frequent itemset with its support
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FrequentItemset {
    /// Number of transactions containing every item
    pub support: usize,
    /// Item labels in ascending order
    pub items: Vec<String>,
}

impl FrequentItemset {
    pub fn new(support: usize, items: Vec<String>) -> Self {
        Self { support, items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Result order: highest support first, then smaller itemsets, then
    /// lexicographic item order.
    pub fn result_order(&self, other: &Self) -> Ordering {
        other
            .support
            .cmp(&self.support)
            .then_with(|| self.items.len().cmp(&other.items.len()))
            .then_with(|| self.items.cmp(&other.items))
    }
}

/// The complete result of a mining run
#[derive(Debug, Clone, Default, Serialize)]
pub struct MiningOutput {
    /// Frequent itemsets in result order
    pub itemsets: Vec<FrequentItemset>,
    /// Number of transactions mined
    pub transaction_count: usize,
    /// Number of distinct items across all transactions
    pub item_count: usize,
    /// Absolute minimum support used for the run
    pub min_support: usize,
    /// Single items dropped for falling below the minimum support
    pub pruned_items: usize,
}

impl MiningOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sorts itemsets into result order
    pub fn sort(&mut self) {
        self.itemsets.sort_by(FrequentItemset::result_order);
    }

    /// Number of itemsets found
    pub fn len(&self) -> usize {
        self.itemsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.itemsets.is_empty()
    }

    /// Longest itemset length, or 0 for an empty result
    pub fn max_itemset_len(&self) -> usize {
        self.itemsets.iter().map(|s| s.len()).max().unwrap_or(0)
    }

    /// Support of the given labels, if they form a frequent itemset
    pub fn support_of(&self, items: &[&str]) -> Option<usize> {
        self.itemsets
            .iter()
            .find(|s| s.items.iter().map(String::as_str).eq(items.iter().copied()))
            .map(|s| s.support)
    }
}
