//! Horizontal Apriori baseline.
//!
//! Level k candidates are built by joining frequent (k-1)-itemsets that share
//! their first k-2 items, then dropped if any (k-1)-subset is infrequent.
//! Support is counted by scanning every transaction for every candidate; there
//! is no bitset reuse between levels.

use rayon::prelude::*;
use std::collections::HashSet;
use tracing::debug;

/// An itemset as ascending item indices, with its support.
pub type CountedItemset = (Vec<usize>, usize);

/// Re-expresses transactions as sorted, deduplicated indices into `items`.
///
/// `items` must be sorted; labels missing from it are dropped.
pub fn encode_horizontal<T: Ord>(transactions: &[Vec<T>], items: &[T]) -> Vec<Vec<usize>> {
    transactions
        .iter()
        .map(|transaction| {
            let mut ids: Vec<usize> = transaction
                .iter()
                .filter_map(|item| items.binary_search(item).ok())
                .collect();
            ids.sort_unstable();
            ids.dedup();
            ids
        })
        .collect()
}

/// Mines every itemset with support of at least `min_support`.
///
/// `transactions` must hold sorted, deduplicated indices below `item_count`.
/// With `parallel` set, candidate support is counted on the rayon pool.
pub fn apriori(
    transactions: &[Vec<usize>],
    item_count: usize,
    min_support: usize,
    parallel: bool,
) -> Vec<CountedItemset> {
    let mut counts = vec![0usize; item_count];
    for transaction in transactions {
        for &item in transaction {
            counts[item] += 1;
        }
    }

    let mut level: Vec<CountedItemset> = counts
        .into_iter()
        .enumerate()
        .filter(|&(_, count)| count >= min_support)
        .map(|(item, count)| (vec![item], count))
        .collect();

    let mut frequent = Vec::new();
    let mut k = 1;
    while !level.is_empty() {
        debug!("Apriori level {}: {} frequent itemsets", k, level.len());
        let candidates = generate_candidates(&level);
        frequent.append(&mut level);
        k += 1;

        let counted: Vec<CountedItemset> = if parallel {
            candidates
                .into_par_iter()
                .map(|c| {
                    let support = count_support(&c, transactions);
                    (c, support)
                })
                .collect()
        } else {
            candidates
                .into_iter()
                .map(|c| {
                    let support = count_support(&c, transactions);
                    (c, support)
                })
                .collect()
        };

        level = counted
            .into_iter()
            .filter(|(_, support)| *support >= min_support)
            .collect();
    }

    frequent
}

/// Prefix join plus subset prune over one level of frequent itemsets.
///
/// `level` must be sorted lexicographically, which holds for every level
/// `apriori` produces since candidates are generated in order.
pub fn generate_candidates(level: &[CountedItemset]) -> Vec<Vec<usize>> {
    let known: HashSet<&[usize]> = level.iter().map(|(items, _)| items.as_slice()).collect();
    let mut candidates = Vec::new();

    for (i, (a, _)) in level.iter().enumerate() {
        let prefix = &a[..a.len() - 1];
        for (b, _) in &level[i + 1..] {
            if &b[..b.len() - 1] != prefix {
                // Sorted order groups shared prefixes together
                break;
            }
            let mut candidate = a.clone();
            candidate.push(b[b.len() - 1]);
            if all_subsets_frequent(&candidate, &known) {
                candidates.push(candidate);
            }
        }
    }

    candidates
}

fn all_subsets_frequent(candidate: &[usize], known: &HashSet<&[usize]>) -> bool {
    // Dropping either of the last two items gives the joined parents
    (0..candidate.len().saturating_sub(2)).all(|skip| {
        let subset: Vec<usize> = candidate
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != skip)
            .map(|(_, &item)| item)
            .collect();
        known.contains(subset.as_slice())
    })
}

fn count_support(candidate: &[usize], transactions: &[Vec<usize>]) -> usize {
    transactions
        .iter()
        .filter(|transaction| is_sorted_subset(candidate, transaction))
        .count()
}

/// Merge walk over two ascending slices.
fn is_sorted_subset(needle: &[usize], haystack: &[usize]) -> bool {
    let mut rest = haystack.iter();
    needle
        .iter()
        .all(|item| rest.by_ref().any(|candidate| candidate == item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transactions::sample_transactions;

    fn sample_ids() -> (Vec<String>, Vec<Vec<usize>>) {
        let items: Vec<String> = ["A", "C", "D", "T", "W"].iter().map(|s| s.to_string()).collect();
        let encoded = encode_horizontal(&sample_transactions(), &items);
        (items, encoded)
    }

    #[test]
    fn test_encode_horizontal() {
        let (_, encoded) = sample_ids();
        assert_eq!(encoded[0], vec![0, 1, 3, 4]);
        assert_eq!(encoded[5], vec![1, 2, 3]);
    }

    #[test]
    fn test_sample_levels() {
        let (items, encoded) = sample_ids();
        let found = apriori(&encoded, items.len(), 3, false);
        assert_eq!(found.len(), 19);
        assert!(found.contains(&(vec![0, 1, 3, 4], 3)));
        assert!(found.contains(&(vec![2, 4], 3)));
        assert!(!found.iter().any(|(set, _)| set == &vec![0, 2]));
    }

    #[test]
    fn test_parallel_counting_matches() {
        let (items, encoded) = sample_ids();
        let mut sequential = apriori(&encoded, items.len(), 2, false);
        let mut parallel = apriori(&encoded, items.len(), 2, true);
        sequential.sort();
        parallel.sort();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_candidates_use_prefix_join_and_prune() {
        // {0,1} {0,2} {1,3}: {0,1,2} requires {1,2}, which is not frequent
        let level = vec![(vec![0, 1], 3), (vec![0, 2], 3), (vec![1, 3], 3)];
        assert!(generate_candidates(&level).is_empty());

        let level = vec![(vec![0, 1], 3), (vec![0, 2], 3), (vec![1, 2], 3)];
        assert_eq!(generate_candidates(&level), vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_sorted_subset() {
        assert!(is_sorted_subset(&[1, 3], &[0, 1, 2, 3]));
        assert!(!is_sorted_subset(&[1, 4], &[0, 1, 2, 3]));
        assert!(is_sorted_subset(&[], &[0]));
    }
}
