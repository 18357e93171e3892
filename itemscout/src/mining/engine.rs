use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::apriori::{apriori, encode_horizontal};
use super::builder::build_vertical;
use super::eclat::eclat;
use super::materialize::materialize;
use super::scheduler::ParallelScheduler;
use crate::config::{Algorithm, MiningConfig};
use crate::errors::MiningResult;
use crate::metrics::MiningMetrics;
use crate::results::{FrequentItemset, MiningOutput};
use crate::transactions::Transaction;

fn elapsed(start: Instant) -> humantime::FormattedDuration {
    // Truncated to whole microseconds
    humantime::format_duration(Duration::from_micros(start.elapsed().as_micros() as u64))
}

/// Mines frequent itemsets from `transactions` as described by `config`.
///
/// Input is validated before any search begins. The result is sorted into
/// result order and is identical for sequential and parallel runs.
pub fn mine(transactions: &[Transaction], config: &MiningConfig) -> MiningResult<MiningOutput> {
    let min_support = config.min_support.resolve(transactions.len())?;
    info!(
        "Mining {} transactions with {:?} (min support {}, parallel: {})",
        transactions.len(),
        config.algorithm,
        min_support,
        config.parallel
    );

    let start = Instant::now();
    let index = build_vertical(transactions)?;
    debug!("Built bit vectors in {}", elapsed(start));

    let metrics = MiningMetrics::new();
    let start = Instant::now();
    let itemsets = match config.algorithm {
        Algorithm::Eclat => {
            let base = index.frequent_base(min_support);
            debug!(
                "Pruned {} items below min support; {} remain",
                index.item_count() - base.len(),
                base.len()
            );

            let found = if config.parallel {
                ParallelScheduler::new(config.thread_count)
                    .with_metrics(metrics.clone())
                    .run(&base, min_support)?
            } else {
                let found = eclat(&base, min_support);
                metrics.record_accepted(found.len());
                found
            };

            base.iter()
                .chain(found.iter())
                .map(|v| {
                    FrequentItemset::new(v.support(), materialize(v.item_mask(), &index.items))
                })
                .collect::<Vec<_>>()
        }
        Algorithm::Apriori => {
            let horizontal = encode_horizontal(transactions, &index.items);
            apriori(&horizontal, index.item_count(), min_support, config.parallel)
                .into_iter()
                .map(|(ids, support)| {
                    let items = ids.into_iter().map(|i| index.items[i].clone()).collect();
                    FrequentItemset::new(support, items)
                })
                .collect::<Vec<_>>()
        }
    };
    debug!("Search finished in {}", elapsed(start));

    let pruned_items = index
        .base_vectors
        .iter()
        .filter(|v| v.support() < min_support)
        .count();

    let mut output = MiningOutput {
        itemsets,
        transaction_count: index.transaction_count,
        item_count: index.item_count(),
        min_support,
        pruned_items,
    };
    output.sort();

    metrics.log_stats();
    info!(
        "Mining complete. Found {} frequent itemsets (longest: {})",
        output.len(),
        output.max_itemset_len()
    );

    Ok(output)
}

/// Loads the configured transaction source and mines it
pub fn mine_with_config(config: &MiningConfig) -> MiningResult<MiningOutput> {
    let transactions = config.input.load()?;
    mine(&transactions, config)
}
