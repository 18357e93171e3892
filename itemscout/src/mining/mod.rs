/// Frequent itemset mining over vertical bit vectors.
///
/// Transactions are first turned into one [`ItemsetVector`] per distinct item:
/// an item mask with a single bit set and a transaction mask marking every
/// transaction that contains the item. Support of any itemset is then the
/// population count of the AND of its members' transaction masks.
///
/// # Search
///
/// [`eclat`] walks the prefix tree depth first. Each vector is combined only
/// with the vectors that follow it in the sibling array, so every itemset is
/// generated from exactly one parent:
/// ```rust,ignore
/// for (i, anchor) in siblings.iter().enumerate() {
///     let children = extend_prefix(anchor, &siblings[i + 1..], min_support);
///     // recurse into children
/// }
/// ```
///
/// [`ParallelScheduler`] runs the same step as independent jobs on a fixed
/// worker pool, coordinated by a [`TaskQueue`] that counts outstanding work.
/// [`apriori`] is the level-wise baseline used to cross-check both.
///
/// # Materialization
///
/// The search operates on bit positions only. [`materialize`] maps an item
/// mask back to item labels once a result is accepted.
pub mod apriori;
pub mod bitset;
pub mod builder;
pub mod eclat;
pub mod engine;
pub mod materialize;
pub mod queue;
pub mod scheduler;
pub mod vector;

pub use apriori::apriori;
pub use bitset::{support_of, Bitmask, MAX_BITS};
pub use builder::{build_vertical, VerticalIndex};
pub use eclat::{eclat, extend_prefix};
pub use engine::{mine, mine_with_config};
pub use materialize::{item_mask_of, materialize};
pub use queue::{DrainOutcome, TaskQueue};
pub use scheduler::ParallelScheduler;
pub use vector::ItemsetVector;
