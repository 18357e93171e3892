pub mod config;
pub mod errors;
pub mod metrics;
pub mod mining;
pub mod output;
pub mod results;
pub mod transactions;

pub use config::{Algorithm, MinSupport, MiningConfig, OutputFormat};
pub use errors::{MiningError, MiningResult};
pub use metrics::{MiningMetrics, MiningStats};
pub use mining::{mine, mine_with_config};
pub use results::{FrequentItemset, MiningOutput};
pub use transactions::{Transaction, TransactionSource};
