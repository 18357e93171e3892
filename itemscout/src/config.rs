use config::{Config as ConfigBuilder, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::errors::{MiningError, MiningResult};
use crate::transactions::TransactionSource;

/// Configuration for a mining run.
///
/// # Configuration Locations
///
/// The configuration can be loaded from multiple locations in order of precedence:
/// 1. Custom config file specified via `--config` flag
/// 2. Local `.itemscout.yaml` in the current directory
/// 3. Global `$HOME/.config/itemscout/config.yaml`
///
/// # Configuration Format
///
/// ```yaml
/// # Where transactions come from (sample, csv, json, stdin)
/// input:
///   kind: csv
///   path: "baskets.csv"
///
/// # Absolute count...
/// min_support:
///   count: 3
/// # ...or a percentage of the transaction count
/// # min_support:
/// #   percent: 2.5
///
/// # eclat or apriori
/// algorithm: eclat
///
/// # Distribute the search across worker threads
/// parallel: true
///
/// # Worker count (default: CPU cores)
/// thread_count: 8
///
/// # csv or json
/// output_format: csv
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "info"
/// ```
///
/// When using the CLI, command-line arguments take precedence over config file
/// values; see [`MiningConfig::merge_with_cli`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiningConfig {
    /// Transaction source. Defaults to the built-in sample dataset
    #[serde(default)]
    pub input: TransactionSource,

    /// Minimum support threshold
    #[serde(default)]
    pub min_support: MinSupport,

    /// Mining algorithm
    #[serde(default)]
    pub algorithm: Algorithm,

    /// Whether to run the search on the worker pool
    #[serde(default)]
    pub parallel: bool,

    /// Number of worker threads for parallel runs
    /// Defaults to number of CPU cores if not specified
    #[serde(default = "default_thread_count")]
    pub thread_count: NonZeroUsize,

    /// How results are written
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Minimum support, either absolute or relative to the transaction count
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MinSupport {
    Count(usize),
    Percent(f64),
}

impl Default for MinSupport {
    fn default() -> Self {
        MinSupport::Count(3)
    }
}

impl MinSupport {
    /// Checks the threshold without knowing the transaction count
    pub fn validate(&self) -> MiningResult<()> {
        match *self {
            MinSupport::Count(0) => Err(MiningError::invalid_min_support(
                "minimum support must be at least 1",
            )),
            MinSupport::Percent(p) if !(p > 0.0 && p <= 100.0) => {
                Err(MiningError::invalid_min_support(format!(
                    "percentage must be in (0, 100], got {}",
                    p
                )))
            }
            _ => Ok(()),
        }
    }

    /// Resolves the threshold to an absolute transaction count.
    ///
    /// A percentage `p` resolves to `ceil(p / 100 * transaction_count)`, the
    /// smallest count that is at least `p` percent of the transactions.
    pub fn resolve(&self, transaction_count: usize) -> MiningResult<usize> {
        self.validate()?;
        match *self {
            MinSupport::Count(n) => Ok(n),
            MinSupport::Percent(p) => {
                // Multiply first so whole percentages divide exactly
                let count = (p * transaction_count as f64 / 100.0).ceil() as usize;
                Ok(count.max(1))
            }
        }
    }
}

/// Mining strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Vertical bitset intersection search
    #[default]
    Eclat,
    /// Horizontal candidate generation baseline
    Apriori,
}

/// Result sink format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `support,item1,item2,...` per line
    #[default]
    Csv,
    /// `[[support, [items...]], ...]`
    Json,
}

fn default_thread_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN)
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            input: TransactionSource::default(),
            min_support: MinSupport::default(),
            algorithm: Algorithm::default(),
            parallel: false,
            thread_count: default_thread_count(),
            output_format: OutputFormat::default(),
            log_level: default_log_level(),
        }
    }
}

/// Values supplied on the command line. `None` leaves the file value alone.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub input: Option<TransactionSource>,
    pub min_support: Option<MinSupport>,
    pub algorithm: Option<Algorithm>,
    pub parallel: bool,
    pub thread_count: Option<NonZeroUsize>,
    pub output_format: Option<OutputFormat>,
    pub log_level: Option<String>,
}

impl MiningConfig {
    /// Loads configuration from the default locations
    pub fn load() -> MiningResult<Self> {
        Self::load_from(None)
    }

    /// Loads configuration from a specific file on top of the default locations
    pub fn load_from(config_path: Option<&Path>) -> MiningResult<Self> {
        let mut builder = ConfigBuilder::builder();

        let config_files = [
            // Global config
            dirs::config_dir().map(|p| p.join("itemscout/config.yaml")),
            // Local config
            Some(PathBuf::from(".itemscout.yaml")),
        ];

        for path in config_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        // An explicit file must exist
        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config: Self = builder.build()?.try_deserialize()?;
        config.min_support.validate()?;
        Ok(config)
    }

    /// Merges CLI arguments with configuration file values
    pub fn merge_with_cli(mut self, cli: CliOverrides) -> Self {
        // CLI values take precedence over config file values
        if let Some(input) = cli.input {
            self.input = input;
        }
        if let Some(min_support) = cli.min_support {
            self.min_support = min_support;
        }
        if let Some(algorithm) = cli.algorithm {
            self.algorithm = algorithm;
        }
        if cli.parallel {
            self.parallel = true;
        }
        if let Some(thread_count) = cli.thread_count {
            self.thread_count = thread_count;
        }
        if let Some(output_format) = cli.output_format {
            self.output_format = output_format;
        }
        if let Some(log_level) = cli.log_level {
            self.log_level = log_level;
        }
        self
    }
}
