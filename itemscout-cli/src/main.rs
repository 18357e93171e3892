use clap::Parser;
use colored::Colorize;
use itemscout::{
    config::CliOverrides,
    mine_with_config,
    output::write_itemsets,
    Algorithm, MinSupport, MiningConfig, MiningError, MiningOutput, OutputFormat,
    TransactionSource,
};
use itertools::Itertools;
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    num::NonZeroUsize,
    path::PathBuf,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

type Result<T> = std::result::Result<T, MiningError>;

/// Mine frequent itemsets from transaction data
#[derive(Parser)]
#[command(
    author,
    version,
    about,
    long_about = None,
    after_help = "Input sources have long flags only, apart from -e: -c, -j and -s select \
                  the config file, the thread count and stats mode. Use --csv, --json and \
                  --stdin to pick those inputs."
)]
struct Cli {
    /// Mine the built-in six-transaction example (default when no input is given)
    #[arg(short = 'e', long, conflicts_with_all = ["csv", "json", "stdin"])]
    example: bool,

    /// Read transactions from a CSV file, one per line
    #[arg(long, value_name = "PATH", conflicts_with_all = ["json", "stdin"])]
    csv: Option<PathBuf>,

    /// Read transactions from a JSON file (array of arrays of strings)
    #[arg(long, value_name = "PATH", conflicts_with = "stdin")]
    json: Option<PathBuf>,

    /// Read CSV transactions from standard input
    #[arg(long)]
    stdin: bool,

    /// Minimum support as an absolute transaction count
    #[arg(short = 'm', long = "min-sup", conflicts_with = "min_perc")]
    min_sup: Option<usize>,

    /// Minimum support as a percentage of the transaction count, in (0, 100]
    #[arg(short = 'M', long = "min-perc")]
    min_perc: Option<f64>,

    /// Distribute the search across worker threads
    #[arg(short = 'p', long)]
    parallel: bool,

    /// Number of worker threads for parallel runs
    #[arg(short = 'j', long)]
    threads: Option<NonZeroUsize>,

    /// Mining algorithm (eclat|apriori)
    #[arg(short = 'a', long)]
    algorithm: Option<String>,

    /// Output format (csv|json)
    #[arg(short = 'f', long)]
    format: Option<String>,

    /// Write itemsets to a file instead of stdout
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Show only statistics, not itemsets
    #[arg(short, long)]
    stats: bool,

    /// Configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn overrides(&self) -> Result<CliOverrides> {
        let input = if let Some(path) = &self.csv {
            Some(TransactionSource::Csv(path.clone()))
        } else if let Some(path) = &self.json {
            Some(TransactionSource::Json(path.clone()))
        } else if self.stdin {
            Some(TransactionSource::Stdin)
        } else if self.example {
            Some(TransactionSource::Sample)
        } else {
            None
        };

        let min_support = match (self.min_sup, self.min_perc) {
            (Some(count), _) => Some(MinSupport::Count(count)),
            (None, Some(percent)) => Some(MinSupport::Percent(percent)),
            (None, None) => None,
        };

        let algorithm = match self.algorithm.as_deref().map(str::to_lowercase).as_deref() {
            None => None,
            Some("eclat") => Some(Algorithm::Eclat),
            Some("apriori") => Some(Algorithm::Apriori),
            Some(other) => {
                return Err(MiningError::config_error(format!(
                    "Unknown algorithm '{}' (expected eclat or apriori)",
                    other
                )))
            }
        };

        let output_format = match self.format.as_deref().map(str::to_lowercase).as_deref() {
            None => None,
            Some("csv") => Some(OutputFormat::Csv),
            Some("json") => Some(OutputFormat::Json),
            Some(other) => {
                return Err(MiningError::config_error(format!(
                    "Unknown output format '{}' (expected csv or json)",
                    other
                )))
            }
        };

        Ok(CliOverrides {
            input,
            min_support,
            algorithm,
            parallel: self.parallel,
            thread_count: self.threads,
            output_format,
            log_level: self.log_level.clone(),
        })
    }
}

fn main() -> Result<()> {
    run()
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = MiningConfig::load_from(cli.config.as_deref())?.merge_with_cli(cli.overrides()?);
    init_logging(&config.log_level);
    debug!("Effective configuration: {:?}", config);

    let output = mine_with_config(&config)?;

    if cli.stats {
        print_stats(&output);
        return Ok(());
    }

    match &cli.output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            write_itemsets(&mut writer, &output.itemsets, config.output_format)?;
        }
        None => {
            let mut writer = BufWriter::new(io::stdout().lock());
            write_itemsets(&mut writer, &output.itemsets, config.output_format)?;
            writer.flush()?;
        }
    }
    Ok(())
}

fn init_logging(level: &str) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn print_stats(output: &MiningOutput) {
    println!(
        "Found {} frequent itemsets in {} transactions",
        output.len().to_string().green(),
        output.transaction_count
    );
    println!(
        "{} distinct items, minimum support {}, {} pruned at level 1",
        output.item_count,
        output.min_support.to_string().yellow(),
        output.pruned_items
    );

    if output.is_empty() {
        return;
    }
    let by_size = output
        .itemsets
        .iter()
        .map(|s| s.len())
        .counts()
        .into_iter()
        .sorted()
        .map(|(size, count)| format!("{}: {}", size, count))
        .join(", ");
    println!("Itemsets by size: {}", by_size.blue());
}
