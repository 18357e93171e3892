use std::io::{self, Write};

use crate::config::OutputFormat;
use crate::errors::MiningResult;
use crate::results::FrequentItemset;

/// Writes itemsets in the requested format
pub fn write_itemsets(
    writer: &mut impl Write,
    itemsets: &[FrequentItemset],
    format: OutputFormat,
) -> MiningResult<()> {
    match format {
        OutputFormat::Csv => write_csv(writer, itemsets),
        OutputFormat::Json => write_json(writer, itemsets),
    }
}

/// One `support,item1,item2,...` row per itemset.
///
/// Labels containing a comma, quote, line break, or edge whitespace are
/// double-quoted so [`parse_csv`](crate::transactions::parse_csv) reads them
/// back unchanged.
pub fn write_csv(writer: &mut impl Write, itemsets: &[FrequentItemset]) -> MiningResult<()> {
    for itemset in itemsets {
        write!(writer, "{}", itemset.support)?;
        for item in &itemset.items {
            writer.write_all(b",")?;
            write_field(writer, item)?;
        }
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_field(writer: &mut impl Write, field: &str) -> io::Result<()> {
    let needs_quotes =
        field.contains([',', '"', '\n', '\r']) || field.trim() != field || field.is_empty();
    if needs_quotes {
        write!(writer, "\"{}\"", field.replace('"', "\"\""))
    } else {
        writer.write_all(field.as_bytes())
    }
}

/// A JSON array of `[support, [items...]]` pairs
pub fn write_json(writer: &mut impl Write, itemsets: &[FrequentItemset]) -> MiningResult<()> {
    let pairs: Vec<(usize, &[String])> = itemsets
        .iter()
        .map(|s| (s.support, s.items.as_slice()))
        .collect();
    // A failing sink is a run failure, not bad input
    serde_json::to_writer(&mut *writer, &pairs).map_err(io::Error::from)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
