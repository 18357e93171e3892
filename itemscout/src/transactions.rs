//! Transaction sources.
//!
//! A transaction is a list of item labels. Sources are:
//!
//! - **CSV**: one transaction per line, items separated by commas. Fields may be
//!   double-quoted, with `""` for a literal quote; a quoted field can contain
//!   commas and line breaks. Unquoted fields are trimmed and empty fields are
//!   dropped. A blank line is an empty transaction and still counts toward the
//!   transaction total.
//! - **JSON**: an array of arrays of strings, e.g. `[["A", "C"], ["C", "D"]]`.
//! - **Stdin**: CSV read from standard input.
//! - **Sample**: the six-transaction dataset from the Eclat paper, used when no
//!   other source is given.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::{MiningError, MiningResult};

/// One transaction: the labels of the items it contains
pub type Transaction = Vec<String>;

/// Where transactions are read from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "path")]
pub enum TransactionSource {
    #[default]
    Sample,
    Csv(PathBuf),
    Json(PathBuf),
    Stdin,
}

impl TransactionSource {
    /// Loads every transaction from this source
    pub fn load(&self) -> MiningResult<Vec<Transaction>> {
        let transactions = match self {
            Self::Sample => sample_transactions(),
            Self::Csv(path) => {
                parse_csv(BufReader::new(open(path)?), &path.display().to_string())?
            }
            Self::Json(path) => {
                parse_json(BufReader::new(open(path)?), &path.display().to_string())?
            }
            Self::Stdin => parse_csv(io::stdin().lock(), "stdin")?,
        };
        debug!("Loaded {} transactions from {:?}", transactions.len(), self);
        Ok(transactions)
    }
}

/// The example database from Zaki's Eclat paper
pub fn sample_transactions() -> Vec<Transaction> {
    let rows: [&[&str]; 6] = [
        &["A", "C", "T", "W"],
        &["C", "D", "W"],
        &["A", "C", "T", "W"],
        &["A", "C", "D", "W"],
        &["A", "C", "D", "T", "W"],
        &["C", "D", "T"],
    ];
    rows.iter()
        .map(|row| row.iter().map(|item| item.to_string()).collect())
        .collect()
}

fn open(path: &Path) -> MiningResult<File> {
    File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => MiningError::file_not_found(path),
        _ => MiningError::IoError(e),
    })
}

/// Parses comma-separated transactions, one record per line
pub fn parse_csv(reader: impl BufRead, source_name: &str) -> MiningResult<Vec<Transaction>> {
    let mut transactions = Vec::new();
    let mut record = String::new();
    // First line of a record still inside a quoted field
    let mut open_since: Option<usize> = None;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| match e.kind() {
            io::ErrorKind::InvalidData => {
                MiningError::malformed_input(source_name, format!("line {}: {}", line_no + 1, e))
            }
            _ => MiningError::IoError(e),
        })?;
        if open_since.is_some() {
            record.push('\n');
        }
        record.push_str(&line);

        match split_record(&record) {
            Some(fields) => {
                transactions.push(fields.into_iter().filter(|f| !f.is_empty()).collect());
                record.clear();
                open_since = None;
            }
            None => {
                open_since.get_or_insert(line_no);
            }
        }
    }

    if let Some(line_no) = open_since {
        return Err(MiningError::malformed_input(
            source_name,
            format!("line {}: unterminated quoted field", line_no + 1),
        ));
    }
    Ok(transactions)
}

/// Splits one record into fields, or `None` if it ends inside quotes.
fn split_record(record: &str) -> Option<Vec<String>> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut in_quotes = false;
    let mut chars = record.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' if !quoted && field.trim().is_empty() => {
                field.clear();
                quoted = true;
                in_quotes = true;
            }
            ',' => fields.push(finish_field(&mut field, &mut quoted)),
            _ => field.push(c),
        }
    }

    if in_quotes {
        return None;
    }
    fields.push(finish_field(&mut field, &mut quoted));
    Some(fields)
}

fn finish_field(field: &mut String, quoted: &mut bool) -> String {
    let value = std::mem::take(field);
    if std::mem::take(quoted) {
        value
    } else {
        value.trim().to_string()
    }
}

/// Parses a JSON array of transactions
pub fn parse_json(mut reader: impl Read, source_name: &str) -> MiningResult<Vec<Transaction>> {
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    serde_json::from_str(&contents)
        .map_err(|e| MiningError::malformed_input(source_name, e.to_string()))
}
