//! CSV serialization
//!
//! Every file starts with a header row whose first cell is empty, and every
//! data row starts with the row's 0-based position in the table.

use crate::table::Table;
use crate::SkimmerError;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes `table` to a new file at `path`, replacing any existing file
///
/// # Returns
///
/// * `Ok(())` - The whole table was written and flushed
/// * `Err(SkimmerError)` - The file could not be created or written
pub fn write_csv(table: &Table, path: &Path) -> Result<(), SkimmerError> {
    let file = std::fs::File::create(path)?;
    write_csv_to(table, file)?;
    tracing::debug!("Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

/// Writes `table` as CSV to any writer
pub fn write_csv_to<W: Write>(table: &Table, writer: W) -> Result<(), SkimmerError> {
    let mut csv = csv::Writer::from_writer(writer);

    let mut header = vec![String::new()];
    header.extend(table.headers());
    csv.write_record(&header)?;

    for (index, row) in table.rows().iter().enumerate() {
        let mut record = vec![index.to_string()];
        record.extend(table.cells(row));
        csv.write_record(&record)?;
    }

    csv.flush()?;
    Ok(())
}

/// File names derived from a base output path
///
/// * batch files: `{base}-{subreddit}-{index}.csv`
/// * per-subreddit files: `{base}-{subreddit}.csv`
/// * the combined file: `{base}.csv`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    base: String,
}

impl OutputPaths {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// File for the `index`-th (1-based) flushed batch of `subreddit`
    pub fn batch(&self, subreddit: &str, index: usize) -> PathBuf {
        PathBuf::from(format!("{}-{}-{}.csv", self.base, subreddit, index))
    }

    /// File for all rows of `subreddit`
    pub fn subreddit(&self, subreddit: &str) -> PathBuf {
        PathBuf::from(format!("{}-{}.csv", self.base, subreddit))
    }

    /// File for the combined table
    pub fn combined(&self) -> PathBuf {
        PathBuf::from(format!("{}.csv", self.base))
    }
}
