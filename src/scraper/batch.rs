//! Periodic flushing of a subreddit's rows
//!
//! Rows accumulate in the current batch. Every `save_period` rows the batch
//! is written to its own file and a fresh batch is started; the flushed
//! batches are kept so the subreddit's full table can be rebuilt afterwards.
//! Each row ends up in exactly one batch.

use crate::table::{write_csv, OutputPaths, PostRecord, Table};
use crate::SkimmerError;
use std::mem;
use std::path::PathBuf;

/// Accumulates one subreddit's rows, flushing them in fixed-size batches
#[derive(Debug)]
pub struct BatchAccumulator<'a> {
    subreddit: &'a str,
    comment_limit: usize,
    flush: Option<(&'a OutputPaths, usize)>,
    current: Table,
    batches: Vec<Table>,
    processed: usize,
}

impl<'a> BatchAccumulator<'a> {
    /// Creates an accumulator for `subreddit`
    ///
    /// Flushing only happens when there is somewhere to write to and
    /// `save_period` is a positive number.
    pub fn new(
        subreddit: &'a str,
        comment_limit: usize,
        paths: Option<&'a OutputPaths>,
        save_period: Option<usize>,
    ) -> Self {
        let flush = match (paths, save_period) {
            (Some(paths), Some(period)) if period > 0 => Some((paths, period)),
            _ => None,
        };

        Self {
            subreddit,
            comment_limit,
            flush,
            current: Table::new(comment_limit),
            batches: Vec::new(),
            processed: 0,
        }
    }

    /// Adds a row, flushing the batch if it just reached the save period
    ///
    /// # Returns
    ///
    /// * `Ok(Some(path))` - The row completed a batch, which was written to `path`
    /// * `Ok(None)` - The row was buffered
    /// * `Err(SkimmerError)` - The batch file could not be written
    pub fn push(&mut self, record: PostRecord) -> Result<Option<PathBuf>, SkimmerError> {
        self.current.push(record);
        self.processed += 1;

        let Some((paths, period)) = self.flush else {
            return Ok(None);
        };
        if self.processed % period != 0 {
            return Ok(None);
        }

        let index = self.processed / period;
        let path = paths.batch(self.subreddit, index);
        write_csv(&self.current, &path)?;
        tracing::info!(
            "Flushed batch {} of r/{} ({} rows) to {}",
            index,
            self.subreddit,
            self.current.len(),
            path.display()
        );

        let batch = mem::replace(&mut self.current, Table::new(self.comment_limit));
        self.batches.push(batch);
        Ok(Some(path))
    }

    /// Number of rows pushed so far
    pub fn processed(&self) -> usize {
        self.processed
    }

    /// Number of batches written to disk so far
    pub fn flushed(&self) -> usize {
        self.batches.len()
    }

    /// Concatenates the flushed batches and the unflushed remainder
    pub fn finish(mut self) -> Table {
        self.batches.push(self.current);
        Table::concat(self.comment_limit, self.batches)
    }
}
