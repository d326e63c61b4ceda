//! Run report for a single collection

use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// What a collection run did
#[derive(Debug, Clone)]
pub struct ScrapeReport {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run finished, once it has
    pub finished_at: Option<DateTime<Utc>>,

    /// Rows collected per subreddit, in collection order
    pub subreddits: Vec<(String, usize)>,

    /// Number of batch files flushed across all subreddits
    pub batches_flushed: usize,

    /// Every file written, in write order
    pub files_written: Vec<PathBuf>,
}

impl ScrapeReport {
    /// Starts a new report stamped with the current time
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            subreddits: Vec::new(),
            batches_flushed: 0,
            files_written: Vec::new(),
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn record_subreddit(&mut self, subreddit: &str, rows: usize) {
        self.subreddits.push((subreddit.to_string(), rows));
    }

    pub fn record_batch(&mut self, path: PathBuf) {
        self.batches_flushed += 1;
        self.files_written.push(path);
    }

    pub fn record_file(&mut self, path: PathBuf) {
        self.files_written.push(path);
    }

    /// Total rows across all subreddits
    pub fn total_posts(&self) -> usize {
        self.subreddits.iter().map(|(_, rows)| rows).sum()
    }

    /// Run duration in seconds, if the run has finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

/// Prints a report to stdout in a formatted manner
pub fn print_report(report: &ScrapeReport) {
    println!("=== Scrape Report ===\n");

    println!("Started: {}", report.started_at.to_rfc3339());
    if let Some(finished) = report.finished_at {
        println!("Finished: {}", finished.to_rfc3339());
    }
    if let Some(duration) = report.duration_seconds() {
        println!("Duration: {} seconds", duration);
    }
    println!();

    println!("Posts by Subreddit:");
    for (subreddit, rows) in &report.subreddits {
        println!("  r/{}: {}", subreddit, rows);
    }
    println!("  Total: {}", report.total_posts());
    println!();

    if !report.files_written.is_empty() {
        println!(
            "Files Written ({}, {} batches):",
            report.files_written.len(),
            report.batches_flushed
        );
        for path in &report.files_written {
            println!("  - {}", path.display());
        }
    }
}
