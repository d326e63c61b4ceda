//! Scraper module: the collection loop
//!
//! For each subreddit, in order, the scraper:
//! 1. Walks the top posts page by page (capped at the listing ceiling)
//! 2. Fetches each post's first comments and turns the post into a row
//! 3. Flushes rows to numbered batch files every `save_period` posts
//! 4. Reassembles the batches and tags the rows with the subreddit
//! 5. Writes a per-subreddit file when more than one subreddit is scraped
//!
//! The per-subreddit tables are then concatenated into the result, which is
//! written to `{base}.csv` when an output path is set.

mod batch;
mod progress;
mod report;

pub use batch::BatchAccumulator;
pub use progress::PostProgress;
pub use report::{print_report, ScrapeReport};

use crate::config::load_credentials;
use crate::reddit::{
    capped_post_limit, CommentSort, RedditApi, RedditClient, TimeFilter, TopListing,
};
use crate::table::{write_csv, OutputPaths, PostRecord, Table};
use crate::SkimmerError;
use std::path::Path;

/// Parameters of a single collection run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectOptions {
    /// Top posts to fetch per subreddit; capped at the listing ceiling
    pub post_limit: usize,

    /// Comments to keep per post
    pub comment_limit: usize,

    /// Base path for output files; `None` keeps everything in memory
    pub file_path: Option<String>,

    /// Flush a batch file every this many posts; `None` or 0 disables it
    pub save_period: Option<usize>,

    /// Time window of the "top" ranking
    pub time_filter: TimeFilter,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            post_limit: 100,
            comment_limit: 5,
            file_path: None,
            save_period: Some(1000),
            time_filter: TimeFilter::All,
        }
    }
}

impl CollectOptions {
    pub fn new(post_limit: usize, comment_limit: usize) -> Self {
        Self {
            post_limit,
            comment_limit,
            ..Self::default()
        }
    }

    pub fn file_path(mut self, file_path: Option<impl Into<String>>) -> Self {
        self.file_path = file_path.map(Into::into);
        self
    }

    pub fn save_period(mut self, save_period: Option<usize>) -> Self {
        self.save_period = save_period;
        self
    }

    pub fn time_filter(mut self, time_filter: TimeFilter) -> Self {
        self.time_filter = time_filter;
        self
    }
}

/// Checks that `name` is a subreddit name that is safe to use in a URL path
/// and in a file name
///
/// Letters, digits and underscores are accepted, and `+` joins several
/// subreddits into one listing.
pub fn validate_subreddit(name: &str) -> Result<(), SkimmerError> {
    let valid = name.split('+').all(|part| {
        !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    });

    if valid {
        Ok(())
    } else {
        Err(SkimmerError::InvalidSubreddit(name.to_string()))
    }
}

/// Collects top posts and comments for a fixed list of subreddits
pub struct Scraper<A = RedditClient> {
    api: A,
    subreddits: Vec<String>,
    progress: bool,
}

impl Scraper<RedditClient> {
    /// Logs in as `bot` and creates a scraper over `subreddits`
    ///
    /// # Arguments
    ///
    /// * `credentials` - Path to the TOML credentials file
    /// * `bot` - Name of the bot's section in the credentials file
    /// * `subreddits` - Subreddits to scrape, in order; may be empty
    /// * `progress` - Whether to display a progress bar
    ///
    /// # Returns
    ///
    /// * `Ok(Scraper)` - Authenticated scraper
    /// * `Err(SkimmerError::Authentication)` - Unknown bot, invalid
    ///   credentials, or the token exchange failed
    pub async fn new(
        credentials: &Path,
        bot: &str,
        subreddits: Vec<String>,
        progress: bool,
    ) -> Result<Self, SkimmerError> {
        let creds = load_credentials(credentials, bot)?;
        let api = RedditClient::connect(&creds).await?;
        Ok(Self::with_api(api, subreddits, progress))
    }

    /// Sets the ordering used when picking each post's first comments
    pub fn with_comment_sort(mut self, comment_sort: CommentSort) -> Self {
        self.api = self.api.with_comment_sort(comment_sort);
        self
    }
}

impl<A: RedditApi> Scraper<A> {
    /// Creates a scraper over an already connected API
    pub fn with_api(api: A, subreddits: Vec<String>, progress: bool) -> Self {
        Self {
            api,
            subreddits,
            progress,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Runs a collection and returns the combined table
    ///
    /// The table is returned whether or not it was also written to disk.
    pub async fn collect(&self, options: &CollectOptions) -> Result<Table, SkimmerError> {
        let (table, _report) = self.collect_with_report(options).await?;
        Ok(table)
    }

    /// Runs a collection and returns the combined table and a run report
    ///
    /// Errors from the API or the file system abort the run. Batch files
    /// written before the failure stay on disk. Subreddit names are checked
    /// before any request is made.
    pub async fn collect_with_report(
        &self,
        options: &CollectOptions,
    ) -> Result<(Table, ScrapeReport), SkimmerError> {
        for subreddit in &self.subreddits {
            validate_subreddit(subreddit)?;
        }

        let paths = options.file_path.as_deref().map(OutputPaths::new);
        let mut report = ScrapeReport::start();

        let mut tables = Vec::with_capacity(self.subreddits.len());
        for subreddit in &self.subreddits {
            let table = self
                .collect_subreddit(subreddit, options, paths.as_ref(), &mut report)
                .await?;
            tables.push(table);
        }

        let table = Table::concat(options.comment_limit, tables);

        if let Some(paths) = &paths {
            let path = paths.combined();
            write_csv(&table, &path)?;
            tracing::info!("Saved {} rows to {}", table.len(), path.display());
            println!("\n\nTable saved to {}", path.display());
            report.record_file(path);
        }

        report.finish();
        Ok((table, report))
    }

    async fn collect_subreddit(
        &self,
        subreddit: &str,
        options: &CollectOptions,
        paths: Option<&OutputPaths>,
        report: &mut ScrapeReport,
    ) -> Result<Table, SkimmerError> {
        tracing::info!("Collecting top posts from r/{}", subreddit);

        let mut listing = TopListing::new(subreddit, options.post_limit, options.time_filter);
        let progress = PostProgress::new(
            self.progress,
            capped_post_limit(options.post_limit),
            subreddit,
        );
        let mut batches =
            BatchAccumulator::new(subreddit, options.comment_limit, paths, options.save_period);

        // Each page is turned into rows before the next one is requested, so
        // a failing page leaves the earlier batches on disk
        while let Some(posts) = listing.next_page(&self.api).await? {
            for post in &posts {
                let comments = self.api.top_comments(post, options.comment_limit).await?;
                let record = PostRecord::from_post(post, &comments, options.comment_limit);
                if let Some(path) = batches.push(record)? {
                    report.record_batch(path);
                }
                progress.inc();
            }
        }
        progress.finish();

        let mut table = batches.finish();
        table.tag_subreddit(subreddit);
        tracing::info!("Collected {} posts from r/{}", table.len(), subreddit);
        report.record_subreddit(subreddit, table.len());

        if let Some(paths) = paths {
            if self.subreddits.len() > 1 {
                let path = paths.subreddit(subreddit);
                write_csv(&table, &path)?;
                report.record_file(path);
            }
        }

        Ok(table)
    }
}
