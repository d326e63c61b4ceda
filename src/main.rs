//! Sub-Skimmer main entry point
//!
//! This is the command-line interface for the Sub-Skimmer Reddit scraper.

use clap::Parser;
use std::path::PathBuf;
use sub_skimmer::reddit::{CommentSort, TimeFilter};
use sub_skimmer::scraper::print_report;
use sub_skimmer::{CollectOptions, Scraper};
use tracing_subscriber::EnvFilter;

/// Sub-Skimmer: top posts and top comments from Reddit, as CSV
///
/// Sub-Skimmer logs in with a bot from a credentials file, fetches the top
/// posts of each subreddit along with their first comments, and writes the
/// rows to CSV files.
#[derive(Parser, Debug)]
#[command(name = "sub-skimmer")]
#[command(version = "1.0.0")]
#[command(about = "Top posts and top comments from Reddit, as CSV", long_about = None)]
struct Cli {
    /// Path to TOML credentials file
    #[arg(long, value_name = "FILE", default_value = "reddit.toml")]
    credentials: PathBuf,

    /// Bot section to use from the credentials file
    #[arg(long, default_value = "bot1")]
    bot: String,

    /// Subreddit to scrape (repeatable, scraped in order)
    #[arg(short, long = "subreddit", value_name = "NAME")]
    subreddits: Vec<String>,

    /// Number of top posts to fetch per subreddit (at most 1000 are served)
    #[arg(long, default_value_t = 100)]
    post_limit: usize,

    /// Number of comments to keep per post
    #[arg(long, default_value_t = 5)]
    comment_limit: usize,

    /// Base path for CSV output; nothing is written when omitted
    #[arg(short, long, value_name = "BASE")]
    output: Option<String>,

    /// Flush a batch file every N posts (0 disables)
    #[arg(long, value_name = "N", default_value_t = 1000)]
    save_period: usize,

    /// Time window of the top ranking (hour, day, week, month, year, all)
    #[arg(long, default_value = "all")]
    time_filter: TimeFilter,

    /// Comment ordering (confidence, top, new, controversial, old, qa)
    #[arg(long, default_value = "confidence")]
    comment_sort: CommentSort,

    /// Do not display a progress bar
    #[arg(long)]
    no_progress: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!(
        "Logging in as '{}' using {}",
        cli.bot,
        cli.credentials.display()
    );
    let scraper = match Scraper::new(
        &cli.credentials,
        &cli.bot,
        cli.subreddits.clone(),
        !cli.no_progress && !cli.quiet,
    )
    .await
    {
        Ok(scraper) => scraper.with_comment_sort(cli.comment_sort),
        Err(e) => {
            tracing::error!("Failed to log in: {}", e);
            return Err(e.into());
        }
    };

    let options = CollectOptions::new(cli.post_limit, cli.comment_limit)
        .file_path(cli.output.clone())
        .save_period(Some(cli.save_period))
        .time_filter(cli.time_filter);

    tracing::info!(
        "Subreddits: {}, post limit: {}, comment limit: {}",
        cli.subreddits.len(),
        cli.post_limit,
        cli.comment_limit
    );

    match scraper.collect_with_report(&options).await {
        Ok((table, report)) => {
            tracing::info!("Scrape completed with {} rows", table.len());
            if !cli.quiet {
                println!();
                print_report(&report);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sub_skimmer=info,warn"),
            1 => EnvFilter::new("sub_skimmer=debug,info"),
            2 => EnvFilter::new("sub_skimmer=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
