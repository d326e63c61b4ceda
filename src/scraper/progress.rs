//! Per-subreddit progress bar

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const TEMPLATE: &str = "{spinner:.green} {msg} {pos}/{len} [{bar:.cyan/blue}] {percent:>3}%  \
                        elapsed: {elapsed_precise}  eta: {eta_precise}";

/// Progress over the posts of one subreddit
///
/// When progress display is off the bar is hidden, so callers never need to
/// branch on it.
pub struct PostProgress {
    pb: ProgressBar,
}

impl PostProgress {
    pub fn new(enabled: bool, total: usize, subreddit: &str) -> Self {
        if !enabled {
            return Self {
                pb: ProgressBar::hidden(),
            };
        }

        let pb = ProgressBar::new(total as u64);
        let style = ProgressStyle::with_template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ");
        pb.set_style(style);
        pb.set_message(format!("r/{}", subreddit));
        pb.enable_steady_tick(Duration::from_millis(100));
        Self { pb }
    }

    #[inline]
    pub fn inc(&self) {
        self.pb.inc(1);
    }

    pub fn position(&self) -> u64 {
        self.pb.position()
    }

    pub fn finish(&self) {
        self.pb.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_progress_still_counts() {
        let progress = PostProgress::new(false, 10, "nba");
        progress.inc();
        progress.inc();
        assert_eq!(progress.position(), 2);
        progress.finish();
    }
}
