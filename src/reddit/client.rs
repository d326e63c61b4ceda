//! Authenticated client for the Reddit listing endpoints
//!
//! This module handles every request the scraper makes after logging in:
//! - Building HTTP clients with the bot's user agent
//! - Walking `/r/{subreddit}/top` page by page via the `after` cursor
//!   ([`TopListing`])
//! - Fetching the top-level comments of a post
//! - Classifying failures into `SkimmerError` variants

use crate::config::BotCredentials;
use crate::reddit::auth::{authenticate, AccessToken};
use crate::reddit::model::{parse_comment_page, parse_post_listing, Comment, Post, PostPage};
use crate::SkimmerError;
use reqwest::Client;
use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Reddit never serves more than this many entries of a listing
pub const LISTING_CEILING: usize = 1000;

/// Largest page Reddit returns for a single listing request
const PAGE_SIZE: usize = 100;

/// Clamps a requested post count to what a listing can actually return
///
/// Larger requests are not an error; they simply yield at most
/// [`LISTING_CEILING`] posts.
pub fn capped_post_limit(limit: usize) -> usize {
    if limit > LISTING_CEILING {
        tracing::debug!(
            "Post limit {} exceeds listing ceiling, capping at {}",
            limit,
            LISTING_CEILING
        );
        LISTING_CEILING
    } else {
        limit
    }
}

/// Time window of the "top" ranking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeFilter {
    Hour,
    Day,
    Week,
    Month,
    Year,
    #[default]
    All,
}

impl TimeFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFilter::Hour => "hour",
            TimeFilter::Day => "day",
            TimeFilter::Week => "week",
            TimeFilter::Month => "month",
            TimeFilter::Year => "year",
            TimeFilter::All => "all",
        }
    }
}

impl FromStr for TimeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hour" => Ok(TimeFilter::Hour),
            "day" => Ok(TimeFilter::Day),
            "week" => Ok(TimeFilter::Week),
            "month" => Ok(TimeFilter::Month),
            "year" => Ok(TimeFilter::Year),
            "all" => Ok(TimeFilter::All),
            other => Err(format!("unknown time filter '{}'", other)),
        }
    }
}

impl fmt::Display for TimeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordering of a post's comments
///
/// `Confidence` is what Reddit calls "best" and is the API default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommentSort {
    #[default]
    Confidence,
    Top,
    New,
    Controversial,
    Old,
    Qa,
}

impl CommentSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentSort::Confidence => "confidence",
            CommentSort::Top => "top",
            CommentSort::New => "new",
            CommentSort::Controversial => "controversial",
            CommentSort::Old => "old",
            CommentSort::Qa => "qa",
        }
    }
}

impl FromStr for CommentSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "confidence" | "best" => Ok(CommentSort::Confidence),
            "top" => Ok(CommentSort::Top),
            "new" => Ok(CommentSort::New),
            "controversial" => Ok(CommentSort::Controversial),
            "old" => Ok(CommentSort::Old),
            "qa" => Ok(CommentSort::Qa),
            other => Err(format!("unknown comment sort '{}'", other)),
        }
    }
}

impl fmt::Display for CommentSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of posts and comments for the scraper
///
/// [`RedditClient`] is the production implementation; tests substitute
/// canned data.
pub trait RedditApi {
    /// Returns one page of the top posts of `subreddit`, in ranking order
    ///
    /// `limit` is at most one page worth of posts; `after` is the cursor
    /// returned with the previous page, or `None` for the first page.
    fn top_posts_page(
        &self,
        subreddit: &str,
        limit: usize,
        after: Option<&str>,
        time_filter: TimeFilter,
    ) -> impl Future<Output = Result<PostPage, SkimmerError>>;

    /// Returns up to `limit` top-level comments of `post`, in comment order
    fn top_comments(
        &self,
        post: &Post,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Comment>, SkimmerError>>;
}

/// Cursor over the top listing of one subreddit
///
/// Each call to [`TopListing::next_page`] issues a single listing request,
/// so callers can process a page before asking for the next one. The total
/// is capped at [`LISTING_CEILING`].
#[derive(Debug, Clone)]
pub struct TopListing<'a> {
    subreddit: &'a str,
    time_filter: TimeFilter,
    remaining: usize,
    after: Option<String>,
    exhausted: bool,
}

impl<'a> TopListing<'a> {
    pub fn new(subreddit: &'a str, limit: usize, time_filter: TimeFilter) -> Self {
        Self {
            subreddit,
            time_filter,
            remaining: capped_post_limit(limit),
            after: None,
            exhausted: false,
        }
    }

    /// Fetches the next page of posts
    ///
    /// # Returns
    ///
    /// * `Ok(Some(posts))` - The next non-empty page
    /// * `Ok(None)` - The limit was reached or the listing ran out
    /// * `Err(SkimmerError)` - The request failed; the cursor is left as is
    pub async fn next_page<A: RedditApi>(
        &mut self,
        api: &A,
    ) -> Result<Option<Vec<Post>>, SkimmerError> {
        if self.exhausted || self.remaining == 0 {
            return Ok(None);
        }

        let page = api
            .top_posts_page(
                self.subreddit,
                self.remaining.min(PAGE_SIZE),
                self.after.as_deref(),
                self.time_filter,
            )
            .await?;

        let received = page.posts.len();
        let mut posts = page.posts;
        posts.truncate(self.remaining);
        self.remaining -= posts.len();

        match page.after {
            Some(cursor) if received > 0 => self.after = Some(cursor),
            _ => self.exhausted = true,
        }

        if posts.is_empty() {
            self.exhausted = true;
            return Ok(None);
        }

        tracing::debug!(
            "Received {} posts from r/{}, {} left to fetch",
            posts.len(),
            self.subreddit,
            self.remaining
        );
        Ok(Some(posts))
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The bot's user agent string
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Client for the authenticated API host
#[derive(Debug, Clone)]
pub struct RedditClient {
    http: Client,
    oauth_url: String,
    token: AccessToken,
    comment_sort: CommentSort,
}

impl RedditClient {
    /// Creates a client from an existing HTTP client and token
    pub fn new(http: Client, oauth_url: &str, token: AccessToken) -> Self {
        Self {
            http,
            oauth_url: oauth_url.trim_end_matches('/').to_string(),
            token,
            comment_sort: CommentSort::default(),
        }
    }

    /// Logs in with `creds` and returns a ready client
    ///
    /// # Returns
    ///
    /// * `Ok(RedditClient)` - Authenticated client
    /// * `Err(SkimmerError::Authentication)` - The token exchange failed
    pub async fn connect(creds: &BotCredentials) -> Result<Self, SkimmerError> {
        let http = build_http_client(&creds.user_agent)?;
        let token = authenticate(&http, creds).await?;
        tracing::info!("Authenticated against {}", creds.reddit_url);
        Ok(Self::new(http, &creds.oauth_url, token))
    }

    /// Sets the ordering used when picking a post's first comments
    pub fn with_comment_sort(mut self, comment_sort: CommentSort) -> Self {
        self.comment_sort = comment_sort;
        self
    }

    /// Appends `segments` to the API host, percent-encoding each one
    fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url, SkimmerError> {
        let mut url = Url::parse(&self.oauth_url)?;
        url.path_segments_mut()
            .map_err(|_| ::url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// Sends an authenticated GET and returns the raw body
    async fn get(&self, url: &Url) -> Result<String, SkimmerError> {
        tracing::debug!("GET {}", url);

        let response = self
            .http
            .get(url.clone())
            .bearer_auth(self.token.value())
            .send()
            .await
            .map_err(|source| SkimmerError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SkimmerError::Api {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| SkimmerError::Http {
            url: url.to_string(),
            source,
        })
    }
}

fn response_error(url: &Url, error: serde_json::Error) -> SkimmerError {
    SkimmerError::Response {
        url: url.to_string(),
        message: error.to_string(),
    }
}

impl RedditApi for RedditClient {
    async fn top_posts_page(
        &self,
        subreddit: &str,
        limit: usize,
        after: Option<&str>,
        time_filter: TimeFilter,
    ) -> Result<PostPage, SkimmerError> {
        let mut query = vec![
            ("t", time_filter.as_str().to_string()),
            ("limit", limit.to_string()),
            ("raw_json", "1".to_string()),
        ];
        if let Some(cursor) = after {
            query.push(("after", cursor.to_string()));
        }

        let url = self.endpoint(&["r", subreddit, "top"], &query)?;
        let body = self.get(&url).await?;
        parse_post_listing(&body).map_err(|e| response_error(&url, e))
    }

    async fn top_comments(&self, post: &Post, limit: usize) -> Result<Vec<Comment>, SkimmerError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let query = vec![
            ("limit", limit.to_string()),
            ("depth", "1".to_string()),
            ("sort", self.comment_sort.as_str().to_string()),
            ("raw_json", "1".to_string()),
        ];
        let url = self.endpoint(&["comments", &post.id], &query)?;
        let body = self.get(&url).await?;

        let mut comments = parse_comment_page(&body).map_err(|e| response_error(&url, e))?;
        comments.truncate(limit);
        Ok(comments)
    }
}
