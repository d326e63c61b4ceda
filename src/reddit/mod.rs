//! Reddit module for talking to the Reddit API
//!
//! This module contains everything between the scraper and the network:
//! - OAuth2 token exchange for a configured bot
//! - HTTP client construction
//! - Top post listings and per-post comment fetching
//! - Payload parsing into [`Post`] and [`Comment`]

mod auth;
mod client;
mod model;

pub use auth::{authenticate, AccessToken};
pub use client::{
    build_http_client, capped_post_limit, CommentSort, RedditApi, RedditClient, TimeFilter,
    TopListing, LISTING_CEILING,
};
pub use model::{parse_comment_page, parse_post_listing, Comment, Post, PostPage};
