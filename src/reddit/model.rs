//! Reddit API payloads
//!
//! Reddit wraps everything it returns in "things": a `kind` tag (`t1` for
//! comments, `t3` for posts, `more` for collapsed comment placeholders) and a
//! `data` object. Lists of things come back as a `Listing` carrying an
//! `after` cursor for the next page.

use serde::Deserialize;
use serde_json::Value;

const KIND_COMMENT: &str = "t1";
const KIND_POST: &str = "t3";
const KIND_MORE: &str = "more";

/// A top-level submission in a subreddit
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Post {
    /// Base-36 post ID, without the `t3_` prefix
    pub id: String,

    /// Post title
    pub title: String,

    /// Number of comments Reddit reports for the post
    #[serde(default)]
    pub num_comments: u64,
}

/// A reply to a post
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Comment {
    /// Comment text, as markdown source
    pub body: String,

    /// Net score of the comment
    pub score: i64,
}

/// One page of a post listing
#[derive(Debug, Clone, Default)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub after: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Thing {
    kind: String,
    data: Value,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    after: Option<String>,
    #[serde(default)]
    children: Vec<Thing>,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

/// Parses a `/r/{subreddit}/top` response
pub fn parse_post_listing(body: &str) -> serde_json::Result<PostPage> {
    let listing: Listing = serde_json::from_str(body)?;

    let mut posts = Vec::with_capacity(listing.data.children.len());
    for thing in listing.data.children {
        if thing.kind != KIND_POST {
            tracing::warn!("Skipping unexpected '{}' entry in post listing", thing.kind);
            continue;
        }
        posts.push(serde_json::from_value(thing.data)?);
    }

    Ok(PostPage {
        posts,
        after: listing.data.after.filter(|cursor| !cursor.is_empty()),
    })
}

/// Parses a `/comments/{id}` response into the post's top-level comments
///
/// The response is a two-element array: the post itself, then the comment
/// listing. Collapsed "more comments" placeholders are dropped.
pub fn parse_comment_page(body: &str) -> serde_json::Result<Vec<Comment>> {
    let (_post, comments): (Value, Listing) = serde_json::from_str(body)?;

    let mut parsed = Vec::with_capacity(comments.data.children.len());
    for thing in comments.data.children {
        match thing.kind.as_str() {
            KIND_COMMENT => parsed.push(serde_json::from_value(thing.data)?),
            KIND_MORE => tracing::debug!("Skipping 'more comments' placeholder"),
            other => tracing::warn!("Skipping unexpected '{}' entry in comment listing", other),
        }
    }

    Ok(parsed)
}
