use crate::reddit::{Comment, Post};

/// A comment kept in one of a row's positional slots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentSlot {
    pub body: String,
    pub score: i64,
}

impl From<&Comment> for CommentSlot {
    fn from(comment: &Comment) -> Self {
        Self {
            body: comment.body.clone(),
            score: comment.score,
        }
    }
}

/// One row of a harvest: a post and its first comments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRecord {
    /// Post title
    pub title: String,

    /// Leading comments, in comment order
    pub comments: Vec<CommentSlot>,

    /// Subreddit the post came from, once the row has been tagged
    pub subreddit: Option<String>,
}

impl PostRecord {
    pub fn new(title: impl Into<String>, comments: Vec<CommentSlot>) -> Self {
        Self {
            title: title.into(),
            comments,
            subreddit: None,
        }
    }

    /// Builds a row from a fetched post, keeping at most `comment_limit`
    /// of its comments
    pub fn from_post(post: &Post, comments: &[Comment], comment_limit: usize) -> Self {
        let comments = comments
            .iter()
            .take(comment_limit)
            .map(CommentSlot::from)
            .collect();
        Self::new(post.title.clone(), comments)
    }

    /// The comment in 1-based slot `slot`, if the post had one there
    pub fn comment(&self, slot: usize) -> Option<&CommentSlot> {
        slot.checked_sub(1).and_then(|i| self.comments.get(i))
    }

    /// Number of slots holding a comment
    pub fn filled_slots(&self) -> usize {
        self.comments.len()
    }
}
