//! Table module for harvested rows and their CSV form
//!
//! This module handles:
//! - The per-post row type and its comment slots
//! - Tables with a fixed column schema derived from the comment limit
//! - Row-wise concatenation and subreddit tagging
//! - CSV serialization and output file naming

mod csv_output;
mod record;

pub use csv_output::{write_csv, write_csv_to, OutputPaths};
pub use record::{CommentSlot, PostRecord};

/// Header of the title column
pub const TITLE_COLUMN: &str = "Title";

/// Header of the subreddit column
pub const SUBREDDIT_COLUMN: &str = "Subreddit";

/// Header of the body column for 1-based comment slot `slot`
pub fn comment_column(slot: usize) -> String {
    format!("Top_comment_{}", slot)
}

/// Header of the score column for 1-based comment slot `slot`
pub fn score_column(slot: usize) -> String {
    format!("Top_comment_{}-score", slot)
}

/// An ordered collection of rows sharing one column schema
///
/// The schema is fixed when the table is created: a title column, a body
/// and score column per comment slot, and a subreddit column once the table
/// has been tagged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    comment_limit: usize,
    rows: Vec<PostRecord>,
    tagged: bool,
}

impl Table {
    /// Creates an empty, untagged table with `comment_limit` comment slots
    pub fn new(comment_limit: usize) -> Self {
        Self {
            comment_limit,
            rows: Vec::new(),
            tagged: false,
        }
    }

    /// Concatenates tables row-wise, preserving order
    ///
    /// The result carries the subreddit column only if every input does.
    pub fn concat(comment_limit: usize, tables: impl IntoIterator<Item = Table>) -> Self {
        let mut result = Self::new(comment_limit);
        let mut tagged = true;

        for table in tables {
            tagged &= table.tagged;
            for row in table.rows {
                result.push(row);
            }
        }

        result.tagged = tagged;
        result
    }

    /// Appends a row, dropping comments beyond the table's slot count
    pub fn push(&mut self, mut record: PostRecord) {
        record.comments.truncate(self.comment_limit);
        self.rows.push(record);
    }

    /// Marks every row as coming from `subreddit` and adds the column
    pub fn tag_subreddit(&mut self, subreddit: &str) {
        for row in &mut self.rows {
            row.subreddit = Some(subreddit.to_string());
        }
        self.tagged = true;
    }

    pub fn is_tagged(&self) -> bool {
        self.tagged
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[PostRecord] {
        &self.rows
    }

    /// Column headers, in output order
    pub fn headers(&self) -> Vec<String> {
        let mut headers = Vec::with_capacity(2 + 2 * self.comment_limit);
        headers.push(TITLE_COLUMN.to_string());
        for slot in 1..=self.comment_limit {
            headers.push(comment_column(slot));
            headers.push(score_column(slot));
        }
        if self.tagged {
            headers.push(SUBREDDIT_COLUMN.to_string());
        }
        headers
    }

    /// Flattens a row into cells matching [`Table::headers`]
    ///
    /// Empty slots become empty cells.
    pub fn cells(&self, record: &PostRecord) -> Vec<String> {
        let mut cells = Vec::with_capacity(2 + 2 * self.comment_limit);
        cells.push(record.title.clone());
        for slot in 1..=self.comment_limit {
            match record.comment(slot) {
                Some(comment) => {
                    cells.push(comment.body.clone());
                    cells.push(comment.score.to_string());
                }
                None => {
                    cells.push(String::new());
                    cells.push(String::new());
                }
            }
        }
        if self.tagged {
            cells.push(record.subreddit.clone().unwrap_or_default());
        }
        cells
    }
}
