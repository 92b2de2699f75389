use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Store-assigned identifier of a book.
pub type BookId = i64;

static ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9 ]+$").expect("alphanumeric pattern is valid"));

/// Persisted form of a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Unset until the store assigns it on insert
    pub id: Option<BookId>,
    pub author: Option<String>,
    pub title: Option<String>,
    pub published: bool,
}

impl Book {
    pub fn new(author: impl Into<String>, title: impl Into<String>, published: bool) -> Self {
        Self {
            id: None,
            author: Some(author.into()),
            title: Some(title.into()),
            published,
        }
    }
}

/// Book as exchanged with clients; identifiers travel separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookView {
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    pub published: bool,
}

impl BookView {
    pub fn new(author: impl Into<String>, title: impl Into<String>, published: bool) -> Self {
        Self {
            author: Some(author.into()),
            title: Some(title.into()),
            published,
        }
    }

    /// Check the character-class rules on `author` and `title`.
    ///
    /// Absent fields pass. On failure returns one `{field, error}` detail per
    /// offending field.
    pub fn validate(&self) -> Result<(), Vec<serde_json::Value>> {
        let mut details = Vec::new();

        if !matches_alphanumeric(self.author.as_deref()) {
            details.push(json!({
                "field": "author",
                "error": "Author must contain alphanumeric characters only"
            }));
        }
        if !matches_alphanumeric(self.title.as_deref()) {
            details.push(json!({
                "field": "title",
                "error": "Title must contain alphanumeric characters only"
            }));
        }

        if details.is_empty() {
            Ok(())
        } else {
            Err(details)
        }
    }
}

fn matches_alphanumeric(value: Option<&str>) -> bool {
    value.map_or(true, |v| ALPHANUMERIC.is_match(v))
}

/// Optional filters for a book search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookSearch {
    pub author: Option<String>,
    pub published: Option<bool>,
}

impl BookSearch {
    pub fn by_author(author: impl Into<String>) -> Self {
        Self {
            author: Some(author.into()),
            published: None,
        }
    }

    pub fn by_published(published: bool) -> Self {
        Self {
            author: None,
            published: Some(published),
        }
    }

    pub fn by_author_and_published(author: impl Into<String>, published: bool) -> Self {
        Self {
            author: Some(author.into()),
            published: Some(published),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.author.is_none() && self.published.is_none()
    }
}

impl std::fmt::Display for BookSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.author, self.published) {
            (Some(author), Some(published)) => {
                write!(f, "author = {author} and published = {published}")
            }
            (Some(author), None) => write!(f, "author = {author}"),
            (None, Some(published)) => write!(f, "published = {published}"),
            (None, None) => write!(f, "no filter"),
        }
    }
}

/// Response body echoing a book identifier, `{"bookId": 1}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookIdResponse {
    pub book_id: BookId,
}
