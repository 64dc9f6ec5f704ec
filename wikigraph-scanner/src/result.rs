use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const NO_INTRODUCTION: &str = "No introduction available";
pub const NO_TEXT: &str = "No text available";

/// Path marker that precedes the article slug in a page URL
const ARTICLE_PATH_MARKER: &str = "/wiki/";

/// One successfully processed page. Created once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    pub url: String,
    pub title: String,
    pub introduction: String,
    pub key_concepts: String,
    pub subject: String,
    pub depth: usize,
    pub crawled_at: DateTime<Utc>,
    pub is_retry: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_title: Option<String>,
}

impl PageRecord {
    pub fn new(entry: &FrontierEntry, title: String, introduction: String, key_concepts: String) -> Self {
        Self {
            subject: subject_from_url(&entry.url),
            url: entry.url.clone(),
            title,
            introduction,
            key_concepts,
            depth: entry.depth,
            crawled_at: Utc::now(),
            is_retry: false,
            source_url: entry.source_url.clone(),
            source_title: entry.source_title.clone(),
        }
    }

    /// Record for a seed page recovered through the reduced retry request.
    /// The article text is cut down to a `preview_len` character preview.
    pub fn from_retry(entry: &FrontierEntry, title: String, text: &str, preview_len: usize) -> Self {
        let mut record = Self::new(entry, title, preview(text, preview_len), String::new());
        record.is_retry = true;
        record
    }
}

/// Transient queue item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: String,
    pub depth: usize,
    pub source_title: Option<String>,
    pub source_url: Option<String>,
}

impl FrontierEntry {
    pub fn seed(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            depth: 0,
            source_title: None,
            source_url: None,
        }
    }
}

/// An outbound link as reported by the extraction service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkCandidate {
    pub url: String,
    pub anchor_text: String,
}

impl LinkCandidate {
    pub fn new(url: impl Into<String>, anchor_text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            anchor_text: anchor_text.into(),
        }
    }
}

/// Human readable subject taken from the article slug, e.g.
/// `https://en.wikipedia.org/wiki/Machine_learning` -> `Machine learning`.
pub fn subject_from_url(url: &str) -> String {
    let slug = match url.split_once(ARTICLE_PATH_MARKER) {
        Some((_, rest)) => rest.split(ARTICLE_PATH_MARKER).next().unwrap_or(rest),
        None => url.trim_end_matches('/').rsplit('/').next().unwrap_or(url),
    };
    slug.replace('_', " ")
}

/// First `max_chars` characters of `text`, with `...` appended when cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}
