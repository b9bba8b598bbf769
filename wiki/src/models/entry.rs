use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::constants::{ENTRY_SUFFIX, MAX_NAME_BYTES};

pub const MAX_TITLE_LEN: usize = 128;
/// `<title>.md` has to fit in one file name.
pub const MAX_TITLE_BYTES: usize = MAX_NAME_BYTES - ENTRY_SUFFIX.len();

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Page title, case-sensitive key
    pub title: String,
    /// Raw markdown
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntryList {
    /// Titles, sorted.
    pub entries: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Title or part of one
    pub q: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryRequest {
    pub title: String,
    /// Markdown body, may be empty.
    #[serde(default)]
    pub contents: String,
}

/// Titles double as file names and object keys, so anything that could
/// escape the entry directory or hide the file is refused.
pub fn validate_title(title: &str) -> Result<(), &'static str> {
    if title.trim().is_empty() {
        return Err("Title must not be empty.");
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err("Title must be at most 128 characters.");
    }
    if title.len() > MAX_TITLE_BYTES {
        return Err("Title is too long.");
    }
    if title.starts_with('.') {
        return Err("Title must not start with a dot.");
    }
    if title
        .chars()
        .any(|c| c == '/' || c == '\\' || c.is_control())
    {
        return Err("Title must not contain slashes or control characters.");
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The query names an entry.
    Exact(String),
    /// Titles containing the query, ignoring case.
    Matches(Vec<String>),
    NoMatches,
}

pub fn search(query: &str, titles: &[String]) -> SearchOutcome {
    if let Some(title) = titles.iter().find(|t| t.as_str() == query) {
        return SearchOutcome::Exact(title.clone());
    }

    let needle = query.to_lowercase();
    let matches: Vec<String> = titles
        .iter()
        .filter(|t| t.to_lowercase().contains(&needle))
        .cloned()
        .collect();

    if matches.is_empty() {
        SearchOutcome::NoMatches
    } else {
        SearchOutcome::Matches(matches)
    }
}
