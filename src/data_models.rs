use serde::{Deserialize, Serialize};

/// One entry of the upstream "list gists for user" response.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GistSummary {
    pub id: String,
    /// API URL of the gist document, carrying the file manifest.
    pub url: String,
    pub html_url: String,
}

/// A single page of a user's gists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GistListing {
    pub gists: Vec<GistSummary>,
    pub more_pages: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GistFileContent {
    pub filename: String,
    pub content: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub gist_id: String,
    pub filename: String,
    pub url: String,
}

impl MatchRecord {
    pub fn new(gist: &GistSummary, filename: &str) -> MatchRecord {
        MatchRecord {
            gist_id: gist.id.clone(),
            filename: filename.to_string(),
            url: gist.html_url.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    #[serde(rename = "success")]
    Success,
    #[serde(rename = "no matches")]
    NoMatches,
    #[serde(rename = "error")]
    Error,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub status: SearchStatus,
    pub username: String,
    pub pattern: String,
    pub matches: Vec<MatchRecord>,
    pub page: u32,
    pub more_pages: bool,
}

impl SearchResult {
    /// Status is derived from the matches, never set independently.
    pub fn new(
        username: String,
        pattern: String,
        matches: Vec<MatchRecord>,
        page: u32,
        more_pages: bool,
    ) -> SearchResult {
        let status = if matches.is_empty() {
            SearchStatus::NoMatches
        } else {
            SearchStatus::Success
        };
        SearchResult {
            status,
            username,
            pattern,
            matches,
            page,
            more_pages,
        }
    }
}
