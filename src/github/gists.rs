use octocrab::Page;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;
use url::form_urlencoded::byte_serialize;

use super::GithubClient;
use crate::data_models::{GistFileContent, GistListing, GistSummary};
use crate::error::{FetchError, ListingError};

/// The parts of a gist document we read. `files` keeps the upstream key order.
#[derive(Debug, Deserialize)]
struct GistManifest {
    files: Map<String, Value>,
}

impl GithubClient {
    /// Fetches one page of `username`'s gists. Inputs are trusted to be validated.
    pub async fn list_gists(
        &self,
        username: &str,
        page: u32,
        per_page: u32,
    ) -> Result<GistListing, ListingError> {
        let route = user_gists_route(username);
        debug!(%route, page, per_page, "listing gists");

        let page_str = page.to_string();
        let per_page_str = per_page.to_string();
        let query_params = [
            ("page", page_str.as_str()),
            ("per_page", per_page_str.as_str()),
        ];

        let page_result: Page<GistSummary> =
            self.octocrab.get(&route, Some(&query_params)).await?;

        // More pages exist only if upstream advertised a `next` link.
        let more_pages = page_result.next.is_some();
        let gists = page_result.items;

        debug!(count = gists.len(), more_pages, "listed gists");
        Ok(GistListing { gists, more_pages })
    }

    /// Fetches the manifest at `gist_url`, then the raw text of every file in it.
    /// All-or-nothing: the first failing file fails the whole gist.
    pub async fn fetch_file_contents(
        &self,
        gist_url: &str,
    ) -> Result<Vec<GistFileContent>, FetchError> {
        debug!(gist_url, "fetching gist manifest");
        let manifest = match self.get(gist_url).await {
            Ok(response) => response.json::<GistManifest>().await,
            Err(e) => Err(e),
        }
        .map_err(|source| FetchError::Manifest {
            url: gist_url.to_string(),
            source,
        })?;

        let mut contents = Vec::with_capacity(manifest.files.len());
        for (filename, entry) in manifest.files {
            let Some(raw_url) = entry.get("raw_url").and_then(Value::as_str) else {
                return Err(FetchError::MissingRawUrl { filename });
            };

            debug!(%filename, raw_url, "fetching gist file");
            let content = match self.get_text(raw_url).await {
                Ok(content) => content,
                Err(source) => return Err(FetchError::File { filename, source }),
            };
            contents.push(GistFileContent { filename, content });
        }

        Ok(contents)
    }
}

/// API route for a user's gists, relative to the client's base URI.
fn user_gists_route(username: &str) -> String {
    let username: String = byte_serialize(username.as_bytes()).collect();
    format!("/users/{username}/gists")
}
