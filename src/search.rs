use futures::stream::{self, BoxStream, Stream, StreamExt, TryStreamExt};
use regex::Regex;
use std::pin::pin;
use tracing::{error, info};

use crate::data_models::{GistFileContent, GistSummary, MatchRecord, SearchResult};
use crate::error::{FetchError, SearchError, ValidationError};
use crate::github::GithubClient;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PER_PAGE: i64 = 10;
pub const MAX_PER_PAGE: i64 = 100;

/// A search request that passed validation. Building one never touches the network.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub username: String,
    pub pattern: Regex,
    pub page: u32,
    pub per_page: u32,
}

impl SearchQuery {
    pub fn new(
        username: Option<String>,
        pattern: Option<String>,
        page: Option<i64>,
        per_page: Option<i64>,
    ) -> Result<SearchQuery, ValidationError> {
        let username = username
            .filter(|u| !u.is_empty())
            .ok_or(ValidationError::MissingUsername)?;
        let pattern = pattern
            .filter(|p| !p.is_empty())
            .ok_or(ValidationError::MissingPattern)?;
        let pattern = Regex::new(&pattern).map_err(ValidationError::InvalidPattern)?;

        let page = page.unwrap_or(DEFAULT_PAGE);
        if page < 1 {
            return Err(ValidationError::InvalidPage(page));
        }
        let page = u32::try_from(page).map_err(|_| ValidationError::PageTooLarge(page))?;

        let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE);
        if !(1..=MAX_PER_PAGE).contains(&per_page) {
            return Err(ValidationError::InvalidPerPage(per_page));
        }

        Ok(SearchQuery {
            username,
            pattern,
            page,
            per_page: per_page as u32,
        })
    }

    fn result(&self, matches: Vec<MatchRecord>, more_pages: bool) -> SearchResult {
        SearchResult::new(
            self.username.clone(),
            self.pattern.as_str().to_string(),
            matches,
            self.page,
            more_pages,
        )
    }
}

/// Lists one page of a user's gists and greps every file in them.
#[derive(Clone)]
pub struct GistSearcher {
    client: GithubClient,
    concurrency: usize,
}

impl GistSearcher {
    /// `concurrency` is how many gists are fetched at once; 1 fetches strictly in sequence.
    pub fn new(client: GithubClient, concurrency: usize) -> GistSearcher {
        GistSearcher {
            client,
            concurrency: concurrency.max(1),
        }
    }

    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResult, SearchError> {
        info!(
            username = %query.username,
            pattern = %query.pattern,
            page = query.page,
            per_page = query.per_page,
            "searching gists"
        );

        let listing = self
            .client
            .list_gists(&query.username, query.page, query.per_page)
            .await
            .inspect_err(|e| error!("listing failed for {}: {:#}", query.username, e))?;
        let gist_count = listing.gists.len();

        let mut matches = Vec::new();
        let mut per_gist = pin!(self.gist_matches(listing.gists, query.pattern.clone()));
        while let Some(found) = per_gist
            .try_next()
            .await
            .inspect_err(|e| error!("fetch failed for {}: {:#}", query.username, e))?
        {
            matches.extend(found);
        }

        info!(
            gists = gist_count,
            matches = matches.len(),
            more_pages = listing.more_pages,
            "search finished"
        );
        Ok(query.result(matches, listing.more_pages))
    }

    /// Same search, but yields one single-match result per hit as soon as its gist is read.
    ///
    /// The listing happens before this returns, so a listing failure is an
    /// `Err` here. Fetch failures afterwards arrive as the stream's last item.
    /// When nothing matches, the stream holds exactly one "no matches" result.
    /// Nothing is fetched until the stream is polled, and dropping it drops
    /// any fetches in flight.
    pub async fn search_stream(
        &self,
        query: SearchQuery,
    ) -> Result<BoxStream<'static, Result<SearchResult, SearchError>>, SearchError> {
        info!(
            username = %query.username,
            pattern = %query.pattern,
            page = query.page,
            per_page = query.per_page,
            "streaming gist search"
        );

        let listing = self
            .client
            .list_gists(&query.username, query.page, query.per_page)
            .await
            .inspect_err(|e| error!("listing failed for {}: {:#}", query.username, e))?;
        let more_pages = listing.more_pages;
        let per_gist = self
            .gist_matches(listing.gists, query.pattern.clone())
            .boxed();

        // state: (pending fetches, anything matched yet, query); None once finished
        let results = stream::unfold(Some((per_gist, false, query)), move |state| async move {
            let Some((mut per_gist, found_any, query)) = state else {
                return None;
            };
            match per_gist.try_next().await {
                Ok(Some(found)) => {
                    let found_any = found_any || !found.is_empty();
                    let batch: Vec<Result<SearchResult, SearchError>> = found
                        .into_iter()
                        .map(|record| Ok(query.result(vec![record], more_pages)))
                        .collect();
                    Some((batch, Some((per_gist, found_any, query))))
                }
                Ok(None) if found_any => None,
                Ok(None) => Some((vec![Ok(query.result(Vec::new(), more_pages))], None)),
                Err(e) => {
                    error!("fetch failed for {}: {:#}", query.username, e);
                    Some((vec![Err(SearchError::from(e))], None))
                }
            }
        });

        Ok(results.flat_map(stream::iter).boxed())
    }

    /// Per-gist match lists in gist order, at most `concurrency` fetches in flight.
    fn gist_matches(
        &self,
        gists: Vec<GistSummary>,
        pattern: Regex,
    ) -> impl Stream<Item = Result<Vec<MatchRecord>, FetchError>> + Send + use<> {
        let client = self.client.clone();
        stream::iter(gists)
            .map(move |gist| {
                let client = client.clone();
                let pattern = pattern.clone();
                async move {
                    let files = client.fetch_file_contents(&gist.url).await?;
                    Ok::<_, FetchError>(matching_files(&gist, &files, &pattern))
                }
            })
            .buffered(self.concurrency)
    }
}

/// Files whose content contains a match anywhere, in manifest order.
pub fn matching_files(
    gist: &GistSummary,
    files: &[GistFileContent],
    pattern: &Regex,
) -> Vec<MatchRecord> {
    files
        .iter()
        .filter(|file| pattern.is_match(&file.content))
        .map(|file| MatchRecord::new(gist, &file.filename))
        .collect()
}
