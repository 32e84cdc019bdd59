use http::Uri;
use octocrab::Octocrab;
use octocrab::service::middleware::retry::RetryConfig;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Response};

use crate::config::Config;
use crate::error::ConfigError;

pub mod gists;

const USER_AGENT_VALUE: &str = concat!("gist-search/", env!("CARGO_PKG_VERSION"));

/// Authenticated client for the upstream gist API.
///
/// Paged API calls go through octocrab, which parses the `Link` relations;
/// manifests and raw file bodies are plain GETs on the URLs upstream hands
/// out. Both carry the same bearer token, fixed at construction.
/// Must be built inside a tokio runtime.
#[derive(Clone, Debug)]
pub struct GithubClient {
    octocrab: Octocrab,
    http: Client,
}

impl GithubClient {
    pub fn new(token: &str, api_url: &str) -> Result<GithubClient, ConfigError> {
        let invalid_url = || ConfigError::InvalidValue {
            key: "GITHUB_API_URL",
            value: api_url.to_string(),
        };
        let base_uri: Uri = api_url.parse().map_err(|_| invalid_url())?;
        if base_uri.scheme().is_none() || base_uri.authority().is_none() {
            return Err(invalid_url());
        }

        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| ConfigError::InvalidToken)?;
        auth.set_sensitive(true);

        let octocrab = Octocrab::builder()
            .personal_token(token)
            .base_uri(base_uri)
            .map_err(|_| invalid_url())?
            .add_retry_config(RetryConfig::None)
            .build()?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let http = Client::builder().default_headers(headers).build()?;

        Ok(GithubClient { octocrab, http })
    }

    pub fn from_config(config: &Config) -> Result<GithubClient, ConfigError> {
        Self::new(&config.github_token, &config.github_api_url)
    }

    /// GET with the non-2xx statuses turned into errors.
    async fn get(&self, url: impl reqwest::IntoUrl) -> reqwest::Result<Response> {
        self.http.get(url).send().await?.error_for_status()
    }

    async fn get_text(&self, url: &str) -> reqwest::Result<String> {
        self.get(url).await?.text().await
    }
}
