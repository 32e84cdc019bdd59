use thiserror::Error;

/// Caller input that cannot be searched. Always the client's fault.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid JSON data: {0}")]
    InvalidJson(String),

    #[error("Username is required")]
    MissingUsername,

    #[error("Pattern is required")]
    MissingPattern,

    #[error("Invalid regular expression pattern")]
    InvalidPattern(#[source] regex::Error),

    #[error("Page must be at least 1")]
    InvalidPage(i64),

    #[error("Page must be at most {}", u32::MAX)]
    PageTooLarge(i64),

    #[error("Per page must be between 1 and 100")]
    InvalidPerPage(i64),
}

/// The upstream listing call failed, in transport or with a non-2xx status.
#[derive(Debug, Error)]
#[error("Error fetching gists: {0}")]
pub struct ListingError(#[from] pub octocrab::Error);

/// A gist manifest or one of its files could not be retrieved.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Error fetching gist {url}: {source}")]
    Manifest {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Error fetching gist file {filename}: {source}")]
    File {
        filename: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Error fetching gist file {filename}: no raw content URL in manifest")]
    MissingRawUrl { filename: String },
}

impl FetchError {
    /// The file that failed, when the failure happened past the manifest.
    pub fn filename(&self) -> Option<&str> {
        match self {
            FetchError::Manifest { .. } => None,
            FetchError::File { filename, .. } | FetchError::MissingRawUrl { filename } => {
                Some(filename)
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Listing(#[from] ListingError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl SearchError {
    /// Whether the failure was caused by the caller rather than upstream.
    pub fn is_client_error(&self) -> bool {
        matches!(self, SearchError::Validation(_))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVariable(&'static str),

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("GITHUB_TOKEN contains characters not allowed in an HTTP header")]
    InvalidToken,

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Failed to build GitHub client: {0}")]
    GithubClient(#[from] octocrab::Error),
}
