use super::{FetcherRateLimit, Repository};

/// A page of repositories returned by the search API.
#[derive(Debug, PartialEq, Eq)]
pub struct SearchResponse {
    /// Retrieved repositories
    pub(crate) repositories: Vec<Repository>,

    /// The total number of repositories matching the query
    pub(crate) total_count: u64,

    /// Whether the search timed out before collecting every match
    pub(crate) incomplete_results: bool,

    /// The API rate limit information, when the server reported it
    pub(crate) rate_limit: Option<FetcherRateLimit>,
}

impl SearchResponse {
    /// Creates a new `SearchResponse` instance.
    pub fn new(
        repositories: Vec<Repository>,
        total_count: u64,
        incomplete_results: bool,
        rate_limit: Option<FetcherRateLimit>,
    ) -> Self {
        Self {
            repositories,
            total_count,
            incomplete_results,
            rate_limit,
        }
    }

    /// Retrieves the list of repositories.
    pub fn repositories(&self) -> &[Repository] {
        &self.repositories
    }

    /// Consumes the response and returns its repositories.
    pub fn into_repositories(self) -> Vec<Repository> {
        self.repositories
    }

    /// Retrieves the total number of matches.
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Whether the result set is incomplete.
    pub fn incomplete_results(&self) -> bool {
        self.incomplete_results
    }

    /// Retrieves the API rate limit information.
    pub fn rate_limit(&self) -> Option<&FetcherRateLimit> {
        self.rate_limit.as_ref()
    }
}
