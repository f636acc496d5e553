use crate::{SearchRequest, SearchResponse, StdResult};

/// A trait for searching repositories on the remote API.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RepositorySearchFetcher: Sync + Send {
    /// Fetches one page of repositories matching the request.
    async fn search(&self, request: &SearchRequest) -> StdResult<SearchResponse>;
}
