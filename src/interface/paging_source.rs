use crate::{LoadParams, LoadResult, PageKey, PagingState};

/// A trait for loading keyed pages of repositories.
///
/// A source is bound to one query and is discarded when the pager refreshes.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PagingSource: Sync + Send {
    /// Loads the page described by the params. Failures are reported in the result.
    async fn load(&self, params: LoadParams) -> LoadResult;

    /// Computes the key to resume from when the pager refreshes with the given state.
    fn refresh_key(&self, state: &PagingState) -> Option<PageKey>;
}
