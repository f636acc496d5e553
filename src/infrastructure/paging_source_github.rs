use std::sync::Arc;

use log::debug;

use crate::{
    GITHUB_STARTING_PAGE_INDEX, LoadParams, LoadResult, MAX_PAGE_SIZE, Page, PageKey,
    PagingSource, PagingState, RepositorySearchFetcher, SearchRequest,
};

/// The qualifier restricting the search to repository names and descriptions.
pub const IN_QUALIFIER: &str = " in:name,description";

/// GitHub search only serves the first 1000 results of a query.
pub const SEARCH_RESULTS_LIMIT: u64 = 1000;

/// A paging source serving the GitHub repository search for one query.
pub struct GithubPagingSource {
    fetcher: Arc<dyn RepositorySearchFetcher>,
    query: String,
    page_size: u32,
}

impl GithubPagingSource {
    /// Creates a new `GithubPagingSource` for the query, stepping keys by `page_size` items.
    pub fn new(fetcher: Arc<dyn RepositorySearchFetcher>, query: &str, page_size: u32) -> Self {
        Self {
            fetcher,
            query: query.to_string(),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    fn next_key(&self, current_key: PageKey, load_size: u32, total_items: usize) -> Option<PageKey> {
        if total_items == 0 {
            return None;
        }
        let step = (load_size / self.page_size).max(1);
        debug!("Current key: {current_key}, Addition: {step}");
        let next_key = current_key + step;
        let next_page_start = u64::from(next_key - 1) * u64::from(self.page_size);
        if next_page_start >= SEARCH_RESULTS_LIMIT {
            debug!("Page {next_key} would start past the {SEARCH_RESULTS_LIMIT} results window");
            return None;
        }

        Some(next_key)
    }
}

#[async_trait::async_trait]
impl PagingSource for GithubPagingSource {
    async fn load(&self, params: LoadParams) -> LoadResult {
        let current_key = params.key.unwrap_or(GITHUB_STARTING_PAGE_INDEX);
        let api_query = format!("{}{IN_QUALIFIER}", self.query);
        debug!("Current key: {current_key}, Load size: {}", params.load_size);

        let request = SearchRequest::new(&api_query, current_key, params.load_size);
        match self.fetcher.search(&request).await {
            Ok(response) => {
                let repositories = response.into_repositories();
                debug!("Response items size: {}", repositories.len());
                let next_key = self.next_key(current_key, params.load_size, repositories.len());
                let prev_key = if current_key == GITHUB_STARTING_PAGE_INDEX {
                    None
                } else {
                    Some(current_key - 1)
                };

                LoadResult::Page(Page::new(repositories, prev_key, next_key))
            }
            Err(e) => LoadResult::Error(e),
        }
    }

    fn refresh_key(&self, state: &PagingState) -> Option<PageKey> {
        let anchor_position = state.anchor_position?;
        let (page, offset) = state.closest_page_and_offset(anchor_position)?;
        if page.prev_key.is_none() && page.next_key.is_none() {
            return None;
        }

        // A page loaded with a larger size spans several keys of `page_size` items.
        let first_key = page
            .prev_key
            .map_or(GITHUB_STARTING_PAGE_INDEX, |prev_key| prev_key + 1);
        let page_offset = PageKey::try_from(offset / self.page_size as usize)
            .unwrap_or(PageKey::MAX);
        let key = first_key.saturating_add(page_offset);
        debug!("Anchor position: {anchor_position}, Refresh key: {key}");

        Some(match page.next_key {
            Some(next_key) => key.min(next_key - 1),
            None => key,
        })
    }
}
