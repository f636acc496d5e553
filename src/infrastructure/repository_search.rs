use std::sync::Arc;

use log::info;

use crate::{GithubPagingSource, Pager, PagingConfig, PagingSource, RepositorySearchFetcher};

/// Exposes GitHub repository searches as pagers.
pub struct SearchRepository {
    fetcher: Arc<dyn RepositorySearchFetcher>,
    config: PagingConfig,
}

impl SearchRepository {
    /// Creates a new `SearchRepository` with the given fetcher and paging config.
    pub fn new(fetcher: Arc<dyn RepositorySearchFetcher>, config: PagingConfig) -> Self {
        Self { fetcher, config }
    }

    /// Search repositories whose names or descriptions match the query.
    ///
    /// The returned pager owns its own state and builds a new source bound to the query on
    /// every refresh.
    pub fn search_results(&self, query: &str) -> Pager {
        info!("Creating pager for query: {query}");
        let fetcher = Arc::clone(&self.fetcher);
        let query = query.to_string();
        let page_size = self.config.page_size;

        Pager::new(self.config, move || {
            Arc::new(GithubPagingSource::new(
                Arc::clone(&fetcher),
                &query,
                page_size,
            )) as Arc<dyn PagingSource>
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;
    use mockall::predicate::eq;

    use crate::{
        LoadOutcome, MockRepositorySearchFetcher, Repository, SearchRequest, SearchResponse,
        StdResult,
    };

    use super::*;

    fn repositories(ids: std::ops::Range<u64>) -> Vec<Repository> {
        ids.map(Repository::dummy).collect()
    }

    fn expect_search(
        fetcher: &mut MockRepositorySearchFetcher,
        query: &str,
        page: u32,
        per_page: u32,
        ids: std::ops::Range<u64>,
    ) {
        fetcher
            .expect_search()
            .with(eq(SearchRequest::new(query, page, per_page)))
            .returning(move |_| Ok(SearchResponse::new(repositories(ids.clone()), 1000, false, None)))
            .times(1);
    }

    #[tokio::test]
    async fn search_results_stream_every_page_until_an_empty_one() {
        let fetcher = {
            let mut fetcher = MockRepositorySearchFetcher::new();
            expect_search(&mut fetcher, "android in:name,description", 1, 90, 0..90);
            expect_search(&mut fetcher, "android in:name,description", 4, 30, 90..120);
            expect_search(&mut fetcher, "android in:name,description", 5, 30, 0..0);

            fetcher
        };
        let repository = SearchRepository::new(Arc::new(fetcher), PagingConfig::default());

        let pages = repository
            .search_results("android")
            .into_stream()
            .collect::<Vec<_>>()
            .await
            .into_iter()
            .collect::<StdResult<Vec<_>>>()
            .unwrap();

        assert_eq!(3, pages.len());
        assert_eq!(
            repositories(0..120),
            pages
                .into_iter()
                .flat_map(|page| page.data)
                .collect::<Vec<_>>()
        );
    }

    #[tokio::test]
    async fn refresh_resumes_on_the_page_covering_the_anchor() {
        let fetcher = {
            let mut fetcher = MockRepositorySearchFetcher::new();
            expect_search(&mut fetcher, "kotlin in:name,description", 1, 30, 0..30);
            expect_search(&mut fetcher, "kotlin in:name,description", 2, 30, 30..60);
            expect_search(&mut fetcher, "kotlin in:name,description", 3, 30, 60..90);
            expect_search(&mut fetcher, "kotlin in:name,description", 2, 30, 30..60);

            fetcher
        };
        let config = PagingConfig::new(30)
            .with_initial_load_size(30)
            .with_prefetch_distance(5);
        let repository = SearchRepository::new(Arc::new(fetcher), config);
        let mut pager = repository.search_results("kotlin");
        pager.refresh().await.unwrap();
        pager.append().await.unwrap();
        pager.append().await.unwrap();
        let anchor_position = 42;
        let anchored_item = pager.get(anchor_position).cloned();
        assert_eq!(
            LoadOutcome::NotRequired,
            pager.access(anchor_position).await.unwrap()
        );

        pager.refresh().await.unwrap();

        assert!(pager.items().any(|item| Some(item) == anchored_item.as_ref()));
        assert_eq!(repositories(30..60), pager.items().cloned().collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn refresh_after_initial_load_keeps_the_anchored_item() {
        let fetcher = {
            let mut fetcher = MockRepositorySearchFetcher::new();
            expect_search(&mut fetcher, "swift in:name,description", 1, 90, 0..90);
            expect_search(&mut fetcher, "swift in:name,description", 2, 30, 30..60);

            fetcher
        };
        let repository = SearchRepository::new(Arc::new(fetcher), PagingConfig::default());
        let mut pager = repository.search_results("swift");
        pager.refresh().await.unwrap();
        let anchor_position = 45;
        let anchored_item = pager.get(anchor_position).cloned();
        assert_eq!(
            LoadOutcome::NotRequired,
            pager.access(anchor_position).await.unwrap()
        );

        pager.refresh().await.unwrap();

        assert!(pager.items().any(|item| Some(item) == anchored_item.as_ref()));
        assert_eq!(repositories(30..60), pager.items().cloned().collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn each_query_gets_an_independent_pager() {
        let fetcher = {
            let mut fetcher = MockRepositorySearchFetcher::new();
            expect_search(&mut fetcher, "rust in:name,description", 1, 30, 0..30);
            expect_search(&mut fetcher, "go in:name,description", 1, 30, 100..130);

            fetcher
        };
        let repository = SearchRepository::new(
            Arc::new(fetcher),
            PagingConfig::new(30).with_initial_load_size(30),
        );
        let mut rust_pager = repository.search_results("rust");
        let mut go_pager = repository.search_results("go");

        rust_pager.refresh().await.unwrap();
        go_pager.refresh().await.unwrap();

        assert_eq!(Some(&Repository::dummy(0)), rust_pager.get(0));
        assert_eq!(Some(&Repository::dummy(100)), go_pager.get(0));
    }
}
