use std::sync::Arc;

use chrono::Utc;
use log::warn;
use tokio::time::sleep;

use crate::{RepositorySearchFetcher, SearchRequest, SearchResponse, StdResult};

/// This struct is responsible for enforcing rate limits on fetcher requests.
pub struct FetcherRateLimitEnforcer {
    /// The fetcher to be rate limited.
    fetcher: Arc<dyn RepositorySearchFetcher>,
}

impl FetcherRateLimitEnforcer {
    /// Creates a new `FetcherRateLimitEnforcer` instance with the given fetcher.
    pub fn new(fetcher: Arc<dyn RepositorySearchFetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait::async_trait]
impl RepositorySearchFetcher for FetcherRateLimitEnforcer {
    /// Waits for the rate limit window to reset once the quota is exhausted.
    async fn search(&self, request: &SearchRequest) -> StdResult<SearchResponse> {
        let response = self.fetcher.search(request).await?;
        if let Some(rate_limit) = response.rate_limit() {
            if rate_limit.is_exceeded() {
                let duration_until_reset = rate_limit.duration_until_reset(Utc::now())?;
                warn!(
                    "Fetcher rate limit exceeded after {request}, waiting for {duration_until_reset:?}"
                );
                sleep(duration_until_reset).await;
            }
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use crate::{FetcherRateLimit, MockRepositorySearchFetcher};

    use super::*;

    fn enforcer_returning(rate_limit: Option<FetcherRateLimit>) -> FetcherRateLimitEnforcer {
        FetcherRateLimitEnforcer::new(Arc::new({
            let mut mock_fetcher = MockRepositorySearchFetcher::new();
            mock_fetcher
                .expect_search()
                .returning(move |_| Ok(SearchResponse::new(vec![], 0, false, rate_limit.clone())))
                .times(1);

            mock_fetcher
        }))
    }

    #[tokio::test]
    async fn search_rate_limit_not_exceeded() {
        let reset_at = Utc::now() + chrono::Duration::seconds(60);
        let enforcer = enforcer_returning(Some(FetcherRateLimit {
            limit: 30,
            used: 10,
            remaining: 20,
            reset_at,
        }));

        enforcer.search(&SearchRequest::dummy()).await.unwrap();

        assert!(reset_at > Utc::now());
    }

    #[tokio::test]
    async fn search_rate_limit_exceeded() {
        let reset_at = Utc::now() + chrono::Duration::seconds(1);
        let enforcer = enforcer_returning(Some(FetcherRateLimit {
            limit: 30,
            used: 30,
            remaining: 0,
            reset_at,
        }));

        enforcer.search(&SearchRequest::dummy()).await.unwrap();

        assert!(reset_at <= Utc::now());
    }

    #[tokio::test]
    async fn search_without_rate_limit() {
        let enforcer = enforcer_returning(None);

        let response = enforcer.search(&SearchRequest::dummy()).await.unwrap();

        assert_eq!(None, response.rate_limit());
    }

    #[tokio::test]
    async fn search_error_is_propagated() {
        let enforcer = FetcherRateLimitEnforcer::new(Arc::new({
            let mut mock_fetcher = MockRepositorySearchFetcher::new();
            mock_fetcher
                .expect_search()
                .returning(|_| Err(anyhow!("Error fetching data")))
                .times(1);

            mock_fetcher
        }));

        enforcer
            .search(&SearchRequest::dummy())
            .await
            .expect_err("Expected the fetcher error");
    }
}
