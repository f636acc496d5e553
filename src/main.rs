use std::{pin::pin, sync::Arc, time::Duration};

use clap::Parser;
use futures::StreamExt;
use log::{debug, info, warn};
use tokio::time::sleep;

use github_search_pager::{
    FetcherRateLimitEnforcer, GITHUB_API_ENDPOINT, MAX_PAGE_SIZE, NETWORK_PAGE_SIZE, PagingConfig,
    RepositoryRow, RestSearchFetcher, SearchRepository, StdResult,
};

/// Command line arguments for the GitHub search pager
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Search query matched against repository names and descriptions
    query: String,

    /// Number of repositories loaded per page
    #[arg(long, default_value_t = NETWORK_PAGE_SIZE,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_PAGE_SIZE)))]
    page_size: u32,

    /// Number of repositories loaded by the first request (defaults to three pages)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_PAGE_SIZE)))]
    initial_load_size: Option<u32>,

    /// Maximum number of repositories displayed
    #[arg(short = 'n', long, default_value_t = 100)]
    max_items: usize,

    /// Maximum number of attempts for a failed page load
    #[arg(long, default_value_t = 3)]
    max_retries: u32,

    /// Base delay of the exponential backoff between attempts, in milliseconds
    #[arg(long, default_value_t = 500)]
    retry_base_delay_ms: u64,

    /// GitHub REST API endpoint
    #[arg(long, default_value = GITHUB_API_ENDPOINT)]
    endpoint: String,

    /// GitHub API token, raising the search rate limit when provided
    #[arg(long, env = "GITHUB_API_TOKEN", hide_env_values = true)]
    github_api_token: Option<String>,

    /// HTTP request timeout, in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> StdResult<()> {
    env_logger::init();
    info!("Starting GitHub search");
    let args = Args::parse();
    debug!("Arguments: query={}, page_size={}", args.query, args.page_size);

    let repository = build_search_repository(&args)?;
    let total_displayed = display_search_results(&repository, &args).await?;
    info!("Displayed {total_displayed} repositories");

    Ok(())
}

fn build_search_repository(args: &Args) -> StdResult<SearchRepository> {
    let fetcher = Arc::new(FetcherRateLimitEnforcer::new(Arc::new(
        RestSearchFetcher::try_new(
            &args.endpoint,
            args.github_api_token.clone(),
            Duration::from_secs(args.timeout_secs),
        )?,
    )));
    let mut config = PagingConfig::new(args.page_size);
    if let Some(initial_load_size) = args.initial_load_size {
        config = config.with_initial_load_size(initial_load_size);
    }

    Ok(SearchRepository::new(fetcher, config))
}

fn calculate_exponential_backoff_delay(base_delay: Duration, attempt: u32) -> Duration {
    base_delay * (2u32.pow(attempt.min(31)))
}

async fn display_search_results(repository: &SearchRepository, args: &Args) -> StdResult<usize> {
    let base_delay = Duration::from_millis(args.retry_base_delay_ms);
    let mut pages = pin!(repository.search_results(&args.query).into_stream());
    let mut total_displayed = 0;
    let mut attempts = 0;

    println!("{}", RepositoryRow::placeholder());
    while let Some(page) = pages.next().await {
        match page {
            Ok(page) => {
                attempts = 0;
                for item in page.data.iter().take(args.max_items - total_displayed) {
                    println!("{}", RepositoryRow::from(item));
                    total_displayed += 1;
                }
                if total_displayed >= args.max_items {
                    break;
                }
                if page.next_key.is_some() {
                    println!("{}", RepositoryRow::placeholder());
                }
            }
            Err(e) => {
                attempts += 1;
                warn!("Load attempt #{attempts} failed: {e}");
                if attempts >= args.max_retries {
                    return Err(e.context(format!("Failed after {attempts} attempts")));
                }
                sleep(calculate_exponential_backoff_delay(base_delay, attempts)).await;
            }
        }
    }

    Ok(total_displayed)
}
