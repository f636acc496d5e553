mod fetcher_rate_limiter;
mod fetcher_rest;
mod pager;
mod paging_source_github;
mod repository_search;

pub use fetcher_rate_limiter::*;
pub use fetcher_rest::*;
pub use pager::*;
pub use paging_source_github::*;
pub use repository_search::*;
