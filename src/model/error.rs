use std::sync::Arc;

use thiserror::Error;

use super::{LoadType, PageKey};

/// The standard result type used throughout the application.
pub type StdResult<T> = Result<T, anyhow::Error>;

/// Errors raised by the pager while coordinating page loads.
#[derive(Error, Debug, Clone)]
pub enum PagingError {
    /// The paging source reported a failure for a load.
    #[error("{load_type} load failed for page {key:?}: {cause}")]
    LoadFailed {
        load_type: LoadType,
        key: Option<PageKey>,
        cause: Arc<anyhow::Error>,
    },

    /// The paging source handed back a key that does not move away from the loaded one.
    #[error("{load_type} load of page {loaded_key} returned the non progressing key {returned_key}")]
    NonIncreasingKey {
        load_type: LoadType,
        loaded_key: PageKey,
        returned_key: PageKey,
    },

    /// Retry was requested while no load failed.
    #[error("There is no failed load to retry")]
    NothingToRetry,
}
