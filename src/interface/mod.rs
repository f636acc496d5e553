mod fetcher;
mod paging_source;

pub use fetcher::*;
pub use paging_source::*;
