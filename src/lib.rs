//! Incremental loading of GitHub repository search results.
//!
//! A [`SearchRepository`] turns a query into a [`Pager`], which loads pages on demand from a
//! [`PagingSource`] and exposes them as a growing list or as a stream of pages.

mod infrastructure;
mod interface;
mod model;

pub use infrastructure::*;
pub use interface::*;
pub use model::*;
