use std::fmt::Display;

use serde::Serialize;

/// A search request being made to the GitHub API
#[derive(Debug, Serialize, PartialEq, Eq, Clone, Hash)]
pub struct SearchRequest {
    /// The text query, qualifiers included.
    #[serde(rename = "q")]
    pub(crate) query: String,

    /// The 1-based page index.
    pub(crate) page: u32,

    /// The number of repositories per page.
    pub(crate) per_page: u32,
}

impl SearchRequest {
    /// Creates a new `SearchRequest` with the given query, page and page size.
    pub fn new(query: &str, page: u32, per_page: u32) -> Self {
        Self {
            query: query.to_string(),
            page,
            per_page,
        }
    }

    /// Retrieves the text query.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Retrieves the page index.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Retrieves the page size.
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Creates a dummy `SearchRequest` for testing purposes.
    #[cfg(test)]
    pub(crate) fn dummy() -> Self {
        Self {
            query: "android in:name,description".to_string(),
            page: 1,
            per_page: 30,
        }
    }
}

impl Display for SearchRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchRequest: query={}, page={}, per_page={}",
            self.query, self.page, self.per_page
        )
    }
}
