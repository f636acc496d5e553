use std::{fmt::Display, sync::Arc};

use super::Repository;

/// A 1-based page index used as pagination cursor.
pub type PageKey = u32;

/// The key of the first page served by GitHub.
pub const GITHUB_STARTING_PAGE_INDEX: PageKey = 1;

/// The number of repositories requested per page.
pub const NETWORK_PAGE_SIZE: u32 = 30;

/// The largest `per_page` accepted by the GitHub search.
pub const MAX_PAGE_SIZE: u32 = 100;

/// The direction of a page load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadType {
    /// Loads the pages from scratch, dropping the previous ones.
    Refresh,
    /// Loads the page after the last loaded one.
    Append,
    /// Loads the page before the first loaded one.
    Prepend,
}

impl Display for LoadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadType::Refresh => write!(f, "Refresh"),
            LoadType::Append => write!(f, "Append"),
            LoadType::Prepend => write!(f, "Prepend"),
        }
    }
}

/// Parameters handed to a paging source for one load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadParams {
    /// The direction of the load.
    pub load_type: LoadType,
    /// The page to load, `None` for the first one.
    pub key: Option<PageKey>,
    /// The number of items requested.
    pub load_size: u32,
}

impl LoadParams {
    /// Creates new `LoadParams`.
    pub fn new(load_type: LoadType, key: Option<PageKey>, load_size: u32) -> Self {
        Self {
            load_type,
            key,
            load_size,
        }
    }
}

/// A loaded page of repositories bounded by its neighbour keys.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Page {
    /// The repositories of the page.
    pub data: Vec<Repository>,
    /// The key of the page before this one, `None` at the start of the sequence.
    pub prev_key: Option<PageKey>,
    /// The key of the page after this one, `None` at the end of the sequence.
    pub next_key: Option<PageKey>,
}

impl Page {
    /// Creates a new `Page`.
    pub fn new(data: Vec<Repository>, prev_key: Option<PageKey>, next_key: Option<PageKey>) -> Self {
        Self {
            data,
            prev_key,
            next_key,
        }
    }
}

/// The outcome of a paging source load.
#[derive(Debug)]
pub enum LoadResult {
    /// The page was loaded.
    Page(Page),
    /// The load failed with the given cause.
    Error(anyhow::Error),
}

/// Tuning of a pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingConfig {
    /// The number of items loaded by each append or prepend.
    pub page_size: u32,
    /// The number of items loaded by the first refresh.
    pub initial_load_size: u32,
    /// How close to a boundary an access must be to trigger the next load.
    pub prefetch_distance: u32,
}

impl PagingConfig {
    /// Creates a config with the default initial load size and prefetch distance.
    ///
    /// The page size is bounded to `1..=MAX_PAGE_SIZE`.
    pub fn new(page_size: u32) -> Self {
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);

        Self {
            page_size,
            initial_load_size: Self::bounded_load_size(page_size, page_size * 3),
            prefetch_distance: page_size,
        }
    }

    /// Overrides the initial load size.
    ///
    /// The size is rounded down to a whole number of pages that fits in one request.
    pub fn with_initial_load_size(mut self, initial_load_size: u32) -> Self {
        self.initial_load_size = Self::bounded_load_size(self.page_size, initial_load_size);
        self
    }

    // Keys step by `load_size / page_size`, so the load size must be a whole number of pages.
    fn bounded_load_size(page_size: u32, load_size: u32) -> u32 {
        let max_load_size = MAX_PAGE_SIZE / page_size * page_size;

        (load_size / page_size * page_size).clamp(page_size, max_load_size)
    }

    /// Overrides the prefetch distance.
    pub fn with_prefetch_distance(mut self, prefetch_distance: u32) -> Self {
        self.prefetch_distance = prefetch_distance;
        self
    }
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self::new(NETWORK_PAGE_SIZE)
    }
}

/// A snapshot of the pages loaded by a pager and of the last accessed position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagingState {
    /// The loaded pages, in key order.
    pub pages: Vec<Page>,
    /// The last index accessed by the consumer.
    pub anchor_position: Option<usize>,
    /// The config of the pager.
    pub config: PagingConfig,
}

impl PagingState {
    /// Creates a new `PagingState`.
    pub fn new(pages: Vec<Page>, anchor_position: Option<usize>, config: PagingConfig) -> Self {
        Self {
            pages,
            anchor_position,
            config,
        }
    }

    /// Returns the page covering `position`, or the nearest page when it lies outside the loaded
    /// items. Empty pages are never selected.
    pub fn closest_page_to_position(&self, position: usize) -> Option<&Page> {
        self.closest_page_and_offset(position).map(|(page, _)| page)
    }

    /// Returns the closest page to `position` together with the offset of the position inside
    /// that page. Positions past the loaded items map to the last item.
    pub fn closest_page_and_offset(&self, position: usize) -> Option<(&Page, usize)> {
        let mut remaining = position;
        let mut last_non_empty = None;
        for page in self.pages.iter().filter(|page| !page.data.is_empty()) {
            if remaining < page.data.len() {
                return Some((page, remaining));
            }
            remaining -= page.data.len();
            last_non_empty = Some(page);
        }

        last_non_empty.map(|page| (page, page.data.len() - 1))
    }

    /// Whether no item is loaded.
    pub fn is_empty(&self) -> bool {
        self.pages.iter().all(|page| page.data.is_empty())
    }
}

/// The state machine of a pager.
#[derive(Debug, Clone)]
pub enum PagerStatus {
    /// Nothing was loaded yet.
    Idle,
    /// A load is in flight, or was abandoned before completing.
    Loading {
        load_type: LoadType,
        key: Option<PageKey>,
        load_size: u32,
    },
    /// Pages are loaded between the given boundary keys.
    Loaded {
        prev_key: Option<PageKey>,
        next_key: Option<PageKey>,
    },
    /// The last load failed and can be retried.
    Failed {
        load_type: LoadType,
        key: Option<PageKey>,
        load_size: u32,
        cause: Arc<anyhow::Error>,
    },
}

impl PagerStatus {
    /// Whether the end of the sequence was reached while paging forward.
    pub fn is_end_of_pagination(&self) -> bool {
        matches!(self, PagerStatus::Loaded { next_key: None, .. })
    }
}

/// The outcome of a pager operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page with the given number of items was loaded.
    Loaded(usize),
    /// There is no page to load in the requested direction.
    EndOfPagination,
    /// The accessed position did not require any load.
    NotRequired,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_of(ids: std::ops::Range<u64>, prev_key: Option<PageKey>, next_key: Option<PageKey>) -> Page {
        Page::new(ids.map(Repository::dummy).collect(), prev_key, next_key)
    }

    fn three_pages_state(anchor_position: Option<usize>) -> PagingState {
        PagingState::new(
            vec![
                page_of(0..30, None, Some(2)),
                page_of(30..60, Some(1), Some(3)),
                page_of(60..65, Some(2), None),
            ],
            anchor_position,
            PagingConfig::default(),
        )
    }

    #[test]
    fn default_config_loads_three_pages_initially() {
        let config = PagingConfig::default();

        assert_eq!(30, config.page_size);
        assert_eq!(90, config.initial_load_size);
        assert_eq!(30, config.prefetch_distance);
    }

    #[test]
    fn closest_page_to_position_inside_loaded_items() {
        let state = three_pages_state(None);

        assert_eq!(Some(&state.pages[0]), state.closest_page_to_position(0));
        assert_eq!(Some(&state.pages[0]), state.closest_page_to_position(29));
        assert_eq!(Some(&state.pages[1]), state.closest_page_to_position(30));
        assert_eq!(Some(&state.pages[2]), state.closest_page_to_position(64));
    }

    #[test]
    fn closest_page_to_position_past_loaded_items_is_last_page() {
        let state = three_pages_state(None);

        assert_eq!(Some(&state.pages[2]), state.closest_page_to_position(500));
    }

    #[test]
    fn closest_page_to_position_skips_empty_pages() {
        let state = PagingState::new(
            vec![page_of(0..30, None, Some(2)), page_of(0..0, Some(1), None)],
            None,
            PagingConfig::default(),
        );

        assert_eq!(Some(&state.pages[0]), state.closest_page_to_position(30));
    }

    #[test]
    fn closest_page_to_position_without_pages() {
        let state = PagingState::new(vec![], Some(3), PagingConfig::default());

        assert_eq!(None, state.closest_page_to_position(3));
        assert!(state.is_empty());
    }

    #[test]
    fn closest_page_and_offset() {
        let state = three_pages_state(None);

        assert_eq!(Some((&state.pages[1], 1)), state.closest_page_and_offset(31));
        assert_eq!(Some((&state.pages[2], 4)), state.closest_page_and_offset(65));
    }

    #[test]
    fn page_size_is_bounded_by_the_search_api() {
        assert_eq!(1, PagingConfig::new(0).page_size);
        assert_eq!(100, PagingConfig::new(150).page_size);
        assert_eq!(100, PagingConfig::new(150).initial_load_size);
    }

    #[test]
    fn initial_load_size_is_whole_pages_within_one_request() {
        assert_eq!(80, PagingConfig::new(40).initial_load_size);
        assert_eq!(90, PagingConfig::new(30).with_initial_load_size(95).initial_load_size);
        assert_eq!(30, PagingConfig::new(30).with_initial_load_size(30).initial_load_size);
        assert_eq!(30, PagingConfig::new(30).with_initial_load_size(0).initial_load_size);
    }
}
