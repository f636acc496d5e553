use std::sync::Arc;

use futures::{Stream, stream};
use log::{debug, info, warn};

use crate::{
    LoadOutcome, LoadParams, LoadResult, LoadType, Page, PagerStatus, PagingConfig, PagingError,
    PagingSource, PagingState, Repository, StdResult,
};

/// Builds a fresh paging source each time the pager refreshes.
pub type PagingSourceFactory = Box<dyn Fn() -> Arc<dyn PagingSource> + Send + Sync>;

/// Coordinates page loads from a paging source into a growing list of repositories.
///
/// Every load borrows the pager mutably, so at most one load is in flight. Dropping a load
/// future abandons it: loaded pages are left untouched and [`Pager::retry`] replays it.
pub struct Pager {
    config: PagingConfig,
    source_factory: PagingSourceFactory,
    source: Option<Arc<dyn PagingSource>>,
    pages: Vec<Page>,
    anchor_position: Option<usize>,
    status: PagerStatus,
}

impl Pager {
    /// Creates a new idle `Pager`. Nothing is loaded until the first refresh.
    pub fn new<F>(config: PagingConfig, source_factory: F) -> Self
    where
        F: Fn() -> Arc<dyn PagingSource> + Send + Sync + 'static,
    {
        Self {
            config,
            source_factory: Box::new(source_factory),
            source: None,
            pages: vec![],
            anchor_position: None,
            status: PagerStatus::Idle,
        }
    }

    /// Retrieves the current load status.
    pub fn status(&self) -> &PagerStatus {
        &self.status
    }

    /// Retrieves the paging config.
    pub fn config(&self) -> &PagingConfig {
        &self.config
    }

    /// Retrieves the loaded pages in key order.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Retrieves the last accessed position, if any.
    pub fn anchor_position(&self) -> Option<usize> {
        self.anchor_position
    }

    /// Retrieves the number of loaded repositories.
    pub fn len(&self) -> usize {
        self.pages.iter().map(|page| page.data.len()).sum()
    }

    /// Whether no repository is loaded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over the loaded repositories in key order.
    pub fn items(&self) -> impl Iterator<Item = &Repository> {
        self.pages.iter().flat_map(|page| page.data.iter())
    }

    /// Retrieves a loaded repository without recording the access.
    pub fn get(&self, index: usize) -> Option<&Repository> {
        self.items().nth(index)
    }

    /// Returns a snapshot of the loaded pages and of the anchor position.
    pub fn state(&self) -> PagingState {
        PagingState::new(self.pages.clone(), self.anchor_position, self.config)
    }

    /// Invalidates the current source and reloads from the key nearest to the anchor position.
    ///
    /// Loaded pages are replaced only once the new load succeeds.
    pub async fn refresh(&mut self) -> StdResult<LoadOutcome> {
        let refresh_key = match &self.source {
            Some(source) if !self.pages.is_empty() => source.refresh_key(&self.state()),
            _ => None,
        };
        let load_size = match refresh_key {
            Some(_) => self.config.page_size,
            None => self.config.initial_load_size,
        };
        info!("Refreshing from page {refresh_key:?} with load size {load_size}");
        self.source = Some((self.source_factory)());

        self.load(LoadParams::new(LoadType::Refresh, refresh_key, load_size))
            .await
    }

    /// Loads the page after the last loaded one.
    pub async fn append(&mut self) -> StdResult<LoadOutcome> {
        let Some(next_key) = self.pages.last().map(|page| page.next_key) else {
            return self.refresh().await;
        };
        match next_key {
            Some(next_key) => {
                self.load(LoadParams::new(
                    LoadType::Append,
                    Some(next_key),
                    self.config.page_size,
                ))
                .await
            }
            None => Ok(LoadOutcome::EndOfPagination),
        }
    }

    /// Loads the page before the first loaded one.
    pub async fn prepend(&mut self) -> StdResult<LoadOutcome> {
        match self.pages.first().and_then(|page| page.prev_key) {
            Some(prev_key) => {
                self.load(LoadParams::new(
                    LoadType::Prepend,
                    Some(prev_key),
                    self.config.page_size,
                ))
                .await
            }
            None => Ok(LoadOutcome::EndOfPagination),
        }
    }

    /// Records an access at `index` and loads a neighbour page when it lies within the
    /// prefetch distance of a boundary.
    pub async fn access(&mut self, index: usize) -> StdResult<LoadOutcome> {
        self.anchor_position = Some(index);
        if self.pages.is_empty() {
            return self.refresh().await;
        }
        let prefetch_distance = self.config.prefetch_distance as usize;
        let has_next = self.pages.last().is_some_and(|page| page.next_key.is_some());
        let has_prev = self.pages.first().is_some_and(|page| page.prev_key.is_some());
        if has_next && index + prefetch_distance >= self.len() {
            self.append().await
        } else if has_prev && index < prefetch_distance {
            self.prepend().await
        } else {
            Ok(LoadOutcome::NotRequired)
        }
    }

    /// Replays the last failed or abandoned load with the same key and size.
    pub async fn retry(&mut self) -> StdResult<LoadOutcome> {
        let params = match &self.status {
            PagerStatus::Failed {
                load_type,
                key,
                load_size,
                ..
            }
            | PagerStatus::Loading {
                load_type,
                key,
                load_size,
            } => LoadParams::new(*load_type, *key, *load_size),
            _ => return Err(PagingError::NothingToRetry.into()),
        };
        info!("Retrying {} load of page {:?}", params.load_type, params.key);

        self.load(params).await
    }

    /// Converts the pager into a stream of pages.
    ///
    /// Each poll drives one load: a refresh first, then appends until the end of pagination.
    /// A failed load is yielded as an error and the next poll retries it.
    pub fn into_stream(self) -> impl Stream<Item = StdResult<Page>> + Send {
        stream::unfold(self, |mut pager| async move {
            let (result, load_type) = match pager.status.clone() {
                PagerStatus::Idle => (pager.refresh().await, LoadType::Refresh),
                PagerStatus::Loading { load_type, .. } | PagerStatus::Failed { load_type, .. } => {
                    (pager.retry().await, load_type)
                }
                PagerStatus::Loaded {
                    next_key: Some(_), ..
                } => (pager.append().await, LoadType::Append),
                PagerStatus::Loaded { next_key: None, .. } => return None,
            };
            let item = result.map(|_| {
                let page = match load_type {
                    LoadType::Prepend => pager.pages.first(),
                    LoadType::Refresh | LoadType::Append => pager.pages.last(),
                };
                page.cloned().unwrap_or_default()
            });

            Some((item, pager))
        })
    }

    async fn load(&mut self, params: LoadParams) -> StdResult<LoadOutcome> {
        let source = match &self.source {
            Some(source) => Arc::clone(source),
            None => {
                let source = (self.source_factory)();
                self.source = Some(Arc::clone(&source));
                source
            }
        };
        self.status = PagerStatus::Loading {
            load_type: params.load_type,
            key: params.key,
            load_size: params.load_size,
        };
        debug!(
            "Loading {} page {:?} with load size {}",
            params.load_type, params.key, params.load_size
        );

        let page = match source.load(params).await {
            LoadResult::Page(page) => page,
            LoadResult::Error(cause) => return Err(self.fail(params, cause)),
        };
        if let Err(e) = check_key_progress(&params, &page) {
            return Err(self.fail(params, e.into()));
        }
        let total_items = page.data.len();
        debug!(
            "Loaded {total_items} items, prev_key={:?}, next_key={:?}",
            page.prev_key, page.next_key
        );
        match params.load_type {
            LoadType::Refresh => {
                self.pages = vec![page];
                self.anchor_position = None;
            }
            LoadType::Append => self.pages.push(page),
            LoadType::Prepend => {
                self.anchor_position = self
                    .anchor_position
                    .map(|anchor_position| anchor_position + total_items);
                self.pages.insert(0, page);
            }
        }
        self.status = PagerStatus::Loaded {
            prev_key: self.pages.first().and_then(|page| page.prev_key),
            next_key: self.pages.last().and_then(|page| page.next_key),
        };

        Ok(LoadOutcome::Loaded(total_items))
    }

    fn fail(&mut self, params: LoadParams, cause: anyhow::Error) -> anyhow::Error {
        warn!(
            "{} load of page {:?} failed: {cause}",
            params.load_type, params.key
        );
        let cause = Arc::new(cause);
        self.status = PagerStatus::Failed {
            load_type: params.load_type,
            key: params.key,
            load_size: params.load_size,
            cause: Arc::clone(&cause),
        };

        PagingError::LoadFailed {
            load_type: params.load_type,
            key: params.key,
            cause,
        }
        .into()
    }
}

fn check_key_progress(params: &LoadParams, page: &Page) -> Result<(), PagingError> {
    let Some(loaded_key) = params.key else {
        return Ok(());
    };
    let returned_key = match params.load_type {
        LoadType::Refresh | LoadType::Append => page.next_key.filter(|key| *key <= loaded_key),
        LoadType::Prepend => page.prev_key.filter(|key| *key >= loaded_key),
    };
    match returned_key {
        Some(returned_key) => Err(PagingError::NonIncreasingKey {
            load_type: params.load_type,
            loaded_key,
            returned_key,
        }),
        None => Ok(()),
    }
}
