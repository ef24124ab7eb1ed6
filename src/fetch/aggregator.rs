//! Paginated fetch aggregation
//!
//! Materializes a whole collection from a backend that only serves bounded
//! pages. The first page reports the total; the remaining pages are fetched
//! with at most [`MAX_CONCURRENT_PAGES`] requests in flight and merged back in
//! offset order.

use crate::error::{Error, Result};
use crate::platform::PageSource;
use crate::types::{AggregateResult, PageMeta};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use tracing::{debug, info};

/// Default page size
pub const DEFAULT_BATCH_SIZE: u64 = 50;

/// Page requests allowed in flight after the first page
pub const MAX_CONCURRENT_PAGES: usize = 2;

/// Aggregator options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Rows requested per page
    pub batch_size: u64,
    /// Suppress the automatic fetch performed by [`PaginatedFetchAggregator::start`]
    pub skip: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            skip: false,
        }
    }
}

/// What a `fetch()` call did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome<T> {
    /// Pass finished and its result was published
    Completed(AggregateResult<T>),
    /// Pass finished after the aggregator was disposed or superseded; not published
    Discarded(AggregateResult<T>),
    /// Another pass was in flight, nothing was fetched
    AlreadyFetching,
    /// Automatic fetch suppressed by [`FetchOptions::skip`]
    Skipped,
}

impl<T> FetchOutcome<T> {
    /// The published result, if this pass produced one
    pub fn into_completed(self) -> Option<AggregateResult<T>> {
        match self {
            Self::Completed(result) => Some(result),
            _ => None,
        }
    }
}

/// Offsets of every page after the first, produced lazily
///
/// `total` comes from the backend, so nothing is sized by it up front.
pub fn remaining_offsets(total: u64, batch_size: u64) -> impl Iterator<Item = u64> {
    let pages = if batch_size == 0 || total <= batch_size {
        1
    } else {
        total.div_ceil(batch_size)
    };
    (1..pages).map(move |page| page * batch_size)
}

/// Collects a full paginated dataset from a [`PageSource`]
///
/// One aggregator owns one in-flight guard: while a pass runs, further
/// `fetch()` calls return [`FetchOutcome::AlreadyFetching`]. Each pass is
/// tagged with a generation; [`dispose`](Self::dispose) or a later pass makes
/// the tag stale and the stale pass's result is not published.
pub struct PaginatedFetchAggregator<T, S> {
    source: S,
    options: FetchOptions,
    fetching: AtomicBool,
    generation: AtomicU64,
    latest: Mutex<Option<AggregateResult<T>>>,
    _rows: PhantomData<fn() -> T>,
}

/// Resets the in-flight guard when a pass ends, including by error or drop
struct FetchingGuard<'a>(&'a AtomicBool);

impl Drop for FetchingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<T, S> PaginatedFetchAggregator<T, S>
where
    T: Clone + Send + 'static,
    S: PageSource<T>,
{
    /// Create an aggregator over `source`
    pub fn new(source: S, options: FetchOptions) -> Self {
        let options = FetchOptions {
            batch_size: options.batch_size.max(1),
            ..options
        };
        Self {
            source,
            options,
            fetching: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            latest: Mutex::new(None),
            _rows: PhantomData,
        }
    }

    /// Options in effect
    pub const fn options(&self) -> FetchOptions {
        self.options
    }

    /// Whether a pass is in flight
    pub fn is_fetching(&self) -> bool {
        self.fetching.load(Ordering::Acquire)
    }

    /// Last published result
    pub fn latest(&self) -> Option<AggregateResult<T>> {
        self.latest
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Stop publishing results of passes already in flight
    ///
    /// Issued requests are not cancelled; their results are dropped.
    pub fn dispose(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// Automatic initial fetch, honoring [`FetchOptions::skip`]
    pub async fn start(&self) -> Result<FetchOutcome<T>> {
        if self.options.skip {
            debug!("Automatic fetch skipped");
            return Ok(FetchOutcome::Skipped);
        }
        self.fetch().await
    }

    /// Run one complete, independent fetch pass
    ///
    /// Any page failure fails the whole pass and nothing is published.
    pub async fn fetch(&self) -> Result<FetchOutcome<T>> {
        if self
            .fetching
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Fetch already in flight, ignoring");
            return Ok(FetchOutcome::AlreadyFetching);
        }
        let _guard = FetchingGuard(&self.fetching);
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;

        let result = self.collect_all().await?;

        if self.generation.load(Ordering::Acquire) != generation {
            debug!("Fetch pass {generation} is stale, not publishing");
            return Ok(FetchOutcome::Discarded(result));
        }

        *self
            .latest
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(result.clone());
        Ok(FetchOutcome::Completed(result))
    }

    async fn collect_all(&self) -> Result<AggregateResult<T>> {
        let batch_size = self.options.batch_size;

        let first = self
            .source
            .fetch_page(0, batch_size)
            .await
            .map_err(|e| Error::AggregateFetch {
                offset: 0,
                source: Box::new(e),
            })?;
        let total = first.meta.total;
        let mut data = first.data.unwrap_or_default();

        let mut offsets = remaining_offsets(total, batch_size).peekable();
        if offsets.peek().is_none() {
            return Ok(AggregateResult {
                data,
                meta: PageMeta { total },
            });
        }

        info!("Fetching remaining pages of {batch_size} (total {total})");

        let mut pages: Vec<(usize, Vec<T>)> = stream::iter(offsets.enumerate())
            .map(|(index, offset)| async move {
                let page = self
                    .source
                    .fetch_page(offset, batch_size)
                    .await
                    .map_err(|e| Error::AggregateFetch {
                        offset,
                        source: Box::new(e),
                    })?;
                debug!("Fetched page at offset {offset}");
                Ok::<_, Error>((index, page.data.unwrap_or_default()))
            })
            .buffer_unordered(MAX_CONCURRENT_PAGES)
            .try_collect()
            .await?;

        // Completion order is arbitrary; merge by page index.
        pages.sort_unstable_by_key(|(index, _)| *index);
        for (_, rows) in pages {
            data.extend(rows);
        }

        Ok(AggregateResult {
            data,
            meta: PageMeta { total },
        })
    }
}
