//! Full-collection fetching over paginated backends

mod aggregator;

pub use aggregator::{
    remaining_offsets, FetchOptions, FetchOutcome, PaginatedFetchAggregator, DEFAULT_BATCH_SIZE,
    MAX_CONCURRENT_PAGES,
};
