//! Mock paginated collection for testing
//!
//! These are test utilities - not all may be used in every test binary.

#![allow(dead_code)]

use async_trait::async_trait;
use remedy::error::{Error, Result};
use remedy::platform::PageSource;
use remedy::types::Page;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Collection of `total` numbered rows served in pages
///
/// Row `i` is the number `i`, so merged results can be checked for order.
pub struct MockPageSource {
    total: u64,
    delays: Mutex<HashMap<u64, Duration>>,
    failing_offsets: Mutex<HashSet<u64>>,
    missing_data_offsets: Mutex<HashSet<u64>>,
    calls: Mutex<Vec<(u64, u64)>>,
    started_at: Mutex<HashMap<u64, Instant>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockPageSource {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            delays: Mutex::new(HashMap::new()),
            failing_offsets: Mutex::new(HashSet::new()),
            missing_data_offsets: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
            started_at: Mutex::new(HashMap::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Delay the response for the page at `offset`
    pub fn delay(&self, offset: u64, delay: Duration) {
        self.delays.lock().unwrap().insert(offset, delay);
    }

    /// Delay every page of a pass with `batch_size` pages by `delay`
    pub fn delay_all(&self, delay: Duration, batch_size: u64) {
        let mut delays = self.delays.lock().unwrap();
        let mut offset = 0;
        while offset < self.total.max(1) {
            delays.insert(offset, delay);
            offset += batch_size;
        }
    }

    /// Make the page at `offset` fail
    pub fn fail_at(&self, offset: u64) {
        self.failing_offsets.lock().unwrap().insert(offset);
    }

    /// Stop failing every page
    pub fn clear_failures(&self) {
        self.failing_offsets.lock().unwrap().clear();
    }

    /// Serve the page at `offset` without a `data` field
    pub fn omit_data_at(&self, offset: u64) {
        self.missing_data_offsets.lock().unwrap().insert(offset);
    }

    /// `(offset, limit)` of every request, in call order
    pub fn calls(&self) -> Vec<(u64, u64)> {
        self.calls.lock().unwrap().clone()
    }

    /// When the request for `offset` started (last one if repeated)
    pub fn started_at(&self, offset: u64) -> Option<Instant> {
        self.started_at.lock().unwrap().get(&offset).copied()
    }

    /// Highest number of simultaneous requests observed
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageSource<u64> for MockPageSource {
    async fn fetch_page(&self, offset: u64, limit: u64) -> Result<Page<u64>> {
        self.calls.lock().unwrap().push((offset, limit));
        self.started_at.lock().unwrap().insert(offset, Instant::now());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self.delays.lock().unwrap().get(&offset).copied();
        if let Some(delay) = delay {
            sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing_offsets.lock().unwrap().contains(&offset) {
            return Err(Error::Transport(format!("page {offset} unavailable")));
        }

        let end = (offset + limit).min(self.total);
        let rows: Vec<u64> = (offset..end).collect();

        if self.missing_data_offsets.lock().unwrap().contains(&offset) {
            let mut page = Page::new(Vec::new(), self.total);
            page.data = None;
            return Ok(page);
        }
        Ok(Page::new(rows, self.total))
    }
}

/// Shares a [`MockPageSource`] with an aggregator that takes ownership of its source
pub struct SharedPages(pub Arc<MockPageSource>);

#[async_trait]
impl PageSource<u64> for SharedPages {
    async fn fetch_page(&self, offset: u64, limit: u64) -> Result<Page<u64>> {
        self.0.fetch_page(offset, limit).await
    }
}
