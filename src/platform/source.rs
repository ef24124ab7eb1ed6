//! Closure-backed page source

use crate::error::Result;
use crate::platform::PageSource;
use crate::types::Page;
use async_trait::async_trait;
use std::future::Future;

/// Adapts an async `Fn(offset, limit)` into a [`PageSource`]
pub struct FnPageSource<F> {
    fetch: F,
}

impl<F> FnPageSource<F> {
    /// Wrap a page-fetch closure
    pub const fn new(fetch: F) -> Self {
        Self { fetch }
    }
}

#[async_trait]
impl<T, F, Fut> PageSource<T> for FnPageSource<F>
where
    T: Send + 'static,
    F: Fn(u64, u64) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Page<T>>> + Send + 'static,
{
    async fn fetch_page(&self, offset: u64, limit: u64) -> Result<Page<T>> {
        (self.fetch)(offset, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_closure_receives_offset_and_limit() {
        let source = FnPageSource::new(|offset: u64, limit: u64| async move {
            Ok::<_, crate::error::Error>(Page::new(vec![offset, limit], 100))
        });

        let page = source.fetch_page(50, 25).await.unwrap();
        assert_eq!(page.data, Some(vec![50, 25]));
        assert_eq!(page.meta.total, 100);
    }
}
