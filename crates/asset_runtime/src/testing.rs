//! Instrumented sources for tests in this and downstream crates.

use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::{AssetSource, MemoryAssetSource, SourceError};

/// Completes on the second poll, so concurrent callers overlap.
pub struct YieldNow(bool);

impl YieldNow {
    pub fn new() -> Self {
        Self(false)
    }
}

impl Default for YieldNow {
    fn default() -> Self {
        Self::new()
    }
}

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            Poll::Ready(())
        } else {
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

/// Memory source that counts calls and suspends once per call.
#[derive(Default)]
pub struct CountingSource {
    pub inner: MemoryAssetSource,
    fetches: AtomicUsize,
    sizes: AtomicUsize,
}

impl CountingSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Number of size lookups served.
    pub fn size_query_count(&self) -> usize {
        self.sizes.load(Ordering::SeqCst)
    }
}

impl AssetSource for CountingSource {
    fn probe<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<u64, SourceError>> {
        async move {
            self.sizes.fetch_add(1, Ordering::SeqCst);
            YieldNow::new().await;
            self.inner.probe(path).await
        }
        .boxed()
    }

    fn fetch<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<Vec<u8>, SourceError>> {
        async move {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            YieldNow::new().await;
            self.inner.fetch(path).await
        }
        .boxed()
    }
}
