//! Cursor pager: accumulates pages of test runs fetched with an opaque cursor.
//!
//! One pager per list view. Fetches are strictly sequential: a `fetch_next`
//! issued while another is in flight, or after the last page, does nothing.
//! A failed fetch leaves every accumulated record in place.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};

use crate::api::DashboardApi;
use crate::error::AppResult;
use crate::models::TestRun;

/// Lifecycle of a pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerStatus {
    /// Idle, more records available.
    Idle,
    /// A request is in flight.
    Fetching,
    /// Idle, the server reported no further pages.
    Exhausted,
    /// The last request failed; `fetch_next` retries from the same cursor.
    Error,
    /// The owning view is gone; nothing is fetched or applied any more.
    Closed,
}

/// Result of a `fetch_next` call that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A page arrived and `added` records were appended.
    Fetched { added: usize },
    /// No request was made because of the pager's status.
    Skipped(PagerStatus),
    /// The response arrived after a reset or close and was dropped.
    Discarded,
}

/// Point-in-time copy of the pager for rendering.
#[derive(Debug, Clone)]
pub struct PagerSnapshot {
    pub records: Vec<TestRun>,
    pub has_more: bool,
    pub total_count: u64,
    pub status: PagerStatus,
}

struct PagerInner {
    status: PagerStatus,
    records: Vec<TestRun>,
    cursor: Option<String>,
    total_count: u64,
    /// Bumped on reset/close so late responses can be recognized.
    generation: u64,
}

impl PagerInner {
    fn empty(generation: u64) -> Self {
        PagerInner {
            status: PagerStatus::Idle,
            records: Vec::new(),
            cursor: None,
            total_count: 0,
            generation,
        }
    }
}

/// Incremental loader for the test run list.
pub struct CursorPager {
    api: Arc<dyn DashboardApi>,
    page_size: u32,
    inner: Mutex<PagerInner>,
}

impl CursorPager {
    pub fn new(api: Arc<dyn DashboardApi>, page_size: u32) -> Self {
        CursorPager {
            api,
            page_size,
            inner: Mutex::new(PagerInner::empty(0)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PagerInner> {
        // A poisoned lock only means a panic elsewhere; the data is still consistent.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Request the page after the last received cursor and append it.
    ///
    /// Triggered externally (scroll threshold, "load more"); the pager never
    /// fetches on its own.
    pub async fn fetch_next(&self) -> AppResult<FetchOutcome> {
        let (cursor, generation) = {
            let mut inner = self.lock();
            match inner.status {
                PagerStatus::Fetching | PagerStatus::Exhausted | PagerStatus::Closed => {
                    debug!("fetch_next skipped while {:?}", inner.status);
                    return Ok(FetchOutcome::Skipped(inner.status));
                }
                PagerStatus::Idle | PagerStatus::Error => {}
            }
            inner.status = PagerStatus::Fetching;
            (inner.cursor.clone(), inner.generation)
        };

        let result = self
            .api
            .list_test_runs(self.page_size, cursor.as_deref())
            .await;

        let mut inner = self.lock();
        if inner.generation != generation {
            debug!("Dropping test run page that arrived after reset");
            return Ok(FetchOutcome::Discarded);
        }

        match result {
            Ok(page) => {
                let added = page.records.len();
                inner.records.extend(page.records);
                inner.total_count = page.total_count;

                inner.status = match (page.has_next_page, page.next_cursor) {
                    (true, Some(next)) => {
                        inner.cursor = Some(next);
                        PagerStatus::Idle
                    }
                    (true, None) => {
                        warn!("Server reported more test runs but sent no cursor; stopping");
                        PagerStatus::Exhausted
                    }
                    (false, _) => PagerStatus::Exhausted,
                };

                info!(
                    "Loaded {} test runs ({} of {})",
                    added,
                    inner.records.len(),
                    inner.total_count
                );
                Ok(FetchOutcome::Fetched { added })
            }
            Err(e) => {
                warn!("Failed to fetch test runs: {}", e);
                inner.status = PagerStatus::Error;
                Err(e)
            }
        }
    }

    /// Drop everything and start again from the first page.
    ///
    /// Any request still in flight is ignored when it completes.
    pub fn reset(&self) {
        let mut inner = self.lock();
        let generation = inner.generation + 1;
        *inner = PagerInner::empty(generation);
    }

    /// Stop reacting to responses; used when the owning view goes away.
    pub fn close(&self) {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.status = PagerStatus::Closed;
    }

    pub fn status(&self) -> PagerStatus {
        self.lock().status
    }

    /// Whether another page can be requested.
    pub fn has_more(&self) -> bool {
        matches!(
            self.lock().status,
            PagerStatus::Idle | PagerStatus::Error | PagerStatus::Fetching
        )
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().records.is_empty()
    }

    pub fn total_count(&self) -> u64 {
        self.lock().total_count
    }

    /// Accumulated records in server order.
    pub fn records(&self) -> Vec<TestRun> {
        self.lock().records.clone()
    }

    pub fn snapshot(&self) -> PagerSnapshot {
        let inner = self.lock();
        PagerSnapshot {
            records: inner.records.clone(),
            has_more: matches!(
                inner.status,
                PagerStatus::Idle | PagerStatus::Error | PagerStatus::Fetching
            ),
            total_count: inner.total_count,
            status: inner.status,
        }
    }
}
