//! Shared list-view mechanics: pagination, request sequencing and search
//! debounce.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;

use crate::client::{PageMeta, Paginated};
use crate::metrics::STALE_RESPONSES_DISCARDED;

/// Pagination state of a list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pager {
    pub current_page: u32,
    pub last_page: u32,
    pub total: u64,
    pub per_page: u32,
}

impl Pager {
    pub fn new(per_page: u32) -> Self {
        Self {
            current_page: 1,
            last_page: 1,
            total: 0,
            per_page: per_page.max(1),
        }
    }

    pub fn from_meta(meta: &PageMeta, per_page: u32) -> Self {
        Self {
            current_page: meta.current_page.max(1),
            last_page: meta.last_page.max(1),
            total: meta.total,
            per_page: meta.per_page.unwrap_or(per_page).max(1),
        }
    }

    /// Pager over `total` locally held items.
    pub fn for_items(total: usize, per_page: u32) -> Self {
        let per_page = per_page.max(1);
        Self {
            current_page: 1,
            last_page: last_page(total as u64, per_page),
            total: total as u64,
            per_page,
        }
    }

    pub fn contains(&self, page: u32) -> bool {
        (1..=self.last_page).contains(&page)
    }

    /// The page to load, or `None` when `page` is outside `1..=last_page`.
    pub fn go_to_page(&self, page: u32) -> Option<u32> {
        self.contains(page).then_some(page)
    }

    pub fn next(&self) -> Option<u32> {
        self.go_to_page(self.current_page.saturating_add(1))
    }

    pub fn prev(&self) -> Option<u32> {
        self.go_to_page(self.current_page.saturating_sub(1))
    }
}

fn last_page(total: u64, per_page: u32) -> u32 {
    (total.div_ceil(per_page as u64) as u32).max(1)
}

/// Slice `items` into page `page`. Pages past the end come back empty.
pub fn paginate<T: Clone>(items: &[T], page: u32, per_page: u32) -> Paginated<T> {
    let per_page = per_page.max(1);
    let page = page.max(1);
    let start = (page as usize - 1).saturating_mul(per_page as usize);

    Paginated {
        data: items
            .iter()
            .skip(start)
            .take(per_page as usize)
            .cloned()
            .collect(),
        meta: PageMeta {
            current_page: page,
            last_page: last_page(items.len() as u64, per_page),
            total: items.len() as u64,
            per_page: Some(per_page),
        },
    }
}

/// Issues generation tokens so only the latest request's response is applied.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token for a request about to be sent.
    pub fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == generation
    }

    /// Like [`is_current`](Self::is_current), counting discarded responses.
    pub fn accept(&self, generation: u64) -> bool {
        let current = self.is_current(generation);
        if !current {
            STALE_RESPONSES_DISCARDED.inc();
            tracing::debug!(
                generation,
                latest = self.latest.load(Ordering::SeqCst),
                "Discarding stale list response"
            );
        }
        current
    }
}

/// Timer reset on every call; only the last scheduled action runs.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: tokio::sync::Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: tokio::sync::Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `action` after the delay, cancelling anything still waiting.
    pub async fn call<F>(&self, action: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let mut pending = self.pending.lock().await;
        if let Some(previous) = pending.take() {
            previous.abort();
        }
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action.await;
        }));
    }

    /// Drop the pending action, if any.
    pub async fn cancel(&self) {
        if let Some(previous) = self.pending.lock().await.take() {
            previous.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    #[test]
    fn test_go_to_page_bounds() {
        let pager = Pager {
            current_page: 2,
            last_page: 3,
            total: 55,
            per_page: 20,
        };
        assert_eq!(pager.go_to_page(3), Some(3));
        assert_eq!(pager.go_to_page(4), None);
        assert_eq!(pager.go_to_page(0), None);
        assert_eq!(pager.next(), Some(3));
        assert_eq!(pager.prev(), Some(1));

        let first = Pager::new(20);
        assert_eq!(first.prev(), None);
        assert_eq!(first.next(), None);
    }

    #[test]
    fn test_for_items() {
        assert_eq!(Pager::for_items(0, 20).last_page, 1);
        assert_eq!(Pager::for_items(40, 20).last_page, 2);
        assert_eq!(Pager::for_items(41, 20).last_page, 3);
    }

    #[test]
    fn test_paginate() {
        let items: Vec<u32> = (1..=45).collect();
        let page = paginate(&items, 3, 20);
        assert_eq!(page.data, (41..=45).collect::<Vec<_>>());
        assert_eq!(page.meta.last_page, 3);
        assert_eq!(page.meta.total, 45);

        assert!(paginate(&items, 9, 20).data.is_empty());
        assert_eq!(paginate::<u32>(&[], 1, 20).meta.last_page, 1);
    }

    #[test]
    fn test_sequencer_only_accepts_latest() {
        let seq = RequestSequencer::new();
        let first = seq.issue();
        let second = seq.issue();
        assert!(!seq.accept(first));
        assert!(seq.accept(second));
    }

    #[tokio::test(start_paused = true)]
    async fn test_debouncer_runs_only_last_action() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let runs = Arc::new(AtomicUsize::new(0));
        let last = Arc::new(AtomicUsize::new(0));

        for value in 1..=3 {
            let runs = runs.clone();
            let last = last.clone();
            debouncer
                .call(async move {
                    runs.fetch_add(1, Ordering::SeqCst);
                    last.store(value, Ordering::SeqCst);
                })
                .await;
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(last.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debouncer_cancel() {
        let debouncer = Debouncer::new(Duration::from_millis(150));
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        debouncer
            .call(async move {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .await;
        debouncer.cancel().await;

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }
}
