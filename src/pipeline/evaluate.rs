// src/pipeline/evaluate.rs

//! Change evaluation.
//!
//! One pass per invocation: fetch, normalize, fingerprint, then compare
//! against the stored baseline. The baseline is written on the first run and
//! whenever the fingerprint changes, never when it is unchanged, so repeated
//! no-op runs leave storage untouched.

use crate::error::Result;
use crate::models::{EvaluationResult, WatchTarget};
use crate::services::{PageFetcher, fingerprint, normalize};
use crate::storage::BaselineStore;

/// Drives the fetch → normalize → fingerprint → compare sequence.
pub struct ChangeEvaluator<'a> {
    fetcher: &'a dyn PageFetcher,
    store: &'a dyn BaselineStore,
}

impl<'a> ChangeEvaluator<'a> {
    pub fn new(fetcher: &'a dyn PageFetcher, store: &'a dyn BaselineStore) -> Self {
        Self { fetcher, store }
    }

    /// Evaluate `target` once.
    ///
    /// Fetch and normalize failures abort the evaluation before the baseline is
    /// read. A failed baseline write also aborts it.
    pub async fn evaluate(&self, target: &WatchTarget) -> Result<EvaluationResult> {
        let document = self.fetcher.fetch(&target.url).await?;
        let content = normalize(&document, target.selector.as_deref())?;
        let current = fingerprint(&content);
        log::debug!(
            "Canonical content: {} chars, fingerprint {}",
            content.chars().count(),
            current
        );

        let result = match self.store.load(&target.baseline_key).await {
            None => {
                self.store.save(&target.baseline_key, &current).await?;
                EvaluationResult::first_run(current)
            }
            Some(previous) if previous == current => EvaluationResult::unchanged(current),
            Some(previous) => {
                log::debug!("Fingerprint changed from {} to {}", previous, current);
                self.store.save(&target.baseline_key, &current).await?;
                EvaluationResult::changed(current)
            }
        };

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::error::{AppError, FetchError, NormalizeError};
    use crate::models::ChangeReason;
    use crate::storage::MemoryStorage;

    const KEY: &str = "last_hash.txt";

    /// Serves whatever page is currently set.
    struct StaticFetcher {
        page: Mutex<std::result::Result<String, FetchError>>,
    }

    impl StaticFetcher {
        fn new(html: &str) -> Self {
            Self {
                page: Mutex::new(Ok(html.to_string())),
            }
        }

        fn failing(error: FetchError) -> Self {
            Self {
                page: Mutex::new(Err(error)),
            }
        }

        fn set(&self, html: &str) {
            *self.page.lock().unwrap() = Ok(html.to_string());
        }
    }

    #[async_trait]
    impl PageFetcher for StaticFetcher {
        async fn fetch(&self, _url: &str) -> std::result::Result<String, FetchError> {
            self.page.lock().unwrap().clone()
        }
    }

    /// Memory store that counts writes.
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStorage,
        saves: AtomicUsize,
    }

    #[async_trait]
    impl BaselineStore for CountingStore {
        async fn load(&self, key: &str) -> Option<String> {
            self.inner.load(key).await
        }

        async fn save(&self, key: &str, fingerprint: &str) -> Result<()> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            self.inner.save(key, fingerprint).await
        }
    }

    /// Store whose writes always fail.
    struct ReadOnlyStore;

    #[async_trait]
    impl BaselineStore for ReadOnlyStore {
        async fn load(&self, _key: &str) -> Option<String> {
            None
        }

        async fn save(&self, key: &str, _fingerprint: &str) -> Result<()> {
            Err(AppError::storage(key, "read-only"))
        }
    }

    fn target(selector: Option<&str>) -> WatchTarget {
        WatchTarget {
            url: "https://example.com/developer".into(),
            selector: selector.map(str::to_string),
            baseline_key: KEY.into(),
        }
    }

    #[tokio::test]
    async fn test_first_run_saves_baseline() {
        let fetcher = StaticFetcher::new("<p>Content</p>");
        let store = CountingStore::default();
        let evaluator = ChangeEvaluator::new(&fetcher, &store);

        let result = evaluator.evaluate(&target(None)).await.unwrap();

        assert!(!result.changed);
        assert_eq!(result.reason, ChangeReason::FirstRun);
        assert_eq!(result.fingerprint, fingerprint("Content"));
        assert_eq!(store.load(KEY).await, Some(fingerprint("Content")));
        assert_eq!(store.saves.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unchanged_leaves_baseline_alone() {
        let fetcher = StaticFetcher::new("<p>Content</p>");
        let store = CountingStore::default();
        let evaluator = ChangeEvaluator::new(&fetcher, &store);

        evaluator.evaluate(&target(None)).await.unwrap();
        let result = evaluator.evaluate(&target(None)).await.unwrap();

        assert!(!result.changed);
        assert_eq!(result.reason, ChangeReason::Unchanged);
        assert_eq!(store.load(KEY).await, Some(fingerprint("Content")));
        assert_eq!(store.saves.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_changed_updates_baseline() {
        let fetcher = StaticFetcher::new("<p>Version 1</p>");
        let store = CountingStore::default();
        let evaluator = ChangeEvaluator::new(&fetcher, &store);

        evaluator.evaluate(&target(None)).await.unwrap();
        fetcher.set("<p>Version 2</p>");
        let result = evaluator.evaluate(&target(None)).await.unwrap();

        assert!(result.changed);
        assert_eq!(result.reason, ChangeReason::Changed);
        assert_eq!(store.load(KEY).await, Some(fingerprint("Version 2")));
        assert_eq!(store.saves.load(Ordering::SeqCst), 2);

        let again = evaluator.evaluate(&target(None)).await.unwrap();
        assert_eq!(again.reason, ChangeReason::Unchanged);
    }

    #[tokio::test]
    async fn test_noise_only_change_is_unchanged() {
        let fetcher = StaticFetcher::new(
            "<body><p>Release 1.2</p><script>var build = 1;</script></body>",
        );
        let store = MemoryStorage::new();
        let evaluator = ChangeEvaluator::new(&fetcher, &store);

        evaluator.evaluate(&target(None)).await.unwrap();
        fetcher.set(
            "<body>\n  <p>Release   1.2</p>\n  <script>var build = 2;</script>\
             <span data-timestamp='1700000001'>just now</span></body>",
        );
        let result = evaluator.evaluate(&target(None)).await.unwrap();

        assert_eq!(result.reason, ChangeReason::Unchanged);
    }

    #[tokio::test]
    async fn test_change_outside_selector_is_ignored() {
        let fetcher = StaticFetcher::new(
            "<div id='nav'>Home</div><div id='content'>Main Content</div>",
        );
        let store = MemoryStorage::new();
        let evaluator = ChangeEvaluator::new(&fetcher, &store);

        evaluator.evaluate(&target(Some("#content"))).await.unwrap();
        fetcher.set("<div id='nav'>Home | Blog</div><div id='content'>Main Content</div>");
        let result = evaluator.evaluate(&target(Some("#content"))).await.unwrap();

        assert_eq!(result.reason, ChangeReason::Unchanged);
    }

    #[tokio::test]
    async fn test_stored_whitespace_is_ignored() {
        let fetcher = StaticFetcher::new("<p>Content</p>");
        let store = MemoryStorage::new();
        store.insert(KEY, format!("{}\n", fingerprint("Content")));
        let evaluator = ChangeEvaluator::new(&fetcher, &store);

        let result = evaluator.evaluate(&target(None)).await.unwrap();
        assert_eq!(result.reason, ChangeReason::Unchanged);
    }

    #[tokio::test]
    async fn test_blank_baseline_reports_change() {
        let fetcher = StaticFetcher::new("<p>Content</p>");
        let store = CountingStore::default();
        store.inner.insert(KEY, "\n");
        let evaluator = ChangeEvaluator::new(&fetcher, &store);

        let result = evaluator.evaluate(&target(None)).await.unwrap();

        assert!(result.changed);
        assert_eq!(result.reason, ChangeReason::Changed);
        assert_eq!(store.load(KEY).await, Some(fingerprint("Content")));
        assert_eq!(store.saves.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fetch_error_leaves_store_untouched() {
        let fetcher = StaticFetcher::failing(FetchError::HttpStatus {
            code: 500,
            reason: "Internal Server Error".into(),
        });
        let store = CountingStore::default();
        let evaluator = ChangeEvaluator::new(&fetcher, &store);

        let err = evaluator.evaluate(&target(None)).await.unwrap_err();

        assert!(matches!(
            err,
            AppError::Fetch(FetchError::HttpStatus { code: 500, .. })
        ));
        assert_eq!(store.saves.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_selector_miss_is_terminal() {
        let fetcher = StaticFetcher::new("<p>Content</p>");
        let store = CountingStore::default();
        let evaluator = ChangeEvaluator::new(&fetcher, &store);

        let err = evaluator
            .evaluate(&target(Some("#nonexistent")))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::Normalize(NormalizeError::NoMatch(_))
        ));
        assert_eq!(store.saves.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_save_failure_propagates() {
        let fetcher = StaticFetcher::new("<p>Content</p>");
        let evaluator = ChangeEvaluator::new(&fetcher, &ReadOnlyStore);

        let err = evaluator.evaluate(&target(None)).await.unwrap_err();
        assert!(matches!(err, AppError::Storage { .. }));
    }
}
