//! # Job Coordinator
//!
//! At most one fetch + resize pipeline runs per [`ThumbnailKey`] in this
//! process, whatever the request fan-in.
//!
//! ## Flow
//! 1. `ensure` looks the key up; a record with an image is returned at once.
//! 2. Under the pending-table mutex the caller either subscribes to the
//!    running job or registers a new one and spawns it.
//! 3. The job waits for a worker permit, creates the empty record, fetches,
//!    resizes on the blocking pool and attaches the bytes. Any failure deletes
//!    the record.
//! 4. Every subscriber waits on a `watch` channel for at most its own
//!    timeout. Giving up never cancels the job.
//! 5. The pending entry is removed once the outcome is published, or when the
//!    job task unwinds. An unwinding job also drops its empty record and its
//!    waiters see [`TransformError::Aborted`].
//!
//! ## Several processes
//! Coalescing is per process. Instances sharing one SQL store may each run a
//! job for the same key. A failing job deletes the empty record even when
//! another instance created it; that instance's attach then fails with
//! [`StoreError::NotFound`], its waiters get the error and the next request
//! starts over. No bytes are lost or mixed up, only one round of work.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use bytes::Bytes;
use tokio::sync::{Semaphore, watch};
use tracing::{Instrument, debug, error, info, info_span, warn};

use super::key::{ThumbnailKey, ThumbnailSpec};
use super::retry::RetryPolicy;
use super::store::ThumbnailStore;
use crate::error::thumbnail::{EnsureError, StoreError, TransformError};
use crate::fetch::origin::OriginFetcher;
use crate::image::processor::ImageProcessor;
use crate::metrics::sink::ThumbnailMetrics;

type JobOutcome = Result<Bytes, TransformError>;
type Outcome = watch::Receiver<Option<JobOutcome>>;

#[derive(Clone)]
pub struct ThumbnailCoordinator {
    inner: Arc<Inner>,
}

struct Inner {
    store: Arc<dyn ThumbnailStore>,
    fetcher: Arc<dyn OriginFetcher>,
    processor: Arc<dyn ImageProcessor>,
    metrics: Arc<dyn ThumbnailMetrics>,
    workers: Arc<Semaphore>,
    retry: RetryPolicy,
    pending: Mutex<HashMap<ThumbnailKey, Outcome>>,
}

impl ThumbnailCoordinator {
    pub fn new(
        store: Arc<dyn ThumbnailStore>,
        fetcher: Arc<dyn OriginFetcher>,
        processor: Arc<dyn ImageProcessor>,
        metrics: Arc<dyn ThumbnailMetrics>,
        workers: usize,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                fetcher,
                processor,
                metrics,
                workers: Arc::new(Semaphore::new(workers.max(1))),
                retry,
                pending: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Returns the encoded thumbnail for `spec`, producing it if needed.
    ///
    /// # Errors
    /// - [`EnsureError::Timeout`] when the job did not resolve within
    ///   `timeout`. The job keeps running.
    /// - [`EnsureError::Transform`] when the job failed.
    /// - [`EnsureError::Store`] when the initial lookup failed.
    pub async fn ensure(&self, spec: &ThumbnailSpec, timeout: Duration) -> Result<Bytes, EnsureError> {
        let key = spec.key();

        let lookup = key.clone();
        match self.inner.with_store(move |s| s.get(&lookup)).await {
            Ok(record) => {
                if let Some(bytes) = record.image {
                    debug!(key = %key, "thumbnail cache hit");
                    return Ok(bytes);
                }
            }
            Err(StoreError::NotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }

        let mut outcome = self.subscribe_or_start(key, spec);

        let published = match tokio::time::timeout(timeout, outcome.wait_for(Option::is_some)).await {
            Err(_) => return Err(EnsureError::Timeout(timeout)),
            Ok(Err(_)) => return Err(TransformError::Aborted.into()),
            Ok(Ok(slot)) => (*slot).clone(),
        };

        match published {
            Some(Ok(bytes)) => Ok(bytes),
            Some(Err(e)) => Err(e.into()),
            None => Err(TransformError::Aborted.into()),
        }
    }

    /// Number of keys with a job in flight.
    pub fn in_flight(&self) -> usize {
        self.inner.pending().len()
    }

    fn subscribe_or_start(&self, key: ThumbnailKey, spec: &ThumbnailSpec) -> Outcome {
        let mut pending = self.inner.pending();
        if let Some(existing) = pending.get(&key) {
            debug!(key = %key, "joining in-flight thumbnail job");
            return existing.clone();
        }

        let (tx, rx) = watch::channel(None);
        pending.insert(key.clone(), rx.clone());
        drop(pending);

        let mut slot = PendingSlot {
            inner: Arc::clone(&self.inner),
            key: key.clone(),
            published: false,
        };
        let spec = spec.clone();
        let span = info_span!("thumbnail_job", key = %key, url = %spec.source_url);
        tokio::spawn(
            async move {
                let outcome = slot.inner.run_job(&spec).await;
                tx.send_replace(Some(outcome));
                slot.published = true;
                drop(slot);
            }
            .instrument(span),
        );

        rx
    }
}

/// Removes the pending entry when the job task ends, normally or not.
struct PendingSlot {
    inner: Arc<Inner>,
    key: ThumbnailKey,
    published: bool,
}

impl Drop for PendingSlot {
    fn drop(&mut self) {
        self.inner.pending().remove(&self.key);
        if self.published {
            return;
        }

        error!(key = %self.key, "thumbnail job ended without an outcome");
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let store = Arc::clone(&self.inner.store);
        let key = self.key.clone();
        handle.spawn_blocking(move || {
            let empty = store.get(&key).is_ok_and(|rec| !rec.is_ready());
            if !empty {
                return;
            }
            if let Err(e) = store.delete(&key) {
                error!(key = %key, error = %e, "failed to delete record of aborted job");
            }
        });
    }
}

impl Inner {
    fn pending(&self) -> MutexGuard<'_, HashMap<ThumbnailKey, Outcome>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn with_store<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&dyn ThumbnailStore) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || f(store.as_ref()))
            .await
            .map_err(|e| StoreError::Backend(format!("store task failed: {e}")))?
    }

    async fn run_job(&self, spec: &ThumbnailSpec) -> JobOutcome {
        let _permit = Arc::clone(&self.workers)
            .acquire_owned()
            .await
            .map_err(|_| TransformError::Aborted)?;

        let create = spec.clone();
        let (record, created) = self.with_store(move |s| s.get_or_create(&create)).await?;
        if let Some(bytes) = record.image {
            debug!("thumbnail produced elsewhere");
            return Ok(bytes);
        }
        debug!(created, "thumbnail record reserved");

        self.metrics.transform_started(spec.max_width, spec.max_height);
        let started = Instant::now();
        let result = self.produce(spec).await;
        let elapsed = started.elapsed();
        self.metrics
            .transform_finished(spec.max_width, spec.max_height, elapsed);

        match result {
            Ok(bytes) => {
                info!(
                    bytes = bytes.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "thumbnail produced"
                );
                Ok(bytes)
            }
            Err(err) => {
                self.discard(spec, created, &err).await;
                Err(err)
            }
        }
    }

    async fn produce(&self, spec: &ThumbnailSpec) -> JobOutcome {
        let encoded = self
            .retry
            .run(
                |attempt| self.fetch_and_resize(spec, attempt),
                |e: &TransformError| matches!(e, TransformError::Fetch(f) if f.is_transient()),
            )
            .await?;

        let key = spec.key();
        let attach = encoded.clone();
        let record = self
            .with_store(move |s| s.attach_image(&key, &attach))
            .await?;
        Ok(record.image.unwrap_or(encoded))
    }

    async fn fetch_and_resize(&self, spec: &ThumbnailSpec, attempt: u32) -> JobOutcome {
        debug!(attempt, "fetching origin");
        let source = self.fetcher.fetch(&spec.source_url).await?;

        let processor = Arc::clone(&self.processor);
        let (max_w, max_h) = (spec.max_width, spec.max_height);
        let jpeg = tokio::task::spawn_blocking(move || processor.resize_to_jpeg(&source, max_w, max_h))
            .await
            .map_err(|e| {
                error!(error = %e, "resize task failed");
                TransformError::Aborted
            })??;

        Ok(Bytes::from(jpeg))
    }

    /// Drops the empty record left by a failed job.
    ///
    /// `created` is false when the row predates this job: a leftover from an
    /// earlier run, or a row another process is working on.
    async fn discard(&self, spec: &ThumbnailSpec, created: bool, err: &TransformError) {
        if let TransformError::Store(StoreError::Conflict { .. }) = err {
            error!(error = %err, "thumbnail attached twice with different bytes");
            return;
        }
        warn!(error = %err, created, "thumbnail job failed");

        let key = spec.key();
        if let Err(e) = self.with_store(move |s| s.delete(&key)).await {
            error!(error = %e, "failed to delete record of failed thumbnail job");
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::thumbnail::{DecodeError, FetchError};
    use crate::image::image_rs_processor::ImageRsProcessor;
    use crate::metrics::sink::tests::RecordingMetrics;
    use crate::thumbnail::memory_store::MemoryThumbnailStore;
    use crate::time::clock::tests::FixedClock;
    use async_trait::async_trait;
    use image::{DynamicImage, ImageFormat, RgbImage};
    use std::collections::VecDeque;
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub(crate) fn png(w: u32, h: u32) -> Bytes {
        let img = RgbImage::from_fn(w, h, |x, y| image::Rgb([(x % 256) as u8, (y % 256) as u8, 90]));
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        Bytes::from(buf)
    }

    /// Serves one body after an optional delay, failing first with queued errors.
    pub(crate) struct StubFetcher {
        body: Bytes,
        delay: Duration,
        failures: Mutex<VecDeque<FetchError>>,
        always: Option<FetchError>,
        panics: bool,
        calls: AtomicUsize,
        active: AtomicUsize,
        peak: AtomicUsize,
    }

    impl StubFetcher {
        pub(crate) fn serving(body: Bytes) -> Self {
            Self {
                body,
                delay: Duration::ZERO,
                failures: Mutex::new(VecDeque::new()),
                always: None,
                panics: false,
                calls: AtomicUsize::new(0),
                active: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }

        pub(crate) fn panicking() -> Self {
            Self {
                panics: true,
                ..Self::serving(Bytes::new())
            }
        }

        pub(crate) fn failing(err: FetchError) -> Self {
            Self {
                always: Some(err),
                ..Self::serving(Bytes::new())
            }
        }

        pub(crate) fn delayed(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        pub(crate) fn fail_first(self, errors: impl IntoIterator<Item = FetchError>) -> Self {
            self.failures.lock().unwrap().extend(errors);
            self
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        /// Most fetches seen running at once.
        pub(crate) fn peak(&self) -> usize {
            self.peak.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl OriginFetcher for StubFetcher {
        async fn fetch(&self, _url: &str) -> Result<Bytes, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.panics {
                panic!("origin fetch blew up");
            }
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.active.fetch_sub(1, Ordering::SeqCst);
            if let Some(err) = &self.always {
                return Err(err.clone());
            }
            if let Some(err) = self.failures.lock().unwrap().pop_front() {
                return Err(err);
            }
            Ok(self.body.clone())
        }
    }

    /// Real resizing, counted.
    #[derive(Default)]
    pub(crate) struct CountingProcessor {
        inner: ImageRsProcessor,
        calls: AtomicUsize,
    }

    impl CountingProcessor {
        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ImageProcessor for CountingProcessor {
        fn resize_to_jpeg(&self, img_bytes: &[u8], max_w: u32, max_h: u32) -> Result<Vec<u8>, DecodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.resize_to_jpeg(img_bytes, max_w, max_h)
        }
    }

    struct Fixture {
        store: Arc<MemoryThumbnailStore>,
        fetcher: Arc<StubFetcher>,
        processor: Arc<CountingProcessor>,
        metrics: Arc<RecordingMetrics>,
        coordinator: ThumbnailCoordinator,
    }

    fn fast_retry() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(4),
        }
    }

    fn fixture(fetcher: StubFetcher) -> Fixture {
        fixture_with_workers(fetcher, 4)
    }

    fn fixture_with_workers(fetcher: StubFetcher, workers: usize) -> Fixture {
        let store = Arc::new(MemoryThumbnailStore::new(Arc::new(FixedClock::at(2025, 1, 1))));
        let fetcher = Arc::new(fetcher);
        let processor = Arc::new(CountingProcessor::default());
        let metrics = Arc::new(RecordingMetrics::default());
        let coordinator = ThumbnailCoordinator::new(
            store.clone(),
            fetcher.clone(),
            processor.clone(),
            metrics.clone(),
            workers,
            fast_retry(),
        );
        Fixture {
            store,
            fetcher,
            processor,
            metrics,
            coordinator,
        }
    }

    fn spec() -> ThumbnailSpec {
        ThumbnailSpec::new("https://example.com/a.png", 100, 100)
    }

    const WAIT: Duration = Duration::from_secs(5);

    /// Polls `cond` until it holds, giving up after a second.
    async fn eventually(mut cond: impl FnMut() -> bool) -> bool {
        for _ in 0..100 {
            if cond() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        cond()
    }

    #[tokio::test]
    async fn miss_produces_then_hit_skips_fetch() {
        let f = fixture(StubFetcher::serving(png(1000, 500)));

        let first = f.coordinator.ensure(&spec(), WAIT).await.unwrap();
        let second = f.coordinator.ensure(&spec(), WAIT).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(f.fetcher.calls(), 1);
        assert_eq!(f.processor.calls(), 1);
        assert!(f.store.get(&spec().key()).unwrap().is_ready());
        assert_eq!(f.coordinator.in_flight(), 0);
        assert_eq!(f.metrics.count("started 100x100"), 1);
        assert_eq!(f.metrics.count("finished 100x100"), 1);
    }

    #[tokio::test]
    async fn ready_record_is_served_without_any_job() {
        let f = fixture(StubFetcher::serving(png(10, 10)));
        f.store.get_or_create(&spec()).unwrap();
        f.store.attach_image(&spec().key(), b"cached").unwrap();

        let bytes = f.coordinator.ensure(&spec(), WAIT).await.unwrap();

        assert_eq!(&bytes[..], b"cached");
        assert_eq!(f.fetcher.calls(), 0);
        assert!(f.metrics.events().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_callers_share_one_job() {
        let f = fixture(StubFetcher::serving(png(400, 300)).delayed(Duration::from_millis(150)));
        let spec = spec();

        let calls = (0..8).map(|_| f.coordinator.ensure(&spec, WAIT));
        let results = futures::future::join_all(calls).await;

        let first = results[0].as_ref().unwrap().clone();
        for r in &results {
            assert_eq!(r.as_ref().unwrap(), &first);
        }
        assert_eq!(f.fetcher.calls(), 1);
        assert_eq!(f.processor.calls(), 1);
        assert_eq!(f.metrics.count("started"), 1);
        assert_eq!(f.coordinator.in_flight(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_callers_share_one_failure() {
        let f = fixture(
            StubFetcher::failing(FetchError::status(404, "missing")).delayed(Duration::from_millis(100)),
        );
        let spec = spec();

        let calls = (0..5).map(|_| f.coordinator.ensure(&spec, WAIT));
        let results = futures::future::join_all(calls).await;

        for r in results {
            assert!(matches!(r, Err(EnsureError::Transform(TransformError::Fetch(ref e))) if e.status == Some(404)));
        }
        assert_eq!(f.fetcher.calls(), 1);
        assert!(f.store.is_empty());
    }

    #[tokio::test]
    async fn failed_fetch_leaves_no_record() {
        let f = fixture(StubFetcher::failing(FetchError::status(404, "missing")));

        let err = f.coordinator.ensure(&spec(), WAIT).await.unwrap_err();

        assert!(matches!(err, EnsureError::Transform(TransformError::Fetch(_))));
        assert!(f.store.is_empty());
        assert_eq!(f.fetcher.calls(), 1, "permanent errors are not retried");
        assert_eq!(f.coordinator.in_flight(), 0);
        assert_eq!(f.metrics.count("finished"), 1);
    }

    #[tokio::test]
    async fn transient_fetch_errors_are_retried() {
        let fetcher = StubFetcher::serving(png(50, 50)).fail_first([
            FetchError::status(503, "unavailable"),
            FetchError::transport("connection reset"),
        ]);
        let f = fixture(fetcher);

        let bytes = f.coordinator.ensure(&spec(), WAIT).await.unwrap();

        assert!(!bytes.is_empty());
        assert_eq!(f.fetcher.calls(), 3);
        assert_eq!(f.processor.calls(), 1);
    }

    #[tokio::test]
    async fn retries_stop_at_the_attempt_budget() {
        let f = fixture(StubFetcher::failing(FetchError::status(502, "bad gateway")));

        let err = f.coordinator.ensure(&spec(), WAIT).await.unwrap_err();

        assert!(matches!(err, EnsureError::Transform(TransformError::Fetch(_))));
        assert_eq!(f.fetcher.calls(), 3);
        assert!(f.store.is_empty());
    }

    #[tokio::test]
    async fn undecodable_source_is_not_retried() {
        let f = fixture(StubFetcher::serving(Bytes::from_static(b"<html>nope</html>")));

        let err = f.coordinator.ensure(&spec(), WAIT).await.unwrap_err();

        assert!(matches!(err, EnsureError::Transform(TransformError::Decode(_))));
        assert_eq!(f.fetcher.calls(), 1);
        assert_eq!(f.processor.calls(), 1);
        assert!(f.store.is_empty());
    }

    #[tokio::test]
    async fn failure_returns_key_to_absent() {
        let fetcher = StubFetcher::serving(png(20, 20)).fail_first([FetchError::status(404, "not yet")]);
        let f = fixture(fetcher);

        assert!(f.coordinator.ensure(&spec(), WAIT).await.is_err());
        let bytes = f.coordinator.ensure(&spec(), WAIT).await.unwrap();

        assert!(!bytes.is_empty());
        assert_eq!(f.fetcher.calls(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn short_timeout_does_not_cancel_the_job() {
        let f = fixture(StubFetcher::serving(png(200, 100)).delayed(Duration::from_millis(300)));
        let spec = spec();

        let (impatient, patient) = tokio::join!(
            f.coordinator.ensure(&spec, Duration::from_millis(20)),
            f.coordinator.ensure(&spec, WAIT),
        );

        assert!(matches!(impatient, Err(EnsureError::Timeout(d)) if d == Duration::from_millis(20)));
        assert!(!patient.unwrap().is_empty());
        assert_eq!(f.fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn distinct_boxes_run_distinct_jobs() {
        let f = fixture(StubFetcher::serving(png(300, 300)));
        let small = ThumbnailSpec::new("https://example.com/a.png", 50, 50);
        let large = ThumbnailSpec::new("https://example.com/a.png", 200, 200);

        let a = f.coordinator.ensure(&small, WAIT).await.unwrap();
        let b = f.coordinator.ensure(&large, WAIT).await.unwrap();

        assert_ne!(a, b);
        assert_eq!(f.fetcher.calls(), 2);
        assert_eq!(f.store.len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn worker_limit_bounds_concurrent_jobs() {
        let f = fixture_with_workers(
            StubFetcher::serving(png(60, 60)).delayed(Duration::from_millis(100)),
            1,
        );
        let a = ThumbnailSpec::new("https://example.com/a.png", 40, 40);
        let b = ThumbnailSpec::new("https://example.com/b.png", 40, 40);

        let (ra, rb) = tokio::join!(f.coordinator.ensure(&a, WAIT), f.coordinator.ensure(&b, WAIT));

        assert!(ra.is_ok());
        assert!(rb.is_ok());
        assert_eq!(f.fetcher.calls(), 2);
        assert_eq!(f.fetcher.peak(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn wider_pool_runs_jobs_side_by_side() {
        let f = fixture_with_workers(
            StubFetcher::serving(png(60, 60)).delayed(Duration::from_millis(150)),
            2,
        );
        let a = ThumbnailSpec::new("https://example.com/a.png", 40, 40);
        let b = ThumbnailSpec::new("https://example.com/b.png", 40, 40);

        let (ra, rb) = tokio::join!(f.coordinator.ensure(&a, WAIT), f.coordinator.ensure(&b, WAIT));

        assert!(ra.is_ok() && rb.is_ok());
        assert_eq!(f.fetcher.peak(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn panicking_job_aborts_waiters_and_cleans_up() {
        let f = fixture(StubFetcher::panicking());
        let spec = spec();

        let (first, second) = tokio::join!(f.coordinator.ensure(&spec, WAIT), f.coordinator.ensure(&spec, WAIT));

        for r in [first, second] {
            assert!(matches!(r, Err(EnsureError::Transform(TransformError::Aborted))), "{r:?}");
        }
        assert_eq!(f.fetcher.calls(), 1);
        assert!(eventually(|| f.coordinator.in_flight() == 0).await);
        assert!(eventually(|| f.store.is_empty()).await, "empty record left behind");
    }

    #[tokio::test]
    async fn key_is_usable_again_after_a_panicking_job() {
        let f = fixture(StubFetcher::panicking());
        assert!(f.coordinator.ensure(&spec(), WAIT).await.is_err());
        assert!(eventually(|| f.store.is_empty()).await);

        let g = ThumbnailCoordinator::new(
            f.store.clone(),
            Arc::new(StubFetcher::serving(png(30, 30))),
            Arc::new(CountingProcessor::default()),
            f.metrics.clone(),
            1,
            RetryPolicy::once(),
        );
        assert!(!g.ensure(&spec(), WAIT).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failure_deletes_a_record_left_by_an_earlier_run() {
        let f = fixture(StubFetcher::failing(FetchError::status(404, "missing")));
        let (_, created) = f.store.get_or_create(&spec()).unwrap();
        assert!(created);

        let err = f.coordinator.ensure(&spec(), WAIT).await.unwrap_err();

        assert!(matches!(err, EnsureError::Transform(TransformError::Fetch(_))));
        assert!(f.store.is_empty());
    }
}
