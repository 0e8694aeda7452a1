//! Background preview worker.
//!
//! Runs filter applications off the caller's thread so an interactive
//! front end stays responsive. There is at most one request of interest at
//! a time: every submission bumps a generation counter, queued requests
//! older than the newest are skipped, and results that finish after a
//! newer submission are dropped.

use crate::core::error::FilterResult;
use crate::execution::engine::{Dispatcher, FilterOutput};
use crossbeam::channel::{self, Receiver, Sender};
use image::RgbImage;
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// One "apply" action.
#[derive(Debug, Clone)]
pub struct PreviewRequest {
    /// Display name or id of the filter.
    pub filter: String,
    /// Decoded upload, shared between requests.
    pub image: Arc<RgbImage>,
    /// Kernel size as selected in the UI.
    pub kernel_size: Option<i64>,
}

impl PreviewRequest {
    /// Create a request.
    pub fn new(filter: impl Into<String>, image: Arc<RgbImage>, kernel_size: Option<i64>) -> Self {
        Self {
            filter: filter.into(),
            image,
            kernel_size,
        }
    }
}

/// Outcome of the most recent request.
#[derive(Debug)]
pub struct PreviewResult {
    /// Generation returned by [`PreviewWorker::submit`].
    pub generation: u64,
    /// Dispatch outcome.
    pub result: FilterResult<FilterOutput>,
}

struct Job {
    generation: u64,
    request: PreviewRequest,
}

#[derive(Default)]
struct Slot {
    result: Mutex<Option<PreviewResult>>,
    ready: Condvar,
}

/// Single background thread applying the latest submitted request.
pub struct PreviewWorker {
    jobs: Option<Sender<Job>>,
    latest: Arc<AtomicU64>,
    slot: Arc<Slot>,
    handle: Option<JoinHandle<()>>,
}

impl PreviewWorker {
    /// Spawn a worker over the built-in registry.
    pub fn spawn() -> std::io::Result<Self> {
        Self::with_dispatcher(Dispatcher::new())
    }

    /// Spawn a worker over a specific dispatcher.
    pub fn with_dispatcher(dispatcher: Dispatcher<'static>) -> std::io::Result<Self> {
        let (jobs, queue) = channel::unbounded();
        let latest = Arc::new(AtomicU64::new(0));
        let slot = Arc::new(Slot::default());

        let handle = {
            let latest = Arc::clone(&latest);
            let slot = Arc::clone(&slot);
            std::thread::Builder::new()
                .name("filterlab-preview".to_string())
                .spawn(move || run(dispatcher, queue, latest, slot))?
        };

        Ok(Self {
            jobs: Some(jobs),
            latest,
            slot,
            handle: Some(handle),
        })
    }

    /// Queue a request, superseding any earlier one. Returns its generation.
    pub fn submit(&self, request: PreviewRequest) -> u64 {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(jobs) = &self.jobs {
            if jobs.send(Job { generation, request }).is_err() {
                log::error!("preview worker has stopped; request {} dropped", generation);
            }
        }
        generation
    }

    /// Generation of the most recent submission (0 before any).
    pub fn latest_generation(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    /// Take the latest result if it is ready.
    pub fn try_take(&self) -> Option<PreviewResult> {
        let mut guard = self.slot.result.lock();
        take_if_current(&mut guard, self.latest_generation())
    }

    /// Wait up to `timeout` for the result of the latest submission.
    pub fn wait_latest(&self, timeout: Duration) -> Option<PreviewResult> {
        let deadline = Instant::now() + timeout;
        let mut guard = self.slot.result.lock();
        loop {
            if let Some(result) = take_if_current(&mut guard, self.latest_generation()) {
                return Some(result);
            }
            if self.slot.ready.wait_until(&mut guard, deadline).timed_out() {
                return take_if_current(&mut guard, self.latest_generation());
            }
        }
    }

    /// Stop the worker and wait for it to exit.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        // Closing the channel ends the worker loop.
        self.jobs.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("preview worker panicked");
            }
        }
    }
}

impl Drop for PreviewWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn take_if_current(slot: &mut Option<PreviewResult>, latest: u64) -> Option<PreviewResult> {
    if slot.as_ref().is_some_and(|r| r.generation == latest) {
        slot.take()
    } else {
        None
    }
}

fn run(dispatcher: Dispatcher<'static>, queue: Receiver<Job>, latest: Arc<AtomicU64>, slot: Arc<Slot>) {
    while let Ok(mut job) = queue.recv() {
        while let Ok(newer) = queue.try_recv() {
            log::warn!("preview request {} superseded by {}", job.generation, newer.generation);
            job = newer;
        }
        if job.generation != latest.load(Ordering::SeqCst) {
            continue;
        }

        let request = &job.request;
        let result = dispatcher.apply(&request.filter, &request.image, request.kernel_size);

        if job.generation != latest.load(Ordering::SeqCst) {
            log::debug!("discarding stale preview result {}", job.generation);
            continue;
        }
        *slot.result.lock() = Some(PreviewResult {
            generation: job.generation,
            result,
        });
        slot.ready.notify_all();
    }
    log::debug!("preview worker exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ChannelMode;
    use image::Rgb;

    fn image() -> Arc<RgbImage> {
        Arc::new(RgbImage::from_fn(32, 24, |x, y| Rgb([x as u8 * 8, y as u8 * 10, 128])))
    }

    #[test]
    fn test_single_request() {
        let worker = PreviewWorker::spawn().unwrap();
        let generation = worker.submit(PreviewRequest::new("Emboss", image(), None));
        let result = worker.wait_latest(Duration::from_secs(10)).unwrap();
        assert_eq!(result.generation, generation);
        assert_eq!(result.result.unwrap().mode, ChannelMode::Rgb);
        worker.shutdown();
    }

    #[test]
    fn test_latest_request_wins() {
        let worker = PreviewWorker::spawn().unwrap();
        let shared = image();
        worker.submit(PreviewRequest::new("Bilateral Filter", Arc::clone(&shared), Some(15)));
        worker.submit(PreviewRequest::new("Median Blur", Arc::clone(&shared), Some(7)));
        let last = worker.submit(PreviewRequest::new("Histogram Equalization", shared, None));

        let result = worker.wait_latest(Duration::from_secs(10)).unwrap();
        assert_eq!(result.generation, last);
        assert_eq!(result.result.unwrap().filter, "Histogram Equalization");
        assert!(worker.try_take().is_none());
    }

    #[test]
    fn test_errors_are_delivered() {
        let worker = PreviewWorker::spawn().unwrap();
        worker.submit(PreviewRequest::new("Smoothing", image(), Some(4)));
        let result = worker.wait_latest(Duration::from_secs(10)).unwrap();
        assert!(result.result.is_err());
    }

    #[test]
    fn test_nothing_pending() {
        let worker = PreviewWorker::spawn().unwrap();
        assert_eq!(worker.latest_generation(), 0);
        assert!(worker.wait_latest(Duration::from_millis(20)).is_none());
    }
}
