//! Worker pool for checking many files at once.
//!
//! Tasks go out over an unbounded crossbeam channel; results come back
//! over a bounded one tagged with their input index, and [`InOrder`]
//! releases them strictly in input order. Dropping the consumer early
//! makes every worker stop after its current file. With
//! `stop_after_error`, workers also stop picking up files that sort after
//! the earliest failure seen so far.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use crossbeam_channel::Receiver;
use recon_check::{CheckConfig, SnapshotReport};
use recon_core::SnapshotBackend;
use tracing::{debug, trace};

use crate::driver::check_file;
use crate::error::ReconError;

/// Result of checking one file.
pub type FileResult = Result<SnapshotReport, ReconError>;

/// Check `paths` on `jobs` worker threads and hand the results, in input
/// order, to `consume`.
///
/// `consume` may stop early; remaining files are then abandoned. When
/// `stop_after_error` is set, files after a failing one are never opened
/// unless a worker had already started them, and the iterator ends after
/// the first failure in input order.
pub fn check_in_order<T>(
    backend: &dyn SnapshotBackend,
    paths: &[PathBuf],
    check: &CheckConfig,
    jobs: usize,
    stop_after_error: bool,
    consume: impl FnOnce(&mut dyn Iterator<Item = FileResult>) -> io::Result<T>,
) -> io::Result<T> {
    let (task_tx, task_rx) = crossbeam_channel::unbounded::<(usize, &Path)>();
    let (result_tx, result_rx) = crossbeam_channel::bounded(jobs * 2);

    for (index, path) in paths.iter().enumerate() {
        // Receiver is alive until the end of this function.
        let _ = task_tx.send((index, path.as_path()));
    }
    drop(task_tx);

    let first_failure = AtomicUsize::new(usize::MAX);

    thread::scope(|scope| {
        for worker in 0..jobs {
            let task_rx = task_rx.clone();
            let result_tx = result_tx.clone();
            let first_failure = &first_failure;
            thread::Builder::new()
                .name(format!("recon-worker-{worker}"))
                .spawn_scoped(scope, move || {
                    while let Ok((index, path)) = task_rx.recv() {
                        // Tasks arrive in index order, so every later task is past it too.
                        if index > first_failure.load(Ordering::Acquire) {
                            debug!(worker, index, "stopping after earlier failure");
                            break;
                        }
                        trace!(worker, path = %path.display(), "checking");
                        let result = check_file(backend, path, check);
                        if stop_after_error && result.is_err() {
                            first_failure.fetch_min(index, Ordering::AcqRel);
                        }
                        if result_tx.send((index, result)).is_err() {
                            break;
                        }
                    }
                    debug!(worker, "worker exiting");
                })?;
        }
        drop(task_rx);
        drop(result_tx);

        let mut ordered = InOrder::new(result_rx, paths.len());
        consume(&mut ordered)
    })
}

/// Re-sequences index-tagged results into input order.
pub(crate) struct InOrder<I> {
    rx: Receiver<(usize, I)>,
    pending: BTreeMap<usize, I>,
    next: usize,
    total: usize,
}

impl<I> InOrder<I> {
    pub(crate) fn new(rx: Receiver<(usize, I)>, total: usize) -> Self {
        Self {
            rx,
            pending: BTreeMap::new(),
            next: 0,
            total,
        }
    }
}

impl<I> Iterator for InOrder<I> {
    type Item = I;

    fn next(&mut self) -> Option<I> {
        loop {
            if let Some(item) = self.pending.remove(&self.next) {
                self.next += 1;
                return Some(item);
            }
            if self.next >= self.total {
                return None;
            }
            match self.rx.recv() {
                Ok((index, item)) => {
                    self.pending.insert(index, item);
                }
                Err(_) => return None,
            }
        }
    }
}
