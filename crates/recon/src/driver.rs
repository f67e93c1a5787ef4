//! Batch driver: load, check and report a list of snapshot files.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use recon_check::{CheckConfig, ConsistencyEngine, SnapshotReport};
use recon_core::SnapshotBackend;
use tracing::{debug, info, warn};

use crate::config::{FailurePolicy, RunConfig};
use crate::error::ReconError;
use crate::parallel::{self, FileResult};
use crate::report::write_report;

/// Load one file and run every check on it.
pub fn check_file(
    backend: &dyn SnapshotBackend,
    path: &Path,
    config: &CheckConfig,
) -> Result<SnapshotReport, ReconError> {
    let snapshot = backend.open(path).map_err(|source| ReconError::Load {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        path = %path.display(),
        dims = %snapshot.dims(),
        fields = snapshot.field_count(),
        "loaded snapshot"
    );
    let layout_error = |source| ReconError::Layout {
        path: path.to_path_buf(),
        source,
    };
    let engine = ConsistencyEngine::from_config(snapshot, config).map_err(layout_error)?;
    engine.run(config).map_err(layout_error)
}

/// Counters for a finished batch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Files checked and reported.
    pub checked: usize,
    /// Reported files with at least one failing check.
    pub with_violations: usize,
    /// Files that could not be checked, in input order.
    pub errors: Vec<PathBuf>,
    /// Files after the failing one that were not reported because the
    /// batch aborted.
    pub not_attempted: usize,
}

impl BatchSummary {
    /// `true` when every file was loaded and checked.
    pub fn all_loaded(&self) -> bool {
        self.errors.is_empty()
    }

    /// Process exit status: 0 when every file was checked, 2 otherwise.
    pub fn exit_status(&self) -> u8 {
        if self.all_loaded() {
            0
        } else {
            2
        }
    }
}

/// Check every file in `paths`, writing reports to `out` and per-file
/// errors to `err`.
///
/// Reports always appear in input order, whatever the worker count.
pub fn run_batch(
    backend: &dyn SnapshotBackend,
    paths: &[PathBuf],
    config: &RunConfig,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> io::Result<BatchSummary> {
    let jobs = config.resolved_jobs(paths.len());
    info!(files = paths.len(), jobs, policy = ?config.policy, "starting batch");

    let summary = if jobs <= 1 {
        let mut results = paths.iter().map(|p| check_file(backend, p, &config.check));
        emit(paths, &mut results, config, out, err)?
    } else {
        let stop_after_error = config.policy == FailurePolicy::Abort;
        parallel::check_in_order(
            backend,
            paths,
            &config.check,
            jobs,
            stop_after_error,
            |results| emit(paths, results, config, out, err),
        )?
    };

    info!(
        checked = summary.checked,
        with_violations = summary.with_violations,
        errors = summary.errors.len(),
        "batch finished"
    );
    Ok(summary)
}

fn emit(
    paths: &[PathBuf],
    results: &mut dyn Iterator<Item = FileResult>,
    config: &RunConfig,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> io::Result<BatchSummary> {
    let mut summary = BatchSummary::default();
    for (position, (path, result)) in paths.iter().zip(results).enumerate() {
        match result {
            Ok(report) => {
                write_report(out, path, &report, &config.report)?;
                summary.checked += 1;
                if !report.passed() {
                    summary.with_violations += 1;
                    warn!(
                        path = %path.display(),
                        failing = report.failures().count(),
                        "snapshot has inconsistent fields"
                    );
                }
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "cannot check file");
                writeln!(err, "Error: {e}")?;
                summary.errors.push(path.clone());
                if config.policy == FailurePolicy::Abort {
                    summary.not_attempted = paths.len() - position - 1;
                    break;
                }
            }
        }
    }
    Ok(summary)
}
