//! Batch run configuration.

use recon_check::{CheckConfig, ConfigError};

/// What to do when a file cannot be loaded or does not fit the layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Report the error, skip the file, and keep going.
    #[default]
    Skip,
    /// Stop at the first failing file.
    ///
    /// With several jobs, files already in flight on other workers finish
    /// unreported; no further files are opened.
    Abort,
}

/// Presentation options for the text report.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReportOptions {
    /// Print the example message under each failing check.
    pub show_failures: bool,
}

/// Everything a batch run needs besides the file list.
#[derive(Clone, Debug, Default)]
pub struct RunConfig {
    /// Tolerances, gating flags and comparison mode.
    pub check: CheckConfig,
    /// Per-file failure handling.
    pub policy: FailurePolicy,
    /// Worker threads. `None` or `Some(1)` runs sequentially.
    pub jobs: Option<usize>,
    /// Report rendering.
    pub report: ReportOptions,
}

impl RunConfig {
    /// Validate the check configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.check.validate()
    }

    /// Worker count to use for `files` inputs.
    ///
    /// Explicit values are clamped to `[1, 64]` and never exceed the
    /// number of files.
    pub fn resolved_jobs(&self, files: usize) -> usize {
        let requested = self.jobs.unwrap_or(1).clamp(1, 64);
        requested.min(files.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sequential_and_skipping() {
        let c = RunConfig::default();
        assert_eq!(c.policy, FailurePolicy::Skip);
        assert_eq!(c.resolved_jobs(10), 1);
        assert!(!c.report.show_failures);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn jobs_clamped() {
        let mut c = RunConfig {
            jobs: Some(0),
            ..RunConfig::default()
        };
        assert_eq!(c.resolved_jobs(5), 1);
        c.jobs = Some(1000);
        assert_eq!(c.resolved_jobs(500), 64);
        c.jobs = Some(8);
        assert_eq!(c.resolved_jobs(3), 3);
        assert_eq!(c.resolved_jobs(0), 1);
    }

    #[test]
    fn invalid_tolerance_surfaces() {
        let mut c = RunConfig::default();
        c.check.enthalpy_tolerance = f64::NAN;
        assert!(c.validate().is_err());
    }
}
