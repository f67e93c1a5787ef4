//! `recon` command-line entry point.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use recon::{run_batch, FailurePolicy, ReportOptions, RunConfig};
use recon_check::{
    CheckConfig, Comparison, DEFAULT_ENTHALPY_TOLERANCE, DEFAULT_OMEGADOT_TOLERANCE,
};
use recon_core::SnapshotBackend;
use recon_plotfile::PlotfileBackend;
use tracing::{debug, error};

#[derive(Parser)]
#[command(name = "recon")]
#[command(about = "Check reaction consistency of microphysics snapshot files")]
#[command(version)]
struct Args {
    /// Snapshot files to check
    files: Vec<PathBuf>,

    /// Tolerance for the per-species omegadot consistency fields
    #[arg(long, default_value_t = DEFAULT_OMEGADOT_TOLERANCE)]
    omegadot_tol: f64,

    /// Tolerance for the enthalpy consistency field
    #[arg(long, default_value_t = DEFAULT_ENTHALPY_TOLERANCE)]
    enthalpy_tol: f64,

    /// External heating was enabled in the run
    #[arg(long)]
    heating: bool,

    /// Burning was disabled in the run
    #[arg(long)]
    no_burning: bool,

    /// Compare absolute values and treat NaN as a violation
    #[arg(long)]
    magnitude: bool,

    /// Require the exact field count the species count implies
    #[arg(long)]
    strict_layout: bool,

    /// Stop at the first file that cannot be checked
    #[arg(long)]
    abort_on_error: bool,

    /// Print the first violating cell under each failing check
    #[arg(long)]
    show_failures: bool,

    /// Number of worker threads
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Logging level
    #[arg(
        long,
        default_value = "warn",
        value_parser = ["trace", "debug", "info", "warn", "error"]
    )]
    log_level: String,
}

impl Args {
    fn log_level(&self) -> tracing::Level {
        match self.log_level.as_str() {
            "trace" => tracing::Level::TRACE,
            "debug" => tracing::Level::DEBUG,
            "info" => tracing::Level::INFO,
            "error" => tracing::Level::ERROR,
            _ => tracing::Level::WARN,
        }
    }

    fn run_config(&self) -> RunConfig {
        RunConfig {
            check: CheckConfig {
                omegadot_tolerance: self.omegadot_tol,
                enthalpy_tolerance: self.enthalpy_tol,
                heating_enabled: self.heating,
                burning_enabled: !self.no_burning,
                comparison: if self.magnitude {
                    Comparison::Magnitude
                } else {
                    Comparison::Literal
                },
                strict_layout: self.strict_layout,
            },
            policy: if self.abort_on_error {
                FailurePolicy::Abort
            } else {
                FailurePolicy::Skip
            },
            jobs: self.jobs,
            report: ReportOptions {
                show_failures: self.show_failures,
            },
        }
    }
}

/// Run a parsed invocation and return the process exit status.
fn execute(
    args: &Args,
    backend: &dyn SnapshotBackend,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> u8 {
    if args.files.is_empty() {
        let _ = writeln!(out, "{}", Args::command().render_help());
        return 0;
    }

    let config = args.run_config();
    if let Err(e) = config.validate() {
        debug!(error = %e, "rejected configuration");
        let _ = writeln!(err, "Error: {e}");
        return 2;
    }

    match run_batch(backend, &args.files, &config, out, err) {
        Ok(summary) => {
            let _ = out.flush();
            debug!(?summary, "exiting");
            summary.exit_status()
        }
        Err(e) => {
            error!("failed to write report: {e}");
            2
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .with_writer(io::stderr)
        .init();

    let mut out = io::stdout().lock();
    // Unlocked: workers log to stderr while reports are written.
    let mut err = io::stderr();
    ExitCode::from(execute(&args, &PlotfileBackend, &mut out, &mut err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use recon_test_utils::{MockBackend, SnapshotBuilder};

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("recon").chain(argv.iter().copied())).unwrap()
    }

    fn execute_with(args: &Args, backend: &MockBackend) -> (u8, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let status = execute(args, backend, &mut out, &mut err);
        (
            status,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn defaults_map_to_default_config() {
        let config = parse(&["plt00000"]).run_config();
        assert_eq!(config.check, CheckConfig::default());
        assert_eq!(config.policy, FailurePolicy::Skip);
        assert_eq!(config.jobs, None);
        assert!(!config.report.show_failures);
    }

    #[test]
    fn flags_map_onto_run_config() {
        let config = parse(&[
            "--heating",
            "--no-burning",
            "--magnitude",
            "--strict-layout",
            "--abort-on-error",
            "--show-failures",
            "--jobs",
            "3",
            "--omegadot-tol",
            "2e-15",
            "--enthalpy-tol",
            "50",
            "plt00000",
        ])
        .run_config();
        assert!(config.check.heating_enabled);
        assert!(!config.check.burning_enabled);
        assert_eq!(config.check.comparison, Comparison::Magnitude);
        assert!(config.check.strict_layout);
        assert_eq!(config.check.omegadot_tolerance, 2e-15);
        assert_eq!(config.check.enthalpy_tolerance, 50.0);
        assert_eq!(config.policy, FailurePolicy::Abort);
        assert_eq!(config.jobs, Some(3));
        assert!(config.report.show_failures);
    }

    #[test]
    fn log_level_accepts_known_values_only() {
        assert_eq!(parse(&["--log-level", "debug"]).log_level(), tracing::Level::DEBUG);
        assert_eq!(parse(&[]).log_level(), tracing::Level::WARN);
        assert!(Args::try_parse_from(["recon", "--log-level", "bogus"]).is_err());
    }

    #[test]
    fn no_files_prints_usage_and_succeeds() {
        let (status, out, err) = execute_with(&parse(&[]), &MockBackend::new());
        assert_eq!(status, 0);
        assert!(out.contains("Usage: recon"));
        assert!(err.is_empty());
    }

    #[test]
    fn invalid_tolerance_exits_two() {
        let backend = MockBackend::new();
        let (status, out, err) = execute_with(&parse(&["--enthalpy-tol=-5", "plt"]), &backend);
        assert_eq!(status, 2);
        assert!(out.is_empty());
        assert!(err.starts_with("Error: "));
        assert!(backend.opened().is_empty());
    }

    #[test]
    fn missing_file_exits_two() {
        let (status, _, err) = execute_with(&parse(&["/nonexistent"]), &MockBackend::new());
        assert_eq!(status, 2);
        assert_eq!(err.lines().count(), 1);
    }

    #[test]
    fn checked_files_exit_zero() {
        let backend = MockBackend::new().with_snapshot(
            "plt00010",
            SnapshotBuilder::cube(2, &["C12"])
                .external_heating(&[0, 0, 0], 1.0)
                .build(),
        );
        let (status, out, _) = execute_with(&parse(&["plt00010"]), &backend);
        assert_eq!(status, 0);
        assert!(out.starts_with("Results for plt00010:"));
    }
}
