//! Plain-text report rendering.

use std::io::{self, Write};
use std::path::Path;

use recon_check::{CheckResult, SnapshotReport};

use crate::config::ReportOptions;

/// Underline printed beneath each file header.
pub const RULE: &str = "--------------------";

/// Render one file's results.
///
/// ```text
/// Results for plt00010:
/// --------------------
/// -Omegadot max error for C12: 0.0
/// -Enthalpy max error:         0.0
/// -Max nuclear heating value:  0.0
/// -Max external heating value: 0.0
///
/// ```
pub fn write_report(
    out: &mut dyn Write,
    path: &Path,
    report: &SnapshotReport,
    options: &ReportOptions,
) -> io::Result<()> {
    writeln!(out, "Results for {}:", path.display())?;
    writeln!(out, "{RULE}")?;
    for result in &report.mass_fractions {
        let line = format!("-Omegadot max error for {}: ", result.label);
        write_line(out, &line, result, options)?;
    }
    write_line(out, "-Enthalpy max error:         ", &report.enthalpy, options)?;
    write_line(
        out,
        "-Max nuclear heating value:  ",
        &report.heating.nuclear,
        options,
    )?;
    write_line(
        out,
        "-Max external heating value: ",
        &report.heating.external,
        options,
    )?;
    writeln!(out)
}

fn write_line(
    out: &mut dyn Write,
    prefix: &str,
    result: &CheckResult,
    options: &ReportOptions,
) -> io::Result<()> {
    writeln!(out, "{prefix}{:?}", result.max_observed)?;
    if options.show_failures && !result.passed {
        writeln!(
            out,
            "    {} ({} cells)",
            result.example_message(),
            result.violations
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use recon_check::{CheckConfig, ConsistencyEngine};
    use recon_test_utils::SnapshotBuilder;

    fn render(report: &SnapshotReport, options: &ReportOptions) -> String {
        let mut buf = Vec::new();
        write_report(&mut buf, Path::new("plt00000"), report, options).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn run(builder: SnapshotBuilder) -> SnapshotReport {
        ConsistencyEngine::new(builder.build())
            .run(&CheckConfig::default())
            .unwrap()
    }

    #[test]
    fn consistent_snapshot_prints_zeros() {
        let report = run(SnapshotBuilder::cube(2, &["C12", "O16"]));
        let text = render(&report, &ReportOptions::default());
        assert_eq!(
            text,
            "Results for plt00000:\n\
             --------------------\n\
             -Omegadot max error for C12: 0.0\n\
             -Omegadot max error for O16: 0.0\n\
             -Enthalpy max error:         0.0\n\
             -Max nuclear heating value:  0.0\n\
             -Max external heating value: 0.0\n\
             \n"
        );
    }

    #[test]
    fn values_use_shortest_float_form() {
        let report = run(SnapshotBuilder::cube(1, &["C12"])
            .omegadot_err("C12", &[0, 0, 0], 1e-15)
            .enthalpy_err(&[0, 0, 0], 2.5));
        let text = render(&report, &ReportOptions::default());
        assert!(text.contains("-Omegadot max error for C12: 1e-15\n"));
        assert!(text.contains("-Enthalpy max error:         2.5\n"));
    }

    #[test]
    fn show_failures_adds_example_lines() {
        let report = run(SnapshotBuilder::plane(2, 2, &["C12"])
            .external_heating(&[1, 0], 3.0));
        let options = ReportOptions {
            show_failures: true,
        };
        let text = render(&report, &options);
        assert!(text.contains(
            "-Max external heating value: 3.0\n    HEAT ERROR: Cell (1, 0) is not 0.0. (1 cells)\n"
        ));
        assert_eq!(text.matches("ERROR").count(), 1);
    }
}
