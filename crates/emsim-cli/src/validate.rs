//! # Validate Subcommand
//!
//! Validates each file independently and prints one line per file:
//! `OK <file>` or `FAIL <file>: <diagnostic>`.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use emsim_schema::{load_config, LoadError};

use crate::FormatArg;

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Configuration files to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Document format; inferred from each file's extension when omitted.
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,
}

/// Outcome counts of a validate run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidateReport {
    pub passed: usize,
    pub failed: usize,
}

impl ValidateReport {
    pub fn total(&self) -> usize {
        self.passed + self.failed
    }
}

/// Validate every file in `args`, writing one result line per file to `out`.
///
/// A file that fails validation is counted, not returned as an error; only
/// failures to write the report are errors.
pub fn run_validate(args: &ValidateArgs, out: &mut impl Write) -> anyhow::Result<ValidateReport> {
    let mut report = ValidateReport::default();
    for path in &args.files {
        match load_config(path, args.format.map(Into::into)) {
            Ok(config) => {
                tracing::info!(
                    file = %path.display(),
                    problem_type = %config.problem.problem_type,
                    "configuration is valid"
                );
                writeln!(out, "OK {}", path.display())?;
                report.passed += 1;
            }
            Err(e) => {
                let tag = match &e {
                    LoadError::Invalid(err) => format!("{:?}", err.kind()),
                    LoadError::Io { .. } => "Io".to_string(),
                    LoadError::Parse { .. } => "Parse".to_string(),
                };
                tracing::debug!(file = %path.display(), error = %e, "configuration rejected");
                writeln!(out, "FAIL {} [{tag}]: {e}", path.display())?;
                report.failed += 1;
            }
        }
    }
    Ok(report)
}
