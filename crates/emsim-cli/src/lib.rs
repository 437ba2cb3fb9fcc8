//! # emsim-cli: Command-Line Interface
//!
//! ## Subcommands
//!
//! - `validate`: validate configuration files and report each result
//! - `dump`: print the validated, defaulted configuration as JSON
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers; handlers write to a
//!   caller-supplied writer so they can be tested without a terminal.
//! - Validation itself lives in `emsim-schema`.

pub mod dump;
pub mod validate;

use emsim_schema::DocumentFormat;

/// Document format selectable on the command line.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Json,
    Yaml,
}

impl From<FormatArg> for DocumentFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => DocumentFormat::Json,
            FormatArg::Yaml => DocumentFormat::Yaml,
        }
    }
}
