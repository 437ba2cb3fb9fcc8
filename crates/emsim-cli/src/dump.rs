//! # Dump Subcommand
//!
//! Prints the validated configuration, with every default filled in, as
//! JSON.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use emsim_schema::load_config;

use crate::FormatArg;

/// Arguments for the dump subcommand.
#[derive(Args, Debug)]
pub struct DumpArgs {
    /// Configuration file to validate and print.
    pub file: PathBuf,

    /// Document format; inferred from the file extension when omitted.
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pub pretty: bool,
}

/// Validate `args.file` and write its typed configuration to `out`.
pub fn run_dump(args: &DumpArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let config = load_config(&args.file, args.format.map(Into::into))
        .with_context(|| format!("cannot dump {}", args.file.display()))?;
    if args.pretty {
        serde_json::to_writer_pretty(&mut *out, &config)?;
    } else {
        serde_json::to_writer(&mut *out, &config)?;
    }
    writeln!(out)?;
    Ok(())
}
