//! Command-line definition for `ibexsnap`.
//!
//! The job takes no options: it always refreshes the full IBEX 35 registry
//! and writes `ibex_data.json` in the working directory. Diagnostic
//! verbosity follows `RUST_LOG` (default: off).

use clap::Parser;

/// Refresh the IBEX 35 end-of-day snapshot.
#[derive(Debug, Parser)]
#[command(
    name = "ibexsnap",
    author,
    version,
    about = "Refresh the IBEX 35 end-of-day snapshot",
    long_about = "Fetches the IBEX 35 index and the quotes of its 35 constituents from \
Yahoo Finance, one at a time, and writes the result to ibex_data.json.\n\
\n\
Companies that cannot be fetched after three attempts are left out of the file. \
Set RUST_LOG (for example RUST_LOG=ibexsnap_core=debug) to see diagnostics on stderr."
)]
pub struct Cli {}
