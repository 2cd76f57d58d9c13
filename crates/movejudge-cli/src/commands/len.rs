//! Len command implementation

use anyhow::{Context, Result};
use std::process::ExitCode;

/// Run the len command, printing the number of samples in `file`.
pub fn run(file: &str) -> Result<ExitCode> {
    let len = movejudge_dxx::len_file(file).with_context(|| format!("Failed to read {}", file))?;
    println!("{}", len);
    Ok(ExitCode::SUCCESS)
}
