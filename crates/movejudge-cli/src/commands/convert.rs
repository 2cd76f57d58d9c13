//! Convert command implementation
//!
//! Re-encodes a sample file in the format named by the output extension.

use anyhow::{Context, Result};
use colored::Colorize;
use std::process::ExitCode;

/// Run the convert command
///
/// # Arguments
/// * `input` - Source file; its extension selects the decoder
/// * `output` - Destination file; its extension selects the encoder
/// * `sample_rate` - Sample rate written into WAV headers
///
/// # Returns
/// Exit code: 0 on success
pub fn run(input: &str, output: &str, sample_rate: u32) -> Result<ExitCode> {
    let samples =
        movejudge_dxx::read(input).with_context(|| format!("Failed to read {}", input))?;
    movejudge_dxx::write_with_rate(output, &samples, sample_rate)
        .with_context(|| format!("Failed to write {}", output))?;

    println!(
        "{} {} -> {} ({} samples)",
        "Converted".green().bold(),
        input,
        output,
        samples.len()
    );
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use movejudge_dxx::DEFAULT_SAMPLE_RATE;

    #[test]
    fn convert_binary_to_ascii() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("in.DSB");
        let output = tmp.path().join("out.DDA");
        movejudge_dxx::write(&input, &[1.0, -2.0, 300.0]).unwrap();

        let code = run(
            input.to_str().unwrap(),
            output.to_str().unwrap(),
            DEFAULT_SAMPLE_RATE,
        )
        .unwrap();

        assert_eq!(code, ExitCode::SUCCESS);
        assert_eq!(movejudge_dxx::read(&output).unwrap(), vec![1.0, -2.0, 300.0]);
    }

    #[test]
    fn convert_rejects_unknown_extension() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("in.DDB");
        movejudge_dxx::write(&input, &[0.5]).unwrap();
        let output = tmp.path().join("out.mp3");

        let err = run(input.to_str().unwrap(), output.to_str().unwrap(), 48_000).unwrap_err();
        assert!(err.to_string().contains("out.mp3"));
        assert!(!output.exists());
    }
}
