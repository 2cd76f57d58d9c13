//! Render command implementation
//!
//! Renders the clockwise and counterclockwise sweeps for both ears from a
//! JSON config, command-line flags, or both.

use anyhow::Result;
use colored::Colorize;
use std::fs;
use std::process::ExitCode;

use movejudge_dxx::FileFormat;
use movejudge_render::{render_all, RenderConfig, RenderReport};

use super::json_output::{error_codes, render_error_to_json, JsonError, RenderOutput};

/// Exit code when setup succeeded but at least one run failed.
pub const EXIT_RUN_FAILED: u8 = 2;

/// Render settings given on the command line.
///
/// Every field overrides the matching value of the config file, if any.
#[derive(Debug, Clone, Default)]
pub struct RenderArgs {
    /// Path to a JSON render config
    pub config: Option<String>,
    /// Subject directory
    pub subject: Option<String>,
    /// Dry signal
    pub input: Option<String>,
    /// Sweep width in tenths of a degree
    pub move_width: Option<u32>,
    /// Angular velocity in tenths of a degree per second
    pub move_velocity: Option<u32>,
    /// Out-and-back cycles
    pub repeat_times: Option<u32>,
    /// End angle in tenths of a degree
    pub end_angle: Option<u32>,
    /// Output directory
    pub out_dir: Option<String>,
    /// Sampling frequency in kHz
    pub sampling_freq_khz: Option<u32>,
    /// Output format extension
    pub format: Option<String>,
    /// Transfer function format extension
    pub sltf_format: Option<String>,
    /// Render one sweep at a time
    pub sequential: bool,
}

/// Run the render command
///
/// # Arguments
/// * `args` - Render settings from the command line
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 if every run succeeded, 2 if any run failed, 1 on setup error
pub fn run(args: &RenderArgs, json_output: bool) -> Result<ExitCode> {
    if json_output {
        run_json(args)
    } else {
        run_human(args)
    }
}

/// Run render with human-readable (colored) output
fn run_human(args: &RenderArgs) -> Result<ExitCode> {
    let config = resolve_config(args)?;

    println!("{}", "Rendering moving source:".cyan().bold());
    println!("  {} {}", "Subject:".dimmed(), config.subject.display());
    println!("  {} {}", "Input:".dimmed(), config.input.display());
    println!(
        "  {} width={} velocity={} repeat={} end={}",
        "Sweep:".dimmed(),
        config.move_width,
        config.move_velocity,
        config.repeat_times,
        config.end_angle
    );
    println!("  {} {}", "Output:".dimmed(), config.out_dir.display());

    let report = render_all(&config)?;

    println!(
        "  {} duration={} overlap={} samples",
        "Timing:".dimmed(),
        report.timing.duration_samples(),
        report.timing.overlap_samples()
    );
    println!();

    print_runs(&report);

    if report.all_succeeded() {
        println!("\n{}", "All sweeps rendered.".green().bold());
        Ok(ExitCode::SUCCESS)
    } else {
        let failed = report.failed().count();
        println!(
            "\n{} {} of {} sweeps failed",
            "FAILED".red().bold(),
            failed,
            report.runs.len()
        );
        Ok(ExitCode::from(EXIT_RUN_FAILED))
    }
}

fn print_runs(report: &RenderReport) {
    for run in &report.runs {
        let label = format!("{}/{}", run.direction, run.channel);
        match &run.result {
            Ok(ok) => {
                println!("  {} {} {}", "OK".green(), label, ok.path.display());
                eprintln!("{}", ok.length_line());
                eprintln!("{}", ok.angles_line());
            }
            Err(err) => {
                println!("  {} {} {}", "FAILED".red(), label, err);
            }
        }
    }
}

/// Run render with machine-readable JSON output
fn run_json(args: &RenderArgs) -> Result<ExitCode> {
    let config = match resolve_config(args) {
        Ok(config) => config,
        Err(error) => {
            let output = RenderOutput::failure(vec![error]);
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(ExitCode::from(1));
        }
    };

    let report = match render_all(&config) {
        Ok(report) => report,
        Err(err) => {
            let output = RenderOutput::failure(vec![render_error_to_json(&err)]);
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(ExitCode::from(1));
        }
    };

    let output = RenderOutput::from_report(&report);
    println!("{}", serde_json::to_string_pretty(&output)?);

    if report.all_succeeded() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(EXIT_RUN_FAILED))
    }
}

/// Builds the render config from the optional config file and the flags.
pub fn resolve_config(args: &RenderArgs) -> Result<RenderConfig, JsonError> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => RenderConfig::new(
            require(&args.subject, "--subject")?,
            require(&args.input, "--input")?,
            require(&args.move_width, "--move-width")?,
            require(&args.move_velocity, "--move-velocity")?,
            require(&args.end_angle, "--end-angle")?,
            require(&args.out_dir, "--out-dir")?,
        ),
    };

    if let Some(subject) = &args.subject {
        config.subject = subject.into();
    }
    if let Some(input) = &args.input {
        config.input = input.into();
    }
    if let Some(move_width) = args.move_width {
        config.move_width = move_width;
    }
    if let Some(move_velocity) = args.move_velocity {
        config.move_velocity = move_velocity;
    }
    if let Some(repeat_times) = args.repeat_times {
        config.repeat_times = repeat_times;
    }
    if let Some(end_angle) = args.end_angle {
        config.end_angle = end_angle;
    }
    if let Some(out_dir) = &args.out_dir {
        config.out_dir = out_dir.into();
    }
    if let Some(khz) = args.sampling_freq_khz {
        config.sampling_freq_khz = khz;
    }
    if let Some(format) = &args.format {
        config.format = parse_format(format)?;
    }
    if let Some(format) = &args.sltf_format {
        config.sltf_format = parse_format(format)?;
    }
    if args.sequential {
        config.parallel = false;
    }

    Ok(config)
}

fn load_config(path: &str) -> Result<RenderConfig, JsonError> {
    let json = fs::read_to_string(path).map_err(|e| {
        JsonError::new(
            error_codes::FILE_READ,
            format!("Failed to read config {}: {}", path, e),
        )
        .with_file(path)
    })?;
    RenderConfig::from_json(&json).map_err(|e| {
        JsonError::new(
            error_codes::JSON_PARSE,
            format!("Invalid config {}: {}", path, e),
        )
        .with_file(path)
    })
}

fn require<T: Clone>(value: &Option<T>, flag: &str) -> Result<T, JsonError> {
    value.clone().ok_or_else(|| {
        JsonError::new(
            error_codes::MISSING_ARGUMENT,
            format!("{} is required when no --config is given", flag),
        )
    })
}

fn parse_format(extension: &str) -> Result<FileFormat, JsonError> {
    extension
        .parse()
        .map_err(|e| JsonError::new(error_codes::UNKNOWN_EXTENSION, format!("{}", e)))
}
