//! JSON output types for machine-readable CLI output.
//!
//! This module provides structured output types for the `--json` flag on
//! `render` and `trajectory`.

use movejudge_render::{
    Angle, Channel, Direction, RenderError, RenderReport, RunOutcome, SweepTiming,
};
use serde::{Deserialize, Serialize};

/// Error codes for CLI operations.
///
/// These codes are stable and can be used for programmatic error handling.
/// Format: CLI_XXX for CLI-level errors; render errors pass through their
/// RENDER_XXX codes.
pub mod error_codes {
    /// File could not be read
    pub const FILE_READ: &str = "CLI_001";
    /// Unknown file extension
    pub const UNKNOWN_EXTENSION: &str = "CLI_002";
    /// JSON parse error
    pub const JSON_PARSE: &str = "CLI_003";
    /// Required setting given neither as a flag nor in the config file
    pub const MISSING_ARGUMENT: &str = "CLI_004";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_001", "RENDER_005")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Source file path (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl JsonError {
    /// Creates a new error with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            file: None,
        }
    }

    /// Sets the file path for this error.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for JsonError {}

/// Converts a RenderError to a JsonError.
pub fn render_error_to_json(err: &RenderError) -> JsonError {
    JsonError::new(err.code(), err.to_string())
}

/// Segment timing in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimingInfo {
    /// Samples each step contributes outside the crossfades
    pub duration_samples: usize,
    /// Samples shared by consecutive steps
    pub overlap_samples: usize,
}

impl From<SweepTiming> for TimingInfo {
    fn from(timing: SweepTiming) -> Self {
        Self {
            duration_samples: timing.duration_samples(),
            overlap_samples: timing.overlap_samples(),
        }
    }
}

/// JSON output for the `render` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderOutput {
    /// Whether every run succeeded
    pub success: bool,
    /// Errors that stopped the render before any run started
    pub errors: Vec<JsonError>,
    /// Timing shared by all runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<TimingInfo>,
    /// Length of the dry signal in samples
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dry_samples: Option<usize>,
    /// One entry per (direction, channel)
    pub runs: Vec<RunResult>,
}

/// Result of a single (direction, channel) run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Sweep direction
    pub direction: Direction,
    /// Ear channel
    pub channel: Channel,
    /// Whether this run wrote its output
    pub success: bool,
    /// Output file (on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Samples written (on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    /// Angle of every step (on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_angles: Option<Vec<Angle>>,
    /// Error (if failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonError>,
}

impl From<&RunOutcome> for RunResult {
    fn from(run: &RunOutcome) -> Self {
        match &run.result {
            Ok(report) => Self {
                direction: run.direction,
                channel: run.channel,
                success: true,
                path: Some(report.path.display().to_string()),
                length: Some(report.length),
                used_angles: Some(report.used_angles.clone()),
                error: None,
            },
            Err(err) => Self {
                direction: run.direction,
                channel: run.channel,
                success: false,
                path: None,
                length: None,
                used_angles: None,
                error: Some(render_error_to_json(err)),
            },
        }
    }
}

impl RenderOutput {
    /// Creates a render output from a finished report.
    pub fn from_report(report: &RenderReport) -> Self {
        Self {
            success: report.all_succeeded(),
            errors: Vec::new(),
            timing: Some(report.timing.into()),
            dry_samples: Some(report.dry_samples),
            runs: report.runs.iter().map(RunResult::from).collect(),
        }
    }

    /// Creates a failed render output.
    pub fn failure(errors: Vec<JsonError>) -> Self {
        Self {
            success: false,
            errors,
            timing: None,
            dry_samples: None,
            runs: Vec::new(),
        }
    }
}

/// Angles visited by one sweep direction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DirectionAngles {
    /// Sweep direction
    pub direction: Direction,
    /// Angle of every step
    pub angles: Vec<Angle>,
}

/// JSON output for the `trajectory` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrajectoryOutput {
    /// Whether the parameters were valid
    pub success: bool,
    /// Errors in the parameters
    pub errors: Vec<JsonError>,
    /// Steps per sweep
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_count: Option<usize>,
    /// Segment timing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<TimingInfo>,
    /// Samples in each rendered sweep
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_samples: Option<usize>,
    /// Angle sequence per direction
    pub directions: Vec<DirectionAngles>,
}

impl TrajectoryOutput {
    /// Creates a successful trajectory output.
    pub fn success(
        timing: SweepTiming,
        step_count: usize,
        directions: Vec<DirectionAngles>,
    ) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            step_count: Some(step_count),
            timing: Some(timing.into()),
            output_samples: Some(timing.output_len(step_count)),
            directions,
        }
    }

    /// Creates a failed trajectory output.
    pub fn failure(errors: Vec<JsonError>) -> Self {
        Self {
            success: false,
            errors,
            step_count: None,
            timing: None,
            output_samples: None,
            directions: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn test_json_error_skips_missing_file() {
        let err = JsonError::new(error_codes::FILE_READ, "nope");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json, serde_json::json!({"code": "CLI_001", "message": "nope"}));

        let err = err.with_file("a.json");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["file"], "a.json");
    }

    #[test]
    fn test_render_error_keeps_code() {
        let err = RenderError::invalid_param("move_width", "must be positive");
        let json = render_error_to_json(&err);
        assert_eq!(json.code, "RENDER_001");
        assert!(json.message.contains("move_width"));
    }

    #[test]
    fn test_run_result_success() {
        let run = RunOutcome {
            direction: Direction::Counterclockwise,
            channel: Channel::Right,
            result: Ok(movejudge_render::RunReport {
                direction: Direction::Counterclockwise,
                channel: Channel::Right,
                path: PathBuf::from("out/x.DDB"),
                length: 10,
                used_angles: vec![Angle::wrapping(0), Angle::wrapping(-1)],
            }),
        };
        let json = serde_json::to_value(RunResult::from(&run)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "direction": "counterclockwise",
                "channel": "R",
                "success": true,
                "path": "out/x.DDB",
                "length": 10,
                "used_angles": [0, 3599],
            })
        );
    }

    #[test]
    fn test_run_result_failure() {
        let run = RunOutcome {
            direction: Direction::Clockwise,
            channel: Channel::Left,
            result: Err(RenderError::invariant("boom")),
        };
        let result = RunResult::from(&run);
        assert!(!result.success);
        assert!(result.path.is_none());
        assert_eq!(result.error.unwrap().code, "RENDER_007");
    }
}
