//! Render configuration.

use std::path::{Path, PathBuf};

use movejudge_dxx::FileFormat;
use serde::{Deserialize, Serialize};

use crate::error::RenderResult;
use crate::timing::SweepTiming;
use crate::trajectory::{Angle, Channel, Direction, SweepParams};

/// Default sampling frequency in kHz.
pub const DEFAULT_SAMPLING_FREQ_KHZ: u32 = 48;

fn default_repeat_times() -> u32 {
    1
}

fn default_sampling_freq_khz() -> u32 {
    DEFAULT_SAMPLING_FREQ_KHZ
}

fn default_format() -> FileFormat {
    FileFormat::Ddb
}

fn default_parallel() -> bool {
    true
}

/// Everything needed to render the four sweeps of one stimulus.
///
/// Loaded from JSON; missing optional fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    /// Subject directory holding the `SLTF/` database.
    pub subject: PathBuf,
    /// Dry (unfiltered) source signal.
    pub input: PathBuf,
    /// Sweep width in tenths of a degree.
    pub move_width: u32,
    /// Angular velocity in tenths of a degree per second.
    pub move_velocity: u32,
    /// Number of out-and-back cycles.
    #[serde(default = "default_repeat_times")]
    pub repeat_times: u32,
    /// Angle every sweep starts and ends at, tenths of a degree.
    pub end_angle: u32,
    /// Directory the outputs are written to.
    pub out_dir: PathBuf,
    /// Sampling frequency of the dry signal and outputs.
    #[serde(default = "default_sampling_freq_khz")]
    pub sampling_freq_khz: u32,
    /// Format of the rendered files.
    #[serde(default = "default_format")]
    pub format: FileFormat,
    /// Format of the transfer function files.
    #[serde(default = "default_format")]
    pub sltf_format: FileFormat,
    /// Render the four sweeps concurrently.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl RenderConfig {
    /// Creates a config with default optional fields.
    pub fn new(
        subject: impl Into<PathBuf>,
        input: impl Into<PathBuf>,
        move_width: u32,
        move_velocity: u32,
        end_angle: u32,
        out_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            subject: subject.into(),
            input: input.into(),
            move_width,
            move_velocity,
            repeat_times: default_repeat_times(),
            end_angle,
            out_dir: out_dir.into(),
            sampling_freq_khz: default_sampling_freq_khz(),
            format: default_format(),
            sltf_format: default_format(),
            parallel: default_parallel(),
        }
    }

    /// Parses a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes the config to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Checks the numeric fields and returns the derived timing.
    pub fn validate(&self) -> RenderResult<SweepTiming> {
        Angle::checked("end_angle", self.end_angle)?;
        self.timing()
    }

    /// Segment timing for this config.
    pub fn timing(&self) -> RenderResult<SweepTiming> {
        SweepTiming::from_motion(
            self.move_width,
            self.move_velocity,
            self.repeat_times,
            self.sampling_freq_khz,
        )
    }

    /// Sweep parameters for one direction.
    pub fn sweep(&self, direction: Direction) -> SweepParams {
        SweepParams {
            move_width: self.move_width,
            repeat_times: self.repeat_times,
            direction,
            end_angle: Angle::wrapping(i64::from(self.end_angle)),
        }
    }

    /// Sample rate in Hz, as written into WAV headers.
    pub fn sample_rate(&self) -> u32 {
        self.sampling_freq_khz.saturating_mul(1000)
    }

    /// File name of the sweep for `direction` heard by `channel`.
    pub fn output_name(&self, direction: Direction, channel: Channel) -> String {
        format!(
            "move_judge_w{:03}_mt{:03}_{}_{}_{}.{}",
            self.move_width,
            self.move_velocity,
            direction.tag(),
            self.end_angle,
            channel.tag(),
            self.format.extension()
        )
    }

    /// Full path of the sweep for `direction` heard by `channel`.
    pub fn output_path(&self, direction: Direction, channel: Channel) -> PathBuf {
        self.out_dir.join(self.output_name(direction, channel))
    }

    /// Output directory.
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config() -> RenderConfig {
        RenderConfig::new("subjects/a", "dry.DDB", 20, 40, 450, "out")
    }

    #[test]
    fn test_output_name() {
        let c = config();
        assert_eq!(
            c.output_name(Direction::Clockwise, Channel::Left),
            "move_judge_w020_mt040_c_450_L.DDB"
        );
        assert_eq!(
            c.output_name(Direction::Counterclockwise, Channel::Right),
            "move_judge_w020_mt040_cc_450_R.DDB"
        );
    }

    #[test]
    fn test_output_name_uses_output_format() {
        let mut c = config();
        c.format = FileFormat::Wav;
        c.move_width = 1234;
        let path = c.output_path(Direction::Clockwise, Channel::Right);
        assert_eq!(
            path,
            Path::new("out").join("move_judge_w1234_mt040_c_450_R.wav")
        );
    }

    #[test]
    fn test_json_defaults() {
        let c = RenderConfig::from_json(
            r#"{
                "subject": "subjects/a",
                "input": "dry.DDB",
                "move_width": 20,
                "move_velocity": 40,
                "end_angle": 450,
                "out_dir": "out"
            }"#,
        )
        .unwrap();
        assert_eq!(c, config());
        assert_eq!(c.repeat_times, 1);
        assert_eq!(c.sampling_freq_khz, 48);
        assert_eq!(c.sltf_format, FileFormat::Ddb);
        assert!(c.parallel);
    }

    #[test]
    fn test_json_overrides() {
        let c = RenderConfig::from_json(
            r#"{
                "subject": "s",
                "input": "dry.wav",
                "move_width": 10,
                "move_velocity": 10,
                "repeat_times": 3,
                "end_angle": 0,
                "out_dir": "o",
                "sampling_freq_khz": 44,
                "format": "DSA",
                "sltf_format": "DFB",
                "parallel": false
            }"#,
        )
        .unwrap();
        assert_eq!(c.repeat_times, 3);
        assert_eq!(c.sampling_freq_khz, 44);
        assert_eq!(c.format, FileFormat::Dsa);
        assert_eq!(c.sltf_format, FileFormat::Dfb);
        assert!(!c.parallel);
    }

    #[test]
    fn test_json_rejects_unknown_fields() {
        let err = RenderConfig::from_json(
            r#"{"subject":"s","input":"i","move_width":1,"move_velocity":1,
                "end_angle":0,"out_dir":"o","speed":3}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("speed"));
    }

    #[test]
    fn test_json_roundtrip() {
        let c = config();
        let parsed = RenderConfig::from_json(&c.to_json_pretty().unwrap()).unwrap();
        assert_eq!(parsed, c);
    }

    #[test]
    fn test_validate() {
        assert!(config().validate().is_ok());

        let mut c = config();
        c.end_angle = 3600;
        let err = c.validate().unwrap_err();
        assert!(err.to_string().contains("end_angle"));

        let mut c = config();
        c.move_velocity = 0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_sweep_params() {
        let c = config();
        let p = c.sweep(Direction::Counterclockwise);
        assert_eq!(p.move_width, 20);
        assert_eq!(p.repeat_times, 1);
        assert_eq!(p.direction, Direction::Counterclockwise);
        assert_eq!(p.end_angle.tenths(), 450);
    }
}
