//! Segment timing derived from the sweep's angular velocity.

use serde::Serialize;

use crate::error::{RenderError, RenderResult};

/// Fraction of the dwelling time given to each segment, as `num / den`.
///
/// Leaves a 1/64 margin in every dwelling period.
pub const SEGMENT_FRACTION: (usize, usize) = (63, 64);

/// Shortest crossfade; a one-sample window has no rising edge.
pub const MIN_OVERLAP_SAMPLES: usize = 2;

/// Sample lengths of the sustained and crossfaded parts of each segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SweepTiming {
    duration_samples: usize,
    overlap_samples: usize,
}

impl SweepTiming {
    /// Creates a timing from explicit sample counts.
    ///
    /// The overlap must span at least [`MIN_OVERLAP_SAMPLES`] and be no longer
    /// than the duration.
    pub fn new(duration_samples: usize, overlap_samples: usize) -> RenderResult<Self> {
        if overlap_samples < MIN_OVERLAP_SAMPLES {
            return Err(RenderError::invalid_param(
                "overlap_samples",
                format!(
                    "must be at least {}, got {}",
                    MIN_OVERLAP_SAMPLES, overlap_samples
                ),
            ));
        }
        if duration_samples < overlap_samples {
            return Err(RenderError::invalid_param(
                "duration_samples",
                format!(
                    "must be at least the overlap ({} < {})",
                    duration_samples, overlap_samples
                ),
            ));
        }
        Ok(Self {
            duration_samples,
            overlap_samples,
        })
    }

    /// Derives the timing of a sweep that covers `move_width` angle units at
    /// `move_velocity` units per second.
    ///
    /// The sweep lasts `move_width * 1000 / move_velocity` milliseconds, shared
    /// evenly between its `2 * move_width * repeat_times + 1` steps. Both the
    /// duration and the overlap are 63/64 of that per-step dwelling time.
    pub fn from_motion(
        move_width: u32,
        move_velocity: u32,
        repeat_times: u32,
        sampling_freq_khz: u32,
    ) -> RenderResult<Self> {
        if move_width == 0 {
            return Err(RenderError::invalid_param("move_width", "must be positive"));
        }
        if move_velocity == 0 {
            return Err(RenderError::invalid_param(
                "move_velocity",
                "must be positive",
            ));
        }
        if repeat_times == 0 {
            return Err(RenderError::invalid_param(
                "repeat_times",
                "must be at least 1",
            ));
        }
        if sampling_freq_khz == 0 {
            return Err(RenderError::invalid_param(
                "sampling_freq_khz",
                "must be positive",
            ));
        }

        let move_time_ms = f64::from(move_width) * 1000.0 / f64::from(move_velocity);
        let steps = 2.0 * f64::from(move_width) * f64::from(repeat_times) + 1.0;
        let dwelling = (move_time_ms * f64::from(sampling_freq_khz) / steps).round() as usize;

        let (num, den) = SEGMENT_FRACTION;
        let samples = dwelling * num / den;
        if samples < MIN_OVERLAP_SAMPLES {
            return Err(RenderError::invalid_param(
                "move_velocity",
                format!(
                    "{} units/s leaves {} samples per step at {} kHz",
                    move_velocity, samples, sampling_freq_khz
                ),
            ));
        }
        Self::new(samples, samples)
    }

    /// Samples each step contributes outside the crossfades.
    pub fn duration_samples(&self) -> usize {
        self.duration_samples
    }

    /// Samples shared by consecutive steps.
    pub fn overlap_samples(&self) -> usize {
        self.overlap_samples
    }

    /// Offset of step `step`'s excerpt in the dry signal.
    pub fn excerpt_start(&self, step: usize) -> usize {
        step * (self.duration_samples + self.overlap_samples)
    }

    /// Length of a trimmed segment, `2 * duration`.
    pub fn segment_len(&self) -> usize {
        2 * self.duration_samples
    }

    /// Final output length of a sweep with `steps` steps.
    ///
    /// Every step appends its segment minus the crossfaded head, and the
    /// leading placeholder is dropped at the end.
    pub fn output_len(&self, steps: usize) -> usize {
        steps * (self.segment_len() - self.overlap_samples)
    }
}
