//! Filtering of one dry-signal excerpt per trajectory step.

use std::ops::Range;

use crate::convolution::Convolver;
use crate::error::{RenderError, RenderResult};
use crate::timing::SweepTiming;
use crate::trajectory::Angle;

/// Filtered excerpt for one trajectory step.
///
/// Laid out as `[fade-in | sustain | fade-out]`, the outer regions each
/// `overlap` samples long.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    samples: Vec<f64>,
    overlap: usize,
}

impl Segment {
    /// Head that crossfades with the previous step's tail.
    pub fn fade_in(&self) -> &[f64] {
        &self.samples[..self.overlap]
    }

    /// Middle part, copied to the output unchanged.
    pub fn sustain(&self) -> &[f64] {
        &self.samples[self.overlap..self.samples.len() - self.overlap]
    }

    /// Tail that crossfades with the next step's head.
    pub fn fade_out(&self) -> &[f64] {
        &self.samples[self.samples.len() - self.overlap..]
    }

    /// Total length of all three regions.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if the segment has no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn for_test(samples: Vec<f64>, overlap: usize) -> Self {
        assert!(samples.len() >= 2 * overlap);
        Self { samples, overlap }
    }
}

/// Dry-signal range filtered for `step` with a transfer function of
/// `filter_len` samples.
///
/// The excerpt carries `3 * filter_len + 1` samples beyond the two durations so
/// that trimming the convolution transients still leaves a full segment.
pub fn excerpt_range(step: usize, filter_len: usize, timing: &SweepTiming) -> Range<usize> {
    let start = timing.excerpt_start(step);
    start..start + 2 * timing.duration_samples() + 3 * filter_len + 1
}

/// Cuts, filters and trims the excerpt for one trajectory step.
///
/// The convolution result loses `2 * filter_len` samples at each end, where
/// the filter only partially overlaps the excerpt.
pub fn process_segment(
    convolver: &mut Convolver,
    dry: &[f64],
    step: usize,
    angle: Angle,
    transfer_fn: &[f64],
    timing: &SweepTiming,
) -> RenderResult<Segment> {
    let filter_len = transfer_fn.len();
    if filter_len == 0 {
        return Err(RenderError::EmptyTransferFunction { angle });
    }

    let range = excerpt_range(step, filter_len, timing);
    if range.end > dry.len() {
        return Err(RenderError::DryTooShort {
            step,
            required: range.end,
            available: dry.len(),
        });
    }

    let filtered = convolver.convolve(&dry[range], transfer_fn)?;

    let trim = 2 * filter_len;
    let overlap = timing.overlap_samples();
    if filtered.len() < 2 * trim + 2 * overlap {
        return Err(RenderError::invariant(format!(
            "step {}: filtered length {} too short to trim {} and split {}",
            step,
            filtered.len(),
            trim,
            overlap
        )));
    }

    Ok(Segment {
        samples: filtered[trim..filtered.len() - trim].to_vec(),
        overlap,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn timing(duration: usize, overlap: usize) -> SweepTiming {
        SweepTiming::new(duration, overlap).unwrap()
    }

    #[test]
    fn test_excerpt_range() {
        let t = timing(10, 4);
        assert_eq!(excerpt_range(0, 3, &t), 0..30);
        assert_eq!(excerpt_range(2, 3, &t), 28..58);
    }

    #[test]
    fn test_segment_regions() {
        let t = timing(10, 4);
        let dry: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let mut convolver = Convolver::new();

        let segment =
            process_segment(&mut convolver, &dry, 1, Angle::wrapping(0), &[1.0], &t).unwrap();

        assert_eq!(segment.len(), t.segment_len());
        assert_eq!(segment.fade_in().len(), 4);
        assert_eq!(segment.sustain().len(), 12);
        assert_eq!(segment.fade_out().len(), 4);
    }

    #[test]
    fn test_unit_filter_passes_steady_state() {
        // A unit impulse keeps the excerpt as is; trimming drops 2 samples at
        // the front, so the segment starts 2 samples into the excerpt.
        let t = timing(6, 3);
        let dry: Vec<f64> = (0..200).map(|i| i as f64).collect();
        let mut convolver = Convolver::new();

        let segment =
            process_segment(&mut convolver, &dry, 2, Angle::wrapping(0), &[1.0], &t).unwrap();

        let start = t.excerpt_start(2) as f64 + 2.0;
        for (i, &s) in segment.fade_in().iter().enumerate() {
            assert!((s - (start + i as f64)).abs() < EPSILON);
        }
    }

    #[test]
    fn test_delay_filter_shifts_excerpt() {
        let t = timing(5, 5);
        let dry: Vec<f64> = (0..100).map(|i| (i * i) as f64).collect();
        let mut convolver = Convolver::new();

        // Three-tap pure delay by two samples.
        let segment = process_segment(
            &mut convolver,
            &dry,
            0,
            Angle::wrapping(0),
            &[0.0, 0.0, 1.0],
            &t,
        )
        .unwrap();

        // out[n] = dry[n - 2]; the segment starts at n = 6.
        for (i, &s) in segment.fade_in().iter().enumerate() {
            let n = 6 + i;
            assert!((s - ((n - 2) * (n - 2)) as f64).abs() < 1e-6);
        }
    }

    #[test]
    fn test_dry_too_short() {
        let t = timing(10, 10);
        let dry = vec![0.0; 30];
        let mut convolver = Convolver::new();

        let err = process_segment(&mut convolver, &dry, 1, Angle::wrapping(0), &[1.0; 4], &t)
            .unwrap_err();
        match err {
            RenderError::DryTooShort {
                step,
                required,
                available,
            } => {
                assert_eq!(step, 1);
                assert_eq!(required, 20 + 20 + 12 + 1);
                assert_eq!(available, 30);
            }
            other => panic!("expected DryTooShort, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_transfer_function() {
        let t = timing(4, 4);
        let mut convolver = Convolver::new();
        let err = process_segment(&mut convolver, &[0.0; 64], 0, Angle::wrapping(15), &[], &t)
            .unwrap_err();
        assert!(matches!(err, RenderError::EmptyTransferFunction { angle } if angle.tenths() == 15));
    }
}
