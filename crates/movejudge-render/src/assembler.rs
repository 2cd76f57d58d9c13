//! Overlap-add assembly of a full sweep.

use serde::Serialize;

use crate::convolution::Convolver;
use crate::error::{RenderError, RenderResult};
use crate::segment::{process_segment, Segment};
use crate::sltf::TransferFunctionSource;
use crate::timing::SweepTiming;
use crate::trajectory::{angle_at, Angle, Channel, SweepParams};
use crate::window::CrossfadeWindow;

/// Result of one (direction, channel) sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepOutput {
    /// Continuous output signal.
    pub samples: Vec<f64>,
    /// Angle of every step, in order.
    pub used_angles: Vec<Angle>,
}

/// Growing output buffer whose last `overlap` samples are the pending tail of
/// the most recent segment.
#[derive(Debug)]
struct OverlapAdd {
    buffer: Vec<f64>,
    overlap: usize,
}

impl OverlapAdd {
    /// Starts with a silent placeholder tail, since the first segment has no
    /// predecessor to crossfade with.
    fn new(overlap: usize, capacity: usize) -> Self {
        let mut buffer = Vec::with_capacity(capacity + overlap);
        buffer.resize(overlap, 0.0);
        Self { buffer, overlap }
    }

    /// Crossfades `segment` onto the pending tail, then appends its sustain
    /// and its faded-out tail.
    fn push(&mut self, segment: &Segment, window: &CrossfadeWindow) {
        let tail_start = self.buffer.len() - self.overlap;
        for ((out, &s), &w) in self.buffer[tail_start..]
            .iter_mut()
            .zip(segment.fade_in())
            .zip(window.fade_in())
        {
            *out += s * w;
        }

        self.buffer.extend_from_slice(segment.sustain());

        self.buffer.extend(
            segment
                .fade_out()
                .iter()
                .zip(window.fade_out())
                .map(|(&s, &w)| s * w),
        );
    }

    /// Drops the leading placeholder.
    fn finish(mut self) -> Vec<f64> {
        self.buffer.drain(..self.overlap);
        self.buffer
    }
}

/// Renders sweeps for one set of sweep parameters.
///
/// Owns its convolver and window so that one assembler can render several
/// channels in sequence without replanning.
pub struct SweepAssembler {
    params: SweepParams,
    timing: SweepTiming,
    window: CrossfadeWindow,
    convolver: Convolver,
}

impl SweepAssembler {
    /// Creates an assembler for `params` with segments timed by `timing`.
    pub fn new(params: SweepParams, timing: SweepTiming) -> Self {
        Self {
            params,
            timing,
            window: CrossfadeWindow::new(timing.overlap_samples()),
            convolver: Convolver::new(),
        }
    }

    /// Sweep parameters.
    pub fn params(&self) -> &SweepParams {
        &self.params
    }

    /// Segment timing.
    pub fn timing(&self) -> &SweepTiming {
        &self.timing
    }

    /// Renders the sweep heard by `channel`.
    ///
    /// Loads one transfer function per step from `source`; the first failure
    /// aborts the sweep.
    pub fn assemble<S>(
        &mut self,
        dry: &[f64],
        channel: Channel,
        source: &S,
    ) -> RenderResult<SweepOutput>
    where
        S: TransferFunctionSource + ?Sized,
    {
        let steps = self.params.step_count();
        let expected_len = self.timing.output_len(steps);
        let mut output = OverlapAdd::new(self.timing.overlap_samples(), expected_len);
        let mut used_angles = Vec::with_capacity(steps);

        for step in 0..steps {
            let angle = angle_at(step, &self.params);
            let transfer_fn = source.load(angle, channel)?;
            let segment = process_segment(
                &mut self.convolver,
                dry,
                step,
                angle,
                &transfer_fn,
                &self.timing,
            )?;
            output.push(&segment, &self.window);
            used_angles.push(angle);
        }

        let samples = output.finish();
        if samples.len() != expected_len {
            return Err(RenderError::invariant(format!(
                "assembled {} samples, expected {}",
                samples.len(),
                expected_len
            )));
        }

        Ok(SweepOutput {
            samples,
            used_angles,
        })
    }
}
