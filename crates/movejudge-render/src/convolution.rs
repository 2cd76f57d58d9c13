//! FFT-based linear convolution.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use crate::error::{RenderError, RenderResult};

/// Linear convolver with a reusable FFT plan cache.
///
/// Plans are cached by length inside the planner, so convolving many segments
/// of the same size only plans once.
pub struct Convolver {
    planner: FftPlanner<f64>,
}

impl Convolver {
    /// Creates a convolver with an empty plan cache.
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
        }
    }

    /// Full linear convolution of `x` and `y`, `x.len() + y.len() - 1` samples.
    ///
    /// Both inputs are zero-padded to the result length so the circular
    /// convolution computed in the frequency domain does not wrap. An empty
    /// input gives an empty result.
    pub fn convolve(&mut self, x: &[f64], y: &[f64]) -> RenderResult<Vec<f64>> {
        if x.is_empty() || y.is_empty() {
            return Ok(Vec::new());
        }

        let conv_len = x.len() + y.len() - 1;
        let mut x_pad = zero_pad(x, conv_len);
        let mut y_pad = zero_pad(y, conv_len);
        if x_pad.len() != conv_len || y_pad.len() != conv_len {
            return Err(RenderError::invariant(format!(
                "padded lengths {} and {} differ from convolution length {}",
                x_pad.len(),
                y_pad.len(),
                conv_len
            )));
        }

        let fft = self.planner.plan_fft_forward(conv_len);
        fft.process(&mut x_pad);
        fft.process(&mut y_pad);

        for (a, b) in x_pad.iter_mut().zip(&y_pad) {
            *a *= *b;
        }

        let ifft = self.planner.plan_fft_inverse(conv_len);
        ifft.process(&mut x_pad);

        // rustfft leaves the inverse unnormalized
        let scale = 1.0 / conv_len as f64;
        Ok(x_pad.iter().map(|c| c.re * scale).collect())
    }
}

impl Default for Convolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Widens `x` to complex samples, appending zeros up to `len`.
///
/// Inputs already at least `len` long are kept whole.
fn zero_pad(x: &[f64], len: usize) -> Vec<Complex<f64>> {
    let mut padded: Vec<Complex<f64>> = x.iter().map(|&s| Complex::new(s, 0.0)).collect();
    if padded.len() < len {
        padded.resize(len, Complex::new(0.0, 0.0));
    }
    padded
}
