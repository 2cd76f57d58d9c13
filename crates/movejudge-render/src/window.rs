//! Crossfade window generation.
//!
//! The curves are a four-term cosine series whose fade-in and fade-out are
//! close to power complementary (`fade_in[i]^2 + fade_out[i]^2` stays within
//! 2e-4 of 1), so uncorrelated neighbouring segments keep a near constant
//! loudness through the crossfade.

use std::f64::consts::{PI, SQRT_2};

/// Fourier series window coefficients.
fn coefficients() -> [f64; 4] {
    let root = ((5.0 - 2.0 * SQRT_2) / 2.0).sqrt();
    [
        (1.0 + SQRT_2) / 4.0,
        0.25 + 0.25 * root,
        (1.0 - SQRT_2) / 4.0,
        0.25 - 0.25 * root,
    ]
}

/// Rising edge of the window at normalized phase `t` in `[0, 1]`.
fn rising(t: f64) -> f64 {
    let [a0, a1, a2, a3] = coefficients();
    a0 - a1 * (PI * t).cos() + a2 * (2.0 * PI * t).cos() - a3 * (3.0 * PI * t).cos()
}

/// Paired fade-in/fade-out coefficients for one overlap region.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossfadeWindow {
    fade_in: Vec<f64>,
    fade_out: Vec<f64>,
}

impl CrossfadeWindow {
    /// Computes the window pair for an overlap of `overlap_samples`.
    ///
    /// `fade_in` rises from 0 to 1 across the region and `fade_out` is its
    /// exact time reversal, so `fade_out[i] == fade_in[n - 1 - i]` holds
    /// bit-for-bit. Below two samples there is no edge to trace and both
    /// curves sit at zero; [`SweepTiming`](crate::SweepTiming) never asks for
    /// such a window.
    pub fn new(overlap_samples: usize) -> Self {
        let last = overlap_samples.saturating_sub(1).max(1) as f64;
        let fade_in: Vec<f64> = (0..overlap_samples)
            .map(|i| rising(i as f64 / last))
            .collect();
        let fade_out: Vec<f64> = fade_in.iter().rev().copied().collect();
        Self { fade_in, fade_out }
    }

    /// Number of samples in each curve.
    pub fn len(&self) -> usize {
        self.fade_in.len()
    }

    /// Returns true for a zero-length window.
    pub fn is_empty(&self) -> bool {
        self.fade_in.is_empty()
    }

    /// Rising curve applied to the incoming segment.
    pub fn fade_in(&self) -> &[f64] {
        &self.fade_in
    }

    /// Falling curve applied to the outgoing segment.
    pub fn fade_out(&self) -> &[f64] {
        &self.fade_out
    }
}
