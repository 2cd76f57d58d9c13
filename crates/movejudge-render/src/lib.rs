//! Moving Sound Source Renderer
//!
//! Renders the signal a listener would hear from a source sweeping back and
//! forth in azimuth, using measured per-angle transfer functions (SLTFs).
//!
//! # Overview
//!
//! A sweep is cut into one short segment per trajectory step. Each segment is
//! an excerpt of the dry signal convolved with the transfer function of the
//! angle the source occupies at that step, and consecutive segments are joined
//! by crossfading their overlapping edges:
//!
//! - **Trajectory** - out-and-back angle sequence around an end angle
//! - **Timing** - segment and crossfade lengths from the angular velocity
//! - **Convolution** - FFT linear convolution with cached plans
//! - **Crossfade** - four-term cosine-series fade-in/fade-out window pair
//! - **Overlap-add** - assembly of the filtered segments into one signal
//!
//! Every config renders four sweeps: clockwise and counterclockwise, each for
//! the left and right ear.
//!
//! # Example
//!
//! ```ignore
//! use movejudge_render::{render_all, RenderConfig};
//!
//! let config = RenderConfig::from_json(&std::fs::read_to_string("render.json")?)?;
//! let report = render_all(&config)?;
//! for run in report.succeeded() {
//!     println!("{}", run.length_line());
//! }
//! ```
//!
//! # Crate Structure
//!
//! - [`render_all()`] - Main entry point, renders and writes all four sweeps
//! - [`assembler`] - Overlap-add assembly of one sweep
//! - [`config`] - JSON-loadable render configuration
//! - [`convolution`] - FFT linear convolution
//! - [`segment`] - Per-step excerpt filtering
//! - [`sltf`] - Transfer function database and cache
//! - [`timing`] - Segment timing
//! - [`trajectory`] - Angle sequence of a sweep
//! - [`window`] - Crossfade window

pub mod assembler;
pub mod config;
pub mod convolution;
pub mod error;
pub mod render;
pub mod segment;
pub mod sltf;
pub mod timing;
pub mod trajectory;
pub mod window;

// Re-export main types at crate root
pub use assembler::{SweepAssembler, SweepOutput};
pub use config::{RenderConfig, DEFAULT_SAMPLING_FREQ_KHZ};
pub use convolution::Convolver;
pub use error::{RenderError, RenderResult};
pub use render::{
    combinations, render_all, render_with_source, RenderReport, RunOutcome, RunReport,
};
pub use sltf::{CachedSource, SltfDirectory, TransferFunctionSource};
pub use timing::SweepTiming;
pub use trajectory::{angle_at, Angle, Channel, Direction, SweepParams, Trajectory};
pub use window::CrossfadeWindow;
