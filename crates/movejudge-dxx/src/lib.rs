//! Sample file codec for the DXX family and mono WAV.
//!
//! DXX files are headerless sample dumps whose extension names the layout:
//!
//! | extension | encoding | sample |
//! |-----------|----------|--------|
//! | `.DSA`    | text     | i16    |
//! | `.DFA`    | text     | f32    |
//! | `.DDA`    | text     | f64    |
//! | `.DSB`    | binary   | i16    |
//! | `.DFB`    | binary   | f32    |
//! | `.DDB`    | binary   | f64    |
//!
//! `.wav` files are read and written as 16-bit PCM so that signals can be
//! auditioned with ordinary tools.
//!
//! # Example
//!
//! ```ignore
//! let dry = movejudge_dxx::read("sounds/white_noise.DSB")?;
//! movejudge_dxx::write("out/copy.DDB", &dry)?;
//! ```

pub mod decode;
pub mod encode;
pub mod error;
pub mod format;

pub use decode::{decode, len_file, read};
pub use encode::{encode, write, write_with_rate, DEFAULT_SAMPLE_RATE};
pub use error::{DxxError, DxxResult};
pub use format::{Encoding, FileFormat, SampleType};
