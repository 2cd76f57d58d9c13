//! Sample file format selection.
//!
//! The DXX family is headerless: the extension alone decides the sample type
//! (`S` = 16-bit integer, `F` = 32-bit float, `D` = 64-bit float) and the
//! encoding (`A` = newline separated text, `B` = little-endian binary).

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DxxError, DxxResult};

/// Storage type of a single sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleType {
    /// Signed 16-bit integer.
    Int16,
    /// IEEE 754 single precision.
    Float32,
    /// IEEE 754 double precision.
    Float64,
}

impl SampleType {
    /// Width of one binary sample in bytes.
    pub fn byte_width(self) -> usize {
        match self {
            SampleType::Int16 => 2,
            SampleType::Float32 => 4,
            SampleType::Float64 => 8,
        }
    }
}

/// How samples are laid out in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// One decimal sample per line.
    Ascii,
    /// Raw little-endian samples.
    Binary,
    /// RIFF/WAVE container.
    Wav,
}

/// A supported sample file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FileFormat {
    /// ASCII 16-bit integer.
    Dsa,
    /// ASCII 32-bit float.
    Dfa,
    /// ASCII 64-bit float.
    Dda,
    /// Binary 16-bit integer.
    Dsb,
    /// Binary 32-bit float.
    Dfb,
    /// Binary 64-bit float.
    Ddb,
    /// Mono 16-bit PCM WAV.
    Wav,
}

impl FileFormat {
    /// Every supported format.
    pub const ALL: [FileFormat; 7] = [
        FileFormat::Dsa,
        FileFormat::Dfa,
        FileFormat::Dda,
        FileFormat::Dsb,
        FileFormat::Dfb,
        FileFormat::Ddb,
        FileFormat::Wav,
    ];

    /// Resolves a format from a file extension (without the dot).
    ///
    /// Matching ignores ASCII case, so `DDB` and `ddb` are the same format.
    pub fn from_extension(extension: &str) -> DxxResult<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(extension))
            .ok_or_else(|| DxxError::BadExtension {
                extension: extension.to_string(),
            })
    }

    /// Resolves a format from a path's extension.
    pub fn from_path(path: &Path) -> DxxResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        Self::from_extension(extension)
    }

    /// Canonical extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Dsa => "DSA",
            FileFormat::Dfa => "DFA",
            FileFormat::Dda => "DDA",
            FileFormat::Dsb => "DSB",
            FileFormat::Dfb => "DFB",
            FileFormat::Ddb => "DDB",
            FileFormat::Wav => "wav",
        }
    }

    /// Sample storage type.
    pub fn sample_type(self) -> SampleType {
        match self {
            FileFormat::Dsa | FileFormat::Dsb | FileFormat::Wav => SampleType::Int16,
            FileFormat::Dfa | FileFormat::Dfb => SampleType::Float32,
            FileFormat::Dda | FileFormat::Ddb => SampleType::Float64,
        }
    }

    /// Sample layout.
    pub fn encoding(self) -> Encoding {
        match self {
            FileFormat::Dsa | FileFormat::Dfa | FileFormat::Dda => Encoding::Ascii,
            FileFormat::Dsb | FileFormat::Dfb | FileFormat::Ddb => Encoding::Binary,
            FileFormat::Wav => Encoding::Wav,
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for FileFormat {
    type Err = DxxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s.trim_start_matches('.'))
    }
}
