//! Error types for sample file I/O.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for sample file operations.
pub type DxxResult<T> = Result<T, DxxError>;

/// Errors that can occur while reading or writing sample files.
#[derive(Debug, Error)]
pub enum DxxError {
    /// The file extension does not name a supported format.
    #[error("unsupported file extension '{extension}' (expected one of DSA, DFA, DDA, DSB, DFB, DDB, WAV)")]
    BadExtension {
        /// The extension that was found (empty if none).
        extension: String,
    },

    /// A binary file whose size is not a whole number of samples.
    #[error("data length {len} is not a multiple of the {width}-byte sample width")]
    TruncatedSample {
        /// Data length in bytes.
        len: usize,
        /// Sample width in bytes.
        width: usize,
    },

    /// An ASCII sample that could not be parsed.
    #[error("line {line}: cannot parse sample '{value}'")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// Offending token.
        value: String,
    },

    /// A WAV file with a sample layout this crate does not read.
    #[error("unsupported WAV layout: {message}")]
    UnsupportedWav {
        /// Description of the layout.
        message: String,
    },

    /// WAV decoding error.
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The finished temporary file could not be moved into place.
    #[error("failed to move finished file into place at {path}: {source}")]
    Persist {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl DxxError {
    /// Creates an unsupported WAV layout error.
    pub fn unsupported_wav(message: impl Into<String>) -> Self {
        Self::UnsupportedWav {
            message: message.into(),
        }
    }

    /// Returns true if the error means the file does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DxxError::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}
