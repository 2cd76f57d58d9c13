//! Sample decoding.
//!
//! Samples are widened to `f64` without rescaling: a 16-bit file yields values
//! in `[-32768, 32767]`.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::{DxxError, DxxResult};
use crate::format::{Encoding, FileFormat, SampleType};

/// Reads every sample of a file, choosing the format from its extension.
pub fn read(path: impl AsRef<Path>) -> DxxResult<Vec<f64>> {
    let path = path.as_ref();
    let format = FileFormat::from_path(path)?;
    let bytes = fs::read(path)?;
    decode(format, &bytes)
}

/// Decodes a complete file image.
pub fn decode(format: FileFormat, bytes: &[u8]) -> DxxResult<Vec<f64>> {
    match format.encoding() {
        Encoding::Binary => decode_binary(bytes, format.sample_type()),
        Encoding::Ascii => {
            let text = std::str::from_utf8(bytes).map_err(|e| {
                DxxError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
            })?;
            parse_ascii(text, format.sample_type())
        }
        Encoding::Wav => decode_wav(bytes),
    }
}

/// Returns the number of samples in a file.
///
/// Binary files are measured from their size alone; other encodings are parsed.
pub fn len_file(path: impl AsRef<Path>) -> DxxResult<usize> {
    let path = path.as_ref();
    let format = FileFormat::from_path(path)?;
    match format.encoding() {
        Encoding::Binary => {
            let len = fs::metadata(path)?.len() as usize;
            let width = format.sample_type().byte_width();
            if len % width != 0 {
                return Err(DxxError::TruncatedSample { len, width });
            }
            Ok(len / width)
        }
        Encoding::Ascii => Ok(read(path)?.len()),
        Encoding::Wav => {
            let reader = hound::WavReader::open(path)?;
            Ok(reader.duration() as usize)
        }
    }
}

fn decode_binary(bytes: &[u8], sample_type: SampleType) -> DxxResult<Vec<f64>> {
    let width = sample_type.byte_width();
    if bytes.len() % width != 0 {
        return Err(DxxError::TruncatedSample {
            len: bytes.len(),
            width,
        });
    }

    let count = bytes.len() / width;
    let mut cursor = Cursor::new(bytes);
    let mut samples = Vec::with_capacity(count);
    for _ in 0..count {
        let sample = match sample_type {
            SampleType::Int16 => f64::from(cursor.read_i16::<LittleEndian>()?),
            SampleType::Float32 => f64::from(cursor.read_f32::<LittleEndian>()?),
            SampleType::Float64 => cursor.read_f64::<LittleEndian>()?,
        };
        samples.push(sample);
    }
    Ok(samples)
}

fn parse_ascii(text: &str, sample_type: SampleType) -> DxxResult<Vec<f64>> {
    let mut samples = Vec::new();
    for (index, line) in text.lines().enumerate() {
        for token in line.split_whitespace() {
            let parsed = match sample_type {
                SampleType::Int16 => token.parse::<i16>().ok().map(f64::from),
                SampleType::Float32 => token.parse::<f32>().ok().map(f64::from),
                SampleType::Float64 => token.parse::<f64>().ok(),
            };
            let sample = parsed.ok_or_else(|| DxxError::Parse {
                line: index + 1,
                value: token.to_string(),
            })?;
            samples.push(sample);
        }
    }
    Ok(samples)
}

/// Decodes a 16-bit integer WAV image, averaging channels down to mono.
fn decode_wav(bytes: &[u8]) -> DxxResult<Vec<f64>> {
    let mut reader = hound::WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();

    if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(DxxError::unsupported_wav(format!(
            "only 16-bit integer PCM is read, got {:?} {}-bit",
            spec.sample_format, spec.bits_per_sample
        )));
    }

    let interleaved: Vec<i16> = reader.samples::<i16>().collect::<Result<_, _>>()?;
    let channels = usize::from(spec.channels.max(1));
    if channels == 1 {
        return Ok(interleaved.into_iter().map(f64::from).collect());
    }

    Ok(interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().map(|&s| f64::from(s)).sum::<f64>() / channels as f64)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_binary_int16() {
        let bytes = [0x01, 0x00, 0xff, 0xff, 0x00, 0x80];
        let samples = decode(FileFormat::Dsb, &bytes).unwrap();
        assert_eq!(samples, vec![1.0, -1.0, -32768.0]);
    }

    #[test]
    fn test_decode_binary_float64() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0.5f64.to_le_bytes());
        bytes.extend_from_slice(&(-2.25f64).to_le_bytes());
        assert_eq!(decode(FileFormat::Ddb, &bytes).unwrap(), vec![0.5, -2.25]);
    }

    #[test]
    fn test_decode_binary_rejects_partial_sample() {
        let err = decode(FileFormat::Dfb, &[0, 0, 0]).unwrap_err();
        assert!(matches!(err, DxxError::TruncatedSample { len: 3, width: 4 }));
    }

    #[test]
    fn test_parse_ascii_accepts_exponent_notation() {
        let text = "1.000000e+00\n-2.5e-1\n\n3\n";
        assert_eq!(
            decode(FileFormat::Dda, text.as_bytes()).unwrap(),
            vec![1.0, -0.25, 3.0]
        );
    }

    #[test]
    fn test_parse_ascii_reports_line() {
        let err = decode(FileFormat::Dsa, b"12\n7.5\n").unwrap_err();
        match err {
            DxxError::Parse { line, value } => {
                assert_eq!(line, 2);
                assert_eq!(value, "7.5");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_file_is_empty_signal() {
        assert!(decode(FileFormat::Ddb, &[]).unwrap().is_empty());
        assert!(decode(FileFormat::Dda, b"").unwrap().is_empty());
    }
}
