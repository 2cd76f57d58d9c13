//! Sample encoding and atomic file output.

use std::io::{self, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};
use tempfile::NamedTempFile;

use crate::error::{DxxError, DxxResult};
use crate::format::{Encoding, FileFormat, SampleType};

/// Sample rate written into WAV headers when none is given.
pub const DEFAULT_SAMPLE_RATE: u32 = 48_000;

/// Writes samples to `path`, choosing the format from its extension.
///
/// WAV output uses [`DEFAULT_SAMPLE_RATE`].
pub fn write(path: impl AsRef<Path>, samples: &[f64]) -> DxxResult<()> {
    write_with_rate(path, samples, DEFAULT_SAMPLE_RATE)
}

/// Writes samples to `path` with an explicit WAV sample rate.
///
/// The data goes to a temporary file in the destination directory which is
/// renamed over `path` only after every byte has been flushed, so readers
/// never observe a partially written file.
pub fn write_with_rate(path: impl AsRef<Path>, samples: &[f64], sample_rate: u32) -> DxxResult<()> {
    let path = path.as_ref();
    let format = FileFormat::from_path(path)?;
    let bytes = encode(format, samples, sample_rate)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| DxxError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

/// Encodes samples into a complete file image.
///
/// Integer formats store raw amplitudes: values are rounded and saturated to
/// the 16-bit range without any normalization.
pub fn encode(format: FileFormat, samples: &[f64], sample_rate: u32) -> DxxResult<Vec<u8>> {
    let sample_type = format.sample_type();
    let bytes = match format.encoding() {
        Encoding::Binary => {
            let mut out = Vec::with_capacity(samples.len() * sample_type.byte_width());
            write_binary(&mut out, samples, sample_type)?;
            out
        }
        Encoding::Ascii => format_ascii(samples, sample_type).into_bytes(),
        Encoding::Wav => {
            let mut pcm = Vec::with_capacity(samples.len() * 2);
            write_binary(&mut pcm, samples, SampleType::Int16)?;
            let mut out = Vec::with_capacity(44 + pcm.len());
            write_wav(&mut out, sample_rate, &pcm)?;
            out
        }
    };
    Ok(bytes)
}

/// Converts a sample to 16-bit, rounding and clipping.
pub fn to_i16(sample: f64) -> i16 {
    sample.round().clamp(f64::from(i16::MIN), f64::from(i16::MAX)) as i16
}

fn write_binary<W: Write>(writer: &mut W, samples: &[f64], sample_type: SampleType) -> io::Result<()> {
    for &sample in samples {
        match sample_type {
            SampleType::Int16 => writer.write_i16::<LittleEndian>(to_i16(sample))?,
            SampleType::Float32 => writer.write_f32::<LittleEndian>(sample as f32)?,
            SampleType::Float64 => writer.write_f64::<LittleEndian>(sample)?,
        }
    }
    Ok(())
}

fn format_ascii(samples: &[f64], sample_type: SampleType) -> String {
    let mut text = String::with_capacity(samples.len() * 12);
    for &sample in samples {
        let line = match sample_type {
            SampleType::Int16 => to_i16(sample).to_string(),
            SampleType::Float32 => format!("{:e}", sample as f32),
            SampleType::Float64 => format!("{:e}", sample),
        };
        text.push_str(&line);
        text.push('\n');
    }
    text
}

/// Writes a mono 16-bit PCM RIFF/WAVE image.
fn write_wav<W: Write>(writer: &mut W, sample_rate: u32, pcm_data: &[u8]) -> io::Result<()> {
    const CHANNELS: u16 = 1;
    const BITS_PER_SAMPLE: u16 = 16;
    let block_align = CHANNELS * BITS_PER_SAMPLE / 8;
    let byte_rate = sample_rate * u32::from(block_align);

    let data_size = u32::try_from(pcm_data.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "WAV data exceeds 4 GiB"))?;
    let file_size = 36 + data_size;

    // RIFF header
    writer.write_all(b"RIFF")?;
    writer.write_u32::<LittleEndian>(file_size)?;
    writer.write_all(b"WAVE")?;

    // fmt chunk
    writer.write_all(b"fmt ")?;
    writer.write_u32::<LittleEndian>(16)?;
    writer.write_u16::<LittleEndian>(1)?; // PCM
    writer.write_u16::<LittleEndian>(CHANNELS)?;
    writer.write_u32::<LittleEndian>(sample_rate)?;
    writer.write_u32::<LittleEndian>(byte_rate)?;
    writer.write_u16::<LittleEndian>(block_align)?;
    writer.write_u16::<LittleEndian>(BITS_PER_SAMPLE)?;

    // data chunk
    writer.write_all(b"data")?;
    writer.write_u32::<LittleEndian>(data_size)?;
    writer.write_all(pcm_data)?;

    Ok(())
}
