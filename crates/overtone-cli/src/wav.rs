//! WAV decode/encode built on hound.
//!
//! Integer PCM is normalized to [-1, 1] on read; output is always mono
//! 32-bit float at the source sample rate.

use std::io::{Read, Seek, Write};
use std::path::Path;

/// Decoded WAV contents: interleaved samples plus stream layout.
pub struct WavContents {
    pub samples: Vec<f64>,
    pub channels: usize,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
}

/// Read a WAV file into interleaved f64 samples.
pub fn read_wav(path: &Path) -> Result<WavContents, hound::Error> {
    read_from(hound::WavReader::open(path)?)
}

fn read_from<R: Read>(reader: hound::WavReader<R>) -> Result<WavContents, hound::Error> {
    let spec = reader.spec();
    let channels = spec.channels as usize;
    let sample_rate = spec.sample_rate;
    let bits = spec.bits_per_sample;

    let samples: Vec<f64> = match spec.sample_format {
        hound::SampleFormat::Int => {
            let max_val = (1_i64 << (bits - 1)) as f64;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f64 / max_val))
                .collect::<Result<_, _>>()?
        }
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<Result<_, _>>()?,
    };

    Ok(WavContents {
        samples,
        channels,
        sample_rate,
        bits_per_sample: bits,
    })
}

/// Write a mono buffer as a 32-bit float WAV file.
pub fn write_wav_mono(path: &Path, samples: &[f64], sample_rate: u32) -> Result<(), hound::Error> {
    let writer = hound::WavWriter::create(path, mono_float_spec(sample_rate))?;
    write_samples(writer, samples)
}

fn write_samples<W: Write + Seek>(
    mut writer: hound::WavWriter<W>,
    samples: &[f64],
) -> Result<(), hound::Error> {
    for &s in samples {
        writer.write_sample(s as f32)?;
    }
    writer.finalize()
}

fn mono_float_spec(sample_rate: u32) -> hound::WavSpec {
    hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    }
}
