/*
MIT License

Copyright (c) 2024 Philipp Schuster

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/
//! Module for reading WAV data into a [`SampleBuffer`] (requires the `wav`
//! feature).
//!
//! Integer PCM samples are scaled to `-1.0..=1.0` by their full-scale value,
//! float samples are taken as they are.

use crate::{AnalysisError, SampleBuffer};
use hound::{SampleFormat, WavReader};
use std::io::Read;
use std::path::Path;
use std::vec::Vec;
use thiserror::Error;

/// Possible errors when reading WAV data with [`read_wav`].
#[derive(Debug, Error)]
pub enum WavReadError {
    /// The WAV data is malformed or can't be read.
    #[error("can't read WAV data")]
    Wav(#[from] hound::Error),
    /// The sample encoding is not supported.
    #[error("unsupported source encoding: {bits} bit {format:?}")]
    UnsupportedEncoding {
        /// Bits per sample.
        bits: u16,
        /// Integer or float.
        format: SampleFormat,
    },
    /// The format in the header is not valid for an analysis.
    #[error("invalid audio format")]
    Format(#[from] AnalysisError),
}

/// Reads WAV data into a [`SampleBuffer`]. A trailing incomplete frame is
/// dropped.
pub fn read_wav<R: Read>(reader: R) -> Result<SampleBuffer, WavReadError> {
    let reader = WavReader::new(reader)?;
    let spec = reader.spec();
    log::debug!("reading WAV data: {:?}, {} samples", spec, reader.len());

    let mut samples = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, bits @ (8 | 16 | 24 | 32)) => {
            let full_scale = (1_u64 << (bits - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|sample| sample.map(|sample| sample as f32 / full_scale))
                .collect::<Result<Vec<_>, _>>()?
        }
        (SampleFormat::Float, 32) => reader.into_samples::<f32>().collect::<Result<Vec<_>, _>>()?,
        (format, bits) => return Err(WavReadError::UnsupportedEncoding { bits, format }),
    };

    let channels = spec.channels.max(1) as usize;
    samples.truncate(samples.len() / channels * channels);
    Ok(SampleBuffer::new(samples, spec.sample_rate, spec.channels)?)
}

/// Convenient wrapper around [`read_wav`] for files.
pub fn read_wav_file<P: AsRef<Path>>(path: P) -> Result<SampleBuffer, WavReadError> {
    let file = std::fs::File::open(path).map_err(hound::Error::IoError)?;
    read_wav(std::io::BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;
    use crate::{AnalysisRange, TempoAnalyzer};
    use assert2::check;
    use float_cmp::approx_eq;
    use hound::{WavSpec, WavWriter};
    use std::io::Cursor;

    fn write_wav<S: hound::Sample + Copy>(spec: WavSpec, samples: &[S]) -> Vec<u8> {
        let mut bytes = Vec::new();
        let mut writer = WavWriter::new(Cursor::new(&mut bytes), spec).unwrap();
        for &sample in samples {
            writer.write_sample(sample).unwrap();
        }
        writer.finalize().unwrap();
        bytes
    }

    #[test]
    fn test_read_int16_stereo() {
        let spec = WavSpec {
            channels: 2,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let bytes = write_wav(spec, &[0_i16, 16384, -32768, 32767]);
        let buffer = read_wav(Cursor::new(bytes)).unwrap();

        check!(buffer.sample_rate() == 44100);
        check!(buffer.channels() == 2);
        check!(buffer.frame_count() == 2);
        let samples = buffer.samples();
        check!(samples[0] == 0.0);
        check!(samples[1] == 0.5);
        check!(samples[2] == -1.0);
        check!(approx_eq!(f32, samples[3], 1.0, epsilon = 0.0001));
    }

    #[test]
    fn test_read_int8_and_int24() {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 8,
            sample_format: SampleFormat::Int,
        };
        let bytes = write_wav(spec, &[-128_i8, 64]);
        let buffer = read_wav(Cursor::new(bytes)).unwrap();
        check!(buffer.samples() == [-1.0, 0.5]);

        let spec = WavSpec {
            bits_per_sample: 24,
            ..spec
        };
        let bytes = write_wav(spec, &[-8_388_608_i32, 4_194_304]);
        let buffer = read_wav(Cursor::new(bytes)).unwrap();
        check!(buffer.samples() == [-1.0, 0.5]);
    }

    #[test]
    fn test_read_float() {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 48000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let bytes = write_wav(spec, &[0.25_f32, -0.75]);
        let buffer = read_wav(Cursor::new(bytes)).unwrap();
        check!(buffer.samples() == [0.25, -0.75]);
    }

    #[test]
    fn test_read_garbage() {
        check!(matches!(
            read_wav(Cursor::new(b"definitely not a wav file".to_vec())),
            Err(WavReadError::Wav(_))
        ));
    }

    #[test]
    fn test_wav_round_trip_into_analysis() {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let samples = test_utils::decaying_pulse_train(44100, 10.0, 0.5);
        let bytes = write_wav(spec, &samples);

        let mut buffer = read_wav(Cursor::new(bytes)).unwrap();
        let candidates = TempoAnalyzer::default()
            .analyze(&mut buffer, AnalysisRange::full())
            .unwrap();
        check!(candidates[0].tempo == 120);
        check!(candidates[0].count == 25);
    }
}
