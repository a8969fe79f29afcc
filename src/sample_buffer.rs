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
//! Module for [`SampleBuffer`] and [`AnalysisRange`].

use crate::AnalysisError;
use alloc::vec::Vec;

/// Decoded audio: interleaved `f32` samples plus sample rate and channel
/// count.
///
/// The number of samples doesn't have to be a multiple of the channel count.
/// A trailing partial frame is ignored by every operation of this crate.
///
/// The buffer is modified in place by the band-limiting step of the analysis.
/// Therefore, [`crate::TempoAnalyzer::analyze`] takes it by `&mut`.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
    channels: u16,
}

impl SampleBuffer {
    /// Creates a new buffer from interleaved samples (LRLR for stereo).
    pub fn new(samples: Vec<f32>, sample_rate: u32, channels: u16) -> Result<Self, AnalysisError> {
        if sample_rate == 0 {
            return Err(AnalysisError::InvalidSampleRate(sample_rate));
        }
        if channels == 0 {
            return Err(AnalysisError::InvalidChannelCount(channels));
        }
        Ok(Self {
            samples,
            sample_rate,
            channels,
        })
    }

    /// Convenient constructor for mono audio.
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Result<Self, AnalysisError> {
        Self::new(samples, sample_rate, 1)
    }

    /// Returns the interleaved samples.
    #[must_use]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Returns the interleaved samples mutably.
    pub fn samples_mut(&mut self) -> &mut [f32] {
        &mut self.samples
    }

    /// Returns the sample rate (Hz).
    #[must_use]
    pub const fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Returns the number of interleaved channels.
    #[must_use]
    pub const fn channels(&self) -> u16 {
        self.channels
    }

    /// Returns the number of complete frames.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Consumes the buffer and returns the underlying samples.
    #[must_use]
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    /// Resolves the range against this buffer. See [`AnalysisRange::resolve`].
    pub fn resolve(&self, range: AnalysisRange) -> Result<ResolvedRange, AnalysisError> {
        range.resolve(self.frame_count())
    }

    /// Returns the interleaved samples of the given range.
    pub(crate) fn range_mut(&mut self, range: ResolvedRange) -> &mut [f32] {
        let channels = self.channels as usize;
        let begin = range.start_frame * channels;
        let end = begin + range.length * channels;
        &mut self.samples[begin..end]
    }
}

/// The part of a [`SampleBuffer`] that should be analyzed, in sample frames.
///
/// A sample frame consists of one sample per channel.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct AnalysisRange {
    /// First frame to analyze.
    pub start_frame: usize,
    /// Number of frames to analyze. `None` means "until the end of the
    /// buffer".
    pub length: Option<usize>,
}

impl AnalysisRange {
    /// The whole buffer.
    #[must_use]
    pub const fn full() -> Self {
        Self {
            start_frame: 0,
            length: None,
        }
    }

    /// From `start_frame` to the end of the buffer.
    #[must_use]
    pub const fn from_frame(start_frame: usize) -> Self {
        Self {
            start_frame,
            length: None,
        }
    }

    /// `length` frames starting at `start_frame`.
    #[must_use]
    pub const fn new(start_frame: usize, length: usize) -> Self {
        Self {
            start_frame,
            length: Some(length),
        }
    }

    /// Checks the range against the number of available frames and returns
    /// the effective range.
    ///
    /// Without an explicit length, the effective length is exactly
    /// `available - start_frame`.
    pub fn resolve(self, available: usize) -> Result<ResolvedRange, AnalysisError> {
        let err = || AnalysisError::InvalidRange {
            start_frame: self.start_frame,
            length: self.length,
            available,
        };

        let remaining = available.checked_sub(self.start_frame).ok_or_else(err)?;
        let length = match self.length {
            None => remaining,
            Some(length) if length <= remaining => length,
            Some(_) => return Err(err()),
        };

        Ok(ResolvedRange {
            start_frame: self.start_frame,
            length,
        })
    }
}

/// A validated [`AnalysisRange`] that fits into its buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ResolvedRange {
    /// First frame.
    pub start_frame: usize,
    /// Number of frames.
    pub length: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use assert2::check;

    #[test]
    fn test_new_validates_format() {
        check!(SampleBuffer::new(vec![], 0, 1) == Err(AnalysisError::InvalidSampleRate(0)));
        check!(SampleBuffer::new(vec![], 44100, 0) == Err(AnalysisError::InvalidChannelCount(0)));
        check!(SampleBuffer::new(vec![], 44100, 2).is_ok());
    }

    #[test]
    fn test_frame_count_ignores_partial_frame() {
        let buffer = SampleBuffer::new(vec![0.0; 7], 44100, 2).unwrap();
        check!(buffer.frame_count() == 3);

        let buffer = SampleBuffer::new(vec![0.0; 2], 44100, 3).unwrap();
        check!(buffer.frame_count() == 0);
    }

    #[test]
    fn test_resolve_open_range() {
        check!(
            AnalysisRange::full().resolve(100)
                == Ok(ResolvedRange {
                    start_frame: 0,
                    length: 100
                })
        );
        check!(
            AnalysisRange::from_frame(40).resolve(100)
                == Ok(ResolvedRange {
                    start_frame: 40,
                    length: 60
                })
        );
        check!(
            AnalysisRange::from_frame(100).resolve(100)
                == Ok(ResolvedRange {
                    start_frame: 100,
                    length: 0
                })
        );
    }

    #[test]
    fn test_resolve_rejects_out_of_bounds() {
        check!(
            AnalysisRange::from_frame(101).resolve(100)
                == Err(AnalysisError::InvalidRange {
                    start_frame: 101,
                    length: None,
                    available: 100
                })
        );
        check!(
            AnalysisRange::new(50, 51).resolve(100)
                == Err(AnalysisError::InvalidRange {
                    start_frame: 50,
                    length: Some(51),
                    available: 100
                })
        );
        check!(AnalysisRange::new(50, 50).resolve(100).is_ok());
    }

    #[test]
    fn test_range_mut_covers_frames() {
        let mut buffer = SampleBuffer::new((0..10).map(|x| x as f32).collect(), 44100, 2).unwrap();
        let range = buffer.resolve(AnalysisRange::new(1, 3)).unwrap();
        let samples: &[f32] = buffer.range_mut(range);
        check!(samples == [2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
    }
}
