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
//! Module for [`AnalysisError`].

use crate::band_limiter::InvalidFrequencyError;
use thiserror::Error;

/// Possible errors when configuring or running a tempo analysis.
///
/// A buffer that is too short to yield any tempo is not an error. In that
/// case, the analysis returns an empty list of candidates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// The requested range of sample frames is not a valid sub-slice of the
    /// buffer.
    #[error("requested length exceeds available samples: start frame {start_frame} + length {length:?} > {available} frames")]
    InvalidRange {
        /// First requested frame.
        start_frame: usize,
        /// Requested length in frames. `None` means "to the end".
        length: Option<usize>,
        /// Number of complete frames in the buffer.
        available: usize,
    },
    /// The sample rate must be greater than zero.
    #[error("invalid sample rate: {0} Hz")]
    InvalidSampleRate(u32),
    /// There must be at least one channel.
    #[error("invalid channel count: {0}")]
    InvalidChannelCount(u16),
    /// The band-limiting filters can't be created for the sample rate.
    #[error("invalid filter frequencies")]
    InvalidFrequency(#[from] InvalidFrequencyError),
    /// A value of [`AnalyzerConfig`] is out of its valid domain.
    ///
    /// [`AnalyzerConfig`]: crate::AnalyzerConfig
    #[error("invalid analyzer configuration: {0}")]
    InvalidConfig(&'static str),
}
