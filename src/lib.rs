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
//! tempo-estimator estimates the dominant tempo (beats per minute) of a
//! decoded audio track from its raw sample buffer. It is `no_std`-compatible
//! but needs `alloc`.
//!
//! # How it works
//!
//! The heuristic is simple and doesn't aim for the accuracy of professional
//! tempo trackers:
//!
//! 1. The audio is band-limited to the range of kick drums (a 150 Hz lowpass
//!    filter followed by a 100 Hz highpass filter).
//! 2. The audio is divided into half-second windows. The loudest sample frame
//!    of each window is a peak. Only the loudest half of all peaks is kept.
//! 3. Each peak is compared with the next nine peaks. The distance of each
//!    pair implies a tempo, which is folded into the octave `[90, 180)` BPM
//!    and counted.
//! 4. The most frequent tempos are the candidates.
//!
//! # Example
//! ```rust
//! use tempo_estimator::{analyze, AnalysisRange, SampleBuffer};
//!
//! // Decoded interleaved stereo audio. Here: 3 seconds of silence.
//! let samples = vec![0.0; 3 * 44100 * 2];
//! let mut buffer = SampleBuffer::new(samples, 44100, 2).unwrap();
//! let candidates = analyze(&mut buffer, AnalysisRange::full()).unwrap();
//! match candidates.first() {
//!     Some(best) => println!("Most probable BPM is {}", best.tempo),
//!     None => println!("Cannot determine the BPM"),
//! }
//! ```
//!
//! # Crate features
//! - `std` (default): [`FileFormat::detect_reader`] for streams.
//! - `wav`: reading WAV data into a [`SampleBuffer`] via `hound`.

#![deny(
    clippy::all,
    clippy::cargo,
    clippy::nursery,
    clippy::must_use_candidate,
    // clippy::restriction,
    // clippy::pedantic
)]
// now allow a few rules which are denied by the above statement
// --> they are ridiculous and not necessary
#![allow(
    clippy::suboptimal_flops,
    clippy::redundant_pub_crate,
    clippy::fallible_impl_from,
    clippy::cast_precision_loss
)]
#![deny(missing_debug_implementations)]
#![deny(rustdoc::all)]
#![no_std]

extern crate alloc;

#[cfg_attr(any(test, feature = "std"), macro_use)]
#[cfg(any(test, feature = "std"))]
extern crate std;

mod analyzer;
mod error;
mod sample_buffer;

pub mod band_limiter;
pub mod format;
pub mod histogram;
pub mod peak;
pub mod ranking;
pub mod scratch;
#[cfg(feature = "wav")]
pub mod wav;

#[cfg(test)]
mod test_utils;

pub use analyzer::{AnalyzerConfig, TempoAnalyzer};
pub use band_limiter::{BandLimiter, FilterStateMode, InvalidFrequencyError};
pub use error::AnalysisError;
pub use format::FileFormat;
pub use histogram::{TempoBucket, TempoRange};
pub use peak::Peak;
pub use ranking::{TempoCandidate, TempoEstimate};
pub use sample_buffer::{AnalysisRange, ResolvedRange, SampleBuffer};

use alloc::vec::Vec;

/// Analyzes the given range of `buffer` with the default [`AnalyzerConfig`].
///
/// The buffer is band-limited in place. See [`TempoAnalyzer::analyze`].
pub fn analyze(
    buffer: &mut SampleBuffer,
    range: AnalysisRange,
) -> Result<Vec<TempoCandidate>, AnalysisError> {
    TempoAnalyzer::default().analyze(buffer, range)
}
