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
//! Module for [`BandLimiter`].
//!
//! Beats, or kicks, generally occur around the 100 to 150 Hz range. A
//! lowpass filter removes most of the song, a subsequent highpass filter
//! removes the bassline. What remains is mostly the kick drum.

use biquad::{Biquad, Coefficients, DirectForm1, Type};
use thiserror::Error;

/// Default cutoff frequency of the lowpass filter.
pub const LOWPASS_CUTOFF_HZ: f32 = 150.0;

/// Default cutoff frequency of the highpass filter.
pub const HIGHPASS_CUTOFF_HZ: f32 = 100.0;

/// Default Q value of both filters.
pub const FILTER_Q: f32 = 1.0;

/// Possible errors when working with [`FilterFrequencies`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidFrequencyError {
    /// The value is NaN, infinite, zero, or negative.
    #[error("frequency {0} Hz is not a positive finite value")]
    NotPositive(f32),
    /// The cutoff frequency doesn't fulfill the Nyquist rule.
    #[error("invalid cutoff frequency: {0} Hz * 2 >= sampling rate ({1} Hz)")]
    AboveNyquist(f32, f32),
    /// The Q value is NaN, infinite, zero, or negative.
    #[error("Q value {0} is not a positive finite value")]
    InvalidQ(f32),
    /// The filter coefficients can't be calculated for the cutoff frequency.
    #[error("biquad rejected the filter parameters for cutoff frequency {0} Hz")]
    Rejected(f32),
}

/// Represents a validated combination of sample rate, cutoff frequency,
/// and Q value for a single biquad filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterFrequencies {
    sample_rate_hz: f32,
    cutoff_fr_hz: f32,
    q: f32,
}

impl FilterFrequencies {
    /// Creates a new struct of validated filter parameters.
    pub fn new(sample_rate_hz: f32, cutoff_fr_hz: f32, q: f32) -> Result<Self, InvalidFrequencyError> {
        for value in [sample_rate_hz, cutoff_fr_hz] {
            if !value.is_finite() || value <= 0.0 {
                return Err(InvalidFrequencyError::NotPositive(value));
            }
        }
        if !q.is_finite() || q <= 0.0 {
            return Err(InvalidFrequencyError::InvalidQ(q));
        }

        // Check Nyquist
        if cutoff_fr_hz * 2.0 >= sample_rate_hz {
            return Err(InvalidFrequencyError::AboveNyquist(
                cutoff_fr_hz,
                sample_rate_hz,
            ));
        }

        Ok(Self {
            sample_rate_hz,
            cutoff_fr_hz,
            q,
        })
    }

    /// Returns the sample rate (Hz).
    #[must_use]
    pub const fn sample_rate_hz(&self) -> f32 {
        self.sample_rate_hz
    }

    /// Returns the cutoff frequency (Hz).
    #[must_use]
    pub const fn cutoff_fr_hz(&self) -> f32 {
        self.cutoff_fr_hz
    }

    /// Returns the Q value.
    #[must_use]
    pub const fn q(&self) -> f32 {
        self.q
    }

    /// Returns the cutoff frequency relative to the Nyquist frequency, in
    /// `(0, 1)`.
    #[must_use]
    pub fn normalized_cutoff(&self) -> f32 {
        2.0 * self.cutoff_fr_hz / self.sample_rate_hz
    }

    /// Creates a properly configured [`biquad`] filter acting as lowpass
    /// or highpass filter.
    fn create_biquad_filter(&self, pass: Pass) -> Result<DirectForm1<f32>, InvalidFrequencyError> {
        // `Coefficients::from_params` of biquad 0.5 places the cutoff at a
        // quarter of the given frequency, hence the normalized variant.
        let f0 = self.normalized_cutoff();

        let coefficients = match pass {
            Pass::Low => Coefficients::<f32>::from_normalized_params(Type::LowPass, f0, self.q),
            Pass::High => Coefficients::<f32>::from_normalized_params(Type::HighPass, f0, self.q),
        }
        .map_err(|_| InvalidFrequencyError::Rejected(self.cutoff_fr_hz))?;
        Ok(DirectForm1::<f32>::new(coefficients))
    }
}

#[derive(Debug, Clone, Copy)]
enum Pass {
    Low,
    High,
}

/// How the filter state is shared between the channels of interleaved audio.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterStateMode {
    /// One filter pair runs over all samples of channel 0, then continues
    /// with its state over all samples of channel 1, and so on. State from
    /// one channel bleeds into the beginning of the next one.
    #[default]
    Shared,
    /// Each channel is filtered by a freshly reset filter pair.
    PerChannel,
}

/// Parameters for a filter with one of the built-in cutoff frequencies.
///
/// Audio with a sample rate of at most twice the cutoff frequency can't be
/// filtered at that frequency. Instead of failing, `None` is returned and
/// the stage is skipped.
pub fn default_stage(
    sample_rate_hz: f32,
    cutoff_fr_hz: f32,
    q: f32,
) -> Result<Option<FilterFrequencies>, InvalidFrequencyError> {
    match FilterFrequencies::new(sample_rate_hz, cutoff_fr_hz, q) {
        Ok(frequencies) => Ok(Some(frequencies)),
        Err(InvalidFrequencyError::AboveNyquist(..)) => {
            log::warn!(
                "skipping the {cutoff_fr_hz} Hz filter: sample rate of {sample_rate_hz} Hz is too low"
            );
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Lowpass filter followed by a highpass filter, applied in place on
/// interleaved audio. A missing stage passes the samples through.
#[derive(Debug)]
pub struct BandLimiter {
    lowpass: Option<DirectForm1<f32>>,
    highpass: Option<DirectForm1<f32>>,
    mode: FilterStateMode,
}

impl BandLimiter {
    /// Creates a new band limiter from validated filter parameters. A stage
    /// without parameters is skipped.
    pub fn new(
        lowpass: Option<FilterFrequencies>,
        highpass: Option<FilterFrequencies>,
        mode: FilterStateMode,
    ) -> Result<Self, InvalidFrequencyError> {
        Ok(Self {
            lowpass: lowpass
                .map(|lowpass| lowpass.create_biquad_filter(Pass::Low))
                .transpose()?,
            highpass: highpass
                .map(|highpass| highpass.create_biquad_filter(Pass::High))
                .transpose()?,
            mode,
        })
    }

    /// Creates the band limiter with the default cutoff frequencies of
    /// [`LOWPASS_CUTOFF_HZ`] and [`HIGHPASS_CUTOFF_HZ`]. See
    /// [`default_stage`] for low sample rates.
    pub fn with_defaults(sample_rate_hz: f32) -> Result<Self, InvalidFrequencyError> {
        let lowpass = default_stage(sample_rate_hz, LOWPASS_CUTOFF_HZ, FILTER_Q)?;
        let highpass = default_stage(sample_rate_hz, HIGHPASS_CUTOFF_HZ, FILTER_Q)?;
        Self::new(lowpass, highpass, FilterStateMode::default())
    }

    /// Returns `true` if the lowpass and the highpass stage are both active.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.lowpass.is_some() && self.highpass.is_some()
    }

    /// Filters the interleaved samples in place, channel by channel.
    ///
    /// Samples of a trailing partial frame are left untouched.
    pub fn apply(&mut self, samples: &mut [f32], channels: usize) {
        debug_assert!(channels > 0);
        let usable = samples.len() / channels * channels;
        let samples = &mut samples[..usable];

        for ch in 0..channels {
            if self.mode == FilterStateMode::PerChannel {
                self.reset();
            }
            for sample in samples.iter_mut().skip(ch).step_by(channels) {
                *sample = self.process(*sample);
            }
        }
    }

    /// Runs one sample through the lowpass and then the highpass filter and
    /// updates the internal state.
    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        let sample = self.lowpass.as_mut().map_or(sample, |lowpass| lowpass.run(sample));
        self.highpass.as_mut().map_or(sample, |highpass| highpass.run(sample))
    }

    /// Resets the state of both filters.
    pub fn reset(&mut self) {
        for filter in [&mut self.lowpass, &mut self.highpass].into_iter().flatten() {
            filter.reset_state();
        }
    }

    /// Returns the [`FilterStateMode`].
    #[must_use]
    pub const fn mode(&self) -> FilterStateMode {
        self.mode
    }
}
