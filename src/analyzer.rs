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
//! Module for [`TempoAnalyzer`], which combines all building blocks of the
//! tempo estimation:
//!
//! 1. band-limit the audio to the range of kick drums ([`BandLimiter`]),
//! 2. find the loudest half of all window peaks ([`crate::peak`]),
//! 3. count the tempos implied by the distances of nearby peaks
//!    ([`TempoHistogram`]),
//! 4. rank the tempos by their count ([`crate::ranking`]).

use crate::band_limiter::{
    self, BandLimiter, FilterFrequencies, FilterStateMode, InvalidFrequencyError, FILTER_Q,
    HIGHPASS_CUTOFF_HZ, LOWPASS_CUTOFF_HZ,
};
use crate::histogram::{TempoHistogram, TempoRange, DEFAULT_LOOK_AHEAD};
use crate::ranking::{TempoCandidate, TempoEstimate, DEFAULT_MAX_CANDIDATES};
use crate::scratch::ScratchSpace;
use crate::{peak, ranking, AnalysisError, AnalysisRange, SampleBuffer};
use alloc::vec::Vec;

/// Parameters of the tempo analysis. The [`Default`] values are the ones the
/// heuristic was tuned with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyzerConfig {
    /// Cutoff frequency of the lowpass filter (Hz).
    pub lowpass_cutoff_hz: f32,
    /// Cutoff frequency of the highpass filter (Hz).
    pub highpass_cutoff_hz: f32,
    /// Q value of both filters.
    pub filter_q: f32,
    /// How filter state is shared between channels.
    pub filter_state: FilterStateMode,
    /// The window size in frames is `sample_rate / window_divisor`, so `2`
    /// means half-second windows.
    pub window_divisor: u32,
    /// Number of following peaks each peak is compared with.
    pub look_ahead: usize,
    /// Octave into which all tempos are folded.
    pub tempo_range: TempoRange,
    /// Maximum number of returned candidates.
    pub max_candidates: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            lowpass_cutoff_hz: LOWPASS_CUTOFF_HZ,
            highpass_cutoff_hz: HIGHPASS_CUTOFF_HZ,
            filter_q: FILTER_Q,
            filter_state: FilterStateMode::Shared,
            window_divisor: 2,
            look_ahead: DEFAULT_LOOK_AHEAD,
            tempo_range: TempoRange::DEFAULT,
            max_candidates: DEFAULT_MAX_CANDIDATES,
        }
    }
}

impl AnalyzerConfig {
    /// Checks the values that don't depend on the sample rate of the audio.
    /// The filter frequencies are checked for every analyzed buffer.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.window_divisor == 0 {
            return Err(AnalysisError::InvalidConfig("window divisor must not be zero"));
        }
        if self.look_ahead == 0 {
            return Err(AnalysisError::InvalidConfig("look-ahead must not be zero"));
        }
        if self.max_candidates == 0 {
            return Err(AnalysisError::InvalidConfig(
                "maximum number of candidates must not be zero",
            ));
        }
        Ok(())
    }

    /// Returns the window size in frames for the given sample rate. This is
    /// at least one frame.
    #[must_use]
    pub fn window_size(&self, sample_rate: u32) -> usize {
        (sample_rate / self.window_divisor.max(1)).max(1) as usize
    }

    /// Creates the [`BandLimiter`] for audio with the given sample rate.
    ///
    /// A filter with its default cutoff frequency is skipped if the sample
    /// rate is too low for it. Custom cutoff frequencies must fulfill the
    /// Nyquist rule.
    pub fn band_limiter(&self, sample_rate: u32) -> Result<BandLimiter, AnalysisError> {
        let sample_rate_hz = sample_rate as f32;
        let lowpass = self.filter_stage(sample_rate_hz, self.lowpass_cutoff_hz, LOWPASS_CUTOFF_HZ)?;
        let highpass =
            self.filter_stage(sample_rate_hz, self.highpass_cutoff_hz, HIGHPASS_CUTOFF_HZ)?;
        Ok(BandLimiter::new(lowpass, highpass, self.filter_state)?)
    }

    fn filter_stage(
        &self,
        sample_rate_hz: f32,
        cutoff_fr_hz: f32,
        default_cutoff_fr_hz: f32,
    ) -> Result<Option<FilterFrequencies>, InvalidFrequencyError> {
        if cutoff_fr_hz == default_cutoff_fr_hz {
            band_limiter::default_stage(sample_rate_hz, cutoff_fr_hz, self.filter_q)
        } else {
            FilterFrequencies::new(sample_rate_hz, cutoff_fr_hz, self.filter_q).map(Some)
        }
    }
}

/// Estimates the dominant tempo of decoded audio.
///
/// The analyzer keeps its working memory between calls, so it is cheaper to
/// reuse one analyzer for many tracks than to create a new one each time.
/// Independent analyzers can run in parallel on different threads.
///
/// ## Example
/// ```rust
/// use tempo_estimator::{AnalysisRange, SampleBuffer, TempoAnalyzer};
///
/// // Pretend this is decoded audio: 4 seconds of mono silence.
/// let mut buffer = SampleBuffer::mono(vec![0.0; 4 * 44100], 44100).unwrap();
/// let mut analyzer = TempoAnalyzer::default();
/// let candidates = analyzer.analyze(&mut buffer, AnalysisRange::full()).unwrap();
/// if let Some(best) = candidates.first() {
///     println!("{best}");
/// }
/// ```
#[derive(Debug, Default)]
pub struct TempoAnalyzer {
    config: AnalyzerConfig,
    scratch: ScratchSpace,
}

impl TempoAnalyzer {
    /// Creates a new analyzer with a validated configuration.
    pub fn new(config: AnalyzerConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        Ok(Self {
            config,
            scratch: ScratchSpace::default(),
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyzes the given range of the buffer and returns up to
    /// [`AnalyzerConfig::max_candidates`] tempo candidates, sorted by their
    /// count in descending order.
    ///
    /// The samples of the range are band-limited in place. Use
    /// [`Self::analyze_copy`] to keep the buffer untouched.
    ///
    /// An empty list means that no dominant tempo could be determined, for
    /// example because the range is shorter than two windows. If the range
    /// doesn't fit into the buffer, [`AnalysisError::InvalidRange`] is
    /// returned and the buffer is not modified.
    pub fn analyze(
        &mut self,
        buffer: &mut SampleBuffer,
        range: AnalysisRange,
    ) -> Result<Vec<TempoCandidate>, AnalysisError> {
        let range = buffer.resolve(range)?;
        let sample_rate = buffer.sample_rate();
        let channels = buffer.channels() as usize;
        let mut band_limiter = self.config.band_limiter(sample_rate)?;
        let window_size = self.config.window_size(sample_rate);

        let windows = peak::window_count(range.length, window_size);
        log::debug!(
            "analyzing {} frames from frame {} ({} Hz, {} channels): {} windows of {} frames",
            range.length,
            range.start_frame,
            sample_rate,
            channels,
            windows,
            window_size
        );
        if windows == 0 {
            log::warn!(
                "range of {} frames is shorter than one window of {} frames",
                range.length,
                window_size
            );
        }

        let mut scratch = self.scratch.borrow();
        let ScratchSpace { peaks, histogram } = &mut *scratch;

        let samples = buffer.range_mut(range);
        band_limiter.apply(samples, channels);
        peak::extract_peaks(samples, channels, window_size, range.start_frame, peaks);

        let pairs = histogram.accumulate(
            peaks,
            sample_rate,
            self.config.look_ahead,
            self.config.tempo_range,
        );
        log::debug!(
            "{} peaks, {} intervals, {} distinct tempos",
            peaks.len(),
            pairs,
            histogram.buckets().len()
        );

        let candidates = ranking::rank(histogram.buckets(), self.config.max_candidates);
        log::trace!("candidates: {:?}", candidates);
        Ok(candidates)
    }

    /// Like [`Self::analyze`], but works on an internal copy of the buffer.
    pub fn analyze_copy(
        &mut self,
        buffer: &SampleBuffer,
        range: AnalysisRange,
    ) -> Result<Vec<TempoCandidate>, AnalysisError> {
        // Fail before the copy is made.
        buffer.resolve(range)?;
        let mut copy = buffer.clone();
        self.analyze(&mut copy, range)
    }

    /// Like [`Self::analyze`], but wraps the result in a [`TempoEstimate`].
    pub fn estimate(
        &mut self,
        buffer: &mut SampleBuffer,
        range: AnalysisRange,
    ) -> Result<TempoEstimate, AnalysisError> {
        self.analyze(buffer, range).map(TempoEstimate::from)
    }

    /// Runs only the histogram stage on already extracted peaks. Useful for
    /// inspecting the complete, unranked histogram.
    #[must_use]
    pub fn histogram_of(&self, peaks: &[peak::Peak], sample_rate: u32) -> TempoHistogram {
        let mut histogram = TempoHistogram::new();
        histogram.accumulate(
            peaks,
            sample_rate,
            self.config.look_ahead,
            self.config.tempo_range,
        );
        histogram
    }
}
