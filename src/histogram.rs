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
//! Module for [`TempoHistogram`].
//!
//! Every peak is compared with the next few peaks. The distance of each such
//! pair implies a tempo. The tempo that is seen the most should be the tempo
//! of the track itself.
//!
//! Peak spacing alone can't distinguish a tempo from its double or half.
//! Hence, each tempo is folded into one octave ([`TempoRange`]) before it is
//! counted.

use crate::peak::Peak;
use alloc::vec::Vec;

/// Default number of following peaks each peak is compared with.
pub const DEFAULT_LOOK_AHEAD: usize = 9;

/// Initial capacity of the histogram. In practice, there are rarely more
/// distinct tempos.
pub const INITIAL_BUCKET_CAPACITY: usize = 256;

/// The octave `[min_bpm, 2 * min_bpm)` into which all tempos are folded.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TempoRange {
    min_bpm: i16,
}

impl TempoRange {
    /// The default range `[90, 180)`.
    pub const DEFAULT: Self = Self { min_bpm: 90 };

    /// Creates the range `[min_bpm, 2 * min_bpm)`. Returns `None` if
    /// `min_bpm` is not positive or the upper bound doesn't fit into an
    /// [`i16`].
    #[must_use]
    pub const fn new(min_bpm: i16) -> Option<Self> {
        if min_bpm > 0 && min_bpm <= i16::MAX / 2 {
            Some(Self { min_bpm })
        } else {
            None
        }
    }

    /// Inclusive lower bound.
    #[must_use]
    pub const fn min_bpm(&self) -> i16 {
        self.min_bpm
    }

    /// Exclusive upper bound.
    #[must_use]
    pub const fn max_bpm(&self) -> i16 {
        self.min_bpm * 2
    }

    /// Doubles or halves `tempo` until it is in the range.
    ///
    /// Returns `None` for tempos that are not positive and finite, as they
    /// can't be folded.
    #[must_use]
    pub fn fold(&self, tempo: f32) -> Option<f32> {
        if !tempo.is_finite() || tempo <= 0.0 {
            return None;
        }

        let min = self.min_bpm as f32;
        let max = self.max_bpm() as f32;
        let mut tempo = tempo;
        while tempo < min {
            tempo *= 2.0;
        }
        while tempo >= max {
            tempo /= 2.0;
        }
        Some(tempo)
    }

    /// Folds `tempo` into the range and rounds it to the bucket key.
    ///
    /// Tempos just below the upper bound that round up to it are mapped to
    /// the lower bound, their octave equivalent.
    #[must_use]
    pub fn bucket_key(&self, tempo: f32) -> Option<i16> {
        let rounded = libm::roundf(self.fold(tempo)?) as i16;
        if rounded >= self.max_bpm() {
            Some(rounded / 2)
        } else {
            Some(rounded)
        }
    }
}

impl Default for TempoRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Histogram accumulator for one rounded tempo value.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TempoBucket {
    /// Folded and rounded tempo (BPM).
    pub tempo: i16,
    /// Number of peak pairs that implied this tempo.
    pub count: u32,
}

/// Occurrence histogram over the tempos implied by pairs of nearby peaks.
///
/// Buckets are kept in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TempoHistogram {
    buckets: Vec<TempoBucket>,
}

impl TempoHistogram {
    /// Creates an empty histogram with [`INITIAL_BUCKET_CAPACITY`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            buckets: Vec::with_capacity(INITIAL_BUCKET_CAPACITY),
        }
    }

    /// Counts one occurrence of `tempo`. Creates the bucket if necessary.
    pub fn add(&mut self, tempo: i16) {
        match self.buckets.iter_mut().find(|bucket| bucket.tempo == tempo) {
            Some(bucket) => bucket.count += 1,
            None => self.buckets.push(TempoBucket { tempo, count: 1 }),
        }
    }

    /// Measures the distance of every peak to each of the following
    /// `look_ahead` peaks and counts the implied tempo.
    ///
    /// `peaks` must be sorted by position. Pairs at an identical position
    /// are skipped. Returns the number of pairs that were counted.
    pub fn accumulate(
        &mut self,
        peaks: &[Peak],
        sample_rate: u32,
        look_ahead: usize,
        range: TempoRange,
    ) -> usize {
        debug_assert!(peaks.windows(2).all(|w| w[0].position <= w[1].position));
        let mut counted = 0;

        for (index, peak) in peaks.iter().enumerate() {
            for other in peaks.iter().skip(index + 1).take(look_ahead) {
                let delta = other.position.abs_diff(peak.position);
                if delta == 0 {
                    continue;
                }

                let tempo = 60.0 * sample_rate as f32 / delta as f32;
                if let Some(key) = range.bucket_key(tempo) {
                    self.add(key);
                    counted += 1;
                }
            }
        }

        counted
    }

    /// Returns all buckets in creation order.
    #[must_use]
    pub fn buckets(&self) -> &[TempoBucket] {
        &self.buckets
    }

    /// Returns the sum of all bucket counts.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.buckets.iter().map(|bucket| u64::from(bucket.count)).sum()
    }

    /// Returns `true` if nothing was counted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Removes all buckets but keeps the allocated memory.
    pub fn clear(&mut self) {
        self.buckets.clear();
    }
}
