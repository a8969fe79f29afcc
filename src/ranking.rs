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
//! Module for [`TempoCandidate`] and the ranking of the tempo histogram.

use crate::histogram::TempoBucket;
use alloc::vec::Vec;
use core::fmt::{Display, Formatter};

/// Default maximum number of returned candidates.
pub const DEFAULT_MAX_CANDIDATES: usize = 5;

/// One possible tempo of the track.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TempoCandidate {
    /// Number of peak pairs that implied this tempo.
    pub count: u32,
    /// Tempo in beats per minute.
    pub tempo: i16,
}

impl From<TempoBucket> for TempoCandidate {
    fn from(bucket: TempoBucket) -> Self {
        Self {
            count: bucket.count,
            tempo: bucket.tempo,
        }
    }
}

impl Display for TempoCandidate {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} BPM ({} samples)", self.tempo, self.count)
    }
}

/// Orders the buckets by count (descending) and returns at most
/// `max_candidates` of them. Buckets with the same count keep their order.
#[must_use]
pub fn rank(buckets: &[TempoBucket], max_candidates: usize) -> Vec<TempoCandidate> {
    let mut candidates = buckets
        .iter()
        .copied()
        .map(TempoCandidate::from)
        .collect::<Vec<_>>();
    candidates.sort_by(|x, y| y.count.cmp(&x.count));
    candidates.truncate(max_candidates);
    candidates
}

/// Ranked result of a tempo analysis.
///
/// An empty estimate means that no dominant tempo could be determined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TempoEstimate {
    candidates: Vec<TempoCandidate>,
}

impl TempoEstimate {
    /// Returns the most probable tempo, if any.
    #[must_use]
    pub fn most_probable(&self) -> Option<TempoCandidate> {
        self.candidates.first().copied()
    }

    /// Returns the other options, in descending order of probability.
    #[must_use]
    pub fn alternatives(&self) -> &[TempoCandidate] {
        self.candidates.get(1..).unwrap_or_default()
    }

    /// Returns all candidates.
    #[must_use]
    pub fn candidates(&self) -> &[TempoCandidate] {
        &self.candidates
    }

    /// Returns `true` if no tempo could be determined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

impl From<Vec<TempoCandidate>> for TempoEstimate {
    fn from(candidates: Vec<TempoCandidate>) -> Self {
        Self { candidates }
    }
}

impl From<TempoEstimate> for Vec<TempoCandidate> {
    fn from(estimate: TempoEstimate) -> Self {
        estimate.candidates
    }
}

impl Display for TempoEstimate {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let Some(best) = self.most_probable() else {
            return write!(f, "cannot determine the BPM");
        };
        write!(f, "most probable BPM is {best}")?;
        for (i, other) in self.alternatives().iter().enumerate() {
            let separator = if i == 0 { "; other options are: " } else { ", " };
            write!(f, "{separator}{other}")?;
        }
        Ok(())
    }
}
