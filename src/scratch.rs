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
//! Module for [`ScratchSpace`], the reusable working memory of an analysis.

use crate::histogram::TempoHistogram;
use crate::peak::Peak;
use alloc::vec::Vec;
use core::ops::{Deref, DerefMut};

/// Working memory for the peak list and the tempo histogram.
///
/// It's kept by the [`crate::TempoAnalyzer`] to reuse allocations across
/// multiple analyses. The memory is only accessible through a
/// [`ScratchGuard`], which empties it again when it goes out of scope.
#[derive(Debug, Default)]
pub struct ScratchSpace {
    /// Peaks of the current analysis.
    pub peaks: Vec<Peak>,
    /// Tempo histogram of the current analysis.
    pub histogram: TempoHistogram,
}

impl ScratchSpace {
    /// Creates a new scratch space with room for `peaks` peaks.
    #[must_use]
    pub fn with_capacity(peaks: usize) -> Self {
        Self {
            peaks: Vec::with_capacity(peaks),
            histogram: TempoHistogram::new(),
        }
    }

    /// Borrows the scratch space for the duration of one analysis.
    pub fn borrow(&mut self) -> ScratchGuard<'_> {
        debug_assert!(self.is_empty());
        ScratchGuard { space: self }
    }

    /// Returns `true` if no data of a previous analysis remains.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty() && self.histogram.is_empty()
    }
}

/// Exclusive access to a [`ScratchSpace`]. Clears it on drop, on every exit
/// path of an analysis.
#[derive(Debug)]
pub struct ScratchGuard<'a> {
    space: &'a mut ScratchSpace,
}

impl Deref for ScratchGuard<'_> {
    type Target = ScratchSpace;

    fn deref(&self) -> &Self::Target {
        self.space
    }
}

impl DerefMut for ScratchGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.space
    }
}

impl Drop for ScratchGuard<'_> {
    fn drop(&mut self) {
        self.space.peaks.clear();
        self.space.histogram.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    #[test]
    fn test_guard_clears_on_drop() {
        let mut space = ScratchSpace::with_capacity(16);
        {
            let mut guard = space.borrow();
            guard.peaks.push(Peak::new(0, 1.0));
            guard.histogram.add(120);
            check!(!guard.is_empty());
        }
        check!(space.is_empty());
        check!(space.peaks.capacity() >= 16);
    }

    #[test]
    fn test_guard_clears_on_early_return() {
        fn fails(space: &mut ScratchSpace) -> Result<(), ()> {
            let mut guard = space.borrow();
            guard.peaks.push(Peak::new(3, 0.5));
            Err(())
        }

        let mut space = ScratchSpace::default();
        check!(fails(&mut space) == Err(()));
        check!(space.is_empty());
    }
}
