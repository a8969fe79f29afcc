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
//! Module for [`Peak`] and the extraction of one peak per analysis window.
//!
//! The audio is divided into windows of equal length (half a second by
//! default). For each window, the loudest sample frame is identified. It's
//! implied that this frame represents the most likely beat within that
//! window. Only the loudest half of those peaks is kept. This allows us to
//! ignore breaks and to address tracks with a tempo below 120 BPM.

use alloc::vec::Vec;
use core::cmp::Ordering;

/// The loudest sample frame within one analysis window.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Peak {
    /// Sample-frame index relative to the beginning of the buffer.
    pub position: usize,
    /// Maximum absolute sample value across all channels of that frame.
    pub volume: f32,
}

impl Peak {
    /// Creates a new peak.
    #[must_use]
    pub const fn new(position: usize, volume: f32) -> Self {
        Self { position, volume }
    }
}

/// Returns the number of complete windows in `frame_count` frames.
#[must_use]
pub const fn window_count(frame_count: usize, window_size: usize) -> usize {
    if window_size == 0 {
        0
    } else {
        frame_count / window_size
    }
}

/// Finds the peak of every complete window in `samples` and appends it to
/// `peaks`, in position order.
///
/// `samples` is interleaved audio with `channels` channels. `first_frame` is
/// the index of the first frame of `samples` within the whole buffer and is
/// added to every reported position. A trailing incomplete window is
/// ignored.
pub fn find_window_peaks(
    samples: &[f32],
    channels: usize,
    window_size: usize,
    first_frame: usize,
    peaks: &mut Vec<Peak>,
) {
    debug_assert!(channels > 0);
    let frame_count = samples.len() / channels;
    let windows = window_count(frame_count, window_size);
    if windows == 0 {
        return;
    }
    peaks.reserve(windows);

    for (window_i, window) in samples
        .chunks_exact(channels * window_size)
        .take(windows)
        .enumerate()
    {
        let mut peak = Peak::new(first_frame + window_i * window_size, 0.0);
        for (frame_i, frame) in window.chunks_exact(channels).enumerate() {
            let volume = frame
                .iter()
                .map(|&sample| libm::fabsf(sample))
                .fold(0.0, f32::max);
            if volume > peak.volume {
                peak = Peak::new(first_frame + window_i * window_size + frame_i, volume);
            }
        }
        peaks.push(peak);
    }
}

/// Keeps the loudest half of the peaks (rounded down) and restores their
/// temporal order.
pub fn retain_loudest_half(peaks: &mut Vec<Peak>) {
    // Stable sort: peaks of equal volume keep their temporal order.
    peaks.sort_by(|x, y| y.volume.partial_cmp(&x.volume).unwrap_or(Ordering::Equal));
    peaks.truncate(peaks.len() / 2);
    peaks.sort_by_key(|peak| peak.position);
}

/// Convenient wrapper around [`find_window_peaks`] and
/// [`retain_loudest_half`].
pub fn extract_peaks(
    samples: &[f32],
    channels: usize,
    window_size: usize,
    first_frame: usize,
    peaks: &mut Vec<Peak>,
) {
    find_window_peaks(samples, channels, window_size, first_frame, peaks);
    log::trace!("found {} window peaks", peaks.len());
    retain_loudest_half(peaks);
}
