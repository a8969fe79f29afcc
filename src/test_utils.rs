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
//! Synthetic audio and helpers for the tests of this crate.

use alloc::vec;
use alloc::vec::Vec;
use core::f32::consts::PI;

/// Returns `seconds` of a full-scale sine wave with the given frequency.
pub fn sine(frequency_hz: f32, sample_rate: u32, seconds: f32) -> Vec<f32> {
    let len = (sample_rate as f32 * seconds) as usize;
    (0..len)
        .map(|i| libm::sinf(2.0 * PI * frequency_hz * i as f32 / sample_rate as f32))
        .collect()
}

/// Returns `seconds` of silence with a single-sample impulse in the middle of
/// every interval of `interval_s` seconds. Each impulse is a bit quieter than
/// the one before, so the loudest windows are always the first ones.
pub fn decaying_pulse_train(sample_rate: u32, seconds: f32, interval_s: f32) -> Vec<f32> {
    let len = (sample_rate as f32 * seconds) as usize;
    let interval = (sample_rate as f32 * interval_s) as usize;
    let mut samples = vec![0.0; len];
    for (k, index) in (interval / 2..len).step_by(interval).enumerate() {
        samples[index] = libm::powf(0.97, k as f32);
    }
    samples
}

/// Returns `seconds` of silence with a full-scale single-sample impulse at
/// the beginning of every interval of `interval_s` seconds.
pub fn pulse_train(sample_rate: u32, seconds: f32, interval_s: f32) -> Vec<f32> {
    let len = (sample_rate as f32 * seconds) as usize;
    let interval = (sample_rate as f32 * interval_s) as usize;
    let mut samples = vec![0.0; len];
    for index in (0..len).step_by(interval) {
        samples[index] = 1.0;
    }
    samples
}

/// Duplicates mono samples into `channels` identical interleaved channels.
pub fn interleave(mono: &[f32], channels: usize) -> Vec<f32> {
    mono.iter()
        .flat_map(|&sample| core::iter::repeat(sample).take(channels))
        .collect()
}

#[test]
fn test_decaying_pulse_train_layout() {
    use assert2::check;

    let samples = decaying_pulse_train(44100, 10.0, 0.5);
    check!(samples.len() == 441000);
    let impulses = samples
        .iter()
        .enumerate()
        .filter(|(_, &x)| x != 0.0)
        .collect::<Vec<_>>();
    check!(impulses.len() == 20);
    check!(impulses[0] == (11025, &1.0));
    check!(impulses[1].0 == 11025 + 22050);
    check!(impulses.windows(2).all(|w| w[0].1 > w[1].1));
}

#[test]
fn test_pulse_train_layout() {
    use assert2::check;

    let samples = pulse_train(44100, 10.0, 0.5);
    let impulses = samples
        .iter()
        .enumerate()
        .filter(|(_, &x)| x != 0.0)
        .map(|(i, _)| i)
        .collect::<Vec<_>>();
    check!(impulses.len() == 20);
    check!(impulses[0] == 0);
    check!(impulses[19] == 19 * 22050);
}
