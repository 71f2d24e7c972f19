//! Frequency analyser.
//!
//! Produces byte magnitudes per frequency bin the way a Web Audio
//! `AnalyserNode` does: Blackman window, FFT, temporal smoothing, then a
//! linear map of the decibel range onto 0..=255. All buffers are allocated
//! up front so a frame's analysis does not allocate.

use num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

use super::tap::AnalyserTap;

/// Smoothing between consecutive frames (0 = none, 1 = frozen)
pub const SMOOTHING_TIME_CONSTANT: f32 = 0.8;
/// Decibel value mapped to byte 0
pub const MIN_DECIBELS: f32 = -100.0;
/// Decibel value mapped to byte 255
pub const MAX_DECIBELS: f32 = -30.0;
/// Largest byte magnitude
pub const MAX_FREQUENCY_VALUE: u8 = 255;

/// Number of usable frequency bins for a given window size
pub fn bin_count(fft_size: usize) -> usize {
    fft_size / 2
}

pub struct Analyser {
    fft_size: usize,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    time: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
}

impl Analyser {
    pub fn new(fft_size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);
        let scratch_len = fft.get_inplace_scratch_len();

        Self {
            fft_size,
            fft,
            window: blackman_window(fft_size),
            time: vec![0.0; fft_size],
            buffer: vec![Complex::new(0.0, 0.0); fft_size],
            scratch: vec![Complex::new(0.0, 0.0); scratch_len],
            smoothed: vec![0.0; bin_count(fft_size)],
        }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Analyse the newest window of the tap and write up to `out.len()` bins.
    pub fn byte_frequency_data(&mut self, tap: &AnalyserTap, out: &mut [u8]) {
        tap.copy_latest(&mut self.time);
        self.process(out);
    }

    fn process(&mut self, out: &mut [u8]) {
        for ((slot, &sample), &w) in self
            .buffer
            .iter_mut()
            .zip(self.time.iter())
            .zip(self.window.iter())
        {
            *slot = Complex::new(sample * w, 0.0);
        }

        self.fft
            .process_with_scratch(&mut self.buffer, &mut self.scratch);

        let scale = 1.0 / self.fft_size as f32;
        for (smoothed, bin) in self.smoothed.iter_mut().zip(self.buffer.iter()) {
            let magnitude = bin.norm() * scale;
            *smoothed = SMOOTHING_TIME_CONSTANT * *smoothed
                + (1.0 - SMOOTHING_TIME_CONSTANT) * magnitude;
        }

        for (byte, &magnitude) in out.iter_mut().zip(self.smoothed.iter()) {
            *byte = magnitude_to_byte(magnitude);
        }
    }
}

fn blackman_window(size: usize) -> Vec<f32> {
    const A0: f32 = 0.42;
    const A1: f32 = 0.5;
    const A2: f32 = 0.08;
    let n = size as f32;
    (0..size)
        .map(|i| {
            let x = std::f32::consts::TAU * i as f32 / n;
            A0 - A1 * x.cos() + A2 * (2.0 * x).cos()
        })
        .collect()
}

fn magnitude_to_byte(magnitude: f32) -> u8 {
    if magnitude <= 0.0 {
        return 0;
    }
    let db = 20.0 * magnitude.log10();
    let scaled = (MAX_FREQUENCY_VALUE as f32 / (MAX_DECIBELS - MIN_DECIBELS)) * (db - MIN_DECIBELS);
    scaled.floor().clamp(0.0, MAX_FREQUENCY_VALUE as f32) as u8
}
