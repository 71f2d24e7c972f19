//! Analysis tap: the "source -> analyser" edge of the analysis graph.
//!
//! The playback callback pushes every frame it plays (mixed to mono) into a
//! fixed-size ring; the analyser copies the most recent window out of it.

use std::sync::{Arc, Mutex};

struct Ring {
    samples: Vec<f32>,
    write: usize,
}

/// Shared ring buffer holding the most recently played samples
#[derive(Clone)]
pub struct AnalyserTap {
    ring: Arc<Mutex<Ring>>,
}

impl AnalyserTap {
    pub fn new(capacity: usize) -> Self {
        Self {
            ring: Arc::new(Mutex::new(Ring {
                samples: vec![0.0; capacity.max(1)],
                write: 0,
            })),
        }
    }

    /// Push interleaved frames, mixing each frame down to one sample.
    pub fn push_interleaved(&self, data: &[f32], channels: usize) {
        let channels = channels.max(1);
        let Ok(mut ring) = self.ring.lock() else {
            return;
        };
        let len = ring.samples.len();
        for frame in data.chunks(channels) {
            let sample = frame.iter().sum::<f32>() / frame.len() as f32;
            let write = ring.write;
            ring.samples[write] = sample;
            ring.write = (write + 1) % len;
        }
    }

    /// Copy the newest `out.len()` samples, oldest first.
    pub fn copy_latest(&self, out: &mut [f32]) {
        let Ok(ring) = self.ring.lock() else {
            out.fill(0.0);
            return;
        };
        let len = ring.samples.len();
        let n = out.len().min(len);
        let lead = out.len() - n;
        out[..lead].fill(0.0);
        let start = (ring.write + len - n) % len;
        for (i, slot) in out[lead..].iter_mut().enumerate() {
            *slot = ring.samples[(start + i) % len];
        }
    }

    /// Zero the ring when the player rebinds its source.
    pub fn clear(&self) {
        if let Ok(mut ring) = self.ring.lock() {
            ring.samples.fill(0.0);
            ring.write = 0;
        }
    }
}
