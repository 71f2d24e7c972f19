//! Spectrum sampler: owns the analysis graph and the shared snapshot buffer.

use log::debug;

use super::analyser::{bin_count, Analyser};
use super::tap::AnalyserTap;
use super::transport::Transport;

/// Bins drawn for a window size once the top of the spectrum is discarded
pub fn buffer_length(fft_size: usize, sample_ratio: f32) -> usize {
    (bin_count(fft_size) as f64 * sample_ratio as f64).floor() as usize
}

/// source -> analyser -> destination, bound to one transport
pub struct AnalysisGraph {
    tap: AnalyserTap,
    analyser: Analyser,
    generation: u64,
}

impl AnalysisGraph {
    fn build<T: Transport>(fft_size: usize, transport: &mut T, generation: u64) -> Self {
        let tap = AnalyserTap::new(fft_size);
        transport.connect_tap(tap.clone());
        debug!("Analysis graph #{} built (window {})", generation, fft_size);

        Self {
            tap,
            analyser: Analyser::new(fft_size),
            generation,
        }
    }

    pub fn fft_size(&self) -> usize {
        self.analyser.fft_size()
    }

    #[cfg(test)]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Default)]
pub struct SpectrumSampler {
    graph: Option<AnalysisGraph>,
    snapshot: Vec<u8>,
    builds: u64,
}

impl SpectrumSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph on first use, then size the snapshot buffer.
    /// Later calls reuse the existing graph. Returns the buffer length.
    pub fn initialize<T: Transport>(
        &mut self,
        fft_size: usize,
        sample_ratio: f32,
        transport: &mut T,
    ) -> usize {
        if self.graph.is_none() {
            self.builds += 1;
            self.graph = Some(AnalysisGraph::build(fft_size, transport, self.builds));
        }
        let window = self.graph.as_ref().map_or(fft_size, |g| g.fft_size());

        let len = buffer_length(window, sample_ratio);
        self.snapshot.clear();
        self.snapshot.resize(len, 0);
        len
    }

    /// Refresh the snapshot in place. Requires `initialize` to have run.
    pub fn sample(&mut self) {
        if let Some(graph) = self.graph.as_mut() {
            graph
                .analyser
                .byte_frequency_data(&graph.tap, &mut self.snapshot);
        }
    }

    pub fn snapshot(&self) -> &[u8] {
        &self.snapshot
    }

    /// Disconnect and drop the graph along with the snapshot.
    pub fn teardown<T: Transport>(&mut self, transport: &mut T) {
        if let Some(graph) = self.graph.take() {
            transport.disconnect_tap();
            debug!("Analysis graph #{} torn down", graph.generation);
        }
        self.snapshot = Vec::new();
    }
}

#[cfg(test)]
impl SpectrumSampler {
    pub fn buffer_length(&self) -> usize {
        self.snapshot.len()
    }

    pub fn graph(&self) -> Option<&AnalysisGraph> {
        self.graph.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::testing::ScriptedTransport;

    #[test]
    fn test_buffer_length() {
        assert_eq!(buffer_length(1024, 4.0 / 6.0), 341);
        assert_eq!(buffer_length(1024, 1.0), 512);
        assert_eq!(buffer_length(256, 0.5), 64);
        assert_eq!(buffer_length(2048, 0.1), 102);
    }

    #[test]
    fn test_buffer_length_is_deterministic() {
        for &size in &[32usize, 256, 1024, 32768] {
            for &ratio in &[0.01f32, 0.25, 4.0 / 6.0, 1.0] {
                let len = buffer_length(size, ratio);
                assert_eq!(len, buffer_length(size, ratio));
                assert!(len <= bin_count(size));
            }
        }
    }

    #[test]
    fn test_graph_built_once() {
        let mut transport = ScriptedTransport::default();
        let mut sampler = SpectrumSampler::new();

        assert_eq!(sampler.initialize(1024, 4.0 / 6.0, &mut transport), 341);
        let first = sampler.graph().map(|g| g.generation());
        assert_eq!(sampler.initialize(1024, 4.0 / 6.0, &mut transport), 341);

        assert_eq!(sampler.graph().map(|g| g.generation()), first);
        assert_eq!(transport.taps_connected, 1);
    }

    #[test]
    fn test_sample_fills_in_place() {
        let mut transport = ScriptedTransport::default();
        let mut sampler = SpectrumSampler::new();
        sampler.initialize(512, 0.5, &mut transport);

        let before = sampler.snapshot().as_ptr();
        sampler.sample();
        sampler.sample();

        assert_eq!(sampler.snapshot().as_ptr(), before);
        assert_eq!(sampler.buffer_length(), 128);
        assert!(sampler.snapshot().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_sample_before_initialize_is_noop() {
        let mut sampler = SpectrumSampler::new();
        sampler.sample();
        assert!(sampler.snapshot().is_empty());
    }

    #[test]
    fn test_teardown_disconnects() {
        let mut transport = ScriptedTransport::default();
        let mut sampler = SpectrumSampler::new();
        sampler.initialize(1024, 1.0, &mut transport);
        sampler.teardown(&mut transport);

        assert!(sampler.graph().is_none());
        assert!(transport.tap.is_none());
        assert_eq!(sampler.buffer_length(), 0);

        sampler.initialize(1024, 1.0, &mut transport);
        assert_eq!(sampler.graph().map(|g| g.generation()), Some(2));
    }
}
