mod analyser;
mod decoder;
mod player;
mod sampler;
mod tap;
mod transport;

#[cfg(test)]
pub mod testing;

pub use analyser::MAX_FREQUENCY_VALUE;
pub use player::CpalPlayer;
pub use sampler::SpectrumSampler;
pub use transport::{PlayerError, Transport};
