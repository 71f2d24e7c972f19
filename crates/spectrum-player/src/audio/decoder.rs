//! Whole-file decoding with symphonia.

use log::{debug, warn};
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::transport::PlayerError;

/// Interleaved PCM for one track
#[derive(Clone, Debug, Default)]
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub channels: usize,
    pub sample_rate: u32,
}

impl DecodedAudio {
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels
        }
    }

    /// Linear-interpolation resample to `target_rate`.
    pub fn resampled(self, target_rate: u32) -> Self {
        if self.sample_rate == target_rate || self.sample_rate == 0 || self.frames() == 0 {
            return Self {
                sample_rate: target_rate,
                ..self
            };
        }

        let channels = self.channels;
        let src_frames = self.frames();
        let ratio = self.sample_rate as f64 / target_rate as f64;
        let dst_frames = ((src_frames as f64) / ratio).floor() as usize;
        let mut samples = Vec::with_capacity(dst_frames * channels);

        for frame in 0..dst_frames {
            let pos = frame as f64 * ratio;
            let idx = pos.floor() as usize;
            let frac = (pos - idx as f64) as f32;
            let next = (idx + 1).min(src_frames - 1);
            for ch in 0..channels {
                let a = self.samples[idx * channels + ch];
                let b = self.samples[next * channels + ch];
                samples.push(a + (b - a) * frac);
            }
        }

        Self {
            samples,
            channels,
            sample_rate: target_rate,
        }
    }
}

pub fn decode_file(path: &Path) -> Result<DecodedAudio, PlayerError> {
    let file = File::open(path).map_err(|source| PlayerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension() {
        hint.with_extension(&ext.to_string_lossy());
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|source| PlayerError::Format {
            path: path.to_path_buf(),
            source,
        })?;
    let mut format = probed.format;

    let (track_id, codec_params) = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .map(|t| (t.id, t.codec_params.clone()))
        .ok_or_else(|| PlayerError::NoAudioTrack(path.to_path_buf()))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|source| PlayerError::Format {
            path: path.to_path_buf(),
            source,
        })?;

    let mut audio = DecodedAudio {
        samples: Vec::new(),
        channels: codec_params.channels.map(|c| c.count()).unwrap_or(0),
        sample_rate: codec_params.sample_rate.unwrap_or(0),
    };

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(source) => {
                return Err(PlayerError::Decode {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                audio.channels = spec.channels.count();
                audio.sample_rate = spec.rate;

                let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buf.copy_interleaved_ref(decoded);
                audio.samples.extend_from_slice(buf.samples());
            }
            // Corrupt packets are skipped, the rest of the stream may be fine
            Err(SymphoniaError::DecodeError(e)) => warn!("Skipping bad packet in {:?}: {}", path, e),
            Err(source) => {
                return Err(PlayerError::Decode {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }

    if audio.channels == 0 {
        return Err(PlayerError::NoAudioTrack(path.to_path_buf()));
    }

    debug!(
        "Decoded {:?}: {} frames, {} ch, {} Hz",
        path,
        audio.frames(),
        audio.channels,
        audio.sample_rate
    );
    Ok(audio)
}
