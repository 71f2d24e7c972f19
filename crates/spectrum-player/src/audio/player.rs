//! cpal output stream playing one decoded track at a time.
//!
//! The stream runs for the whole process and outputs silence while nothing is
//! loaded or playback is paused. Every frame it writes is also pushed into the
//! analysis tap when one is connected. Tracks are decoded on a worker thread
//! and handed back over a channel.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::decoder::{decode_file, DecodedAudio};
use super::tap::AnalyserTap;
use super::transport::{PlayerError, Transport};
use crate::utils::Config;

/// State shared between the UI thread and the output callback
pub(crate) struct Playback {
    track: Mutex<Option<DecodedAudio>>,
    position: AtomicUsize,
    paused: AtomicBool,
    ended: AtomicBool,
    ended_event: AtomicBool,
    tap: Mutex<Option<AnalyserTap>>,
}

impl Playback {
    pub(crate) fn new() -> Self {
        Self {
            track: Mutex::new(None),
            position: AtomicUsize::new(0),
            paused: AtomicBool::new(true),
            ended: AtomicBool::new(false),
            ended_event: AtomicBool::new(false),
            tap: Mutex::new(None),
        }
    }

    fn replace(&self, audio: Option<DecodedAudio>) {
        if let Ok(mut track) = self.track.lock() {
            *track = audio;
        }
        self.position.store(0, Ordering::SeqCst);
        self.paused.store(true, Ordering::SeqCst);
        self.ended.store(false, Ordering::SeqCst);
        self.ended_event.store(false, Ordering::SeqCst);
    }

    /// Forget what the previous source left in the tap.
    fn clear_tap(&self) {
        if let Ok(tap) = self.tap.lock() {
            if let Some(tap) = tap.as_ref() {
                tap.clear();
            }
        }
    }

    /// Fill one interleaved output buffer and feed the tap.
    pub(crate) fn fill(&self, out: &mut [f32], channels: usize) {
        out.fill(0.0);
        let channels = channels.max(1);

        if !self.paused.load(Ordering::SeqCst) {
            if let Ok(track) = self.track.lock() {
                if let Some(audio) = track.as_ref() {
                    self.copy_frames(audio, out, channels);
                }
            }
        }

        if let Ok(tap) = self.tap.lock() {
            if let Some(tap) = tap.as_ref() {
                tap.push_interleaved(out, channels);
            }
        }
    }

    fn copy_frames(&self, audio: &DecodedAudio, out: &mut [f32], channels: usize) {
        let total = audio.frames();
        let pos = self.position.load(Ordering::SeqCst);
        let n = (out.len() / channels).min(total.saturating_sub(pos));
        let src_channels = audio.channels.max(1);

        for (f, frame) in out.chunks_mut(channels).take(n).enumerate() {
            let base = (pos + f) * src_channels;
            for (c, slot) in frame.iter_mut().enumerate() {
                *slot = audio.samples[base + c.min(src_channels - 1)];
            }
        }

        self.position.store(pos + n, Ordering::SeqCst);
        if pos + n >= total && !self.ended.swap(true, Ordering::SeqCst) {
            self.paused.store(true, Ordering::SeqCst);
            self.ended_event.store(true, Ordering::SeqCst);
        }
    }
}

struct Output {
    _stream: Stream,
    sample_rate: u32,
}

type DecodeResult = Result<DecodedAudio, PlayerError>;

/// A decode running on its worker thread
struct PendingLoad {
    path: PathBuf,
    result: Receiver<DecodeResult>,
}

pub struct CpalPlayer {
    playback: Arc<Playback>,
    output: Option<Output>,
    source: Option<PathBuf>,
    loading: Option<PendingLoad>,
}

impl CpalPlayer {
    /// Open the configured (or default) output device. A missing device is
    /// logged and leaves a player whose `load` always fails.
    pub fn new(config: &Config) -> Self {
        let playback = Arc::new(Playback::new());
        let output = match Self::open_output(config, Arc::clone(&playback)) {
            Ok(output) => Some(output),
            Err(e) => {
                error!("{}", e);
                None
            }
        };

        Self {
            playback,
            output,
            source: None,
            loading: None,
        }
    }

    fn spawn_decoder(path: PathBuf, rate: u32) -> Result<PendingLoad, PlayerError> {
        let (tx, rx) = mpsc::channel();
        let worker_path = path.clone();
        std::thread::Builder::new()
            .name("track-decoder".to_string())
            .spawn(move || {
                // the receiver is gone if the load was abandoned
                let _ = tx.send(decode_file(&worker_path).map(|audio| audio.resampled(rate)));
            })
            .map_err(|e| PlayerError::Device(format!("cannot start decoder: {}", e)))?;

        Ok(PendingLoad { path, result: rx })
    }

    fn select_device(config: &Config) -> Option<Device> {
        let host = cpal::default_host();
        if let Some(wanted) = config.output_device.as_ref() {
            let wanted_lower = wanted.to_lowercase();
            let found = host.output_devices().ok().and_then(|mut devices| {
                devices.find(|d| {
                    d.name()
                        .map(|n| n.to_lowercase().contains(&wanted_lower))
                        .unwrap_or(false)
                })
            });
            if found.is_some() {
                return found;
            }
            warn!("Output device {:?} not found, using default", wanted);
        }
        host.default_output_device()
    }

    /// Query the device config on a helper thread (the call can hang on bad devices)
    fn config_with_timeout(
        device: &Device,
        timeout: Duration,
    ) -> Result<(StreamConfig, SampleFormat), PlayerError> {
        let device_clone = device.clone();
        let (tx, rx) = std::sync::mpsc::channel();

        std::thread::spawn(move || {
            let _ = tx.send(device_clone.default_output_config());
        });

        match rx.recv_timeout(timeout) {
            Ok(Ok(supported)) => Ok((supported.config(), supported.sample_format())),
            Ok(Err(e)) => Err(PlayerError::Device(e.to_string())),
            Err(_) => Err(PlayerError::Device(format!(
                "device config timed out after {:?}",
                timeout
            ))),
        }
    }

    fn open_output(config: &Config, playback: Arc<Playback>) -> Result<Output, PlayerError> {
        let device = Self::select_device(config)
            .ok_or_else(|| PlayerError::Device("no output device".to_string()))?;
        let name = device.name().unwrap_or_else(|_| "<unnamed>".to_string());
        let (stream_config, format) = Self::config_with_timeout(&device, config.device_timeout())?;

        let stream = match format {
            SampleFormat::F32 => Self::build_stream::<f32>(&device, &stream_config, playback),
            SampleFormat::I16 => Self::build_stream::<i16>(&device, &stream_config, playback),
            SampleFormat::U16 => Self::build_stream::<u16>(&device, &stream_config, playback),
            other => Err(PlayerError::Device(format!(
                "unsupported sample format {:?}",
                other
            ))),
        }?;
        stream
            .play()
            .map_err(|e| PlayerError::Device(e.to_string()))?;

        info!(
            "Output: {} ({} ch, {} Hz)",
            name, stream_config.channels, stream_config.sample_rate.0
        );

        Ok(Output {
            _stream: stream,
            sample_rate: stream_config.sample_rate.0,
        })
    }

    fn build_stream<T>(
        device: &Device,
        config: &StreamConfig,
        playback: Arc<Playback>,
    ) -> Result<Stream, PlayerError>
    where
        T: SizedSample + FromSample<f32>,
    {
        let channels = config.channels as usize;
        let mut mix: Vec<f32> = Vec::new();

        device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    mix.resize(data.len(), 0.0);
                    playback.fill(&mut mix, channels);
                    for (out, &sample) in data.iter_mut().zip(mix.iter()) {
                        *out = T::from_sample(sample);
                    }
                },
                |err| error!("Audio stream error: {}", err),
                None,
            )
            .map_err(|e| PlayerError::Device(e.to_string()))
    }
}

impl Transport for CpalPlayer {
    fn set_source(&mut self, path: &Path) {
        self.source = Some(path.to_path_buf());
    }

    fn begin_load(&mut self) -> Result<(), PlayerError> {
        self.loading = None;
        self.playback.replace(None);
        self.playback.clear_tap();

        let path = self.source.clone().ok_or(PlayerError::NoSource)?;
        let rate = self
            .output
            .as_ref()
            .map(|o| o.sample_rate)
            .ok_or_else(|| PlayerError::Device("no output stream".to_string()))?;

        self.loading = Some(Self::spawn_decoder(path, rate)?);
        Ok(())
    }

    fn poll_load(&mut self) -> Option<Result<(), PlayerError>> {
        let pending = self.loading.as_ref()?;
        let result = match pending.result.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(PlayerError::DecoderLost(pending.path.clone())),
        };
        self.loading = None;

        Some(result.map(|audio| self.playback.replace(Some(audio))))
    }

    fn play(&mut self) {
        if self.playback.ended.swap(false, Ordering::SeqCst) {
            self.playback.position.store(0, Ordering::SeqCst);
        }
        self.playback.paused.store(false, Ordering::SeqCst);
    }

    fn pause(&mut self) {
        self.playback.paused.store(true, Ordering::SeqCst);
    }

    fn stop(&mut self) {
        self.loading = None;
        self.playback.replace(None);
        self.source = None;
    }

    fn is_paused(&self) -> bool {
        self.playback.paused.load(Ordering::SeqCst)
    }

    fn is_ended(&self) -> bool {
        self.playback.ended.load(Ordering::SeqCst)
    }

    fn take_ended(&mut self) -> bool {
        self.playback.ended_event.swap(false, Ordering::SeqCst)
    }

    fn connect_tap(&mut self, tap: AnalyserTap) {
        if let Ok(mut slot) = self.playback.tap.lock() {
            *slot = Some(tap);
        }
    }

    fn disconnect_tap(&mut self) {
        if let Ok(mut slot) = self.playback.tap.lock() {
            *slot = None;
        }
    }
}
