//! Playback transport seam.
//!
//! The session drives playback only through [`Transport`], the native stand-in
//! for an audio element: bind a source, load it in the background, play/pause,
//! and observe the end-of-track notification.

use std::path::{Path, PathBuf};
use thiserror::Error;

use super::tap::AnalyserTap;

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("no source bound")]
    NoSource,
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported or unreadable audio in {path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: symphonia::core::errors::Error,
    },
    #[error("{0} has no audio track")]
    NoAudioTrack(PathBuf),
    #[error("decoding {path} failed: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: symphonia::core::errors::Error,
    },
    #[error("audio output unavailable: {0}")]
    Device(String),
    #[error("decoder for {0} stopped without a result")]
    DecoderLost(PathBuf),
}

pub trait Transport {
    /// Bind the next source; takes effect on `begin_load`.
    fn set_source(&mut self, path: &Path);

    /// Start decoding the bound source off the calling thread. Playback is
    /// paused and silent until the load completes. Errors here are the ones
    /// known up front (no source, no output).
    fn begin_load(&mut self) -> Result<(), PlayerError>;

    /// Non-blocking check on the load started by `begin_load`. `Some` exactly
    /// once per load; the track is then rewound to its start, paused.
    fn poll_load(&mut self) -> Option<Result<(), PlayerError>>;

    fn play(&mut self);

    fn pause(&mut self);

    /// Stop playback, drop the loaded audio and abandon any load in flight.
    fn stop(&mut self);

    fn is_paused(&self) -> bool;

    fn is_ended(&self) -> bool;

    /// End-of-track notification. Returns true once per finished track.
    fn take_ended(&mut self) -> bool;

    /// Route every played frame into the analysis tap.
    fn connect_tap(&mut self, tap: AnalyserTap);

    fn disconnect_tap(&mut self);
}
