//! Scripted transport for driving sessions in tests.

use std::path::{Path, PathBuf};

use super::tap::AnalyserTap;
use super::transport::{PlayerError, Transport};

#[derive(Default)]
pub struct ScriptedTransport {
    pub source: Option<PathBuf>,
    pub loaded: Vec<PathBuf>,
    pub failing: Vec<PathBuf>,
    /// While set, loads stay in flight and `poll_load` reports nothing
    pub hold_loads: bool,
    in_flight: Option<PathBuf>,
    pub paused: bool,
    pub ended: bool,
    ended_pending: bool,
    pub tap: Option<AnalyserTap>,
    pub taps_connected: usize,
    pub stops: usize,
}

impl ScriptedTransport {
    /// Simulate the current track playing to its end.
    pub fn finish_track(&mut self) {
        self.ended = true;
        self.paused = true;
        self.ended_pending = true;
    }
}

impl Transport for ScriptedTransport {
    fn set_source(&mut self, path: &Path) {
        self.source = Some(path.to_path_buf());
    }

    fn begin_load(&mut self) -> Result<(), PlayerError> {
        let path = self.source.clone().ok_or(PlayerError::NoSource)?;
        self.paused = true;
        self.ended = false;
        self.ended_pending = false;
        self.in_flight = Some(path);
        Ok(())
    }

    fn poll_load(&mut self) -> Option<Result<(), PlayerError>> {
        if self.hold_loads {
            return None;
        }
        let path = self.in_flight.take()?;
        if self.failing.contains(&path) {
            return Some(Err(PlayerError::NoAudioTrack(path)));
        }
        self.loaded.push(path);
        Some(Ok(()))
    }

    fn play(&mut self) {
        self.ended = false;
        self.paused = false;
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn stop(&mut self) {
        self.source = None;
        self.in_flight = None;
        self.paused = true;
        self.ended = false;
        self.ended_pending = false;
        self.stops += 1;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn is_ended(&self) -> bool {
        self.ended
    }

    fn take_ended(&mut self) -> bool {
        std::mem::take(&mut self.ended_pending)
    }

    fn connect_tap(&mut self, tap: AnalyserTap) {
        self.tap = Some(tap);
        self.taps_connected += 1;
    }

    fn disconnect_tap(&mut self) {
        self.tap = None;
    }
}
