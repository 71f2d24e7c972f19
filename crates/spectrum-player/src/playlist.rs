//! Ordered track list and the state machine that walks it.

use log::{debug, info};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    pub index: usize,
    pub name: String,
    pub path: PathBuf,
}

impl Track {
    pub fn new(index: usize, path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self {
            index,
            name,
            path: path.to_path_buf(),
        }
    }
}

pub fn tracks_from_paths<P: AsRef<Path>>(paths: &[P]) -> Vec<Track> {
    paths
        .iter()
        .enumerate()
        .map(|(i, p)| Track::new(i, p.as_ref()))
        .collect()
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Loading,
    Playing,
    Finished,
}

/// What the session must do after the advance timer fires
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Advance {
    /// Load the track at this index
    Next(usize),
    /// The last track ended; reset everything
    Finished,
}

pub struct TrackController {
    tracks: Vec<Track>,
    current: usize,
    state: PlaybackState,
    advance_at: Option<Instant>,
    advance_delay: Duration,
    plays_started: usize,
}

impl TrackController {
    pub fn new(advance_delay: Duration) -> Self {
        Self {
            tracks: Vec::new(),
            current: 0,
            state: PlaybackState::Idle,
            advance_at: None,
            advance_delay,
            plays_started: 0,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current_track(&self) -> Option<&Track> {
        match self.state {
            PlaybackState::Idle | PlaybackState::Finished => None,
            _ => self.tracks.get(self.current),
        }
    }

    /// Idle -> Loading for the first track. Returns false if nothing was queued.
    pub fn start(&mut self, tracks: Vec<Track>) -> bool {
        if self.state != PlaybackState::Idle || tracks.is_empty() {
            return false;
        }
        info!("Queued {} track(s)", tracks.len());
        self.tracks = tracks;
        self.current = 0;
        self.state = PlaybackState::Loading;
        true
    }

    /// Loading -> Playing
    pub fn mark_playing(&mut self) {
        if self.state == PlaybackState::Loading {
            self.state = PlaybackState::Playing;
            self.plays_started += 1;
        }
    }

    /// End-of-track notification; schedules the debounced advance.
    pub fn track_ended(&mut self, now: Instant) {
        if self.state != PlaybackState::Playing || self.advance_at.is_some() {
            return;
        }
        debug!(
            "Track {} ended, advancing in {:?}",
            self.current, self.advance_delay
        );
        self.advance_at = Some(now + self.advance_delay);
    }

    /// Fire the pending advance once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<Advance> {
        let due = self.advance_at?;
        if now < due {
            return None;
        }
        self.advance_at = None;

        if self.current + 1 >= self.tracks.len() {
            self.state = PlaybackState::Finished;
            Some(Advance::Finished)
        } else {
            self.current += 1;
            self.state = PlaybackState::Loading;
            Some(Advance::Next(self.current))
        }
    }

    /// Back to Idle with an empty list.
    pub fn reset(&mut self) {
        self.tracks.clear();
        self.current = 0;
        self.state = PlaybackState::Idle;
        self.advance_at = None;
        self.plays_started = 0;
    }
}

#[cfg(test)]
impl TrackController {
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Number of Loading -> Playing transitions since the last reset
    pub fn plays_started(&self) -> usize {
        self.plays_started
    }

    pub fn is_advance_pending(&self) -> bool {
        self.advance_at.is_some()
    }
}
