//! Rotation offset for the arc style and the ticker that advances it.
//!
//! The offset lives in `[1, wrap]` and moves by one step per tick on its own
//! thread, independent of the frame rate. The ticker is started lazily by the
//! first arcs frame and stopped when the rotation is dropped.

use log::debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

struct RotationState {
    offset: AtomicUsize,
    wrap: AtomicUsize,
}

impl RotationState {
    fn advance(&self) {
        let wrap = self.wrap.load(Ordering::SeqCst);
        let _ = self
            .offset
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |offset| {
                Some(if offset >= wrap { 1 } else { offset + 1 })
            });
    }
}

/// Handle to the ticker thread; dropping it stops the thread.
struct RotationTicker {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl RotationTicker {
    fn spawn(state: Arc<RotationState>, interval: Duration) -> Self {
        let (stop, stopped) = mpsc::channel::<()>();
        let handle = std::thread::Builder::new()
            .name("arc-rotation".to_string())
            .spawn(move || loop {
                match stopped.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => state.advance(),
                    _ => break,
                }
            })
            .ok();

        Self {
            stop: Some(stop),
            handle,
        }
    }
}

impl Drop for RotationTicker {
    fn drop(&mut self) {
        // Closing the channel wakes the thread immediately
        self.stop.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        debug!("Arc rotation ticker stopped");
    }
}

pub struct ArcRotation {
    state: Arc<RotationState>,
    interval: Duration,
    ticker: Mutex<Option<RotationTicker>>,
    starts: AtomicUsize,
}

impl ArcRotation {
    pub fn new(interval: Duration) -> Self {
        Self {
            state: Arc::new(RotationState {
                offset: AtomicUsize::new(1),
                wrap: AtomicUsize::new(0),
            }),
            interval,
            ticker: Mutex::new(None),
            starts: AtomicUsize::new(0),
        }
    }

    pub fn offset(&self) -> usize {
        self.state.offset.load(Ordering::SeqCst)
    }

    /// One rotation step, wrapping back to 1 after `wrap`.
    pub fn advance(&self) {
        self.state.advance();
    }

    /// Record the wrap length and start the ticker if it is not running yet.
    /// Returns true when this call started it.
    pub fn ensure_ticking(&self, wrap: usize) -> bool {
        self.state.wrap.store(wrap, Ordering::SeqCst);

        let Ok(mut ticker) = self.ticker.lock() else {
            return false;
        };
        if ticker.is_some() {
            return false;
        }
        *ticker = Some(RotationTicker::spawn(Arc::clone(&self.state), self.interval));
        self.starts.fetch_add(1, Ordering::SeqCst);
        debug!("Arc rotation ticker started ({:?})", self.interval);
        true
    }

    pub fn stop(&self) {
        if let Ok(mut ticker) = self.ticker.lock() {
            ticker.take();
        }
    }
}

#[cfg(test)]
impl ArcRotation {
    pub fn is_ticking(&self) -> bool {
        self.ticker.lock().map(|t| t.is_some()).unwrap_or(false)
    }

    /// How many times a ticker has been started for this rotation
    pub fn ticker_starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    const NEVER: Duration = Duration::from_secs(3600);

    #[test]
    fn test_advance_wraps_to_one() {
        let rotation = ArcRotation::new(NEVER);
        rotation.ensure_ticking(3);
        assert_eq!(rotation.offset(), 1);

        rotation.advance();
        rotation.advance();
        assert_eq!(rotation.offset(), 3);
        rotation.advance();
        assert_eq!(rotation.offset(), 1);
    }

    #[test]
    fn test_offset_stays_in_range() {
        let rotation = ArcRotation::new(NEVER);
        rotation.ensure_ticking(341);
        for _ in 0..2000 {
            rotation.advance();
            let offset = rotation.offset();
            assert!((1..=341).contains(&offset), "offset {}", offset);
        }
    }

    #[test]
    fn test_ticker_started_once() {
        let rotation = ArcRotation::new(NEVER);
        assert!(rotation.ensure_ticking(10));
        for _ in 0..100 {
            assert!(!rotation.ensure_ticking(10));
        }
        assert_eq!(rotation.ticker_starts(), 1);
        assert!(rotation.is_ticking());
    }

    #[test]
    fn test_stop_is_prompt() {
        let rotation = ArcRotation::new(NEVER);
        rotation.ensure_ticking(10);

        let started = Instant::now();
        rotation.stop();
        assert!(!rotation.is_ticking());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_ticker_advances_on_its_own() {
        let rotation = ArcRotation::new(Duration::from_millis(5));
        rotation.ensure_ticking(1_000_000);

        let deadline = Instant::now() + Duration::from_secs(5);
        while rotation.offset() == 1 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        rotation.stop();
        assert!(rotation.offset() > 1);
    }
}
