//! Session statistics
//!
//! Lightweight counters shared between the frame pump and whoever asks for a
//! summary (the demo binary, the test suite). All fields are atomics so the
//! pump never blocks on bookkeeping.

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

/// Live counters for one session
#[derive(Debug, Default)]
pub struct SessionStats {
    ticks: AtomicUsize,
    frames_forwarded: AtomicUsize,
    frames_skipped: AtomicUsize,
    frames_dropped: AtomicUsize,
    fps_estimate: AtomicU32,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_tick(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    /// A frame was read, detected and queued for display
    pub fn record_forwarded(&self) {
        self.frames_forwarded.fetch_add(1, Ordering::Relaxed);
    }

    /// The capture source had no frame this tick
    pub fn record_skipped(&self) {
        self.frames_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// The render queue was full or gone; the frame was discarded
    pub fn record_dropped(&self) {
        self.frames_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn update_fps_estimate(&self, fps: f32) {
        self.fps_estimate.store(fps.to_bits(), Ordering::Relaxed);
    }

    pub fn ticks(&self) -> usize {
        self.ticks.load(Ordering::Relaxed)
    }

    pub fn frames_forwarded(&self) -> usize {
        self.frames_forwarded.load(Ordering::Relaxed)
    }

    /// Point-in-time copy of the counters
    pub fn snapshot(&self) -> SessionSummary {
        SessionSummary {
            ticks: self.ticks.load(Ordering::Relaxed),
            frames_forwarded: self.frames_forwarded.load(Ordering::Relaxed),
            frames_skipped: self.frames_skipped.load(Ordering::Relaxed),
            frames_dropped: self.frames_dropped.load(Ordering::Relaxed),
            fps_estimate: f32::from_bits(self.fps_estimate.load(Ordering::Relaxed)),
        }
    }
}

/// Final numbers for a completed session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub ticks: usize,
    pub frames_forwarded: usize,
    pub frames_skipped: usize,
    pub frames_dropped: usize,
    pub fps_estimate: f32,
}
