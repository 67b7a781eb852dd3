//! Shared detection thresholds
//!
//! Confidence and NMS thresholds are written by the UI thread and read by the
//! frame pump on the worker thread. They are independent scalars, so they are
//! stored lock-free as f32 bit patterns in atomics; each tick sees a
//! consistent "current" value without taking a lock.

use std::sync::atomic::{AtomicU32, Ordering};

/// Lock-free confidence/NMS threshold pair shared between UI and worker
#[derive(Debug)]
pub struct SharedThresholds {
    confidence: AtomicU32,
    nms: AtomicU32,
}

impl SharedThresholds {
    pub fn new(confidence: f32, nms: f32) -> Self {
        Self {
            confidence: AtomicU32::new(confidence.to_bits()),
            nms: AtomicU32::new(nms.to_bits()),
        }
    }

    pub fn confidence(&self) -> f32 {
        f32::from_bits(self.confidence.load(Ordering::Relaxed))
    }

    pub fn nms(&self) -> f32 {
        f32::from_bits(self.nms.load(Ordering::Relaxed))
    }

    pub fn set_confidence(&self, value: f32) {
        self.confidence.store(value.to_bits(), Ordering::Relaxed);
    }

    pub fn set_nms(&self, value: f32) {
        self.nms.store(value.to_bits(), Ordering::Relaxed);
    }
}
