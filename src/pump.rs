//! Frame pump
//!
//! The periodic capture -> detect -> render loop that runs on the session's
//! worker thread. Each tick checks the cancellation flag before doing any
//! work, so a stop request makes the pump inert immediately even if the
//! controller has already moved on.

use crate::capture::CaptureSource;
use crate::detector::Detector;
use crate::render::FrameSink;
use crate::stats::SessionStats;
use crate::thresholds::SharedThresholds;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Granularity of the cadence sleep; keeps stop latency low at slow framerates
const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Owns every per-session resource for the duration of the worker thread:
/// capture handle, detector, class-name list, render sink and counters.
pub struct FramePump {
    capture: Box<dyn CaptureSource>,
    detector: Box<dyn Detector>,
    class_names: Arc<[String]>,
    thresholds: Arc<SharedThresholds>,
    sink: FrameSink,
    cancel: Arc<AtomicBool>,
    period: Duration,
    stats: Arc<SessionStats>,
}

impl FramePump {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        capture: Box<dyn CaptureSource>,
        detector: Box<dyn Detector>,
        class_names: Arc<[String]>,
        thresholds: Arc<SharedThresholds>,
        sink: FrameSink,
        cancel: Arc<AtomicBool>,
        period: Duration,
        stats: Arc<SessionStats>,
    ) -> Self {
        Self {
            capture,
            detector,
            class_names,
            thresholds,
            sink,
            cancel,
            period,
            stats,
        }
    }

    /// Run the tick loop until cancelled, then release the capture source.
    /// Consumes the pump; the detector and class list are dropped on return.
    pub fn run(mut self) {
        let mut fps_estimate = 0.0f32;
        let mut last_tick = Instant::now();

        loop {
            if self.cancel.load(Ordering::SeqCst) {
                break;
            }

            let tick_start = Instant::now();
            self.tick();

            let dt = last_tick.elapsed().as_secs_f32().max(0.001);
            last_tick = Instant::now();
            fps_estimate = 0.9 * fps_estimate + 0.1 * (1.0 / dt);
            self.stats.update_fps_estimate(fps_estimate);

            self.sleep_until_next_tick(tick_start);
        }

        if self.capture.is_opened() {
            self.capture.release();
        }
        debug!("frame pump exited, capture released");
    }

    /// One frame: refresh thresholds, read, detect, forward
    fn tick(&mut self) {
        self.stats.record_tick();

        self.detector
            .set_thresholds(self.thresholds.confidence(), self.thresholds.nms());

        let Some(frame) = self.capture.read_frame() else {
            self.stats.record_skipped();
            return;
        };

        // A stop may have landed while the read was blocking; the frame is
        // discarded rather than delivered after teardown returned.
        if self.cancel.load(Ordering::SeqCst) {
            return;
        }

        match self.detector.detect(frame, &self.class_names) {
            Ok(annotated) => {
                if self.sink.send(annotated) {
                    self.stats.record_forwarded();
                } else {
                    self.stats.record_dropped();
                }
            }
            Err(e) => warn!("detection failed, frame discarded: {}", e),
        }
    }

    /// Sleep out the remainder of the frame period, waking early on cancel
    fn sleep_until_next_tick(&self, tick_start: Instant) {
        loop {
            let elapsed = tick_start.elapsed();
            if elapsed >= self.period || self.cancel.load(Ordering::SeqCst) {
                return;
            }
            let remaining = self.period - elapsed;
            std::thread::sleep(remaining.min(CANCEL_POLL_INTERVAL));
        }
    }
}
