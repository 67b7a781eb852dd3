//! Session lifecycle integration tests
//!
//! These exercise the controller's Idle/Running state machine end to end
//! with instrumented capture and detector doubles: single-session guard,
//! idempotent stop, inertness after stop/close, and the tick accounting of
//! a short run.

use lookout::{
    render_channel, AnnotatedFrame, AppConfig, CaptureOpener, CaptureSource, Detector,
    DetectorConfig, DetectorFactory, Frame, LookoutError, LookoutResult, PassthroughFactory,
    RenderReceiver, SessionController,
};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;

/// Capture double whose read/release activity is observable from the test
struct InstrumentedCapture {
    reads: Arc<AtomicUsize>,
    released: Arc<AtomicBool>,
}

impl CaptureSource for InstrumentedCapture {
    fn is_opened(&self) -> bool {
        !self.released.load(Ordering::SeqCst)
    }

    fn read_frame(&mut self) -> Option<Frame> {
        if self.released.load(Ordering::SeqCst) {
            return None;
        }
        self.reads.fetch_add(1, Ordering::SeqCst);
        Some(Frame::filled(8, 8, [0, 0, 0]))
    }

    fn release(&mut self) {
        self.released.store(true, Ordering::SeqCst);
    }
}

#[derive(Clone)]
struct InstrumentedOpener {
    reads: Arc<AtomicUsize>,
    released: Arc<AtomicBool>,
}

impl InstrumentedOpener {
    fn new() -> Self {
        Self {
            reads: Arc::new(AtomicUsize::new(0)),
            released: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl CaptureOpener for InstrumentedOpener {
    fn open(&self, _target_framerate: u32) -> LookoutResult<Box<dyn CaptureSource>> {
        Ok(Box::new(InstrumentedCapture {
            reads: Arc::clone(&self.reads),
            released: Arc::clone(&self.released),
        }))
    }
}

/// Capture double whose reads block far longer than the shutdown timeout,
/// forcing the controller down its detach path
struct StuckCapture {
    block_for: Duration,
    released: Arc<AtomicBool>,
}

impl CaptureSource for StuckCapture {
    fn is_opened(&self) -> bool {
        !self.released.load(Ordering::SeqCst)
    }

    fn read_frame(&mut self) -> Option<Frame> {
        std::thread::sleep(self.block_for);
        Some(Frame::filled(8, 8, [0, 0, 0]))
    }

    fn release(&mut self) {
        self.released.store(true, Ordering::SeqCst);
    }
}

struct StuckOpener {
    block_for: Duration,
    released: Arc<AtomicBool>,
}

impl CaptureOpener for StuckOpener {
    fn open(&self, _target_framerate: u32) -> LookoutResult<Box<dyn CaptureSource>> {
        Ok(Box::new(StuckCapture {
            block_for: self.block_for,
            released: Arc::clone(&self.released),
        }))
    }
}

/// Opener that fails the way a missing camera would
struct UnavailableOpener;

impl CaptureOpener for UnavailableOpener {
    fn open(&self, _target_framerate: u32) -> LookoutResult<Box<dyn CaptureSource>> {
        Err(LookoutError::CaptureOpenFailed(
            "no camera at index 0".to_string(),
        ))
    }
}

/// Detector double recording the thresholds seen on each detect call
struct RecordingDetector {
    last_thresholds: Arc<std::sync::Mutex<(f32, f32)>>,
    confidence: f32,
    nms: f32,
}

impl Detector for RecordingDetector {
    fn set_thresholds(&mut self, confidence: f32, nms: f32) {
        self.confidence = confidence;
        self.nms = nms;
    }

    fn thresholds(&self) -> (f32, f32) {
        (self.confidence, self.nms)
    }

    fn detect(&mut self, frame: Frame, class_names: &[String]) -> LookoutResult<AnnotatedFrame> {
        *self.last_thresholds.lock().unwrap() = (self.confidence, self.nms);
        Ok(AnnotatedFrame {
            frame,
            labels: class_names.first().cloned().into_iter().collect(),
        })
    }
}

struct RecordingFactory {
    last_thresholds: Arc<std::sync::Mutex<(f32, f32)>>,
}

impl DetectorFactory for RecordingFactory {
    fn build(
        &self,
        _config: &DetectorConfig,
        confidence: f32,
        nms: f32,
    ) -> LookoutResult<Box<dyn Detector>> {
        Ok(Box::new(RecordingDetector {
            last_thresholds: Arc::clone(&self.last_thresholds),
            confidence,
            nms,
        }))
    }
}

/// Factory that fails the way missing model weights would
struct BrokenModelFactory;

impl DetectorFactory for BrokenModelFactory {
    fn build(
        &self,
        config: &DetectorConfig,
        _confidence: f32,
        _nms: f32,
    ) -> LookoutResult<Box<dyn Detector>> {
        Err(LookoutError::ModelLoadFailed(config.model_path.clone()))
    }
}

fn names_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"person\ncar\n").unwrap();
    file.flush().unwrap();
    file
}

/// Fast-ticking config pointing at a real (temporary) class-name file
fn test_config(names_path: PathBuf) -> AppConfig {
    let mut config = AppConfig::default();
    config.session.framerate = 100;
    config.detector.class_names_path = names_path;
    config
}

fn controller_with_receiver(config: &AppConfig) -> (SessionController, RenderReceiver) {
    let (sink, receiver) = render_channel(256);
    (SessionController::new(config.clone(), sink), receiver)
}

fn drain_count(receiver: &RenderReceiver) -> usize {
    let mut count = 0;
    while receiver.recv_timeout(Duration::from_millis(1)).is_some() {
        count += 1;
    }
    count
}

#[test]
fn test_second_start_is_rejected() {
    let names = names_file();
    let config = test_config(names.path().to_path_buf());
    let (mut controller, _receiver) = controller_with_receiver(&config);
    let opener = InstrumentedOpener::new();
    let factory = PassthroughFactory;

    controller.start(&opener, &factory).unwrap();
    assert!(controller.is_running());

    let second = controller.start(&opener, &factory);
    assert!(matches!(second, Err(LookoutError::SessionAlreadyRunning)));
    assert!(controller.is_running());

    controller.stop();
}

#[test]
fn test_stop_while_idle_is_noop() {
    let names = names_file();
    let config = test_config(names.path().to_path_buf());
    let (mut controller, _receiver) = controller_with_receiver(&config);

    assert!(!controller.is_running());
    assert!(controller.stop().is_none());
    assert!(controller.stop().is_none());
}

#[test]
fn test_stop_makes_pump_inert_and_releases_capture() {
    let names = names_file();
    let config = test_config(names.path().to_path_buf());
    let (mut controller, receiver) = controller_with_receiver(&config);
    let opener = InstrumentedOpener::new();
    let factory = PassthroughFactory;

    controller.start(&opener, &factory).unwrap();
    std::thread::sleep(Duration::from_millis(60));
    let summary = controller.stop().unwrap();

    assert!(!controller.is_running());
    assert!(opener.released.load(Ordering::SeqCst));

    // No reads or render deliveries after teardown returned
    let reads_at_stop = opener.reads.load(Ordering::SeqCst);
    let shown_at_stop = drain_count(&receiver);
    std::thread::sleep(Duration::from_millis(50));
    assert_eq!(opener.reads.load(Ordering::SeqCst), reads_at_stop);
    assert_eq!(drain_count(&receiver), 0);

    assert!(summary.ticks > 0);
    assert_eq!(shown_at_stop, summary.frames_forwarded);
}

#[test]
fn test_short_run_forwards_every_frame_read() {
    let names = names_file();
    let config = test_config(names.path().to_path_buf());
    let (mut controller, receiver) = controller_with_receiver(&config);
    let opener = InstrumentedOpener::new();
    let factory = PassthroughFactory;

    controller.start(&opener, &factory).unwrap();
    // ~5 ticks at 10ms period, give or take scheduling jitter
    std::thread::sleep(Duration::from_millis(50));
    let summary = controller.stop().unwrap();

    let reads = opener.reads.load(Ordering::SeqCst);
    assert!(summary.ticks >= 2, "expected several ticks, got {:?}", summary);
    // The frame read on the tick the stop lands in may be discarded
    assert!(reads - summary.frames_forwarded <= 1);
    assert_eq!(summary.frames_dropped, 0);
    assert_eq!(drain_count(&receiver), summary.frames_forwarded);
    assert!(opener.released.load(Ordering::SeqCst));
}

#[test]
fn test_stop_timeout_detaches_stuck_worker() {
    let names = names_file();
    let mut config = test_config(names.path().to_path_buf());
    config.session.shutdown_timeout_ms = 100;
    let (mut controller, receiver) = controller_with_receiver(&config);

    let released = Arc::new(AtomicBool::new(false));
    let opener = StuckOpener {
        block_for: Duration::from_millis(400),
        released: Arc::clone(&released),
    };

    controller.start(&opener, &PassthroughFactory).unwrap();
    std::thread::sleep(Duration::from_millis(30));

    // The worker is blocked inside read_frame; stop must give up after the
    // configured timeout instead of waiting out the read
    let stop_started = Instant::now();
    let summary = controller.stop();
    assert!(summary.is_some());
    assert!(!controller.is_running());
    assert!(
        stop_started.elapsed() < Duration::from_millis(350),
        "stop blocked past its timeout: {:?}",
        stop_started.elapsed()
    );

    // The detached worker eventually unblocks, discards its in-flight frame
    // and releases the capture on its own
    drain_count(&receiver);
    std::thread::sleep(Duration::from_millis(600));
    assert_eq!(drain_count(&receiver), 0, "frame delivered after stop returned");
    assert!(released.load(Ordering::SeqCst));
}

#[test]
fn test_close_while_running_is_full_teardown() {
    let names = names_file();
    let config = test_config(names.path().to_path_buf());
    let (mut controller, receiver) = controller_with_receiver(&config);
    let opener = InstrumentedOpener::new();
    let factory = PassthroughFactory;

    controller.start(&opener, &factory).unwrap();
    std::thread::sleep(Duration::from_millis(30));
    assert!(controller.close().is_some());

    assert!(!controller.is_running());
    assert!(opener.released.load(Ordering::SeqCst));

    drain_count(&receiver);
    std::thread::sleep(Duration::from_millis(50));
    assert_eq!(drain_count(&receiver), 0, "frame delivered after close");

    // Close is also stop-idempotent
    assert!(controller.close().is_none());
}

#[test]
fn test_capture_open_failure_reverts_to_idle() {
    let names = names_file();
    let config = test_config(names.path().to_path_buf());
    let (mut controller, _receiver) = controller_with_receiver(&config);

    let result = controller.start(&UnavailableOpener, &PassthroughFactory);
    assert!(matches!(result, Err(LookoutError::CaptureOpenFailed(_))));
    assert!(!controller.is_running());

    // A retry with a healthy opener succeeds
    let opener = InstrumentedOpener::new();
    controller.start(&opener, &PassthroughFactory).unwrap();
    controller.stop();
}

#[test]
fn test_model_load_failure_reverts_to_idle() {
    let names = names_file();
    let config = test_config(names.path().to_path_buf());
    let (mut controller, _receiver) = controller_with_receiver(&config);
    let opener = InstrumentedOpener::new();

    let result = controller.start(&opener, &BrokenModelFactory);
    assert!(matches!(result, Err(LookoutError::ModelLoadFailed(_))));
    assert!(!controller.is_running());
    // The factory failed before the capture was opened
    assert_eq!(opener.reads.load(Ordering::SeqCst), 0);
}

#[test]
fn test_missing_class_names_fails_start() {
    let mut config = AppConfig::default();
    config.session.framerate = 100;
    config.detector.class_names_path = PathBuf::from("does/not/exist.names");
    let (mut controller, _receiver) = controller_with_receiver(&config);

    let result = controller.start(&InstrumentedOpener::new(), &PassthroughFactory);
    assert!(matches!(
        result,
        Err(LookoutError::ClassNamesLoadFailed { .. })
    ));
    assert!(!controller.is_running());
}

#[test]
fn test_threshold_updates_reach_detector_mid_session() {
    let names = names_file();
    let config = test_config(names.path().to_path_buf());
    let (mut controller, _receiver) = controller_with_receiver(&config);
    let opener = InstrumentedOpener::new();
    let last_thresholds = Arc::new(std::sync::Mutex::new((0.0, 0.0)));
    let factory = RecordingFactory {
        last_thresholds: Arc::clone(&last_thresholds),
    };

    controller.start(&opener, &factory).unwrap();

    controller.thresholds().set_confidence(0.91);
    controller.thresholds().set_nms(0.17);
    std::thread::sleep(Duration::from_millis(50));
    controller.stop();

    let seen = *last_thresholds.lock().unwrap();
    assert_eq!(seen, (0.91, 0.17));
}

#[test]
fn test_detector_built_with_current_thresholds() {
    let names = names_file();
    let config = test_config(names.path().to_path_buf());
    let (mut controller, _receiver) = controller_with_receiver(&config);
    let opener = InstrumentedOpener::new();
    let last_thresholds = Arc::new(std::sync::Mutex::new((0.0, 0.0)));
    let factory = RecordingFactory {
        last_thresholds: Arc::clone(&last_thresholds),
    };

    // Slider moved before start; the new session's detector must be built
    // with the updated values
    controller.thresholds().set_confidence(0.33);
    controller.start(&opener, &factory).unwrap();
    std::thread::sleep(Duration::from_millis(30));
    controller.stop();

    let seen = *last_thresholds.lock().unwrap();
    assert_eq!(seen.0, 0.33);
}
