//! Processing-session controller
//!
//! Two-state machine (Idle / Running) around one run of the
//! capture -> detect -> render loop. At most one session is alive at a time.
//! Stop and close are idempotent and always leave the controller Idle with
//! every per-session resource released.

use crate::capture::CaptureOpener;
use crate::classes::load_class_names;
use crate::config::AppConfig;
use crate::detector::DetectorFactory;
use crate::error::{LookoutError, LookoutResult};
use crate::pump::FramePump;
use crate::render::FrameSink;
use crate::stats::{SessionStats, SessionSummary};
use crate::thresholds::SharedThresholds;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Lifecycle notifications from the worker thread
enum WorkerEvent {
    /// Sent before the first tick; the cadence never begins before this
    Started,
    /// Sent after the pump loop has exited and released the capture source
    Stopped,
}

/// One running session: worker handle, cancellation flag, event channel
/// and the counters the pump updates.
struct Session {
    worker: Option<JoinHandle<()>>,
    cancel: Arc<AtomicBool>,
    events: Receiver<WorkerEvent>,
    stats: Arc<SessionStats>,
}

/// Owns the session lifecycle. UI events are delivered as plain method
/// calls; the controller never touches UI state itself.
pub struct SessionController {
    config: AppConfig,
    thresholds: Arc<SharedThresholds>,
    sink: FrameSink,
    session: Option<Session>,
}

impl SessionController {
    /// Create an Idle controller. The shared thresholds start at the
    /// configured values; the UI mutates them through [`Self::thresholds`].
    pub fn new(config: AppConfig, sink: FrameSink) -> Self {
        let thresholds = Arc::new(SharedThresholds::new(
            config.detector.confidence_threshold,
            config.detector.nms_threshold,
        ));
        Self {
            config,
            thresholds,
            sink,
            session: None,
        }
    }

    /// Shared threshold handle, written by the UI thread and read by the pump
    pub fn thresholds(&self) -> Arc<SharedThresholds> {
        Arc::clone(&self.thresholds)
    }

    pub fn is_running(&self) -> bool {
        self.session.is_some()
    }

    /// Idle -> Running. Loads the class list, builds a fresh detector with
    /// the current thresholds, opens the capture source and spawns the
    /// worker. Returns only after the worker has reported startup, so the
    /// tick cadence cannot begin before its thread context exists.
    ///
    /// Any failure leaves the controller Idle; resources acquired up to the
    /// failure point are dropped on the way out.
    pub fn start(
        &mut self,
        opener: &dyn CaptureOpener,
        factory: &dyn DetectorFactory,
    ) -> LookoutResult<()> {
        if self.session.is_some() {
            return Err(LookoutError::SessionAlreadyRunning);
        }

        let class_names = load_class_names(&self.config.detector.class_names_path)?;
        let detector = factory.build(
            &self.config.detector,
            self.thresholds.confidence(),
            self.thresholds.nms(),
        )?;
        let capture = opener.open(self.config.session.framerate)?;

        let cancel = Arc::new(AtomicBool::new(false));
        let stats = Arc::new(SessionStats::new());
        let (event_tx, event_rx) = bounded(2);

        let pump = FramePump::new(
            capture,
            detector,
            class_names,
            Arc::clone(&self.thresholds),
            self.sink.clone(),
            Arc::clone(&cancel),
            self.config.session.frame_period(),
            Arc::clone(&stats),
        );

        let worker = std::thread::Builder::new()
            .name("lookout-pump".to_string())
            .spawn(move || {
                let _ = event_tx.send(WorkerEvent::Started);
                pump.run();
                let _ = event_tx.send(WorkerEvent::Stopped);
            })
            .map_err(|e| LookoutError::Unexpected(format!("worker spawn failed: {}", e)))?;

        let timeout = self.config.session.shutdown_timeout();
        match event_rx.recv_timeout(timeout) {
            Ok(WorkerEvent::Started) => {}
            Ok(WorkerEvent::Stopped) | Err(_) => {
                cancel.store(true, Ordering::SeqCst);
                return Err(LookoutError::WorkerStartTimeout {
                    waited_ms: self.config.session.shutdown_timeout_ms,
                });
            }
        }

        info!(
            framerate = self.config.session.framerate,
            "processing session started"
        );
        self.session = Some(Session {
            worker: Some(worker),
            cancel,
            events: event_rx,
            stats,
        });
        Ok(())
    }

    /// Running -> Idle. Cancels the pump, waits up to the configured timeout
    /// for the worker to exit, then joins it; on timeout the worker is
    /// detached and teardown proceeds anyway. Calling stop while Idle is a
    /// no-op and returns `None`.
    pub fn stop(&mut self) -> Option<SessionSummary> {
        let Some(mut session) = self.session.take() else {
            debug!("stop requested while idle, nothing to do");
            return None;
        };

        session.cancel.store(true, Ordering::SeqCst);

        let timeout = self.config.session.shutdown_timeout();
        let deadline = Instant::now() + timeout;
        let mut clean_exit = false;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match session.events.recv_timeout(remaining) {
                Ok(WorkerEvent::Stopped) => {
                    clean_exit = true;
                    break;
                }
                // A stale Started can only sit in the channel if start was
                // interrupted; drain it and keep waiting for Stopped.
                Ok(WorkerEvent::Started) => continue,
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => {
                    clean_exit = true;
                    break;
                }
            }
        }

        if clean_exit {
            if let Some(handle) = session.worker.take() {
                let _ = handle.join();
            }
            info!("processing session stopped");
        } else {
            // The worker keeps the cancel flag and will release the capture
            // source when it finally observes it; dropping the handle
            // detaches rather than blocks.
            let timeout_err = LookoutError::WorkerShutdownTimeout {
                waited_ms: self.config.session.shutdown_timeout_ms,
            };
            warn!("{}; worker detached", timeout_err);
        }

        Some(session.stats.snapshot())
    }

    /// Window-close handling: a superset of stop. Performs the same teardown
    /// with the same bounded wait, guaranteeing that no frame can be
    /// delivered into a window that has begun destruction.
    pub fn close(&mut self) -> Option<SessionSummary> {
        let summary = self.stop();
        info!("controller closed");
        summary
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        if self.session.is_some() {
            self.stop();
        }
    }
}
