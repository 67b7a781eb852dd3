//! Render-surface marshaling
//!
//! The render surface may only be touched from the UI thread. The frame pump
//! therefore never calls it: annotated frames go into a bounded channel and
//! the UI thread drains them into the surface at its own pace. When the
//! channel is full the frame is dropped rather than blocking the pump.

use crate::frame::AnnotatedFrame;
use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError, TrySendError};
use std::time::Duration;

/// Display side of the seam; implementations are only ever invoked on the
/// thread that owns the [`RenderReceiver`].
pub trait RenderSurface {
    fn show_frame(&mut self, frame: AnnotatedFrame);
}

/// Worker-side sender held by the frame pump
#[derive(Clone)]
pub struct FrameSink {
    tx: Sender<AnnotatedFrame>,
}

impl FrameSink {
    /// Queue a frame for display. Returns false if the frame was dropped
    /// because the UI is not keeping up or the receiver is gone.
    pub fn send(&self, frame: AnnotatedFrame) -> bool {
        match self.tx.try_send(frame) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// UI-side receiver; owns the only path to the render surface
pub struct RenderReceiver {
    rx: Receiver<AnnotatedFrame>,
}

impl RenderReceiver {
    /// Deliver every queued frame to the surface, returning how many were shown
    pub fn drain_into(&self, surface: &mut dyn RenderSurface) -> usize {
        let mut shown = 0;
        loop {
            match self.rx.try_recv() {
                Ok(frame) => {
                    surface.show_frame(frame);
                    shown += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return shown,
            }
        }
    }

    /// Wait for the next frame, up to `timeout`
    pub fn recv_timeout(&self, timeout: Duration) -> Option<AnnotatedFrame> {
        self.rx.recv_timeout(timeout).ok()
    }
}

/// Create the worker-to-UI frame channel with the given queue depth
pub fn render_channel(depth: usize) -> (FrameSink, RenderReceiver) {
    let (tx, rx) = bounded(depth);
    (FrameSink { tx }, RenderReceiver { rx })
}
