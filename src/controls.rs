//! Toolkit-agnostic UI surface model
//!
//! Replaces the original signal/slot wiring with plain values: the host UI
//! translates widget activity into [`UiEvent`]s and hands them to
//! [`ControlPanel::handle`], which keeps the button affordances consistent
//! and dispatches into the session controller.

use crate::capture::CaptureOpener;
use crate::detector::DetectorFactory;
use crate::session::SessionController;
use tracing::warn;

/// Which threshold a slider controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdKind {
    Confidence,
    Nms,
}

/// A UI event, decoupled from any particular toolkit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// A threshold slider moved; positions are constrained to 0..=100 by the UI
    SliderMoved { kind: ThresholdKind, position: u8 },
    StartClicked,
    StopClicked,
    WindowClosed,
}

/// Map a slider position in 0..=100 to its threshold value
pub fn slider_value(position: u8) -> f32 {
    f32::from(position) / 100.0
}

/// Two-decimal display text for a slider position
pub fn slider_label(position: u8) -> String {
    format!("{:.2}", slider_value(position))
}

/// Tracks the start/stop affordances and the slider value labels.
/// Start and stop enabled states are mutually exclusive at all times.
pub struct ControlPanel {
    start_enabled: bool,
    stop_enabled: bool,
    confidence_label: String,
    nms_label: String,
}

impl ControlPanel {
    /// A panel in the Idle state, labels showing the initial slider positions
    pub fn new(confidence_position: u8, nms_position: u8) -> Self {
        Self {
            start_enabled: true,
            stop_enabled: false,
            confidence_label: slider_label(confidence_position),
            nms_label: slider_label(nms_position),
        }
    }

    pub fn start_enabled(&self) -> bool {
        self.start_enabled
    }

    pub fn stop_enabled(&self) -> bool {
        self.stop_enabled
    }

    pub fn confidence_label(&self) -> &str {
        &self.confidence_label
    }

    pub fn nms_label(&self) -> &str {
        &self.nms_label
    }

    /// Process one UI event against the controller.
    ///
    /// A failed start restores the Idle affordances (start enabled, stop
    /// disabled) so the UI never shows "running" over a dead pipeline.
    pub fn handle(
        &mut self,
        event: UiEvent,
        controller: &mut SessionController,
        opener: &dyn CaptureOpener,
        factory: &dyn DetectorFactory,
    ) {
        match event {
            UiEvent::SliderMoved { kind, position } => {
                let value = slider_value(position);
                let label = slider_label(position);
                match kind {
                    ThresholdKind::Confidence => {
                        controller.thresholds().set_confidence(value);
                        self.confidence_label = label;
                    }
                    ThresholdKind::Nms => {
                        controller.thresholds().set_nms(value);
                        self.nms_label = label;
                    }
                }
            }
            UiEvent::StartClicked => {
                if !self.start_enabled {
                    return;
                }
                self.start_enabled = false;
                self.stop_enabled = true;
                if let Err(e) = controller.start(opener, factory) {
                    warn!("start failed: {}", e);
                    self.start_enabled = true;
                    self.stop_enabled = false;
                }
            }
            UiEvent::StopClicked => {
                if !self.stop_enabled {
                    return;
                }
                self.stop_enabled = false;
                self.start_enabled = true;
                controller.stop();
            }
            UiEvent::WindowClosed => {
                self.stop_enabled = false;
                self.start_enabled = true;
                controller.close();
            }
        }
    }
}
