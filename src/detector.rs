//! Detector collaborator seam
//!
//! The detection algorithm itself is an external collaborator. The session
//! core only needs to build one per session, keep its threshold copies in
//! step with the UI, and feed it one frame per tick.

use crate::config::DetectorConfig;
use crate::error::LookoutResult;
use crate::frame::{AnnotatedFrame, Frame};

/// One detection pass over a frame plus threshold bookkeeping.
///
/// The detector is the sole mutator of its own threshold copies; the frame
/// pump pushes the current shared values in via `set_thresholds` before each
/// `detect` call.
pub trait Detector: Send {
    /// Update the detector's threshold copies
    fn set_thresholds(&mut self, confidence: f32, nms: f32);

    /// Current threshold copies (confidence, nms)
    fn thresholds(&self) -> (f32, f32);

    /// Run detection on a frame, returning it annotated with the labels found
    fn detect(&mut self, frame: Frame, class_names: &[String]) -> LookoutResult<AnnotatedFrame>;
}

/// Builds a fresh detector for each session from the configured model paths
/// and the thresholds current at start time.
pub trait DetectorFactory: Send + Sync {
    fn build(
        &self,
        config: &DetectorConfig,
        confidence: f32,
        nms: f32,
    ) -> LookoutResult<Box<dyn Detector>>;
}

/// A detector that performs no inference: frames pass through unchanged with
/// an empty label list. Lets the demo binary and the tests exercise the full
/// session loop without model files.
pub struct PassthroughDetector {
    confidence: f32,
    nms: f32,
}

impl PassthroughDetector {
    pub fn new(confidence: f32, nms: f32) -> Self {
        Self { confidence, nms }
    }
}

impl Detector for PassthroughDetector {
    fn set_thresholds(&mut self, confidence: f32, nms: f32) {
        self.confidence = confidence;
        self.nms = nms;
    }

    fn thresholds(&self) -> (f32, f32) {
        (self.confidence, self.nms)
    }

    fn detect(&mut self, frame: Frame, _class_names: &[String]) -> LookoutResult<AnnotatedFrame> {
        Ok(AnnotatedFrame {
            frame,
            labels: Vec::new(),
        })
    }
}

/// Factory for [`PassthroughDetector`]
#[derive(Default)]
pub struct PassthroughFactory;

impl DetectorFactory for PassthroughFactory {
    fn build(
        &self,
        _config: &DetectorConfig,
        confidence: f32,
        nms: f32,
    ) -> LookoutResult<Box<dyn Detector>> {
        Ok(Box::new(PassthroughDetector::new(confidence, nms)))
    }
}
