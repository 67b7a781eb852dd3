//! Lookout session core
//!
//! A toolkit-agnostic core for a live object-detection viewer: a
//! processing-session controller that owns a background frame pump
//! (capture -> detect -> render) with adjustable confidence/NMS
//! thresholds and clean start/stop/close teardown.

pub mod capture;
pub mod classes;
pub mod config;
pub mod controls;
pub mod detector;
pub mod error;
pub mod frame;
pub mod pump;
pub mod render;
pub mod session;
pub mod stats;
pub mod thresholds;

// Re-export commonly used types
pub use capture::{CaptureOpener, CaptureSource, SyntheticCapture, SyntheticOpener};
pub use config::{AppConfig, ConfigError, DetectorConfig, SessionConfig};
pub use controls::{ControlPanel, ThresholdKind, UiEvent};
pub use detector::{Detector, DetectorFactory, PassthroughDetector, PassthroughFactory};
pub use error::{LookoutError, LookoutResult};
pub use frame::{AnnotatedFrame, Frame};
pub use render::{render_channel, FrameSink, RenderReceiver, RenderSurface};
pub use session::SessionController;
pub use stats::{SessionStats, SessionSummary};
pub use thresholds::SharedThresholds;

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
