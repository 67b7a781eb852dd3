//! Capture-source collaborator seam

use crate::error::LookoutResult;
use crate::frame::Frame;

/// An open camera/video source read by the frame pump.
///
/// `read_frame` returning `None` means no frame was available this tick; the
/// pump skips the tick rather than treating it as fatal.
pub trait CaptureSource: Send {
    fn is_opened(&self) -> bool;
    fn read_frame(&mut self) -> Option<Frame>;
    fn release(&mut self);
}

/// Opens a capture source at a target framerate. A fresh source is opened for
/// each session and released when the session ends.
pub trait CaptureOpener: Send + Sync {
    fn open(&self, target_framerate: u32) -> LookoutResult<Box<dyn CaptureSource>>;
}

/// A capture source producing solid-color frames, for running the session
/// loop without camera hardware.
pub struct SyntheticCapture {
    width: u32,
    height: u32,
    opened: bool,
    frames_read: u64,
}

impl SyntheticCapture {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            opened: true,
            frames_read: 0,
        }
    }
}

impl CaptureSource for SyntheticCapture {
    fn is_opened(&self) -> bool {
        self.opened
    }

    fn read_frame(&mut self) -> Option<Frame> {
        if !self.opened {
            return None;
        }
        self.frames_read += 1;
        // Cycle the green channel so consecutive frames differ
        let g = (self.frames_read % 256) as u8;
        Some(Frame::filled(self.width, self.height, [32, g, 32]))
    }

    fn release(&mut self) {
        self.opened = false;
    }
}

/// Opener for [`SyntheticCapture`] at a fixed frame size
pub struct SyntheticOpener {
    pub width: u32,
    pub height: u32,
}

impl Default for SyntheticOpener {
    fn default() -> Self {
        Self {
            width: 416,
            height: 416,
        }
    }
}

impl CaptureOpener for SyntheticOpener {
    fn open(&self, _target_framerate: u32) -> LookoutResult<Box<dyn CaptureSource>> {
        Ok(Box::new(SyntheticCapture::new(self.width, self.height)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_capture_reads_until_released() {
        let mut capture = SyntheticCapture::new(4, 4);
        assert!(capture.is_opened());

        let first = capture.read_frame().unwrap();
        let second = capture.read_frame().unwrap();
        assert_eq!(first.width, 4);
        assert_ne!(first, second);

        capture.release();
        assert!(!capture.is_opened());
        assert!(capture.read_frame().is_none());
    }

    #[test]
    fn test_opener_produces_configured_size() {
        let opener = SyntheticOpener {
            width: 64,
            height: 48,
        };
        let mut capture = opener.open(30).unwrap();
        let frame = capture.read_frame().unwrap();
        assert_eq!((frame.width, frame.height), (64, 48));
    }
}
