//! Frame data structures shared between capture, detection and rendering

/// A raw RGB frame, row-major `[RGB, RGB, ...]` of length width * height * 3
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Frame {
    /// Create a frame filled with a single color
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let pixels = rgb
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 3)
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Expected pixel buffer length for the frame dimensions.
    /// Widened before multiplying; `u32` arithmetic overflows past ~37k square.
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }
}

/// A frame that has been through detection, carrying the labels found in it
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotatedFrame {
    pub frame: Frame,
    pub labels: Vec<String>,
}
