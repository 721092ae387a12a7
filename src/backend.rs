//! Input-injection and screen-capture collaborator abstraction.
//!
//! This module provides the boundary between scenario execution and the
//! display under test:
//! - `UiBackend` trait for injecting input and capturing frames
//! - `Frame` as the owned RGB pixel buffer produced by captures
//! - `MockUiBackend` for testing and offline scenario runs

use image::{ImageBuffer, RgbImage};
use std::io::Cursor;
use std::path::Path;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors raised by the input/capture collaborator
#[derive(Debug)]
pub enum BackendError {
    /// Input injection call failed
    Injection(String),

    /// Frame capture failed
    Capture(String),

    /// I/O error
    Io(std::io::Error),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::Injection(msg) => write!(f, "Input injection error: {}", msg),
            BackendError::Capture(msg) => write!(f, "Capture error: {}", msg),
            BackendError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for BackendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BackendError::Injection(_) | BackendError::Capture(_) => None,
            BackendError::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::Io(err)
    }
}

/// Trait for input-injection / screen-capture collaborators
///
/// Implementations drive the display under test. The crate ships
/// `MockUiBackend` for tests and offline runs; a real display driver
/// implements the same surface.
pub trait UiBackend: Send {
    /// Click at absolute screen coordinates
    fn click(&mut self, x: i32, y: i32) -> BackendResult<()>;

    /// Drag by a relative offset over the given duration in seconds
    fn drag(&mut self, dx: i32, dy: i32, duration: f64) -> BackendResult<()>;

    /// Type a string as literal keypresses
    fn type_text(&mut self, text: &str) -> BackendResult<()>;

    /// Capture the current screen contents
    fn capture_frame(&mut self) -> BackendResult<Frame>;

    /// Get the source type identifier (e.g., "mock", "display")
    fn source_type(&self) -> &str;
}

/// An owned RGB frame, as captured from a backend
///
/// Also provides a small drawing API used to build test fixtures:
/// - `fill()` - Fill the whole frame with a color
/// - `draw_rect()` - Draw a filled rectangle
/// - `get_pixel()` / `set_pixel()` - Direct pixel access
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// RGB pixel buffer (row-major, 3 bytes per pixel)
    buffer: Vec<u8>,
}

impl Frame {
    /// Create a new frame with the given dimensions, initialized to black
    pub fn new(width: u32, height: u32) -> Self {
        let buffer = vec![0u8; (width * height * 3) as usize];
        Self {
            width,
            height,
            buffer,
        }
    }

    /// Create a frame initialized to a specific color
    pub fn with_color(width: u32, height: u32, color: [u8; 3]) -> Self {
        let mut frame = Self::new(width, height);
        frame.fill(color);
        frame
    }

    /// Load a frame from PNG image bytes
    pub fn from_png_bytes(data: &[u8]) -> BackendResult<Self> {
        let img = image::load_from_memory(data)
            .map_err(|e| BackendError::Capture(format!("Failed to load PNG: {}", e)))?;
        let rgb = img.to_rgb8();
        Ok(Self {
            width: rgb.width(),
            height: rgb.height(),
            buffer: rgb.into_raw(),
        })
    }

    /// Load a frame from a PNG file on disk
    pub fn from_png_path(path: impl AsRef<Path>) -> BackendResult<Self> {
        let data = std::fs::read(path)?;
        Self::from_png_bytes(&data)
    }

    /// Build a frame from raw RGB bytes
    pub fn from_raw_rgb(width: u32, height: u32, data: Vec<u8>) -> BackendResult<Self> {
        let expected = (width * height * 3) as usize;
        if data.len() != expected {
            return Err(BackendError::Capture(format!(
                "Buffer size mismatch: expected {} bytes, got {}",
                expected,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            buffer: data,
        })
    }

    /// Fill the entire frame with a color
    pub fn fill(&mut self, color: [u8; 3]) {
        for chunk in self.buffer.chunks_exact_mut(3) {
            chunk[0] = color[0];
            chunk[1] = color[1];
            chunk[2] = color[2];
        }
    }

    /// Draw a filled rectangle
    pub fn draw_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: [u8; 3]) {
        for py in y..(y + h).min(self.height) {
            for px in x..(x + w).min(self.width) {
                self.set_pixel(px, py, color);
            }
        }
    }

    /// Get the color of a pixel
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 3] {
        if x >= self.width || y >= self.height {
            return [0, 0, 0];
        }
        let idx = ((y * self.width + x) * 3) as usize;
        [self.buffer[idx], self.buffer[idx + 1], self.buffer[idx + 2]]
    }

    /// Set the color of a pixel
    pub fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 3]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = ((y * self.width + x) * 3) as usize;
        self.buffer[idx] = color[0];
        self.buffer[idx + 1] = color[1];
        self.buffer[idx + 2] = color[2];
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the raw RGB buffer
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Convert to an image buffer
    fn to_image(&self) -> RgbImage {
        ImageBuffer::from_raw(self.width, self.height, self.buffer.clone())
            .expect("Buffer size should match dimensions")
    }

    /// Encode the frame as PNG bytes
    pub fn to_png(&self) -> BackendResult<Vec<u8>> {
        let img = self.to_image();
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .map_err(|e| BackendError::Capture(format!("Failed to encode PNG: {}", e)))?;
        Ok(bytes)
    }
}

/// A scriptable collaborator for tests and offline runs
///
/// Owns a `Frame` standing in for the screen, records every injected
/// action, and can be armed to fail on a specific click so failure
/// sequencing can be exercised deterministically.
#[derive(Debug)]
pub struct MockUiBackend {
    frame: Frame,
    /// Recorded click coordinates, in call order
    pub clicks: Vec<(i32, i32)>,
    /// Recorded drag offsets with durations
    pub drags: Vec<(i32, i32, f64)>,
    /// Recorded typed strings
    pub typed: Vec<String>,
    fail_click_at: Option<usize>,
}

impl MockUiBackend {
    /// Create a mock backend over the given frame
    pub fn new(frame: Frame) -> Self {
        Self {
            frame,
            clicks: Vec::new(),
            drags: Vec::new(),
            typed: Vec::new(),
            fail_click_at: None,
        }
    }

    /// Create a mock backend with a solid-color screen
    pub fn with_color(width: u32, height: u32, color: [u8; 3]) -> Self {
        Self::new(Frame::with_color(width, height, color))
    }

    /// Create a mock backend whose screen is loaded from a PNG file
    pub fn from_png_path(path: impl AsRef<Path>) -> BackendResult<Self> {
        Ok(Self::new(Frame::from_png_path(path)?))
    }

    /// Arm the backend to fail the nth click (1-based)
    pub fn fail_click_at(mut self, nth: usize) -> Self {
        self.fail_click_at = Some(nth);
        self
    }

    /// Mutable access to the screen frame, for drawing fixtures
    pub fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }
}

impl UiBackend for MockUiBackend {
    fn click(&mut self, x: i32, y: i32) -> BackendResult<()> {
        if self.fail_click_at == Some(self.clicks.len() + 1) {
            return Err(BackendError::Injection(format!(
                "simulated click failure at ({}, {})",
                x, y
            )));
        }
        self.clicks.push((x, y));
        Ok(())
    }

    fn drag(&mut self, dx: i32, dy: i32, duration: f64) -> BackendResult<()> {
        self.drags.push((dx, dy, duration));
        Ok(())
    }

    fn type_text(&mut self, text: &str) -> BackendResult<()> {
        self.typed.push(text.to_string());
        Ok(())
    }

    fn capture_frame(&mut self) -> BackendResult<Frame> {
        Ok(self.frame.clone())
    }

    fn source_type(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_new() {
        let frame = Frame::new(100, 50);
        assert_eq!(frame.width(), 100);
        assert_eq!(frame.height(), 50);
        // Should be initialized to black
        assert_eq!(frame.get_pixel(0, 0), [0, 0, 0]);
        assert_eq!(frame.get_pixel(99, 49), [0, 0, 0]);
    }

    #[test]
    fn test_frame_fill() {
        let mut frame = Frame::new(10, 10);
        frame.fill([255, 128, 64]);
        assert_eq!(frame.get_pixel(0, 0), [255, 128, 64]);
        assert_eq!(frame.get_pixel(5, 5), [255, 128, 64]);
        assert_eq!(frame.get_pixel(9, 9), [255, 128, 64]);
    }

    #[test]
    fn test_frame_draw_rect() {
        let mut frame = Frame::new(20, 20);
        frame.draw_rect(5, 5, 10, 10, [255, 0, 0]);

        // Outside rect
        assert_eq!(frame.get_pixel(0, 0), [0, 0, 0]);
        assert_eq!(frame.get_pixel(4, 4), [0, 0, 0]);

        // Inside rect
        assert_eq!(frame.get_pixel(5, 5), [255, 0, 0]);
        assert_eq!(frame.get_pixel(14, 14), [255, 0, 0]);

        // Just outside rect
        assert_eq!(frame.get_pixel(15, 15), [0, 0, 0]);
    }

    #[test]
    fn test_frame_png_roundtrip() {
        let mut frame = Frame::new(32, 32);
        frame.fill([100, 150, 200]);
        frame.draw_rect(8, 8, 16, 16, [255, 0, 0]);

        let png = frame.to_png().unwrap();
        // Check PNG magic bytes
        assert_eq!(&png[0..4], &[0x89, 0x50, 0x4E, 0x47]);

        let frame2 = Frame::from_png_bytes(&png).unwrap();
        assert_eq!(frame2.width(), frame.width());
        assert_eq!(frame2.height(), frame.height());
        assert_eq!(frame2.get_pixel(0, 0), [100, 150, 200]);
        assert_eq!(frame2.get_pixel(10, 10), [255, 0, 0]);
    }

    #[test]
    fn test_frame_from_raw_rgb_size_mismatch() {
        let result = Frame::from_raw_rgb(10, 10, vec![0u8; 5]);
        assert!(result.is_err());
    }

    #[test]
    fn test_mock_backend_records_actions() {
        let mut backend = MockUiBackend::with_color(50, 50, [0, 0, 0]);
        backend.click(10, 20).unwrap();
        backend.drag(5, -5, 1.0).unwrap();
        backend.type_text("hello").unwrap();

        assert_eq!(backend.clicks, vec![(10, 20)]);
        assert_eq!(backend.drags, vec![(5, -5, 1.0)]);
        assert_eq!(backend.typed, vec!["hello".to_string()]);
    }

    #[test]
    fn test_mock_backend_armed_failure() {
        let mut backend = MockUiBackend::with_color(50, 50, [0, 0, 0]).fail_click_at(2);
        assert!(backend.click(1, 1).is_ok());
        assert!(backend.click(2, 2).is_err());
        // Failed click is not recorded
        assert_eq!(backend.clicks.len(), 1);
    }

    #[test]
    fn test_mock_backend_capture() {
        let mut backend = MockUiBackend::with_color(50, 50, [128, 128, 128]);
        let frame = backend.capture_frame().unwrap();
        assert_eq!(frame.width(), 50);
        assert_eq!(frame.get_pixel(25, 25), [128, 128, 128]);
    }
}
