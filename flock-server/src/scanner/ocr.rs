//! OCR engine boundary

use async_trait::async_trait;
use image::GrayImage;
use thiserror::Error;

/// Page segmentation hint for the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentationMode {
    /// Treat the frame as one uniform block of text, the right mode for a
    /// code card filling the viewfinder
    SingleBlock,
}

/// Engine configuration for digit reading
#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Characters the engine may emit
    pub char_whitelist: &'static str,
    pub segmentation: SegmentationMode,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            char_whitelist: "0123456789",
            segmentation: SegmentationMode::SingleBlock,
        }
    }
}

/// OCR failures
#[derive(Debug, Error)]
pub enum OcrError {
    /// Engine could not be brought up; terminal for the scan session
    #[error("Recognizer initialization failed: {0}")]
    InitFailed(String),

    /// One recognition pass failed; the session keeps scanning
    #[error("Recognition failed: {0}")]
    RecognitionFailed(String),
}

/// A text recognizer
///
/// One engine instance belongs to one scanner session; it is configured
/// once and then fed grayscale frames until the session ends.
#[async_trait]
pub trait OcrEngine: Send {
    async fn initialize(&mut self, config: &OcrConfig) -> Result<(), OcrError>;

    /// Recognize text in a preprocessed frame
    async fn recognize(&mut self, frame: &GrayImage) -> Result<String, OcrError>;
}
