// Concrete detector engines behind the collaborator traits
pub mod barcode;
#[cfg(feature = "tesseract")]
pub mod tesseract;

use anyhow::Result;
use image::DynamicImage;
use log::warn;

use crate::detector::{TextHit, TextRecognizer};

/// Stand-in recognizer for builds without an OCR engine. Returns no text
/// detections, which the pipeline already tolerates; barcode-only extraction
/// still works.
pub struct NullRecognizer;

impl NullRecognizer {
    pub fn new() -> Self {
        warn!("built without the `tesseract` feature; OCR text detection is disabled");
        Self
    }
}

impl Default for NullRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextRecognizer for NullRecognizer {
    fn recognize_text(&self, _image: &DynamicImage) -> Result<Vec<TextHit>> {
        Ok(Vec::new())
    }
}
