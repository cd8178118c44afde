// Core types for the job-card extraction pipeline
use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// A single rasterized PDF page. Owned by the pipeline for the duration of
/// region extraction, then dropped.
pub struct PageImage {
    /// 1-based page number
    pub page: u32,
    pub image: DynamicImage,
}

/// A horizontal slice of a page bounded by two divider lines (or page edges).
pub struct Region {
    pub page: u32,
    pub region_index: usize,
    /// Vertical bounds on the source page, `y0..y1`
    pub y0: u32,
    pub y1: u32,
    pub image: DynamicImage,
}

impl Region {
    pub fn height(&self) -> u32 {
        self.y1 - self.y0
    }
}

/// Bounding box relative to the region it was detected in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Clamp this box so it lies entirely within a `bound_width` x
    /// `bound_height` region.
    pub fn clamped(self, bound_width: u32, bound_height: u32) -> Self {
        let x = self.x.min(bound_width.saturating_sub(1));
        let y = self.y.min(bound_height.saturating_sub(1));
        Self {
            x,
            y,
            width: self.width.min(bound_width - x).max(1),
            height: self.height.min(bound_height - y).max(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionKind {
    Barcode,
    Text,
}

/// A normalized recognition result from either detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub kind: DetectionKind,
    pub text: String,
    pub bbox: BBox,
    pub confidence: f32,
}

impl Detection {
    /// Barcode values following the `J<digits>` job-number convention are
    /// high-confidence job-number candidates. Tagging only; the field
    /// extractor makes the extraction decision.
    pub fn is_job_candidate(&self) -> bool {
        self.kind == DetectionKind::Barcode && crate::extract::fields::is_job_number(&self.text)
    }
}

/// Raw per-region detection dump, written to `*_raw.json` when enabled.
/// Diagnostic only; never consulted for extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionReport {
    pub page: u32,
    pub region_index: usize,
    /// Vertical bounds `[y0, y1]` on the source page
    pub bounds: [u32; 2],
    pub detections: Vec<Detection>,
}

/// One manufacturing operation extracted from the card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationRecord {
    pub op_number: String,
    pub op_name: String,
    pub op_id: Option<String>,
    pub page: u32,
}

/// The document-level result. Absent header fields serialize as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub job_number: Option<String>,
    pub quantity: Option<String>,
    pub delivery_date: Option<String>,
    pub operations: Vec<OperationRecord>,
}

// Error types
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ExtractError>;
