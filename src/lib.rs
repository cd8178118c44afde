//! Job-card extraction pipeline.
//!
//! Turns scanned manufacturing job-card PDFs into structured records:
//! pages are rasterized, segmented into horizontal regions along rule
//! lines, scanned by barcode and OCR engines, and the fused detections are
//! run through pattern tables to recover the job number, quantity,
//! delivery date and operation list.
//!
//! The external engines (PDF rasterizer, barcode decoder, OCR) sit behind
//! narrow traits, so the whole pipeline can run against stubs in tests.

pub mod annotate;
pub mod assembler;
pub mod detector;
pub mod engines;
pub mod extract;
pub mod output;
pub mod render;
pub mod segmenter;
pub mod types;

pub use assembler::{Pipeline, ProcessOutcome};
pub use detector::{BarcodeDecoder, BarcodeHit, TextHit, TextRecognizer};
pub use render::{PageRenderer, PdfiumRenderer, DEFAULT_DPI};
pub use types::{
    BBox, Detection, DetectionKind, ExtractError, JobRecord, OperationRecord, PageImage, Region,
    RegionReport,
};
