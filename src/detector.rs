// Region detector adapter: fuse barcode and OCR engines into normalized detections
use anyhow::Result;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use image::Luma;
use imageproc::contrast::adaptive_threshold;
use imageproc::filter::{filter3x3, median_filter};
use log::warn;

use crate::types::{BBox, Detection, DetectionKind, Region};

/// OCR crops are upscaled until at least this tall; low-resolution scans
/// recognize poorly otherwise.
const MIN_OCR_HEIGHT: u32 = 600;

/// Block radius for the adaptive binarization ahead of OCR.
const THRESHOLD_BLOCK_RADIUS: u32 = 15;

/// Structural barcode decodes are trusted more than OCR text.
const BARCODE_BASE_CONFIDENCE: f32 = 0.95;

/// Edge-sharpening kernel applied between denoise and binarization.
const SHARPEN_KERNEL: [f32; 9] = [0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0];

/// A raw barcode decode from the external engine.
#[derive(Debug, Clone)]
pub struct BarcodeHit {
    pub text: String,
    pub bbox: BBox,
    pub format: String,
}

/// A raw text recognition from the external engine.
#[derive(Debug, Clone)]
pub struct TextHit {
    pub text: String,
    pub bbox: BBox,
    pub confidence: f32,
}

/// External barcode decoder, consumed as a black box.
pub trait BarcodeDecoder {
    fn decode_barcodes(&self, image: &DynamicImage) -> Result<Vec<BarcodeHit>>;
}

/// External OCR engine, consumed as a black box.
pub trait TextRecognizer {
    fn recognize_text(&self, image: &DynamicImage) -> Result<Vec<TextHit>>;
}

/// Runs both engines over a region and normalizes their output.
pub struct RegionDetector<'a> {
    barcodes: &'a dyn BarcodeDecoder,
    ocr: &'a dyn TextRecognizer,
}

impl<'a> RegionDetector<'a> {
    pub fn new(barcodes: &'a dyn BarcodeDecoder, ocr: &'a dyn TextRecognizer) -> Self {
        Self { barcodes, ocr }
    }

    /// Detect barcodes then OCR text within one region.
    ///
    /// Engine failures are contained here: a failing engine contributes an
    /// empty detection list, never a page-aborting error. Detections come
    /// back in top-to-bottom, left-to-right order, with boxes clamped to the
    /// region bounds.
    pub fn detect(&self, region: &Region) -> Vec<Detection> {
        let (rw, rh) = region.image.dimensions();
        let mut detections = Vec::new();

        // Barcodes first: structural, cheap
        match self.barcodes.decode_barcodes(&region.image) {
            Ok(hits) => {
                for hit in hits {
                    let text = clean_barcode_value(&hit.text);
                    if text.is_empty() {
                        continue;
                    }
                    let mut det = Detection {
                        kind: DetectionKind::Barcode,
                        text,
                        bbox: hit.bbox.clamped(rw, rh),
                        confidence: BARCODE_BASE_CONFIDENCE,
                    };
                    if det.is_job_candidate() {
                        det.confidence = 1.0;
                    }
                    detections.push(det);
                }
            }
            Err(e) => warn!(
                "barcode decode failed on page {} region {}: {e:#}",
                region.page, region.region_index
            ),
        }

        // OCR over a preprocessed copy; boxes map back through the upscale
        let (prepared, scale) = preprocess_for_ocr(&region.image);
        match self.ocr.recognize_text(&prepared) {
            Ok(hits) => {
                for hit in hits {
                    let text = hit.text.trim().replace('_', " ");
                    if text.is_empty() {
                        continue;
                    }
                    detections.push(Detection {
                        kind: DetectionKind::Text,
                        text,
                        bbox: downscale_bbox(hit.bbox, scale).clamped(rw, rh),
                        confidence: hit.confidence,
                    });
                }
            }
            Err(e) => warn!(
                "OCR failed on page {} region {}: {e:#}",
                region.page, region.region_index
            ),
        }

        detections.sort_by_key(|d| (d.bbox.y, d.bbox.x));
        detections
    }
}

/// Denoise, sharpen, binarize and upscale a region crop ahead of OCR.
///
/// Returns the prepared image and the upscale factor applied, so engine
/// boxes can be mapped back to region coordinates.
pub fn preprocess_for_ocr(image: &DynamicImage) -> (DynamicImage, f32) {
    let gray = image.to_luma8();
    let denoised = median_filter(&gray, 1, 1);
    let sharpened = filter3x3::<Luma<u8>, f32, u8>(&denoised, &SHARPEN_KERNEL);
    let binary = adaptive_threshold(&sharpened, THRESHOLD_BLOCK_RADIUS);

    let (w, h) = binary.dimensions();
    let prepared = DynamicImage::ImageLuma8(binary);
    if h > 0 && h < MIN_OCR_HEIGHT {
        let scale = MIN_OCR_HEIGHT as f32 / h as f32;
        let scaled = prepared.resize_exact(
            (w as f32 * scale) as u32,
            MIN_OCR_HEIGHT,
            FilterType::CatmullRom,
        );
        (scaled, scale)
    } else {
        (prepared, 1.0)
    }
}

fn downscale_bbox(bbox: BBox, scale: f32) -> BBox {
    if scale <= 1.0 {
        return bbox;
    }
    BBox::new(
        (bbox.x as f32 / scale) as u32,
        (bbox.y as f32 / scale) as u32,
        ((bbox.width as f32 / scale) as u32).max(1),
        ((bbox.height as f32 / scale) as u32).max(1),
    )
}

/// Strip control and non-alphanumeric characters from a decoded barcode.
pub fn clean_barcode_value(raw: &str) -> String {
    raw.chars().filter(|c| c.is_alphanumeric()).collect()
}
