// Barcode decoding via rxing (pure-Rust zxing port)
use anyhow::Result;
use image::{DynamicImage, GenericImageView};
use log::debug;

use crate::detector::{BarcodeDecoder, BarcodeHit};
use crate::types::BBox;

/// `BarcodeDecoder` backed by rxing's multi-format reader.
pub struct RxingDecoder;

impl RxingDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RxingDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl BarcodeDecoder for RxingDecoder {
    fn decode_barcodes(&self, image: &DynamicImage) -> Result<Vec<BarcodeHit>> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Ok(Vec::new());
        }
        let luma = image.to_luma8().into_raw();

        // rxing reports "not found" as an error; for this pipeline an empty
        // region is a normal outcome, not a failure
        let results = match rxing::helpers::detect_multiple_in_luma(luma, width, height) {
            Ok(results) => results,
            Err(e) => {
                debug!("no barcodes decoded: {e}");
                return Ok(Vec::new());
            }
        };

        let hits = results
            .iter()
            .map(|result| BarcodeHit {
                text: result.getText().to_string(),
                bbox: points_to_bbox(result.getRXingResultPoints(), width, height),
                format: result.getBarcodeFormat().to_string(),
            })
            .collect();
        Ok(hits)
    }
}

/// rxing reports corner/locator points rather than a rectangle; take their
/// bounding extent.
fn points_to_bbox(points: &[rxing::Point], width: u32, height: u32) -> BBox {
    if points.is_empty() {
        return BBox::new(0, 0, width, height);
    }
    let (mut min_x, mut min_y) = (f32::MAX, f32::MAX);
    let (mut max_x, mut max_y) = (f32::MIN, f32::MIN);
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    let x = min_x.max(0.0) as u32;
    let y = min_y.max(0.0) as u32;
    BBox::new(
        x,
        y,
        ((max_x - min_x) as u32).max(1),
        ((max_y - min_y) as u32).max(1),
    )
}
