// Annotated debug images: region, barcode and OCR boxes overlaid on the page
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::types::{DetectionKind, PageImage, RegionReport};

const REGION_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);
const BARCODE_COLOR: Rgba<u8> = Rgba([0, 200, 0, 255]);
const TEXT_COLOR: Rgba<u8> = Rgba([0, 0, 255, 255]);

/// Draw region boundaries (red), barcode boxes (green) and OCR boxes (blue)
/// over a copy of the page. Diagnostic only.
pub fn draw_overlays(page: &PageImage, page_reports: &[RegionReport]) -> RgbaImage {
    let mut canvas = page.image.to_rgba8();
    let width = canvas.width();

    for report in page_reports {
        let [y0, y1] = report.bounds;
        if y1 > y0 && width > 1 {
            draw_hollow_rect_mut(
                &mut canvas,
                Rect::at(0, y0 as i32).of_size(width - 1, y1 - y0),
                REGION_COLOR,
            );
        }

        for det in &report.detections {
            let color = match det.kind {
                DetectionKind::Barcode => BARCODE_COLOR,
                DetectionKind::Text => TEXT_COLOR,
            };
            if det.bbox.width == 0 || det.bbox.height == 0 {
                continue;
            }
            // Detection boxes are region-relative; shift into page coordinates
            draw_hollow_rect_mut(
                &mut canvas,
                Rect::at(det.bbox.x as i32, (y0 + det.bbox.y) as i32)
                    .of_size(det.bbox.width, det.bbox.height),
                color,
            );
        }
    }

    canvas
}
