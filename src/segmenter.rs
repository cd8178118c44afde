// Region segmentation: split a page into horizontal bands along rule lines
use image::GenericImageView;
use log::debug;

use crate::types::{PageImage, Region};

/// A divider row must be dark across at least this fraction of the page width.
const DIVIDER_COVERAGE: f32 = 0.6;

/// Pixels darker than this count toward the row projection.
const DARK_THRESHOLD: u8 = 128;

/// Regions shorter than this are treated as noise and merged into a neighbour.
pub const MIN_REGION_HEIGHT: u32 = 50;

/// Split a page into regions bounded by detected horizontal rule lines.
///
/// A page with no detectable lines comes back as a single full-page region;
/// segmentation never fails.
pub fn segment(page: &PageImage) -> Vec<Region> {
    let (width, height) = page.image.dimensions();
    let gray = page.image.to_luma8();

    let lines = divider_lines(&gray, width, height);
    debug!("page {}: divider lines at y = {:?}", page.page, lines);

    let mut edges = Vec::with_capacity(lines.len() + 2);
    edges.push(0);
    edges.extend(lines);
    edges.push(height);
    edges.dedup();

    let mut bounds: Vec<(u32, u32)> = Vec::new();
    for pair in edges.windows(2) {
        let (y0, y1) = (pair[0], pair[1]);
        if y1 <= y0 {
            continue;
        }
        match bounds.last_mut() {
            // Noise sliver: fold into the preceding region
            Some(last) if y1 - y0 < MIN_REGION_HEIGHT => last.1 = y1,
            // A short leading interval has no preceding region; let the
            // following interval absorb it instead
            Some(last) if last.1 - last.0 < MIN_REGION_HEIGHT => last.1 = y1,
            _ => bounds.push((y0, y1)),
        }
    }

    bounds
        .into_iter()
        .enumerate()
        .map(|(region_index, (y0, y1))| Region {
            page: page.page,
            region_index,
            y0,
            y1,
            image: page.image.crop_imm(0, y0, width, y1 - y0),
        })
        .collect()
}

/// Row intensity projection: y coordinates whose dark-pixel count spans a
/// large fraction of the page width. Consecutive divider rows collapse into
/// the run's first row.
fn divider_lines(gray: &image::GrayImage, width: u32, height: u32) -> Vec<u32> {
    let min_dark = (width as f32 * DIVIDER_COVERAGE) as u32;
    let mut lines = Vec::new();
    let mut in_run = false;

    for y in 0..height {
        let dark = (0..width)
            .filter(|&x| gray.get_pixel(x, y).0[0] < DARK_THRESHOLD)
            .count() as u32;
        if dark >= min_dark {
            if !in_run {
                lines.push(y);
                in_run = true;
            }
        } else {
            in_run = false;
        }
    }

    lines
}
