// End-to-end pipeline tests against stubbed collaborator engines.
//
// Stub pages are plain white, so the segmenter yields exactly one region per
// page and the stub engines can hand out canned detections per region call.
use std::path::Path;
use std::sync::Mutex;

use anyhow::Result;
use image::{DynamicImage, GrayImage, Luma};

use jobcard::detector::{BarcodeDecoder, BarcodeHit, TextHit, TextRecognizer};
use jobcard::render::PageRenderer;
use jobcard::types::{BBox, PageImage};
use jobcard::Pipeline;

struct StubRenderer {
    pages: usize,
}

impl PageRenderer for StubRenderer {
    fn render_pages(&self, _pdf_path: &Path) -> Result<Vec<PageImage>> {
        Ok((1..=self.pages as u32)
            .map(|page| PageImage {
                page,
                image: DynamicImage::ImageLuma8(GrayImage::from_pixel(
                    800,
                    1000,
                    Luma([255u8]),
                )),
            })
            .collect())
    }
}

/// Hands out one canned hit list per detect call, in order.
struct StubBarcodes {
    per_region: Mutex<Vec<Vec<BarcodeHit>>>,
}

impl StubBarcodes {
    fn new(per_region: Vec<Vec<BarcodeHit>>) -> Self {
        Self {
            per_region: Mutex::new(per_region),
        }
    }
}

impl BarcodeDecoder for StubBarcodes {
    fn decode_barcodes(&self, _image: &DynamicImage) -> Result<Vec<BarcodeHit>> {
        let mut queue = self.per_region.lock().unwrap();
        if queue.is_empty() {
            Ok(Vec::new())
        } else {
            Ok(queue.remove(0))
        }
    }
}

struct StubOcr {
    per_region: Mutex<Vec<Vec<TextHit>>>,
}

impl StubOcr {
    fn new(per_region: Vec<Vec<TextHit>>) -> Self {
        Self {
            per_region: Mutex::new(per_region),
        }
    }
}

impl TextRecognizer for StubOcr {
    fn recognize_text(&self, _image: &DynamicImage) -> Result<Vec<TextHit>> {
        let mut queue = self.per_region.lock().unwrap();
        if queue.is_empty() {
            Ok(Vec::new())
        } else {
            Ok(queue.remove(0))
        }
    }
}

fn barcode(text: &str, y: u32) -> BarcodeHit {
    BarcodeHit {
        text: text.to_string(),
        bbox: BBox::new(600, y, 120, 40),
        format: "CODE_128".to_string(),
    }
}

fn text(content: &str, y: u32) -> TextHit {
    TextHit {
        text: content.to_string(),
        bbox: BBox::new(20, y, 400, 30),
        confidence: 0.85,
    }
}

/// Two-page card: header fields and operations 10/20 on page 1,
/// operations 30/40 on page 2, one corroborating barcode for op 30.
fn two_page_stubs() -> (StubRenderer, StubBarcodes, StubOcr) {
    let renderer = StubRenderer { pages: 2 };
    let barcodes = StubBarcodes::new(vec![
        vec![barcode("J123456", 10)],
        vec![barcode("J123456Q30", 200)],
    ]);
    let ocr = StubOcr::new(vec![
        vec![
            text("Job No", 10),
            text("Quantity: 100 units", 60),
            text("Delivery Date: 12/05/2025", 100),
            text("Operation 10 CUTTING", 300),
            text("Operation 20 WELDING", 400),
        ],
        vec![
            text("Operation 30 DRILLING", 100),
            text("Operation 40 INSPECTION", 300),
        ],
    ]);
    (renderer, barcodes, ocr)
}

#[test]
fn two_page_document_end_to_end() {
    let (renderer, barcodes, ocr) = two_page_stubs();
    let pipeline = Pipeline::new(&renderer, &barcodes, &ocr);
    let outcome = pipeline.process(Path::new("stub.pdf")).unwrap();
    let record = outcome.record;

    assert_eq!(record.job_number.as_deref(), Some("J123456"));
    assert_eq!(record.quantity.as_deref(), Some("100"));
    assert_eq!(record.delivery_date.as_deref(), Some("12/05/2025"));

    let numbers: Vec<&str> = record.operations.iter().map(|o| o.op_number.as_str()).collect();
    assert_eq!(numbers, vec!["10", "20", "30", "40"]);
    let pages: Vec<u32> = record.operations.iter().map(|o| o.page).collect();
    assert_eq!(pages, vec![1, 1, 2, 2]);

    // No corroborating barcodes: synthesized from the job number
    assert_eq!(record.operations[0].op_id.as_deref(), Some("J123456Q10"));
    assert_eq!(record.operations[1].op_id.as_deref(), Some("J123456Q20"));
    // Physically scanned barcode wins verbatim
    assert_eq!(record.operations[2].op_id.as_deref(), Some("J123456Q30"));
    assert_eq!(record.operations[3].op_id.as_deref(), Some("J123456Q40"));

    assert_eq!(record.operations[2].op_name, "DRILLING");
}

#[test]
fn rerun_with_same_engine_outputs_is_byte_identical() {
    let run = || {
        let (renderer, barcodes, ocr) = two_page_stubs();
        let pipeline = Pipeline::new(&renderer, &barcodes, &ocr);
        let outcome = pipeline.process(Path::new("stub.pdf")).unwrap();
        serde_json::to_string_pretty(&outcome.record).unwrap()
    };
    assert_eq!(run(), run());
}

#[test]
fn missing_job_number_propagates_as_absence() {
    let renderer = StubRenderer { pages: 2 };
    let barcodes = StubBarcodes::new(vec![]);
    let ocr = StubOcr::new(vec![
        vec![text("Operation 10 CUTTING", 100)],
        vec![text("Operation 30 DRILLING", 100)],
    ]);
    let pipeline = Pipeline::new(&renderer, &barcodes, &ocr);
    let record = pipeline.process(Path::new("stub.pdf")).unwrap().record;

    // Operations still come through on every page; op_id stays absent
    assert_eq!(record.job_number, None);
    assert_eq!(record.operations.len(), 2);
    assert!(record.operations.iter().all(|o| o.op_id.is_none()));
}

#[test]
fn header_fields_come_only_from_page_one() {
    let renderer = StubRenderer { pages: 2 };
    // A J-barcode on page 2 must not become the job number
    let barcodes = StubBarcodes::new(vec![vec![], vec![barcode("J999999", 10)]]);
    let ocr = StubOcr::new(vec![
        vec![text("Operation 10 CUTTING", 100)],
        vec![text("Quantity: 500", 50)],
    ]);
    let pipeline = Pipeline::new(&renderer, &barcodes, &ocr);
    let record = pipeline.process(Path::new("stub.pdf")).unwrap().record;

    assert_eq!(record.job_number, None);
    assert_eq!(record.quantity, None);
}

#[test]
fn raw_reports_cover_every_region_with_contained_boxes() {
    let (renderer, barcodes, ocr) = two_page_stubs();
    let pipeline = Pipeline::new(&renderer, &barcodes, &ocr);
    let outcome = pipeline.process(Path::new("stub.pdf")).unwrap();

    // One white page = one region
    assert_eq!(outcome.reports.len(), 2);
    for report in &outcome.reports {
        let [y0, y1] = report.bounds;
        let height = y1 - y0;
        for det in &report.detections {
            assert!(det.bbox.x + det.bbox.width <= 800);
            assert!(det.bbox.y + det.bbox.height <= height);
        }
    }
}

#[test]
fn annotation_produces_one_image_per_page() {
    let (renderer, barcodes, ocr) = two_page_stubs();
    let pipeline = Pipeline::new(&renderer, &barcodes, &ocr).with_annotation(true);
    let outcome = pipeline.process(Path::new("stub.pdf")).unwrap();

    assert_eq!(outcome.annotated.len(), 2);
    assert_eq!(outcome.annotated[0].0, 1);
    assert_eq!(outcome.annotated[1].0, 2);
    assert_eq!(outcome.annotated[0].1.dimensions(), (800, 1000));
}
