// Document assembly: run the pipeline over all pages and merge results
use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;
use image::RgbaImage;
use log::{debug, info, warn};

use crate::annotate;
use crate::detector::{BarcodeDecoder, RegionDetector, TextRecognizer};
use crate::extract::{fields, operations};
use crate::render::PageRenderer;
use crate::segmenter;
use crate::types::{JobRecord, RegionReport};

/// Everything one document run produces. The raw reports and annotated pages
/// are side artifacts; only `record` is the extraction result.
pub struct ProcessOutcome {
    pub record: JobRecord,
    pub reports: Vec<RegionReport>,
    /// `(page, image)` pairs, present when annotation was requested
    pub annotated: Vec<(u32, RgbaImage)>,
}

/// Single-document pipeline over pluggable collaborators.
pub struct Pipeline<'a> {
    renderer: &'a dyn PageRenderer,
    barcodes: &'a dyn BarcodeDecoder,
    ocr: &'a dyn TextRecognizer,
    annotate: bool,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        renderer: &'a dyn PageRenderer,
        barcodes: &'a dyn BarcodeDecoder,
        ocr: &'a dyn TextRecognizer,
    ) -> Self {
        Self {
            renderer,
            barcodes,
            ocr,
            annotate: false,
        }
    }

    pub fn with_annotation(mut self, annotate: bool) -> Self {
        self.annotate = annotate;
        self
    }

    /// Process one PDF into a `JobRecord` plus diagnostic artifacts.
    ///
    /// Pages run in order, sequentially. Page-1 header fields are
    /// authoritative: they are set exactly once, before any operation
    /// extraction, and later pages never touch them. A job number that
    /// cannot be resolved propagates as absence, not as an error.
    pub fn process(&self, pdf_path: &Path) -> Result<ProcessOutcome> {
        let pages = self.renderer.render_pages(pdf_path)?;
        info!("{}: {} pages rendered", pdf_path.display(), pages.len());

        let detector = RegionDetector::new(self.barcodes, self.ocr);
        let mut record = JobRecord::default();
        let mut reports = Vec::new();
        let mut annotated = Vec::new();
        let mut seen_ops = HashSet::new();

        for page in pages {
            let regions = segmenter::segment(&page);
            debug!("page {}: {} regions", page.page, regions.len());

            let mut page_reports = Vec::with_capacity(regions.len());
            for region in &regions {
                let detections = detector.detect(region);
                page_reports.push(RegionReport {
                    page: region.page,
                    region_index: region.region_index,
                    bounds: [region.y0, region.y1],
                    detections,
                });
            }

            if self.annotate {
                annotated.push((page.page, annotate::draw_overlays(&page, &page_reports)));
            }

            // Header fields appear once, on the first page; resolve them
            // before operations so op_id synthesis can use the job number.
            if page.page == 1 {
                let header = fields::extract_header_fields(&page_reports);
                if header.job_number.is_none() {
                    warn!("{}: no job number found on page 1", pdf_path.display());
                }
                record.job_number = header.job_number;
                record.quantity = header.quantity;
                record.delivery_date = header.delivery_date;
            }

            let ops = operations::extract_operations(
                &page_reports,
                record.job_number.as_deref(),
                &mut seen_ops,
            );
            record.operations.extend(ops);
            reports.extend(page_reports);
            // page image dropped here; only detections survive the region
        }

        Ok(ProcessOutcome {
            record,
            reports,
            annotated,
        })
    }
}
