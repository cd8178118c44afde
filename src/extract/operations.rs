// Operation extraction: OCR line patterns paired with region barcodes
use std::collections::HashSet;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{DetectionKind, OperationRecord, RegionReport};

/// Numbers above this are not operation numbers (filters year tokens like 2022).
const MAX_OP_NUMBER: f64 = 1000.0;

/// "Operation 10 CUTTING" or bare "10 CUTTING"; decimal steps like "10.1" count
static OP_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:operation\s+)?(\d+(?:\.\d+)?)\s+(.+)$").unwrap());

/// Number on one line with the name on the next; OCR splits these frequently
static OP_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)^(?:operation\s+)?(\d+(?:\.\d+)?)\s*\n\s*(.+)").unwrap());

/// OCR'd year prefixes that bleed into the name column
static YEAR_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^20\d\d\s+").unwrap());

/// "Scan barcodes to start job operation" footer noise, in its OCR'd variants
static SCAN_NOISE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s*~?\s*scan[\s\-].*$").unwrap());

/// Extract operations from one page's region reports.
///
/// `seen` carries the document-wide `(op_number, page)` dedup set; OCR often
/// re-detects the same line across overlapping region crops, and the first
/// occurrence wins.
pub fn extract_operations(
    page_reports: &[RegionReport],
    job_number: Option<&str>,
    seen: &mut HashSet<(String, u32)>,
) -> Vec<OperationRecord> {
    let mut operations = Vec::new();

    for report in page_reports {
        let region_barcodes: Vec<&str> = report
            .detections
            .iter()
            .filter(|d| d.kind == DetectionKind::Barcode)
            .map(|d| d.text.as_str())
            .collect();

        let texts = report
            .detections
            .iter()
            .filter(|d| d.kind == DetectionKind::Text);

        for det in texts {
            let text = det.text.trim();

            // Number on one line, name on the next: take the first line of
            // whatever follows as the name
            if let Some(caps) = OP_BLOCK.captures(text) {
                let name = caps[2].lines().next().unwrap_or("");
                record_operation(
                    &caps[1],
                    name,
                    report.page,
                    &region_barcodes,
                    job_number,
                    seen,
                    &mut operations,
                );
            }

            for line in text.lines() {
                if let Some(caps) = OP_LINE.captures(line.trim()) {
                    record_operation(
                        &caps[1],
                        &caps[2],
                        report.page,
                        &region_barcodes,
                        job_number,
                        seen,
                        &mut operations,
                    );
                }
            }
        }
    }

    operations
}

fn record_operation(
    op_number: &str,
    raw_name: &str,
    page: u32,
    region_barcodes: &[&str],
    job_number: Option<&str>,
    seen: &mut HashSet<(String, u32)>,
    operations: &mut Vec<OperationRecord>,
) {
    // Year tokens like 2022 parse but fail the range check
    match op_number.parse::<f64>() {
        Ok(n) if n <= MAX_OP_NUMBER => {}
        _ => return,
    }

    let key = (op_number.to_string(), page);
    if seen.contains(&key) {
        debug!("dropping duplicate operation {op_number} on page {page}");
        return;
    }

    let op_name = clean_operation_name(raw_name);
    let op_id = resolve_op_id(region_barcodes, job_number, op_number);

    seen.insert(key);
    operations.push(OperationRecord {
        op_number: op_number.to_string(),
        op_name,
        op_id,
        page,
    });
}

/// A barcode physically printed next to the operation is authoritative;
/// synthesis from the job number is the fallback.
fn resolve_op_id(
    region_barcodes: &[&str],
    job_number: Option<&str>,
    op_number: &str,
) -> Option<String> {
    let synthesized = job_number.map(|job| format!("{job}Q{op_number}"));
    let suffix = format!("Q{op_number}");

    region_barcodes
        .iter()
        .find(|b| synthesized.as_deref() == Some(**b) || b.ends_with(&suffix))
        .map(|b| (*b).to_string())
        .or(synthesized)
}

/// Strip year prefixes and scan-instruction noise, then trailing punctuation.
pub fn clean_operation_name(raw: &str) -> String {
    let name = YEAR_PREFIX.replace(raw, "");
    let name = SCAN_NOISE.replace(&name, "");
    name.trim_end_matches(|c: char| c.is_whitespace() || matches!(c, '.' | ',' | ';' | ':' | '-' | '~' | '_'))
        .trim_start()
        .to_string()
}
