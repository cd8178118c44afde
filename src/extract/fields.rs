// Header field extraction driven by a declarative pattern-rule table
use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{DetectionKind, RegionReport};

/// Header fields recovered from page 1. Absent means no rule matched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderFields {
    pub job_number: Option<String>,
    pub quantity: Option<String>,
    pub delivery_date: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    JobNumber,
    Quantity,
    DeliveryDate,
}

/// One tagged extraction rule. Rules are data: adding a pattern means adding
/// a table entry, not a control-flow branch.
struct FieldRule {
    field: Field,
    /// Restrict to one detection kind, or consider both
    kind: Option<DetectionKind>,
    /// Only consider detections in the top region of the page
    top_region_only: bool,
    pattern: &'static Lazy<Regex>,
    /// Capture group holding the field value (0 = whole match)
    capture: usize,
}

static JOB_BARCODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^J[0-9]+$").unwrap());
static JOB_TEXT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bJ[0-9]+\b").unwrap());
static QUANTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:quantity|qty)\s*[:\-]?\s*(\d+)").unwrap());
static DELIVERY_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:delivery\s+date|date\s+required)\s*[:\-]?\s*(\d{1,2}[/-]\d{1,2}[/-]\d{2,4}|\d{1,2}-[A-Za-z]{3,9}-\d{2,4})",
    )
    .unwrap()
});

/// Priority-ordered rule table; the first match per field wins.
static FIELD_RULES: Lazy<Vec<FieldRule>> = Lazy::new(|| {
    vec![
        // Job number: a physically printed barcode beats any OCR reading
        FieldRule {
            field: Field::JobNumber,
            kind: Some(DetectionKind::Barcode),
            top_region_only: false,
            pattern: &JOB_BARCODE,
            capture: 0,
        },
        FieldRule {
            field: Field::JobNumber,
            kind: Some(DetectionKind::Text),
            top_region_only: true,
            pattern: &JOB_TEXT,
            capture: 0,
        },
        FieldRule {
            field: Field::Quantity,
            kind: Some(DetectionKind::Text),
            top_region_only: false,
            pattern: &QUANTITY,
            capture: 1,
        },
        FieldRule {
            field: Field::DeliveryDate,
            kind: Some(DetectionKind::Text),
            top_region_only: false,
            pattern: &DELIVERY_DATE,
            capture: 1,
        },
    ]
});

/// Whether a string follows the `J<digits>` job-number convention.
pub fn is_job_number(value: &str) -> bool {
    JOB_BARCODE.is_match(value)
}

/// Apply the field rule table to the page-1 region reports.
///
/// Reports must be in region order; detections within a report are already
/// in scan order, so "first match wins" is positional, not coordinate-exact.
pub fn extract_header_fields(page_one: &[RegionReport]) -> HeaderFields {
    let mut fields = HeaderFields::default();

    for rule in FIELD_RULES.iter() {
        if field_slot(&mut fields, rule.field).is_some() {
            continue;
        }
        let value = page_one
            .iter()
            .filter(|r| !rule.top_region_only || r.region_index == 0)
            .flat_map(|r| r.detections.iter())
            .filter(|d| rule.kind.map_or(true, |k| d.kind == k))
            .find_map(|d| {
                rule.pattern
                    .captures(&d.text)
                    .and_then(|c| c.get(rule.capture))
                    .map(|m| m.as_str().to_string())
            });
        if value.is_some() {
            *field_slot(&mut fields, rule.field) = value;
        }
    }

    fields
}

fn field_slot(fields: &mut HeaderFields, field: Field) -> &mut Option<String> {
    match field {
        Field::JobNumber => &mut fields.job_number,
        Field::Quantity => &mut fields.quantity,
        Field::DeliveryDate => &mut fields.delivery_date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BBox, Detection};

    fn det(kind: DetectionKind, text: &str) -> Detection {
        Detection {
            kind,
            text: text.to_string(),
            bbox: BBox::new(0, 0, 10, 10),
            confidence: 0.9,
        }
    }

    fn report(region_index: usize, detections: Vec<Detection>) -> RegionReport {
        RegionReport {
            page: 1,
            region_index,
            bounds: [0, 100],
            detections,
        }
    }

    #[test]
    fn barcode_job_number_beats_conflicting_ocr() {
        let reports = vec![report(
            0,
            vec![
                det(DetectionKind::Text, "Job No J999999"),
                det(DetectionKind::Barcode, "J123456"),
            ],
        )];
        let fields = extract_header_fields(&reports);
        assert_eq!(fields.job_number.as_deref(), Some("J123456"));
    }

    #[test]
    fn ocr_job_number_fallback_is_top_region_only() {
        let reports = vec![
            report(0, vec![det(DetectionKind::Text, "Job No J777777")]),
            report(1, vec![det(DetectionKind::Text, "J888888")]),
        ];
        let fields = extract_header_fields(&reports);
        assert_eq!(fields.job_number.as_deref(), Some("J777777"));

        // Same text in a lower region is not a header job number
        let reports = vec![
            report(0, vec![det(DetectionKind::Text, "Customer ACME")]),
            report(1, vec![det(DetectionKind::Text, "J888888")]),
        ];
        let fields = extract_header_fields(&reports);
        assert_eq!(fields.job_number, None);
    }

    #[test]
    fn quantity_patterns() {
        let fields = extract_header_fields(&[report(
            0,
            vec![det(DetectionKind::Text, "Quantity: 100 units")],
        )]);
        assert_eq!(fields.quantity.as_deref(), Some("100"));

        let fields = extract_header_fields(&[report(
            0,
            vec![det(DetectionKind::Text, "QTY:250")],
        )]);
        assert_eq!(fields.quantity.as_deref(), Some("250"));

        let fields = extract_header_fields(&[report(
            0,
            vec![det(DetectionKind::Text, "no keyword 42 here")],
        )]);
        assert_eq!(fields.quantity, None);
    }

    #[test]
    fn delivery_date_kept_verbatim() {
        for (text, expected) in [
            ("Delivery Date: 12/05/2025", "12/05/2025"),
            ("delivery date - 01-02-25", "01-02-25"),
            ("Date Required 3-Mar-2025", "3-Mar-2025"),
        ] {
            let fields = extract_header_fields(&[report(0, vec![det(DetectionKind::Text, text)])]);
            assert_eq!(fields.delivery_date.as_deref(), Some(expected), "{text}");
        }

        let fields = extract_header_fields(&[report(
            0,
            vec![det(DetectionKind::Text, "Delivery Date: soon")],
        )]);
        assert_eq!(fields.delivery_date, None);
    }

    #[test]
    fn first_match_wins_per_field() {
        let reports = vec![
            report(0, vec![det(DetectionKind::Text, "Quantity: 10")]),
            report(1, vec![det(DetectionKind::Text, "Quantity: 20")]),
        ];
        let fields = extract_header_fields(&reports);
        assert_eq!(fields.quantity.as_deref(), Some("10"));
    }
}
