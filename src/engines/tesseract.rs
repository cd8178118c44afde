// OCR via the system Tesseract install (leptess bindings)
use anyhow::{anyhow, Context, Result};
use image::DynamicImage;
use leptess::LepTess;

use crate::detector::{TextHit, TextRecognizer};
use crate::types::BBox;

/// `TextRecognizer` backed by Tesseract, recognizing at text-line level.
pub struct TesseractRecognizer {
    /// Tesseract language string, e.g. "eng" or "eng+fra"
    language: String,
}

impl TesseractRecognizer {
    /// Build from CLI-style language codes. Multiple languages fold into a
    /// single `+`-joined configuration; one recognition pass then yields the
    /// union of candidate texts.
    pub fn new(lang_list: &[String]) -> Result<Self> {
        let language = if lang_list.is_empty() {
            "eng".to_string()
        } else {
            lang_list
                .iter()
                .map(|code| tesseract_lang(code))
                .collect::<Vec<_>>()
                .join("+")
        };

        // Fail fast if the language data is missing
        LepTess::new(None, &language).map_err(|e| {
            anyhow!("failed to initialize Tesseract with language '{language}': {e}")
        })?;

        Ok(Self { language })
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize_text(&self, image: &DynamicImage) -> Result<Vec<TextHit>> {
        let mut lt = LepTess::new(None, &self.language)
            .map_err(|e| anyhow!("failed to initialize Tesseract: {e}"))?;

        // leptess expects encoded image data
        let mut png = std::io::Cursor::new(Vec::new());
        image
            .write_to(&mut png, image::ImageFormat::Png)
            .context("failed to encode region for OCR")?;
        lt.set_image_from_mem(png.get_ref())
            .map_err(|e| anyhow!("failed to set OCR image: {e}"))?;

        // None means no text in the image, which is not an error
        let boxes = match lt.get_component_boxes(leptess::capi::TessPageIteratorLevel_RIL_TEXTLINE, true)
        {
            Some(boxes) => boxes,
            None => return Ok(Vec::new()),
        };

        let mut hits = Vec::new();
        for b in &boxes {
            let geom = b.get_geometry();
            lt.set_rectangle(geom.x, geom.y, geom.w, geom.h);

            let text = lt.get_utf8_text().unwrap_or_default().trim().to_string();
            if text.is_empty() {
                continue;
            }
            let confidence = lt.mean_text_conf() as f32 / 100.0;

            hits.push(TextHit {
                text,
                bbox: BBox::new(
                    geom.x.max(0) as u32,
                    geom.y.max(0) as u32,
                    geom.w.max(1) as u32,
                    geom.h.max(1) as u32,
                ),
                confidence,
            });
        }

        Ok(hits)
    }
}

/// Map common two-letter CLI codes onto Tesseract's three-letter data names;
/// anything else passes through untouched.
fn tesseract_lang(code: &str) -> String {
    match code {
        "en" => "eng",
        "fr" => "fra",
        "de" => "deu",
        "es" => "spa",
        "it" => "ita",
        "pt" => "por",
        "nl" => "nld",
        other => other,
    }
    .to_string()
}
