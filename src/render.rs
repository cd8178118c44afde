// PDF rasterization through pdfium
use std::path::Path;

use anyhow::{Context, Result};
use pdfium_render::prelude::*;

use crate::types::PageImage;

/// Default rasterization resolution. Job cards are plain text and barcodes;
/// 200 DPI keeps the barcodes crisp without ballooning page buffers.
pub const DEFAULT_DPI: f32 = 200.0;

/// External PDF rasterization collaborator.
pub trait PageRenderer {
    /// Render every page of the PDF, in order, 1-based.
    fn render_pages(&self, pdf_path: &Path) -> Result<Vec<PageImage>>;
}

/// `PageRenderer` backed by the pdfium library.
pub struct PdfiumRenderer {
    dpi: f32,
}

impl PdfiumRenderer {
    pub fn new(dpi: f32) -> Self {
        Self { dpi }
    }
}

impl Default for PdfiumRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_DPI)
    }
}

impl PageRenderer for PdfiumRenderer {
    fn render_pages(&self, pdf_path: &Path) -> Result<Vec<PageImage>> {
        let pdfium = Pdfium::new(
            Pdfium::bind_to_system_library()
                .or_else(|_| {
                    Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
                })
                .context("failed to bind pdfium library")?,
        );

        let document = pdfium
            .load_pdf_from_file(pdf_path, None)
            .with_context(|| format!("failed to load PDF: {}", pdf_path.display()))?;

        // PDF points are 72 per inch
        let scale = self.dpi / 72.0;
        let mut pages = Vec::new();

        for (index, page) in document.pages().iter().enumerate() {
            let pixel_width = (page.width().value * scale) as i32;
            let pixel_height = (page.height().value * scale) as i32;

            let bitmap = page
                .render_with_config(
                    &PdfRenderConfig::new()
                        .set_target_width(pixel_width)
                        .set_target_height(pixel_height),
                )
                .with_context(|| format!("failed to render page {}", index + 1))?;

            pages.push(PageImage {
                page: index as u32 + 1,
                image: bitmap.as_image(),
            });
        }

        Ok(pages)
    }
}
