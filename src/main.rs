// Job card extractor CLI: batch PDFs in, one JSON record per document out
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use log::{error, info};

use jobcard::detector::TextRecognizer;
use jobcard::engines::barcode::RxingDecoder;
use jobcard::render::{PdfiumRenderer, DEFAULT_DPI};
use jobcard::{output, Pipeline};

#[derive(Parser, Debug)]
#[command(
    name = "jobcard",
    about = "Process PDF job documents and extract job number and operations",
    disable_version_flag = true
)]
struct Args {
    /// Path to the PDF file(s) to process
    pdf_files: Vec<PathBuf>,

    /// Directory to save output files; omit to print the result instead
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Language codes for OCR
    #[arg(short, long, num_args = 1.., default_value = "en")]
    lang: Vec<String>,

    /// Don't save raw extraction data
    #[arg(long)]
    no_raw: bool,

    /// Don't save annotated debug images
    #[arg(long)]
    no_annotated: bool,

    /// Rasterization resolution in dots per inch
    #[arg(long, default_value_t = DEFAULT_DPI)]
    dpi: f32,

    /// Display version information
    #[arg(short = 'v', long = "version")]
    version: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if args.version {
        println!("Job Card Extractor v{}", env!("CARGO_PKG_VERSION"));
        return;
    }

    if args.pdf_files.is_empty() {
        eprintln!("Error: at least one PDF file is required unless using --version.");
        std::process::exit(1);
    }

    let renderer = PdfiumRenderer::new(args.dpi);
    let barcodes = RxingDecoder::new();
    let ocr = match build_recognizer(&args.lang) {
        Ok(ocr) => ocr,
        Err(e) => {
            error!("failed to initialize OCR engine: {e:#}");
            std::process::exit(1);
        }
    };

    // Annotation is only produced when there is somewhere to write it
    let annotate = args.output_dir.is_some() && !args.no_annotated;
    let pipeline = Pipeline::new(&renderer, &barcodes, ocr.as_ref()).with_annotation(annotate);

    let mut failures = 0usize;
    for pdf in &args.pdf_files {
        info!("processing {}", pdf.display());
        if let Err(e) = process_file(&pipeline, pdf, args.output_dir.as_deref(), !args.no_raw) {
            // A failed file produces no output; the rest of the batch proceeds
            error!("{}: {e:#}", pdf.display());
            failures += 1;
        }
    }

    if failures > 0 {
        std::process::exit(1);
    }
}

fn process_file(
    pipeline: &Pipeline,
    pdf: &Path,
    output_dir: Option<&Path>,
    save_raw: bool,
) -> Result<()> {
    let outcome = pipeline.process(pdf)?;

    match output_dir {
        Some(dir) => {
            let stem = pdf
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "document".to_string());
            output::write_artifacts(dir, &stem, &outcome, save_raw, true)?;
        }
        None => println!("{}", serde_json::to_string_pretty(&outcome.record)?),
    }

    Ok(())
}

#[cfg(feature = "tesseract")]
fn build_recognizer(lang_list: &[String]) -> Result<Box<dyn TextRecognizer>> {
    use jobcard::engines::tesseract::TesseractRecognizer;
    Ok(Box::new(TesseractRecognizer::new(lang_list)?))
}

#[cfg(not(feature = "tesseract"))]
fn build_recognizer(_lang_list: &[String]) -> Result<Box<dyn TextRecognizer>> {
    use jobcard::engines::NullRecognizer;
    Ok(Box::new(NullRecognizer::new()))
}
