// Output artifacts: clean JSON, raw detection dump, annotated page images
use std::fs;
use std::path::Path;

use log::info;

use crate::assembler::ProcessOutcome;
use crate::types::Result;

/// Write the artifacts for one processed document under `output_dir`.
///
/// Always writes `{stem}_job_and_operations.json`; `{stem}_raw.json` and
/// `annotated/page_{n}_areas.png` are optional diagnostics. A write failure
/// here is fatal for this file's output step.
pub fn write_artifacts(
    output_dir: &Path,
    stem: &str,
    outcome: &ProcessOutcome,
    save_raw: bool,
    save_annotated: bool,
) -> Result<()> {
    fs::create_dir_all(output_dir)?;

    let clean_path = output_dir.join(format!("{stem}_job_and_operations.json"));
    fs::write(&clean_path, serde_json::to_string_pretty(&outcome.record)?)?;
    info!("job and operations data saved to {}", clean_path.display());

    if save_raw {
        let raw_path = output_dir.join(format!("{stem}_raw.json"));
        fs::write(&raw_path, serde_json::to_string_pretty(&outcome.reports)?)?;
        info!("raw extraction data saved to {}", raw_path.display());
    }

    if save_annotated && !outcome.annotated.is_empty() {
        let annotated_dir = output_dir.join("annotated");
        fs::create_dir_all(&annotated_dir)?;
        for (page, image) in &outcome.annotated {
            let path = annotated_dir.join(format!("page_{page}_areas.png"));
            image.save(&path)?;
        }
        info!(
            "{} annotated pages saved to {}",
            outcome.annotated.len(),
            annotated_dir.display()
        );
    }

    Ok(())
}
