use panelscan_core::error::PanelScanError;
use panelscan_core::words::JsonWordSource;
use panelscan_core::{extract_pages, to_document, SegmentConfig};
use std::path::PathBuf;

use crate::output;

pub fn run(
    input_file: PathBuf,
    output_format: &str,
    output_file: Option<PathBuf>,
    y_tol: Option<f64>,
    pad: Option<f64>,
    max_retries: Option<u32>,
) -> Result<(), PanelScanError> {
    let source = JsonWordSource::new(&input_file);

    let mut config = SegmentConfig::default();
    if y_tol.is_some() {
        config.y_tol_override = y_tol;
    }
    if let Some(pad) = pad {
        config.pad = pad;
    }
    if let Some(max_retries) = max_retries {
        config.max_retry_attempts = max_retries;
    }

    let extractions = extract_pages(&source, &config)?;
    let panels: Vec<_> = extractions
        .iter()
        .flat_map(|e| e.panels.iter().map(|p| p.panel.clone()))
        .collect();
    let document = to_document(&panels);

    match output_file {
        Some(path) => {
            // Always write the canonical fragment when saving to file
            let json = serde_json::to_string_pretty(&document)?;
            std::fs::write(&path, json)?;
            eprintln!(
                "Extracted {} panel(s) from {} page(s), written to {}",
                panels.len(),
                extractions.len(),
                path.display()
            );
            for extraction in &extractions {
                for p in &extraction.panels {
                    if p.stats.numbered < config.expected_min_circuits {
                        eprintln!(
                            "  warning: panel {} yielded only {} numbered circuit(s)",
                            p.panel.panel_name, p.stats.numbered
                        );
                    }
                }
            }
        }
        None => match output_format {
            "json" => println!("{}", serde_json::to_string_pretty(&document)?),
            _ => {
                for (i, extraction) in extractions.iter().enumerate() {
                    if extractions.len() > 1 {
                        if i > 0 {
                            println!();
                        }
                        println!("--- Page {} ---\n", i + 1);
                    }
                    print!("{}", output::table::format_page(extraction));
                }
            }
        },
    }

    Ok(())
}
