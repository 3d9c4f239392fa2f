use panelscan_core::error::PanelScanError;
use panelscan_core::normalize::normalize_document;
use std::path::PathBuf;

pub fn run(input_file: PathBuf, output_file: Option<PathBuf>) -> Result<(), PanelScanError> {
    let bytes = std::fs::read(&input_file)?;
    let doc: serde_json::Value = serde_json::from_slice(&bytes)?;

    // unrecognized shapes warn inside normalize_document
    let normalized = normalize_document(&doc);
    let json = serde_json::to_string_pretty(&normalized)?;

    match output_file {
        Some(path) => {
            std::fs::write(&path, json)?;
            eprintln!("Canonical document written to {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}
