//! Panel-schedule extraction for construction-drawing PDF pages.
//!
//! Drawing sheets lay panel schedules out as visual tables with no
//! semantic grid in the file. This crate carves a page's word layer
//! into per-panel regions, maps words to schedule columns, rebuilds
//! typed circuits, and pairs left/right halves — retrying with
//! relaxed tolerances when a panel's yield stays low. A separate
//! normalizer canonicalizes the three historical JSON document shapes
//! found at persistence.
//!
//! The engine is pure and single-threaded per page: no I/O, no shared
//! state, deterministic for identical inputs and config. Callers own
//! word acquisition (see [`words::WordSource`]), scheduling, and any
//! OCR or LLM fallback keyed on the per-panel yield counters.

pub mod circuits;
pub mod columns;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod segment;
pub mod words;

pub use config::SegmentConfig;
pub use error::PanelScanError;
pub use model::{
    Circuit, PageExtraction, Panel, PanelExtraction, PanelMetadata, PanelYield, PhaseLoads, Rect,
    Word,
};

use log::debug;

/// Extract every panel schedule from one page of words.
///
/// An empty [`PageExtraction`] means no panel anchors were found on
/// the page; callers fall back to whole-page extraction. Data-quality
/// problems never error: panels degrade to partial circuit lists with
/// diagnostics in the log. The only failure mode is an invalid
/// `config`.
pub fn extract_page(
    page_words: &[Word],
    page: Rect,
    config: &SegmentConfig,
) -> Result<PageExtraction, PanelScanError> {
    config.validate()?;

    let anchors = segment::anchors::detect_anchors(page_words);
    if anchors.is_empty() {
        debug!("no panel anchors found, caller should fall back to whole-page extraction");
        return Ok(PageExtraction::default());
    }

    let y_tol = config.y_tol(page.height());
    let rows = segment::rows::group_rows(&anchors, y_tol);
    let mut regions = segment::regions::compute_regions(&rows, page, config.pad);
    segment::regions::resolve_overlaps(&mut regions);

    let mut panels = Vec::new();
    for region in &regions {
        let extracted =
            circuits::pairer::extract_circuits(page_words, region.rect, page, config, &region.name);
        let metadata = circuits::metadata::extract_metadata(page_words, region.rect);
        panels.push(PanelExtraction {
            panel: Panel {
                panel_name: region.name.clone(),
                metadata,
                circuits: extracted.circuits,
            },
            region: region.rect,
            stats: extracted.stats,
        });
    }

    Ok(PageExtraction { panels })
}

/// Extract panel schedules from every page a word source yields.
pub fn extract_pages(
    source: &dyn words::WordSource,
    config: &SegmentConfig,
) -> Result<Vec<PageExtraction>, PanelScanError> {
    let pages = source.pages()?;
    debug!(
        "extracting {} page(s) from {}",
        pages.len(),
        source.source_name()
    );
    pages
        .iter()
        .map(|p| extract_page(&p.words, p.page, config))
        .collect()
}

/// Assemble the canonical persistence fragment
/// `{"ELECTRICAL": {"panels": [...]}}` from extracted panels.
pub fn to_document(panels: &[Panel]) -> serde_json::Value {
    serde_json::json!({ "ELECTRICAL": { "panels": panels } })
}
