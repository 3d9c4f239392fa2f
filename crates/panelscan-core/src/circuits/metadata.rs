use crate::columns::mapper::ROW_BREAK_PT;
use crate::model::{PanelMetadata, Rect, Word};

/// Extract nameplate metadata from a panel region.
///
/// The region's words are reassembled into text lines, and each line
/// is scanned for known labels ("VOLTAGE: 120/208" and the like). The
/// first value found per field wins; unlabeled fields stay `None`.
pub fn extract_metadata(words: &[Word], region: Rect) -> PanelMetadata {
    let mut meta = PanelMetadata::default();

    for line in region_lines(words, region) {
        if meta.rating.is_none() {
            meta.rating = value_after_label(&line, &["rating", "mains"]);
        }
        if meta.voltage.is_none() {
            meta.voltage = value_after_label(&line, &["voltage", "volts"]);
        }
        if meta.phases.is_none() {
            meta.phases = value_after_label(&line, &["phases"]);
        }
        if meta.panel_type.is_none() {
            meta.panel_type = value_after_label(&line, &["type", "mounting"]);
        }
        if meta.supply_from.is_none() {
            meta.supply_from = value_after_label(&line, &["supply from", "fed from"]);
        }
        if meta.aic.is_none() {
            meta.aic = value_after_label(&line, &["a.i.c.", "aic"]);
        }
    }

    meta
}

/// Rebuild text lines from the words inside `region`, in reading order.
fn region_lines(words: &[Word], region: Rect) -> Vec<String> {
    let mut in_region: Vec<&Word> = words
        .iter()
        .filter(|w| region.contains_point(w.center_x(), w.center_y()) && !w.text.trim().is_empty())
        .collect();
    in_region.sort_by(|a, b| (a.y0, a.x0).partial_cmp(&(b.y0, b.x0)).unwrap_or(std::cmp::Ordering::Equal));

    let mut lines: Vec<String> = Vec::new();
    let mut prev_y: Option<f64> = None;
    for word in in_region {
        let new_line = prev_y.is_none_or(|y| (word.y0 - y).abs() > ROW_BREAK_PT);
        if new_line {
            lines.push(String::new());
        }
        prev_y = Some(word.y0);
        let line = lines.last_mut().expect("line pushed above");
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word.text.trim());
    }
    lines
}

/// Value following the first of `labels` found in the line
/// (case-insensitive), with any separating colon stripped.
fn value_after_label(line: &str, labels: &[&str]) -> Option<String> {
    let lower = line.to_lowercase();
    for label in labels {
        let Some(idx) = lower.find(label) else {
            continue;
        };
        let after = line[idx + label.len()..]
            .trim_start_matches(|c: char| c == ':' || c.is_whitespace())
            .trim();
        if !after.is_empty() {
            return Some(after.to_string());
        }
    }
    None
}
