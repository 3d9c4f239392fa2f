use crate::model::{PanelAnchor, Word};
use regex::Regex;
use std::sync::LazyLock;

/// Marker tokens that introduce a panel name.
const MARKERS: &[&str] = &["panel:", "panel", "pnl:", "pnl", "board:", "board"];

/// Tokens that can follow a marker without being the panel name.
const NAME_STOPWORDS: &[&str] = &["SCHEDULE", "SCHEDULES", "NAME"];

/// Sheet-summary names that look like panels but are not.
const SUMMARY_NAMES: &[&str] = &["TOTALS", "SUMMARY", "LOAD", "LOAD SUMMARY"];

/// How many tokens past a marker may hold the panel name.
const NAME_LOOKAHEAD: usize = 3;

/// Inflation applied to anchor bounding boxes, in points.
const ANCHOR_INFLATE: f64 = 2.0;

static TITLE_NAME_FIRST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^([A-Z0-9][A-Z0-9./-]*)\s+panel\s+schedule$").unwrap());
static TITLE_NAME_LAST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^schedule\s*-\s*([A-Z0-9][A-Z0-9./-]*)$").unwrap());

/// Find panel-name anchors on a page.
///
/// Two passes over the word stream: marker tokens ("PANEL:", "PNL",
/// "BOARD", ...) followed within three tokens by a plausible name, and
/// three-token title windows ("K1 PANEL SCHEDULE", "SCHEDULE - K1").
/// Sheet summaries are filtered out. The result is sorted by (y0, x0).
///
/// An empty result is not an error; the caller falls back to
/// whole-page extraction.
pub fn detect_anchors(words: &[Word]) -> Vec<PanelAnchor> {
    let mut anchors: Vec<PanelAnchor> = Vec::new();

    // Pass 1: marker token plus lookahead name.
    for (i, marker) in words.iter().enumerate() {
        let token = marker.text.trim().to_lowercase();
        if !MARKERS.contains(&token.as_str()) {
            continue;
        }
        for candidate in words.iter().skip(i + 1).take(NAME_LOOKAHEAD) {
            let name = strip_name_token(&candidate.text);
            if name.is_empty() || NAME_STOPWORDS.contains(&name.as_str()) {
                continue;
            }
            let rect = marker
                .rect()
                .union(&candidate.rect())
                .inflate(ANCHOR_INFLATE);
            push_candidate(&mut anchors, PanelAnchor { name, rect });
            break;
        }
    }

    // Pass 2: sliding three-token title windows.
    for window in words.windows(3) {
        let joined = format!(
            "{} {} {}",
            window[0].text.trim(),
            window[1].text.trim(),
            window[2].text.trim()
        );
        let name = TITLE_NAME_FIRST
            .captures(&joined)
            .or_else(|| TITLE_NAME_LAST.captures(&joined))
            .map(|c| c[1].to_uppercase());
        if let Some(name) = name {
            let rect = window[0]
                .rect()
                .union(&window[1].rect())
                .union(&window[2].rect())
                .inflate(ANCHOR_INFLATE);
            push_candidate(&mut anchors, PanelAnchor { name, rect });
        }
    }

    anchors.sort_by(|a, b| {
        (a.rect.y0, a.rect.x0)
            .partial_cmp(&(b.rect.y0, b.rect.x0))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    anchors
}

/// Keep alphanumerics plus `-./`, drop everything else, upper-case.
fn strip_name_token(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '/'))
        .collect::<String>()
        .to_uppercase()
}

/// Append unless the name is a sheet summary or the same name was
/// already anchored at an overlapping location (the marker and title
/// passes often see the same panel).
fn push_candidate(anchors: &mut Vec<PanelAnchor>, candidate: PanelAnchor) {
    if SUMMARY_NAMES.contains(&candidate.name.as_str()) {
        return;
    }
    let duplicate = anchors
        .iter()
        .any(|a| a.name == candidate.name && a.rect.overlap_area(&candidate.rect) > 0.0);
    if !duplicate {
        anchors.push(candidate);
    }
}
