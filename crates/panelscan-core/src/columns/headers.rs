use crate::model::{ColumnKey, Rect, Word};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Column label patterns, matched whole-word and case-insensitively
/// against header-band text.
static HEADER_PATTERNS: LazyLock<Vec<(ColumnKey, Regex)>> = LazyLock::new(|| {
    let pat = |re: &str| Regex::new(&format!("(?i)^(?:{re})$")).unwrap();
    vec![
        (ColumnKey::Ckt, pat(r"CKT|CIRCUIT")),
        (ColumnKey::LoadName, pat(r"LOAD\s*NAME|DESCRIPTION")),
        (ColumnKey::Trip, pat(r"TRIP|BKR")),
        (ColumnKey::Poles, pat(r"POLES?|P")),
        (ColumnKey::PhaseA, pat(r"A|PHASE\s*A")),
        (ColumnKey::PhaseB, pat(r"B|PHASE\s*B")),
        (ColumnKey::PhaseC, pat(r"C|PHASE\s*C")),
    ]
});

/// Fraction of the panel width the largest header-band gap must span
/// before it counts as a clear two-cluster split.
const SPLIT_GAP_MIN_FRAC: f64 = 0.15;

/// Detected column layout for one panel half: column -> x center.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnLayout {
    pub centers: BTreeMap<ColumnKey, f64>,
}

impl ColumnLayout {
    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    /// Column whose header center is nearest to `x`, with its distance.
    pub fn nearest(&self, x: f64) -> Option<(ColumnKey, f64)> {
        self.centers
            .iter()
            .map(|(key, center)| (*key, (center - x).abs()))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

/// Locate column labels in the header band of one panel half.
///
/// Only the top `header_band` points of the half are searched. Header
/// rows repeat on some sheets, so a later match for the same column
/// overwrites an earlier one.
pub fn detect_headers(words: &[Word], half: Rect, header_band: f64) -> ColumnLayout {
    let band_bottom = half.y0 + header_band;
    let mut layout = ColumnLayout::default();

    for word in words {
        if !half.contains_point(word.center_x(), word.center_y()) || word.y0 > band_bottom {
            continue;
        }
        let text = word.text.trim();
        if text.is_empty() {
            continue;
        }
        for (key, re) in HEADER_PATTERNS.iter() {
            if re.is_match(text) {
                layout.centers.insert(*key, word.center_x());
                break;
            }
        }
    }

    layout
}

/// Choose the x coordinate splitting a panel region into its left and
/// right halves.
///
/// Header-band word centers are clustered into at most two groups by
/// the largest gap in their sorted x positions. Without a clear
/// two-cluster gap, the split falls back to the panel's horizontal
/// midpoint biased by `split_bias`.
pub fn compute_left_right_split(
    words: &[Word],
    region: Rect,
    header_band: f64,
    split_bias: f64,
) -> f64 {
    let band_bottom = region.y0 + header_band;
    let mut centers: Vec<f64> = words
        .iter()
        .filter(|w| {
            region.contains_point(w.center_x(), w.center_y())
                && w.y0 <= band_bottom
                && !w.text.trim().is_empty()
        })
        .map(|w| w.center_x())
        .collect();
    centers.sort_by(f64::total_cmp);

    let mut best_gap = 0.0;
    let mut best_mid = 0.0;
    for pair in centers.windows(2) {
        let gap = pair[1] - pair[0];
        if gap > best_gap {
            best_gap = gap;
            best_mid = (pair[0] + pair[1]) / 2.0;
        }
    }

    if best_gap > SPLIT_GAP_MIN_FRAC * region.width() {
        best_mid
    } else {
        region.x0 + region.width() * split_bias
    }
}
