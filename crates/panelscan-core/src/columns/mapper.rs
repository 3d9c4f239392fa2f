use crate::columns::headers::ColumnLayout;
use crate::model::{MappedRow, Rect, Word};

/// A y jump beyond this many points starts a new logical row.
pub const ROW_BREAK_PT: f64 = 5.0;

/// Assign the words of one panel half to columns and logical rows.
///
/// Words are taken in reading order (y, then x). A new row starts
/// when `y0` jumps more than [`ROW_BREAK_PT`] from the previous word.
/// Each word goes to the nearest column header within `tol` points of
/// its center, concatenated with a space when the cell already holds
/// text. Words farther than `tol` from every header are dropped.
pub fn map_words(words: &[Word], half: Rect, layout: &ColumnLayout, tol: f64) -> Vec<MappedRow> {
    let mut in_half: Vec<&Word> = words
        .iter()
        .filter(|w| half.contains_point(w.center_x(), w.center_y()) && !w.text.trim().is_empty())
        .collect();
    in_half.sort_by(|a, b| (a.y0, a.x0).partial_cmp(&(b.y0, b.x0)).unwrap_or(std::cmp::Ordering::Equal));

    let mut rows: Vec<MappedRow> = Vec::new();
    let mut prev_y: Option<f64> = None;

    for word in in_half {
        let new_row = match prev_y {
            None => true,
            Some(y) => (word.y0 - y).abs() > ROW_BREAK_PT,
        };
        if new_row {
            rows.push(MappedRow::default());
        }
        prev_y = Some(word.y0);

        let Some((key, dist)) = layout.nearest(word.center_x()) else {
            continue;
        };
        if dist > tol {
            continue;
        }
        let row = rows.last_mut().expect("row pushed above");
        let cell = row.cells.entry(key).or_default();
        if !cell.is_empty() {
            cell.push(' ');
        }
        cell.push_str(word.text.trim());
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::headers::detect_headers;
    use crate::model::ColumnKey;

    fn w(x0: f64, y0: f64, text: &str) -> Word {
        Word {
            x0,
            y0,
            x1: x0 + 20.0,
            y1: y0 + 8.0,
            text: text.into(),
            block: 0,
            line: 0,
            word_no: 0,
        }
    }

    fn half() -> Rect {
        Rect::new(0.0, 0.0, 300.0, 700.0)
    }

    fn layout() -> ColumnLayout {
        let headers = vec![w(40.0, 20.0, "CKT"), w(120.0, 20.0, "DESCRIPTION"), w(230.0, 20.0, "TRIP")];
        detect_headers(&headers, half(), 150.0)
    }

    #[test]
    fn words_land_in_nearest_columns() {
        let words = vec![w(42.0, 100.0, "1"), w(118.0, 100.0, "LIGHTS"), w(228.0, 100.0, "20")];
        let rows = map_words(&words, half(), &layout(), 30.0);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get(ColumnKey::Ckt), Some("1"));
        assert_eq!(rows[0].get(ColumnKey::LoadName), Some("LIGHTS"));
        assert_eq!(rows[0].get(ColumnKey::Trip), Some("20"));
    }

    #[test]
    fn y_jump_starts_new_row() {
        let words = vec![w(42.0, 100.0, "1"), w(42.0, 103.0, "3"), w(42.0, 112.0, "5")];
        // 103 is within 5pt of 100 (same row), 112 is not
        let rows = map_words(&words, half(), &layout(), 30.0);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get(ColumnKey::Ckt), Some("1 3"));
        assert_eq!(rows[1].get(ColumnKey::Ckt), Some("5"));
    }

    #[test]
    fn multi_word_cells_concatenate_with_space() {
        let words = vec![w(110.0, 100.0, "EXT"), w(135.0, 100.0, "LIGHTS")];
        let rows = map_words(&words, half(), &layout(), 30.0);
        assert_eq!(rows[0].get(ColumnKey::LoadName), Some("EXT LIGHTS"));
    }

    #[test]
    fn words_beyond_tolerance_are_dropped() {
        // 75 is 30.0+ away from both CKT (50) and DESCRIPTION (135)
        let words = vec![w(68.0, 100.0, "stray"), w(42.0, 100.0, "1")];
        let rows = map_words(&words, half(), &layout(), 25.0);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get(ColumnKey::Ckt), Some("1"));
        assert_eq!(rows[0].get(ColumnKey::LoadName), None);
    }

    #[test]
    fn relaxed_tolerance_recovers_offset_words() {
        let words = vec![w(68.0, 100.0, "7")];
        assert!(map_words(&words, half(), &layout(), 25.0)[0].is_blank());
        let rows = map_words(&words, half(), &layout(), 40.0);
        assert_eq!(rows[0].get(ColumnKey::Ckt), Some("7"));
    }

    #[test]
    fn words_outside_half_are_ignored() {
        let words = vec![w(500.0, 100.0, "1")];
        assert!(map_words(&words, half(), &layout(), 30.0).is_empty());
    }

    #[test]
    fn no_headers_maps_nothing() {
        let words = vec![w(42.0, 100.0, "1")];
        let rows = map_words(&words, half(), &ColumnLayout::default(), 30.0);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_blank());
    }
}
