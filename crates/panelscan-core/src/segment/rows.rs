use crate::model::PanelAnchor;

/// Cluster anchors into horizontal bands.
///
/// Expects the `(y0, x0)` ordering `detect_anchors` produces. A new
/// row starts whenever an anchor's `y0` is more than `y_tol` below
/// the first anchor of the current row; each finished row is sorted
/// by `x0`.
pub fn group_rows(anchors: &[PanelAnchor], y_tol: f64) -> Vec<Vec<PanelAnchor>> {
    let mut rows: Vec<Vec<PanelAnchor>> = Vec::new();
    let mut current: Vec<PanelAnchor> = Vec::new();
    let mut row_y = 0.0_f64;

    for anchor in anchors {
        if current.is_empty() {
            row_y = anchor.rect.y0;
            current.push(anchor.clone());
            continue;
        }
        if (anchor.rect.y0 - row_y).abs() > y_tol {
            current.sort_by(|a, b| a.rect.x0.total_cmp(&b.rect.x0));
            rows.push(std::mem::take(&mut current));
            row_y = anchor.rect.y0;
        }
        current.push(anchor.clone());
    }

    if !current.is_empty() {
        current.sort_by(|a, b| a.rect.x0.total_cmp(&b.rect.x0));
        rows.push(current);
    }

    rows
}
