use crate::model::{PanelAnchor, PanelRegion, Rect};
use log::warn;

/// Headroom above an anchor row, as a multiple of `pad`.
const HEADROOM_PADS: f64 = 3.0;

/// Max tolerated pairwise overlap as a fraction of the smaller area.
pub const MAX_OVERLAP_FRAC: f64 = 0.05;

/// Derive one content rectangle per anchor from the row structure.
///
/// Vertically a region runs from just above its anchor row to the
/// midpoint toward the next row (or the page bottom). Horizontally
/// adjacent anchors in a row split at the midpoint between their
/// anchor positions. The final rectangle is shrunk by `pad` on all
/// sides.
pub fn compute_regions(rows: &[Vec<PanelAnchor>], page: Rect, pad: f64) -> Vec<PanelRegion> {
    let row_tops: Vec<f64> = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|a| a.rect.y0)
                .fold(f64::INFINITY, f64::min)
        })
        .collect();

    let mut regions = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let y_top = page.y0.max(row_tops[i] - HEADROOM_PADS * pad);
        let y_bottom = match row_tops.get(i + 1) {
            Some(next_top) => (row_tops[i] + next_top) / 2.0,
            None => page.y1,
        };

        for (j, anchor) in row.iter().enumerate() {
            let x_left = if j == 0 {
                page.x0
            } else {
                (row[j - 1].rect.x0 + anchor.rect.x0) / 2.0
            };
            let x_right = match row.get(j + 1) {
                Some(next) => (anchor.rect.x0 + next.rect.x0) / 2.0,
                None => page.x1,
            };

            regions.push(PanelRegion {
                name: anchor.name.clone(),
                rect: Rect::new(x_left + pad, y_top + pad, x_right - pad, y_bottom - pad),
            });
        }
    }

    regions
}

/// Shrink region pairs that still overlap by more than
/// `MAX_OVERLAP_FRAC` of either area.
///
/// Each offending pair is pushed apart at the vertical midline of the
/// overlap band: both facing edges move in by half the excess, and if
/// that is not enough both are clamped exactly to the midline. Never
/// fails; degenerate zero-width results are logged and kept.
pub fn resolve_overlaps(regions: &mut [PanelRegion]) {
    for i in 0..regions.len() {
        for j in (i + 1)..regions.len() {
            let a = regions[i].rect;
            let b = regions[j].rect;
            let overlap = a.overlap_area(&b);
            if overlap <= 0.0 {
                continue;
            }
            let min_area = a.area().min(b.area());
            if min_area <= 0.0 || overlap / min_area <= MAX_OVERLAP_FRAC {
                continue;
            }

            warn!(
                "panel regions '{}' and '{}' overlap by {:.1}% of the smaller region, shrinking",
                regions[i].name,
                regions[j].name,
                100.0 * overlap / min_area
            );

            // Which of the pair sits left of the other.
            let (li, ri) = if a.center_x() <= b.center_x() {
                (i, j)
            } else {
                (j, i)
            };
            let band_x0 = regions[li].rect.x0.max(regions[ri].rect.x0);
            let band_x1 = regions[li].rect.x1.min(regions[ri].rect.x1);
            let midline = (band_x0 + band_x1) / 2.0;
            let half_excess = (band_x1 - band_x0) / 2.0;

            let left = regions[li].rect;
            let right = regions[ri].rect;
            regions[li].rect = Rect::new(left.x0, left.y0, left.x1 - half_excess, left.y1);
            regions[ri].rect = Rect::new(right.x0 + half_excess, right.y0, right.x1, right.y1);

            if regions[li].rect.overlap_area(&regions[ri].rect) > 0.0 {
                let left = regions[li].rect;
                let right = regions[ri].rect;
                warn!(
                    "panel regions '{}' and '{}' still overlap, clamping to midline x={:.1}",
                    regions[li].name, regions[ri].name, midline
                );
                regions[li].rect = Rect::new(left.x0.min(midline), left.y0, midline, left.y1);
                regions[ri].rect = Rect::new(midline, right.y0, right.x1.max(midline), right.y1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor(name: &str, x0: f64, y0: f64) -> PanelAnchor {
        PanelAnchor {
            name: name.into(),
            rect: Rect::new(x0, y0, x0 + 40.0, y0 + 10.0),
        }
    }

    fn page() -> Rect {
        Rect::new(0.0, 0.0, 612.0, 792.0)
    }

    #[test]
    fn single_anchor_takes_whole_page_minus_pad() {
        let rows = vec![vec![anchor("K1", 50.0, 50.0)]];
        let regions = compute_regions(&rows, page(), 10.0);
        assert_eq!(regions.len(), 1);
        let r = regions[0].rect;
        assert_eq!(r, Rect::new(10.0, 30.0, 602.0, 782.0));
    }

    #[test]
    fn adjacent_anchors_split_at_midpoint() {
        let rows = vec![vec![anchor("K1", 50.0, 50.0), anchor("L1", 350.0, 50.0)]];
        let regions = compute_regions(&rows, page(), 10.0);
        assert_eq!(regions.len(), 2);
        // boundary at (50 + 350) / 2 = 200, minus/plus pad
        assert_eq!(regions[0].rect.x1, 190.0);
        assert_eq!(regions[1].rect.x0, 210.0);
        assert_eq!(regions[0].rect.x0, 10.0);
        assert_eq!(regions[1].rect.x1, 602.0);
    }

    #[test]
    fn stacked_rows_split_at_y_midpoint() {
        let rows = vec![
            vec![anchor("K1", 50.0, 50.0)],
            vec![anchor("K1S", 50.0, 400.0)],
        ];
        let regions = compute_regions(&rows, page(), 10.0);
        // rows split at (50 + 400) / 2 = 225
        assert_eq!(regions[0].rect.y1, 215.0);
        assert_eq!(regions[1].rect.y0, 380.0);
        assert_eq!(regions[1].rect.y1, 782.0);
    }

    #[test]
    fn headroom_clamps_to_page_top() {
        let rows = vec![vec![anchor("K1", 50.0, 5.0)]];
        let regions = compute_regions(&rows, page(), 10.0);
        // 5 - 30 clamps to page top 0, then pad shrink
        assert_eq!(regions[0].rect.y0, 10.0);
    }

    #[test]
    fn small_overlap_is_tolerated() {
        let mut regions = vec![
            PanelRegion {
                name: "A".into(),
                rect: Rect::new(0.0, 0.0, 102.0, 100.0),
            },
            PanelRegion {
                name: "B".into(),
                rect: Rect::new(98.0, 0.0, 200.0, 100.0),
            },
        ];
        let before = regions.clone();
        // 4 x 100 overlap = ~3.9% of either area
        resolve_overlaps(&mut regions);
        assert_eq!(regions, before);
    }

    #[test]
    fn large_overlap_is_shrunk_to_threshold() {
        let mut regions = vec![
            PanelRegion {
                name: "A".into(),
                rect: Rect::new(0.0, 0.0, 130.0, 100.0),
            },
            PanelRegion {
                name: "B".into(),
                rect: Rect::new(70.0, 0.0, 200.0, 100.0),
            },
        ];
        resolve_overlaps(&mut regions);
        let a = regions[0].rect;
        let b = regions[1].rect;
        let frac = a.overlap_area(&b) / a.area().min(b.area());
        assert!(frac <= MAX_OVERLAP_FRAC + 1e-9, "residual overlap {frac}");
        // facing edges meet at the old overlap midline
        assert_eq!(a.x1, 100.0);
        assert_eq!(b.x0, 100.0);
    }

    #[test]
    fn containment_clamps_to_midline_without_panicking() {
        // B entirely inside A: shrinking cannot fully separate them
        let mut regions = vec![
            PanelRegion {
                name: "A".into(),
                rect: Rect::new(0.0, 0.0, 200.0, 100.0),
            },
            PanelRegion {
                name: "B".into(),
                rect: Rect::new(50.0, 10.0, 150.0, 90.0),
            },
        ];
        resolve_overlaps(&mut regions);
        let frac = regions[0].rect.overlap_area(&regions[1].rect)
            / regions[0].rect.area().min(regions[1].rect.area()).max(1e-9);
        assert!(frac <= MAX_OVERLAP_FRAC + 1e-9);
    }
}
