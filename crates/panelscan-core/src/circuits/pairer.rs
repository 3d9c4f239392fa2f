use crate::circuits::builder::build_circuit;
use crate::columns::{headers, mapper};
use crate::config::SegmentConfig;
use crate::model::{Circuit, PanelYield, Rect, Word};
use log::{debug, warn};

/// Raw block text must be at least this long before a low-yield panel
/// is worth retrying; shorter blocks simply have nothing to find.
const RETRY_MIN_TEXT_LEN: usize = 1000;

/// Immutable per-attempt parameters for one panel extraction pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttemptContext {
    pub attempt: u32,
    pub rect: Rect,
    pub header_tol: f64,
}

impl AttemptContext {
    pub fn initial(rect: Rect, config: &SegmentConfig) -> AttemptContext {
        AttemptContext {
            attempt: 0,
            rect,
            header_tol: config.header_tol,
        }
    }

    /// Context for the next attempt: the rectangle grows left and top
    /// by `5 + 10 * attempt` points and bottom by double that (bottoms
    /// truncate most often), clamped to the page, and the header
    /// tolerance relaxes.
    pub fn next(&self, page: Rect, config: &SegmentConfig) -> AttemptContext {
        let d = 5.0 + 10.0 * self.attempt as f64;
        let grown = Rect::new(
            self.rect.x0 - d,
            self.rect.y0 - d,
            self.rect.x1,
            self.rect.y1 + 2.0 * d,
        );
        AttemptContext {
            attempt: self.attempt + 1,
            rect: grown.clamp_to(&page),
            header_tol: config.header_tol_retry + 10.0 * self.attempt as f64,
        }
    }
}

/// Circuits extracted from one panel region plus its yield counters.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelCircuits {
    pub circuits: Vec<Circuit>,
    pub stats: PanelYield,
}

/// Run header detection, column mapping, circuit building and pairing
/// over one panel region, retrying with a grown rectangle and relaxed
/// tolerance while the yield stays low.
///
/// The retry policy is a bounded loop over [`AttemptContext`] values:
/// a pass whose numbered-circuit count falls below
/// `min_rows_for_panel` is repeated, provided the region holds more
/// than [`RETRY_MIN_TEXT_LEN`] characters of raw text and the attempt
/// cap is not exhausted. Exhaustion returns the best-effort result
/// with a warning; this function never fails.
pub fn extract_circuits(
    words: &[Word],
    region: Rect,
    page: Rect,
    config: &SegmentConfig,
    panel_name: &str,
) -> PanelCircuits {
    let mut ctx = AttemptContext::initial(region, config);

    loop {
        let circuits = run_attempt(words, &ctx, config);
        let numbered = count_numbered(&circuits);

        let text_len = raw_text_len(words, ctx.rect);
        if numbered < config.min_rows_for_panel
            && text_len > RETRY_MIN_TEXT_LEN
            && ctx.attempt < config.max_retry_attempts
        {
            debug!(
                "panel '{}': attempt {} yielded {} numbered circuits (< {}), retrying",
                panel_name, ctx.attempt, numbered, config.min_rows_for_panel
            );
            ctx = ctx.next(page, config);
            continue;
        }

        if numbered < config.expected_min_circuits {
            warn!(
                "panel '{}': low yield, {} numbered circuits extracted (expected >= {}) after {} attempt(s)",
                panel_name,
                numbered,
                config.expected_min_circuits,
                ctx.attempt + 1
            );
        }

        let mut circuits = circuits;
        sort_circuits(&mut circuits);
        let total = circuits.len();
        return PanelCircuits {
            circuits,
            stats: PanelYield {
                numbered,
                total,
                attempts: ctx.attempt,
            },
        };
    }
}

/// One pass of sections 4.5 through 4.8 for a fixed context.
fn run_attempt(words: &[Word], ctx: &AttemptContext, config: &SegmentConfig) -> Vec<Circuit> {
    let rect = ctx.rect;
    let split = headers::compute_left_right_split(words, rect, config.header_band, config.split_bias);
    let left_half = Rect::new(rect.x0, rect.y0, split, rect.y1);
    let right_half = Rect::new(split, rect.y0, rect.x1, rect.y1);

    let left_layout = headers::detect_headers(words, left_half, config.header_band);
    let right_layout = headers::detect_headers(words, right_half, config.header_band);

    let left_rows = mapper::map_words(words, left_half, &left_layout, ctx.header_tol);
    let right_rows = mapper::map_words(words, right_half, &right_layout, ctx.header_tol);

    let left: Vec<Option<Circuit>> = left_rows.iter().map(build_circuit).collect();
    let right: Vec<Option<Circuit>> = right_rows.iter().map(build_circuit).collect();
    pair_halves(left, right)
}

/// Merge per-index left/right circuits into schedule rows.
///
/// Both numbered: the left circuit carries the right as `right_side`.
/// One side numbered: that side is emitted as primary on its own — a
/// numbered right half is deliberately promoted rather than lost.
/// Neither numbered: the row is dropped.
pub fn pair_halves(left: Vec<Option<Circuit>>, right: Vec<Option<Circuit>>) -> Vec<Circuit> {
    let rows = left.len().max(right.len());
    let mut left = left;
    let mut right = right;
    left.resize(rows, None);
    right.resize(rows, None);

    let mut circuits = Vec::new();
    for (l, r) in left.into_iter().zip(right) {
        match (l, r) {
            (Some(l), Some(r)) if l.is_numbered() && r.is_numbered() => {
                let mut primary = l;
                primary.right_side = Some(Box::new(r));
                circuits.push(primary);
            }
            (Some(l), _) if l.is_numbered() => circuits.push(l),
            (_, Some(r)) if r.is_numbered() => circuits.push(r),
            _ => {}
        }
    }
    circuits
}

fn count_numbered(circuits: &[Circuit]) -> usize {
    circuits.iter().filter(|c| c.is_numbered()).count()
}

/// Length of the raw text inside `rect`, words joined by one space.
fn raw_text_len(words: &[Word], rect: Rect) -> usize {
    let mut len = 0;
    for word in words {
        if rect.contains_point(word.center_x(), word.center_y()) {
            if len > 0 {
                len += 1;
            }
            len += word.text.trim().len();
        }
    }
    len
}

/// Numbered circuits ascending, unnumbered last, stable within ties.
pub fn sort_circuits(circuits: &mut [Circuit]) {
    circuits.sort_by_key(|c| match c.circuit_number {
        Some(n) => (0, n),
        None => (1, 0),
    });
}
