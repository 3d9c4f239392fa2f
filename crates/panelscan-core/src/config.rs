use crate::error::PanelScanError;
use serde::{Deserialize, Serialize};

/// All externally injected tuning knobs for the segmentation engine.
///
/// Values are plain numbers; whatever layer owns environment or file
/// parsing constructs one of these and passes it down. There is no
/// global registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentConfig {
    /// Upper bound on the row-grouping y tolerance in points.
    pub y_tol_max: f64,
    /// Fraction of page height used for the row-grouping tolerance.
    pub y_tol_frac: f64,
    /// When set, replaces the `min(y_tol_max, height * y_tol_frac)`
    /// default outright.
    pub y_tol_override: Option<f64>,
    /// Inner margin removed from each panel content rectangle.
    pub pad: f64,
    /// Height of the band searched for column header labels.
    pub header_band: f64,
    /// Max distance from a word to a column header center on the
    /// first attempt.
    pub header_tol: f64,
    /// Base tolerance used on retries, further relaxed per attempt.
    pub header_tol_retry: f64,
    /// Minimum numbered circuits before a dense block is retried.
    pub min_rows_for_panel: usize,
    /// Below this yield a warning is emitted after retries exhaust.
    pub expected_min_circuits: usize,
    /// Hard cap on retries per panel.
    pub max_retry_attempts: u32,
    /// Fraction of panel width used for the left/right split when no
    /// clear two-cluster gap exists in the header band.
    pub split_bias: f64,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        SegmentConfig {
            y_tol_max: 120.0,
            y_tol_frac: 0.08,
            y_tol_override: None,
            pad: 10.0,
            header_band: 150.0,
            header_tol: 30.0,
            header_tol_retry: 40.0,
            min_rows_for_panel: 3,
            expected_min_circuits: 10,
            max_retry_attempts: 3,
            split_bias: 0.5,
        }
    }
}

impl SegmentConfig {
    /// Row-grouping tolerance for a page of the given height.
    pub fn y_tol(&self, page_height: f64) -> f64 {
        self.y_tol_override
            .unwrap_or_else(|| self.y_tol_max.min(page_height * self.y_tol_frac))
    }

    pub fn validate(&self) -> Result<(), PanelScanError> {
        if self.pad < 0.0 {
            return Err(PanelScanError::InvalidConfig(format!(
                "pad must be non-negative, got {}",
                self.pad
            )));
        }
        if self.y_tol_max <= 0.0 || self.y_tol_frac <= 0.0 {
            return Err(PanelScanError::InvalidConfig(format!(
                "y tolerance must be positive, got max={} frac={}",
                self.y_tol_max, self.y_tol_frac
            )));
        }
        if let Some(v) = self.y_tol_override {
            if v <= 0.0 {
                return Err(PanelScanError::InvalidConfig(format!(
                    "y_tol_override must be positive, got {v}"
                )));
            }
        }
        if self.header_tol <= 0.0 || self.header_tol_retry <= 0.0 {
            return Err(PanelScanError::InvalidConfig(
                "header tolerances must be positive".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.split_bias) {
            return Err(PanelScanError::InvalidConfig(format!(
                "split_bias must be within 0..=1, got {}",
                self.split_bias
            )));
        }
        Ok(())
    }
}
