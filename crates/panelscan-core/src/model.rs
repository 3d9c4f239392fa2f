use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Axis-aligned rectangle in PDF points. The y-axis grows downward,
/// so `y0` is the top edge and `y1` the bottom edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    /// Construct a rectangle, normalizing so that x0 <= x1 and y0 <= y1.
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Rect {
        Rect {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center_x(&self) -> f64 {
        (self.x0 + self.x1) / 2.0
    }

    pub fn center_y(&self) -> f64 {
        (self.y0 + self.y1) / 2.0
    }

    /// Smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Grow the rectangle by `d` points on every side.
    pub fn inflate(&self, d: f64) -> Rect {
        Rect::new(self.x0 - d, self.y0 - d, self.x1 + d, self.y1 + d)
    }

    /// Area shared with `other`, zero if disjoint.
    pub fn overlap_area(&self, other: &Rect) -> f64 {
        let w = (self.x1.min(other.x1) - self.x0.max(other.x0)).max(0.0);
        let h = (self.y1.min(other.y1) - self.y0.max(other.y0)).max(0.0);
        w * h
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }

    /// Clip the rectangle so it lies within `bounds`.
    pub fn clamp_to(&self, bounds: &Rect) -> Rect {
        Rect::new(
            self.x0.max(bounds.x0),
            self.y0.max(bounds.y0),
            self.x1.min(bounds.x1),
            self.y1.min(bounds.y1),
        )
    }
}

/// One word from the PDF text layer, as delivered by the external
/// word source. `block`, `line` and `word_no` come with the fixture
/// but the engine only relies on reading order and geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub text: String,
    #[serde(default)]
    pub block: u32,
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub word_no: u32,
}

impl Word {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x0, self.y0, self.x1, self.y1)
    }

    pub fn center_x(&self) -> f64 {
        (self.x0 + self.x1) / 2.0
    }

    pub fn center_y(&self) -> f64 {
        (self.y0 + self.y1) / 2.0
    }
}

/// A detected panel-name token and its location, used to seed
/// segmentation. Names are normalized to upper case.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelAnchor {
    pub name: String,
    pub rect: Rect,
}

/// The content rectangle carved out for one panel on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelRegion {
    pub name: String,
    pub rect: Rect,
}

/// Canonical schedule columns the engine knows how to locate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColumnKey {
    Ckt,
    LoadName,
    Trip,
    Poles,
    PhaseA,
    PhaseB,
    PhaseC,
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ColumnKey::Ckt => "CKT",
            ColumnKey::LoadName => "LOAD_NAME",
            ColumnKey::Trip => "TRIP",
            ColumnKey::Poles => "POLES",
            ColumnKey::PhaseA => "PHASE_A",
            ColumnKey::PhaseB => "PHASE_B",
            ColumnKey::PhaseC => "PHASE_C",
        };
        write!(f, "{s}")
    }
}

/// One logical schedule row after column mapping: column -> cell text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappedRow {
    pub cells: BTreeMap<ColumnKey, String>,
}

impl MappedRow {
    pub fn get(&self, key: ColumnKey) -> Option<&str> {
        self.cells.get(&key).map(|s| s.as_str())
    }

    /// True when every cell is blank (or the row has no cells at all).
    pub fn is_blank(&self) -> bool {
        self.cells.values().all(|v| v.trim().is_empty())
    }
}

/// Connected load per phase, volt-amps with units stripped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseLoads {
    #[serde(rename = "A", default, skip_serializing_if = "Option::is_none")]
    pub a: Option<f64>,
    #[serde(rename = "B", default, skip_serializing_if = "Option::is_none")]
    pub b: Option<f64>,
    #[serde(rename = "C", default, skip_serializing_if = "Option::is_none")]
    pub c: Option<f64>,
}

impl PhaseLoads {
    pub fn is_empty(&self) -> bool {
        self.a.is_none() && self.b.is_none() && self.c.is_none()
    }
}

/// One row of a panel schedule. The left/odd circuit carries its
/// right/even counterpart in `right_side`; nesting never goes deeper
/// than one level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circuit_number: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poles: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase_loads: Option<PhaseLoads>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_side: Option<Box<Circuit>>,
}

impl Circuit {
    pub fn is_numbered(&self) -> bool {
        self.circuit_number.is_some()
    }

    /// True when the circuit carries no data at all.
    pub fn is_blank(&self) -> bool {
        self.circuit_number.is_none()
            && self.load_name.as_deref().is_none_or(|s| s.trim().is_empty())
            && self.trip.as_deref().is_none_or(|s| s.trim().is_empty())
            && self.poles.is_none()
            && self.phase_loads.is_none_or(|p| p.is_empty())
            && self.right_side.is_none()
    }
}

/// Nameplate-style fields pulled from the region above the circuit grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phases: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub panel_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supply_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aic: Option<String>,
}

/// One extracted panel: name, nameplate metadata, and its circuits
/// (numbered ascending, unnumbered last). The panel owns its circuits
/// exclusively, so a caller may replace one panel's `circuits`
/// wholesale without touching its siblings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub panel_name: String,
    pub metadata: PanelMetadata,
    pub circuits: Vec<Circuit>,
}

/// Extraction counters for one panel. `numbered` is the yield signal
/// an external OCR fallback keys on; `attempts` counts retries taken
/// (so the pipeline ran `attempts + 1` times).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelYield {
    pub numbered: usize,
    pub total: usize,
    pub attempts: u32,
}

/// One panel plus the region it was cut from and its yield counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelExtraction {
    pub panel: Panel,
    pub region: Rect,
    pub stats: PanelYield,
}

/// Everything extracted from one page. An empty `panels` list means
/// no anchors were found; the caller falls back to whole-page
/// extraction, it is not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageExtraction {
    pub panels: Vec<PanelExtraction>,
}
