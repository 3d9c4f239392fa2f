//! Schema reconciliation for persisted panel-schedule documents.
//!
//! Three historical document shapes reach persistence: an
//! object-keyed `PANEL_SCHEDULES` map, a legacy `PANEL_SCHEDULES`
//! array, and the canonical `ELECTRICAL.panels` list. All three are
//! accepted and canonicalized without loss; the circuit-level work is
//! shared by every branch. Documents may come from this engine or
//! from an LLM-structured text path, so nothing here assumes clean
//! input: malformed nodes are logged and passed through unchanged.

pub mod aliases;

use aliases::{lookup, normalize_key};
use log::warn;
use serde_json::{Map, Value};
use std::cmp::Ordering;

/// The three accepted document shapes, resolved once per document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentShape {
    /// `{"PANEL_SCHEDULES": {"K1": {"circuit_details": [...]}}}`
    ObjectKeyed,
    /// `{"PANEL_SCHEDULES": [{"circuits": [...]}]}`
    LegacyArray,
    /// `{"ELECTRICAL": {"panels": [{"circuits": [...]}]}}`
    PanelsList,
    Unknown,
}

pub fn detect_shape(doc: &Value) -> DocumentShape {
    match doc.get("PANEL_SCHEDULES") {
        Some(Value::Object(_)) => DocumentShape::ObjectKeyed,
        Some(Value::Array(_)) => DocumentShape::LegacyArray,
        _ => {
            if doc
                .pointer("/ELECTRICAL/panels")
                .is_some_and(Value::is_array)
            {
                DocumentShape::PanelsList
            } else {
                DocumentShape::Unknown
            }
        }
    }
}

/// Canonicalize a whole document, whatever its shape.
///
/// Works on a copy; the input is never mutated. Unknown shapes are
/// returned unchanged with a warning. Duplicate or non-monotonic
/// circuit numbering is passed through as-is; only adjacent-pair
/// parity is repaired.
pub fn normalize_document(doc: &Value) -> Value {
    let mut out = doc.clone();
    match detect_shape(&out) {
        DocumentShape::ObjectKeyed => {
            if let Some(panels) = out.get_mut("PANEL_SCHEDULES").and_then(Value::as_object_mut) {
                for (name, panel) in panels.iter_mut() {
                    normalize_panel(panel, "circuit_details", false, name);
                }
            }
        }
        DocumentShape::LegacyArray => {
            if let Some(panels) = out.get_mut("PANEL_SCHEDULES").and_then(Value::as_array_mut) {
                for (idx, panel) in panels.iter_mut().enumerate() {
                    let label = panel_label(panel, idx);
                    normalize_panel(panel, "circuits", false, &label);
                }
            }
        }
        DocumentShape::PanelsList => {
            if let Some(panels) = out
                .pointer_mut("/ELECTRICAL/panels")
                .and_then(Value::as_array_mut)
            {
                for (idx, panel) in panels.iter_mut().enumerate() {
                    let label = panel_label(panel, idx);
                    normalize_panel(panel, "circuits", true, &label);
                }
            }
        }
        DocumentShape::Unknown => {
            warn!("unrecognized document shape, passed through unchanged");
        }
    }
    out
}

/// Canonicalize one panel's circuit array in place.
fn normalize_panel(panel: &mut Value, circuits_key: &str, sort: bool, label: &str) {
    let Some(obj) = panel.as_object_mut() else {
        warn!("panel '{label}': expected a record, found a non-record; left unchanged");
        return;
    };
    let Some(circuits) = obj.get_mut(circuits_key).and_then(Value::as_array_mut) else {
        return;
    };

    for circuit in circuits.iter_mut() {
        *circuit = normalize_circuit_record(circuit);
    }
    if sort {
        sort_by_number(circuits);
    }
    repair_pairs(circuits);
    for circuit in circuits.iter_mut() {
        *circuit = normalize_left_right(circuit);
    }
}

fn panel_label(panel: &Value, idx: usize) -> String {
    panel
        .get("panel_name")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("#{idx}"))
}

/// Canonicalize one circuit record: resolve aliased keys, coerce
/// types, gather phase fields under `phase_loads`, and normalize a
/// nested `right_side`. An explicit `{left: {...}, right: {...}}`
/// shape is also accepted; when the left half lacks a number but the
/// right half has one, the halves are swapped.
pub fn normalize_circuit_record(record: &Value) -> Value {
    let Some(obj) = record.as_object() else {
        warn!("expected a circuit record, found a non-record; left unchanged");
        return record.clone();
    };

    if obj.contains_key("left") || obj.contains_key("right") {
        let mut left = normalize_half(obj.get("left"));
        let mut right = normalize_half(obj.get("right"));
        if number_of_map(&left).is_none() && number_of_map(&right).is_some() {
            std::mem::swap(&mut left, &mut right);
        }
        if !value_blank(&Value::Object(right.clone())) {
            left.insert("right_side".into(), Value::Object(right));
        }
        return Value::Object(left);
    }

    let mut out = Map::new();
    let mut phases = Map::new();
    for (key, value) in obj {
        let nk = normalize_key(key);
        if nk == "right_side" {
            let nested = normalize_circuit_record(value);
            if !value_blank(&nested) {
                out.insert("right_side".into(), nested);
            }
            continue;
        }
        if nk == "phase_loads" {
            if let Some(inner) = value.as_object() {
                for (phase_key, phase_value) in inner {
                    if let Some(field) = lookup(phase_key) {
                        if let Some(letter) = field.phase_letter() {
                            let coerced = field.coerce(phase_value);
                            if !coerced.is_null() {
                                phases.insert(letter.into(), coerced);
                            }
                        }
                    }
                }
            }
            continue;
        }
        match lookup(&nk) {
            Some(field) => {
                let coerced = field.coerce(value);
                // explicit nulls survive (a nulled primary slot is
                // meaningful), failed coercions do not
                if coerced.is_null() && !value.is_null() {
                    continue;
                }
                match field.phase_letter() {
                    Some(letter) => {
                        if !coerced.is_null() {
                            phases.insert(letter.into(), coerced);
                        }
                    }
                    None => {
                        out.insert(field.key().into(), coerced);
                    }
                }
            }
            // Unknown keys are carried through untouched.
            None => {
                out.insert(key.clone(), value.clone());
            }
        }
    }
    if !phases.is_empty() {
        out.insert("phase_loads".into(), Value::Object(phases));
    }
    Value::Object(out)
}

fn normalize_half(half: Option<&Value>) -> Map<String, Value> {
    match half {
        Some(v) => match normalize_circuit_record(v) {
            Value::Object(m) => m,
            _ => Map::new(),
        },
        None => Map::new(),
    }
}

/// Merge standalone even circuits into the immediately preceding odd
/// circuit's `right_side`, iff `even == odd + 1` and the odd circuit
/// has no existing non-empty `right_side`.
pub fn repair_pairs(circuits: &mut Vec<Value>) {
    let mut i = 1;
    while i < circuits.len() {
        let adjacent = match (number_of(&circuits[i - 1]), number_of(&circuits[i])) {
            (Some(odd), Some(even)) => {
                odd.rem_euclid(2) == 1 && even.rem_euclid(2) == 0 && even == odd + 1
            }
            _ => false,
        };
        let standalone = !has_right_side(&circuits[i]);
        let prev_free = !has_right_side(&circuits[i - 1]);

        if adjacent && standalone && prev_free {
            let mut moved = circuits.remove(i);
            if let Some(m) = moved.as_object_mut() {
                m.remove("right_side");
            }
            if let Some(prev) = circuits[i - 1].as_object_mut() {
                prev.insert("right_side".into(), moved);
            }
            // the element after the removed one slid into position i
        } else {
            i += 1;
        }
    }
}

/// Correct swapped or dangling parity on one circuit row.
///
/// An even primary paired with an odd `right_side` has all fields
/// swapped between the two sides. A row holding only a standalone
/// even number has its data moved into a fresh `right_side` and the
/// primary slot nulled. Idempotent: applying twice equals applying
/// once.
pub fn normalize_left_right(record: &Value) -> Value {
    let Some(obj) = record.as_object() else {
        return record.clone();
    };
    let mut out = obj.clone();

    if out.get("right_side").is_some_and(value_blank) {
        out.remove("right_side");
    }

    let primary_n = number_of_map(&out);
    let right_n = out
        .get("right_side")
        .and_then(|r| r.get("circuit_number"))
        .and_then(Value::as_i64);

    match (primary_n, right_n) {
        (Some(p), Some(r)) if p.rem_euclid(2) == 0 && r.rem_euclid(2) == 1 => {
            let right = out.remove("right_side").expect("checked above");
            let mut new_primary = match right {
                Value::Object(m) => m,
                _ => Map::new(),
            };
            // nesting stays one level deep
            new_primary.remove("right_side");
            new_primary.insert("right_side".into(), Value::Object(out));
            Value::Object(new_primary)
        }
        (Some(p), None) if p.rem_euclid(2) == 0 && !out.contains_key("right_side") => {
            let mut fresh = Map::new();
            fresh.insert("circuit_number".into(), Value::Null);
            fresh.insert("right_side".into(), Value::Object(out));
            Value::Object(fresh)
        }
        _ => Value::Object(out),
    }
}

fn number_of(record: &Value) -> Option<i64> {
    record.get("circuit_number").and_then(Value::as_i64)
}

fn number_of_map(record: &Map<String, Value>) -> Option<i64> {
    record.get("circuit_number").and_then(Value::as_i64)
}

fn has_right_side(record: &Value) -> bool {
    record.get("right_side").is_some_and(|r| !value_blank(r))
}

/// Null, a blank string, or a container of nothing but blanks.
fn value_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Object(m) => m.values().all(value_blank),
        Value::Array(a) => a.iter().all(value_blank),
        _ => false,
    }
}

/// Stable ascending sort by numeric circuit number, missing last. A
/// row with a nulled primary slot sorts by its `right_side` number so
/// repeated normalization keeps a stable order.
fn sort_by_number(circuits: &mut [Value]) {
    fn sort_key(record: &Value) -> Option<i64> {
        number_of(record).or_else(|| {
            record
                .get("right_side")
                .and_then(|r| r.get("circuit_number"))
                .and_then(Value::as_i64)
        })
    }
    circuits.sort_by(|a, b| match (sort_key(a), sort_key(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
