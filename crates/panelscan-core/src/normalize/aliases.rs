use serde_json::Value;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Canonical circuit-record fields the normalizer resolves aliases to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    CircuitNumber,
    LoadName,
    Trip,
    Poles,
    PhaseA,
    PhaseB,
    PhaseC,
}

impl CanonicalField {
    /// Type-coerce a raw value for this field. Returns `Null` when the
    /// value cannot be coerced; callers treat `Null` as absent.
    pub fn coerce(self, value: &Value) -> Value {
        match self {
            CanonicalField::CircuitNumber | CanonicalField::Poles => coerce_int(value),
            CanonicalField::LoadName | CanonicalField::Trip => coerce_string(value),
            CanonicalField::PhaseA | CanonicalField::PhaseB | CanonicalField::PhaseC => {
                coerce_numeric_or_string(value)
            }
        }
    }

    /// Letter key used inside the canonical `phase_loads` object, if
    /// this is a phase field.
    pub fn phase_letter(self) -> Option<&'static str> {
        match self {
            CanonicalField::PhaseA => Some("A"),
            CanonicalField::PhaseB => Some("B"),
            CanonicalField::PhaseC => Some("C"),
            _ => None,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            CanonicalField::CircuitNumber => "circuit_number",
            CanonicalField::LoadName => "load_name",
            CanonicalField::Trip => "trip",
            CanonicalField::Poles => "poles",
            CanonicalField::PhaseA => "phase_a",
            CanonicalField::PhaseB => "phase_b",
            CanonicalField::PhaseC => "phase_c",
        }
    }
}

/// One shared alias table for every schema branch. Keys are compared
/// after `normalize_key`, so "Circuit No." and "circuit_no" both hit.
static ALIASES: LazyLock<HashMap<&'static str, CanonicalField>> = LazyLock::new(|| {
    use CanonicalField::*;
    let mut m = HashMap::new();

    for alias in [
        "circuit_number",
        "circuit",
        "circuit_no",
        "circuit_num",
        "ckt",
        "ckt_no",
        "ckt_number",
        "cct",
        "number",
        "no",
        "num",
    ] {
        m.insert(alias, CircuitNumber);
    }

    for alias in [
        "load_name",
        "load",
        "loads",
        "description",
        "desc",
        "load_description",
        "name",
        "load_served",
        "serves",
        "served",
    ] {
        m.insert(alias, LoadName);
    }

    for alias in [
        "trip",
        "trips",
        "breaker",
        "breaker_size",
        "breaker_trip",
        "bkr",
        "amps",
        "amp",
        "amperage",
        "trip_rating",
        "ocp",
    ] {
        m.insert(alias, Trip);
    }

    for alias in ["poles", "pole", "p", "no_of_poles", "num_poles", "pole_count"] {
        m.insert(alias, Poles);
    }

    for alias in ["phase_a", "a", "va_a", "load_a", "phase_a_load", "a_phase"] {
        m.insert(alias, PhaseA);
    }
    for alias in ["phase_b", "b", "va_b", "load_b", "phase_b_load", "b_phase"] {
        m.insert(alias, PhaseB);
    }
    for alias in ["phase_c", "c", "va_c", "load_c", "phase_c_load", "c_phase"] {
        m.insert(alias, PhaseC);
    }

    m
});

/// Resolve a raw record key to its canonical field, if known.
pub fn lookup(raw_key: &str) -> Option<CanonicalField> {
    ALIASES.get(normalize_key(raw_key).as_str()).copied()
}

/// Lowercase, map separator runs to single underscores, trim.
pub fn normalize_key(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_sep = true;
    for c in raw.trim().chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            prev_sep = false;
        } else if !prev_sep {
            out.push('_');
            prev_sep = true;
        }
    }
    if out.ends_with('_') {
        out.pop();
    }
    out
}

fn coerce_int(value: &Value) -> Value {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .map(Value::from)
            .unwrap_or(Value::Null),
        Value::String(s) => {
            static FIRST_INT: LazyLock<regex::Regex> =
                LazyLock::new(|| regex::Regex::new(r"-?\d+").unwrap());
            FIRST_INT
                .find(s)
                .and_then(|m| m.as_str().parse::<i64>().ok())
                .map(Value::from)
                .unwrap_or(Value::Null)
        }
        _ => Value::Null,
    }
}

fn coerce_string(value: &Value) -> Value {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Value::Null
            } else {
                Value::from(trimmed)
            }
        }
        Value::Number(n) => Value::from(n.to_string()),
        _ => Value::Null,
    }
}

fn coerce_numeric_or_string(value: &Value) -> Value {
    match value {
        Value::Number(_) => value.clone(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Value::Null
            } else if let Ok(f) = trimmed.parse::<f64>() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .unwrap_or_else(|| Value::from(trimmed))
            } else {
                Value::from(trimmed)
            }
        }
        _ => Value::Null,
    }
}
