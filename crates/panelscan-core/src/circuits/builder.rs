use crate::model::{Circuit, ColumnKey, MappedRow, PhaseLoads};
use regex::Regex;
use std::sync::LazyLock;

static FIRST_INT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());
static TRIP_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:AMPS?|A)?").unwrap());
static FIRST_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-?\d+(?:\.\d+)?").unwrap());

/// Parse typed circuit fields out of one mapped row.
///
/// Returns `None` for rows with no non-blank cell; everything else
/// yields a circuit, however partial. A cell that fails to parse just
/// leaves its field unset.
pub fn build_circuit(row: &MappedRow) -> Option<Circuit> {
    if row.is_blank() {
        return None;
    }

    let phase_loads = PhaseLoads {
        a: row.get(ColumnKey::PhaseA).and_then(first_number),
        b: row.get(ColumnKey::PhaseB).and_then(first_number),
        c: row.get(ColumnKey::PhaseC).and_then(first_number),
    };

    Some(Circuit {
        circuit_number: row.get(ColumnKey::Ckt).and_then(first_int),
        load_name: row
            .get(ColumnKey::LoadName)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        trip: row.get(ColumnKey::Trip).and_then(parse_trip),
        poles: row.get(ColumnKey::Poles).and_then(first_int),
        phase_loads: (!phase_loads.is_empty()).then_some(phase_loads),
        right_side: None,
    })
}

fn first_int(cell: &str) -> Option<i64> {
    FIRST_INT.find(cell)?.as_str().parse().ok()
}

fn first_number(cell: &str) -> Option<f64> {
    FIRST_NUMBER.find(cell)?.as_str().parse().ok()
}

/// Re-render a trip cell as `"<n> A"`, taking the first numeric token
/// and dropping any A/AMP/AMPS suffix.
fn parse_trip(cell: &str) -> Option<String> {
    let caps = TRIP_VALUE.captures(cell)?;
    Some(format!("{} A", &caps[1]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[(ColumnKey, &str)]) -> MappedRow {
        MappedRow {
            cells: cells.iter().map(|(k, v)| (*k, v.to_string())).collect(),
        }
    }

    #[test]
    fn full_row_parses_all_fields() {
        let r = row(&[
            (ColumnKey::Ckt, "1"),
            (ColumnKey::LoadName, " EXT LIGHTS "),
            (ColumnKey::Trip, "20A"),
            (ColumnKey::Poles, "1"),
            (ColumnKey::PhaseA, "1200 VA"),
        ]);
        let c = build_circuit(&r).unwrap();
        assert_eq!(c.circuit_number, Some(1));
        assert_eq!(c.load_name.as_deref(), Some("EXT LIGHTS"));
        assert_eq!(c.trip.as_deref(), Some("20 A"));
        assert_eq!(c.poles, Some(1));
        assert_eq!(c.phase_loads.unwrap().a, Some(1200.0));
    }

    #[test]
    fn trip_variants_rerender_uniformly() {
        for cell in ["20", "20 A", "20A", "20 AMP", "20 AMPS", "breaker 20 amps"] {
            assert_eq!(parse_trip(cell).as_deref(), Some("20 A"), "cell {cell:?}");
        }
        assert_eq!(parse_trip("17.5 A").as_deref(), Some("17.5 A"));
        assert_eq!(parse_trip("spare"), None);
    }

    #[test]
    fn circuit_number_takes_first_integer() {
        let r = row(&[(ColumnKey::Ckt, "12 / 14")]);
        assert_eq!(build_circuit(&r).unwrap().circuit_number, Some(12));
    }

    #[test]
    fn unparseable_cells_leave_fields_unset() {
        let r = row(&[
            (ColumnKey::Ckt, "SPARE"),
            (ColumnKey::Trip, "-"),
            (ColumnKey::Poles, "?"),
        ]);
        let c = build_circuit(&r).unwrap();
        assert_eq!(c.circuit_number, None);
        assert_eq!(c.trip, None);
        assert_eq!(c.poles, None);
    }

    #[test]
    fn blank_row_is_dropped() {
        assert!(build_circuit(&MappedRow::default()).is_none());
        let r = row(&[(ColumnKey::LoadName, "   ")]);
        assert!(build_circuit(&r).is_none());
    }

    #[test]
    fn phase_loads_strip_units() {
        let r = row(&[
            (ColumnKey::Ckt, "3"),
            (ColumnKey::PhaseB, "560VA"),
            (ColumnKey::PhaseC, "0.5 kVA"),
        ]);
        let loads = build_circuit(&r).unwrap().phase_loads.unwrap();
        assert_eq!(loads.a, None);
        assert_eq!(loads.b, Some(560.0));
        assert_eq!(loads.c, Some(0.5));
    }
}
