use panelscan_core::{Circuit, PageExtraction};
use std::fmt::Write;

/// Render one page's extraction as a fixed-width text table, one
/// block per panel.
pub fn format_page(extraction: &PageExtraction) -> String {
    let mut out = String::new();

    if extraction.panels.is_empty() {
        out.push_str("No panel schedules found on this page.\n");
        return out;
    }

    for (i, p) in extraction.panels.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "=== Panel {} ===", p.panel.panel_name);

        let meta = &p.panel.metadata;
        for (label, value) in [
            ("Voltage", &meta.voltage),
            ("Rating", &meta.rating),
            ("Phases", &meta.phases),
            ("Type", &meta.panel_type),
            ("Supply from", &meta.supply_from),
            ("A.I.C.", &meta.aic),
        ] {
            if let Some(v) = value {
                let _ = writeln!(out, "  {label}: {v}");
            }
        }

        let _ = writeln!(
            out,
            "  {} circuit(s), {} numbered, {} retry attempt(s)",
            p.stats.total, p.stats.numbered, p.stats.attempts
        );
        if p.panel.circuits.is_empty() {
            continue;
        }

        out.push('\n');
        let _ = writeln!(
            out,
            "  {:>4} {:<24} {:>6} {:>5}   {:>4} {:<24} {:>6} {:>5}",
            "CKT", "LOAD", "TRIP", "P", "CKT", "LOAD", "TRIP", "P"
        );
        for circuit in &p.panel.circuits {
            let left = format_half(circuit);
            let right = match &circuit.right_side {
                Some(r) => format_half(r),
                None => format!("{:>4} {:<24} {:>6} {:>5}", "", "", "", ""),
            };
            let _ = writeln!(out, "  {left}   {right}");
        }
    }

    out
}

fn format_half(c: &Circuit) -> String {
    format!(
        "{:>4} {:<24} {:>6} {:>5}",
        c.circuit_number.map(|n| n.to_string()).unwrap_or_default(),
        c.load_name.as_deref().unwrap_or(""),
        c.trip.as_deref().unwrap_or(""),
        c.poles.map(|n| n.to_string()).unwrap_or_default(),
    )
}
