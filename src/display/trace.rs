use crate::resolve::{Resolution, ResolvedObservation};
use std::fmt::Write;

/// Renders an audit trace of a resolution: every date's value in force, and
/// the versions that value replaced.
pub fn format_trace(resolution: &Resolution) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "AUDIT TRACE for series '{}' (feed '{}', instrument '{}'):",
        resolution.series, resolution.feed, resolution.instrument
    );
    let _ = writeln!(output, "--------------------------------------------------");

    if resolution.is_empty() {
        let _ = writeln!(output, "(no observations)");
        return output;
    }

    let rows = resolution.observations();
    for (i, obs) in rows.iter().enumerate() {
        let is_last = i == rows.len() - 1;
        let connector = if is_last { "`--" } else { "|--" };
        let _ = writeln!(output, "{} {} = {:.4} (v{})", connector, obs.date, obs.value, obs.version);

        let superseded = resolution.superseded(obs.date);
        if !superseded.is_empty() {
            let stem = if is_last { "   " } else { "|  " };
            let _ = writeln!(output, "{}`-- Supersedes: {}", stem, format_superseded(superseded));
        }
    }

    let _ = writeln!(output, "--------------------------------------------------");
    let _ = writeln!(output, "{} dates, {} restated", rows.len(), resolution.restated_dates());
    output
}

fn format_superseded(entries: &[ResolvedObservation]) -> String {
    entries
        .iter()
        .map(|o| format!("v{} [{:.4}]", o.version, o.value))
        .collect::<Vec<_>>()
        .join(", ")
}
