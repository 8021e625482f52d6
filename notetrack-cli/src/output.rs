//! Rendering of note lists as JSON or as a plain text table.

use anyhow::Result;
use notetrack_core::{Note, tuning};
use serde::Serialize;
use std::fmt::Write;

use crate::batch::TrackReport;

#[derive(Serialize)]
struct SourcedNotes<'a> {
    source: String,
    notes: &'a [Note],
}

/// A single report renders as the bare note array; several reports render as
/// an array of `{ "source", "notes" }` objects.
pub fn render_json(reports: &[TrackReport]) -> Result<String> {
    let json = match reports {
        [single] => serde_json::to_string_pretty(&single.notes)?,
        _ => {
            let sourced: Vec<SourcedNotes> = reports
                .iter()
                .map(|r| SourcedNotes {
                    source: r.source.display().to_string(),
                    notes: &r.notes,
                })
                .collect();
            serde_json::to_string_pretty(&sourced)?
        }
    };
    Ok(json)
}

/// Renders every report as an aligned table, one block per source.
pub fn render_table(reports: &[TrackReport]) -> Result<String> {
    let mut out = String::new();
    for (i, report) in reports.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        writeln!(out, "# {} ({} notes)", report.source.display(), report.notes.len())?;
        writeln!(
            out,
            "{:<6} {:>11} {:>9} {:>9} {:>9}",
            "Note", "Freq (Hz)", "Start (s)", "End (s)", "Dur (s)"
        )?;
        for note in &report.notes {
            writeln!(
                out,
                "{:<6} {:>11.2} {:>9.3} {:>9.3} {:>9.3}",
                note.name,
                note.frequency,
                note.start_time,
                note.end_time(),
                note.duration
            )?;
        }
    }
    Ok(out)
}

/// One row per frequency: nearest note, its target and the deviation in cents.
pub fn render_note_names(frequencies: &[f64]) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "{:>11} {:<6} {:>11} {:>8}", "Freq (Hz)", "Note", "Target (Hz)", "Cents")?;
    for &freq in frequencies {
        let (name, target) = tuning::nearest_note(freq)?;
        let cents = tuning::cents_deviation(freq, target);
        writeln!(out, "{:>11.2} {:<6} {:>11.2} {:>+8.1}", freq, name, target, cents)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn report(source: &str, notes: Vec<Note>) -> TrackReport {
        TrackReport {
            source: PathBuf::from(source),
            notes,
        }
    }

    fn a4() -> Note {
        Note {
            name: "A4".to_string(),
            frequency: 440.5,
            start_time: 0.0,
            duration: 0.25,
        }
    }

    #[test]
    fn single_report_is_a_bare_array() {
        let json = render_json(&[report("take.csv", vec![a4()])]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["name"], "A4");
        assert_eq!(value[0]["startTime"], 0.0);
        assert_eq!(value[0]["duration"], 0.25);
        assert!(value[0].get("endTime").is_none());
    }

    #[test]
    fn several_reports_carry_their_source() {
        let json = render_json(&[report("a.csv", vec![a4()]), report("b.csv", vec![])]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["source"], "a.csv");
        assert_eq!(value[0]["notes"][0]["frequency"], 440.5);
        assert_eq!(value[1]["source"], "b.csv");
        assert_eq!(value[1]["notes"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn table_lists_each_note() {
        let table = render_table(&[report("take.csv", vec![a4()])]).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "# take.csv (1 notes)");
        assert!(lines[1].starts_with("Note"));
        assert_eq!(lines[2], "A4          440.50     0.000     0.250     0.250");
    }

    #[test]
    fn table_blocks_are_separated() {
        let table =
            render_table(&[report("a.csv", vec![a4()]), report("b.csv", vec![])]).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "# b.csv (0 notes)");
        assert!(render_table(&[]).unwrap().is_empty());
    }

    #[test]
    fn note_names_with_cents() {
        let table = render_note_names(&[440.0, 445.0]).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("A4"));
        assert!(lines[2].trim_end().ends_with("+19.6"));
        assert!(render_note_names(&[0.0]).is_err());
    }
}
