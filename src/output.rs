//! Terminal and JSON rendering of lookup results.

use anyhow::Result;
use std::fmt::Write;
use tracing::debug;

use crate::report::{INSPECTIONS_TITLE, Report, or_unknown};
use crate::vehicle::VehicleData;

/// Message shown for a failed lookup and for a plate without data alike.
pub fn no_data_message(plate: &str) -> String {
    format!("Geen gegevens gevonden voor kenteken: {plate}")
}

/// Renders the outcome of a lookup as plain text.
///
/// `None` (a failed lookup) and an empty aggregate both produce
/// [`no_data_message`].
pub fn render_lookup(plate: &str, data: Option<&VehicleData>) -> String {
    if let Some(data) = data {
        debug!("{:#?}", data);
    }

    match data.and_then(Report::build) {
        Some(report) => render_text(&report),
        None => no_data_message(plate),
    }
}

/// Renders a report as aligned `label: value` blocks.
pub fn render_text(report: &Report) -> String {
    let mut out = String::new();

    for section in &report.sections {
        heading(&mut out, &section.title);
        let width = section.rows.iter().map(|r| r.label.chars().count()).max().unwrap_or(0);
        for row in &section.rows {
            let _ = writeln!(
                out,
                "  {:<width$}  {}",
                row.label,
                or_unknown(row.value.clone())
            );
        }
        out.push('\n');
    }

    if !report.inspections.is_empty() {
        heading(&mut out, INSPECTIONS_TITLE);
        for (i, inspection) in report.inspections.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            for row in &inspection.rows {
                let _ = writeln!(out, "  {:<13}  {}", row.label, row.value);
            }
            if !inspection.defects.is_empty() {
                out.push_str("  Gebreken:\n");
                for defect in &inspection.defects {
                    let _ = writeln!(out, "    - {defect}");
                }
            }
        }
        out.push('\n');
    }

    if !report.unrendered.is_empty() {
        let names: Vec<&str> = report.unrendered.iter().map(|c| c.as_str()).collect();
        let _ = writeln!(
            out,
            "Overige gegevens ({}): gebruik --json om ze te tonen",
            names.join(", ")
        );
    }

    out.truncate(out.trim_end().len());
    out
}

/// Serialises the raw aggregate as pretty JSON; `null` for a failed lookup.
pub fn render_json(data: Option<&VehicleData>) -> Result<String> {
    Ok(serde_json::to_string_pretty(&data)?)
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "-".repeat(title.chars().count()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Defect, Record};

    #[test]
    fn test_failed_and_empty_look_the_same() {
        let empty = VehicleData::default();
        assert_eq!(
            render_lookup("AB-12-CD", None),
            render_lookup("AB-12-CD", Some(&empty))
        );
        assert_eq!(
            render_lookup("AB-12-CD", None),
            "Geen gegevens gevonden voor kenteken: AB-12-CD"
        );
    }

    #[test]
    fn test_render_sections_and_inspections() {
        let mut data = VehicleData {
            base: Some(
                Record::new()
                    .with("kenteken", "AB12CD")
                    .with("merk", "Volkswagen")
                    .with("tweede_kleur", ""),
            ),
            apk: vec![
                Record::new()
                    .with("rapportnummer", "123")
                    .with("vervaldatum_keuring", "20250101"),
            ],
            ..Default::default()
        };
        data.defects.insert(
            "123".into(),
            vec![Defect {
                description: Some("Olie lekkage".into()),
                ..Default::default()
            }],
        );

        let text = render_lookup("AB-12-CD", Some(&data));
        assert!(text.starts_with("Voertuiggegevens\n----------------\n"));
        assert!(text.contains("Merk              Volkswagen"));
        assert!(text.contains("Secundaire kleur  —"));
        assert!(text.contains("APK Keuringen"));
        assert!(text.contains("Vervaldatum    01-01-2025"));
        assert!(text.contains("    - Olie lekkage"));
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn test_data_without_section_is_not_blank() {
        let data = VehicleData {
            emissions: Some(Record::new().with("uitlaatemissieniveau", "EURO 6")),
            wltp: Some(Record::new().with("wltp_co2", "120")),
            ..Default::default()
        };

        let text = render_lookup("AB-12-CD", Some(&data));
        assert_eq!(
            text,
            "Overige gegevens (emissions, wltp): gebruik --json om ze te tonen"
        );
    }

    #[test]
    fn test_render_json() {
        assert_eq!(render_json(None).unwrap(), "null");

        let data = VehicleData {
            base: Some(Record::new().with("merk", "Fiat")),
            ..Default::default()
        };
        let value: serde_json::Value =
            serde_json::from_str(&render_json(Some(&data)).unwrap()).unwrap();
        assert_eq!(value["base"]["merk"], "Fiat");
        assert!(value["fuel"].is_null());
        assert_eq!(value["apk"], serde_json::json!([]));
        assert_eq!(value["defects"], serde_json::json!({}));
    }
}
