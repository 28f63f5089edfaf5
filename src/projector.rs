//! Projection of raw records onto labelled display rows.

use serde::Serialize;

use crate::date::{format_date, is_compact_date};
use crate::record::{Record, Scalar};

/// A `field name -> label` pair. Field maps are ordered slices of these.
pub type FieldLabel = (&'static str, &'static str);

/// One labelled value, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldRow {
    pub label: String,
    pub value: String,
}

impl FieldRow {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Projects `record` onto `fields`, in field-map order.
///
/// Fields that are missing or null in the record are skipped. Text values of
/// exactly eight digits are treated as compact dates. Returns `None` when
/// there is nothing to show, so callers can drop the whole section.
pub fn project_fields(record: Option<&Record>, fields: &[FieldLabel]) -> Option<Vec<FieldRow>> {
    let record = record?;

    let rows: Vec<FieldRow> = fields
        .iter()
        .filter_map(|&(field, label)| {
            record
                .get(field)
                .map(|value| FieldRow::new(label, display_value(value)))
        })
        .collect();

    (!rows.is_empty()).then_some(rows)
}

fn display_value(value: &Scalar) -> String {
    match value {
        Scalar::Text(s) if is_compact_date(s) => format_date(s),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: &[FieldLabel] = &[
        ("kenteken", "Kenteken"),
        ("merk", "Merk"),
        ("handelsbenaming", "Model"),
        ("vervaldatum_apk", "APK vervaldatum"),
    ];

    #[test]
    fn test_rows_follow_field_map_order() {
        let record = Record::new().with("merk", "Volkswagen").with("kenteken", "AB12CD");
        let rows = project_fields(Some(&record), FIELDS).unwrap();
        assert_eq!(
            rows,
            vec![
                FieldRow::new("Kenteken", "AB12CD"),
                FieldRow::new("Merk", "Volkswagen"),
            ]
        );
    }

    #[test]
    fn test_compact_dates_are_formatted() {
        let record = Record::new().with("vervaldatum_apk", "20250101");
        let rows = project_fields(Some(&record), FIELDS).unwrap();
        assert_eq!(rows, vec![FieldRow::new("APK vervaldatum", "01-01-2025")]);
    }

    #[test]
    fn test_numbers_are_not_dates() {
        let record: Record = serde_json::from_str(r#"{"merk":20250101}"#).unwrap();
        let rows = project_fields(Some(&record), FIELDS).unwrap();
        assert_eq!(rows, vec![FieldRow::new("Merk", "20250101")]);
    }

    #[test]
    fn test_null_fields_are_skipped() {
        let record: Record =
            serde_json::from_str(r#"{"kenteken":"AB12CD","merk":null}"#).unwrap();
        let rows = project_fields(Some(&record), FIELDS).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows.iter().all(|r| r.label != "Merk"));
    }

    #[test]
    fn test_empty_string_is_kept() {
        let record = Record::new().with("merk", "");
        let rows = project_fields(Some(&record), FIELDS).unwrap();
        assert_eq!(rows, vec![FieldRow::new("Merk", "")]);
    }

    #[test]
    fn test_nothing_to_render() {
        assert!(project_fields(None, FIELDS).is_none());
        assert!(project_fields(Some(&Record::new()), FIELDS).is_none());

        let unrelated = Record::new().with("brandstof_omschrijving", "Benzine");
        assert!(project_fields(Some(&unrelated), FIELDS).is_none());
    }
}
