//! Raw rows as returned by the open-data API.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single non-null field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    /// Nested arrays/objects; the datasets are flat so this is rare.
    Other(serde_json::Value),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Number(n) => write!(f, "{n}"),
            Scalar::Text(s) => f.write_str(s),
            Scalar::Other(v) => write!(f, "{v}"),
        }
    }
}

/// One flat row of a dataset.
///
/// A key that is missing from the row and a key explicitly set to `null` are
/// both "absent" as far as [`Record::get`] is concerned; the `Option` keeps
/// the distinction for serialisation only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<String, Option<Scalar>>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of `field`, or `None` when it is missing or null.
    pub fn get(&self, field: &str) -> Option<&Scalar> {
        self.0.get(field).and_then(Option::as_ref)
    }

    /// Returns `field` as display text, or `None` when absent.
    pub fn text(&self, field: &str) -> Option<String> {
        self.get(field).map(Scalar::to_string)
    }

    /// Number of keys, including null ones.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Option<Scalar>) {
        self.0.insert(field.into(), value);
    }

    /// Builder-style helper for a text field.
    pub fn with(mut self, field: &str, value: &str) -> Self {
        self.insert(field, Some(Scalar::Text(value.to_string())));
        self
    }

    /// The inspection report number, if present and non-empty.
    pub fn report_number(&self) -> Option<String> {
        self.text("rapportnummer").filter(|nr| !nr.is_empty())
    }
}

/// A deficiency found during a periodic inspection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Defect {
    #[serde(rename = "omschrijving", default, deserialize_with = "scalar_text")]
    pub description: Option<String>,
    #[serde(rename = "soort", default, deserialize_with = "scalar_text")]
    pub kind: Option<String>,
    #[serde(rename = "locatie", default, deserialize_with = "scalar_text")]
    pub location: Option<String>,
}

/// Accepts any scalar (or null) and keeps its display text.
fn scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Scalar> = Option::deserialize(deserializer)?;
    Ok(value.map(|v| v.to_string()))
}

impl fmt::Display for Defect {
    /// `description (kind, location)`, skipping whichever parts are missing.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = self
            .description
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or("Onbekend gebrek");
        f.write_str(description)?;

        let details: Vec<&str> = [self.kind.as_deref(), self.location.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect();
        if !details.is_empty() {
            write!(f, " ({})", details.join(", "))?;
        }
        Ok(())
    }
}
