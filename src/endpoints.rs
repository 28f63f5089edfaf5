//! URL templates for the open-data datasets.
//!
//! Every category has one template containing a `{kenteken}` placeholder;
//! the defects dataset has one containing `{rapportnummer}`. The defaults
//! point at the RDW Socrata API and can be replaced from a JSON file:
//! ```json
//! {
//!   "categories": {
//!     "base": "https://opendata.rdw.nl/resource/m9d7-ebf2.json?kenteken={kenteken}",
//!     "...": "..."
//!   },
//!   "defects": "https://opendata.rdw.nl/resource/hx2c-gt7k.json?rapportnummer={rapportnummer}"
//! }
//! ```

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::vehicle::Category;

pub const DEFAULT_BASE_URL: &str = "https://opendata.rdw.nl";

const PLATE_PLACEHOLDER: &str = "{kenteken}";
const REPORT_PLACEHOLDER: &str = "{rapportnummer}";

/// Socrata dataset id per category.
static DATASETS: &[(Category, &str)] = &[
    (Category::Base, "m9d7-ebf2"),
    (Category::Fuel, "8ys7-d773"),
    (Category::Mileage, "qyyz-sp7a"),
    (Category::Apk, "vkij-7mwc"),
    (Category::Specs, "vezc-m2t6"),
    (Category::Emissions, "j49n-pgkz"),
    (Category::Wltp, "e8ys-bvje"),
];

static DEFECTS_DATASET: &str = "hx2c-gt7k";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    categories: BTreeMap<Category, String>,
    defects: String,
}

impl Endpoints {
    /// The standard datasets under `base_url` (no trailing slash needed).
    pub fn rdw(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');
        let categories = DATASETS
            .iter()
            .map(|&(category, id)| {
                (
                    category,
                    format!("{base_url}/resource/{id}.json?kenteken={PLATE_PLACEHOLDER}"),
                )
            })
            .collect();

        Self {
            categories,
            defects: format!(
                "{base_url}/resource/{DEFECTS_DATASET}.json?rapportnummer={REPORT_PLACEHOLDER}"
            ),
        }
    }

    /// Loads templates from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read endpoints file '{path}'"))?;
        Self::from_json(&content).with_context(|| format!("invalid endpoints file '{path}'"))
    }

    /// Parses templates from JSON, requiring all seven categories.
    pub fn from_json(json: &str) -> Result<Self> {
        let endpoints: Endpoints = serde_json::from_str(json)?;

        let missing: Vec<&str> = Category::ALL
            .iter()
            .filter(|&&category| !endpoints.categories.contains_key(&category))
            .map(|category| category.as_str())
            .collect();
        if !missing.is_empty() {
            bail!("missing templates for: {}", missing.join(", "));
        }

        Ok(endpoints)
    }

    /// URL for `category` with the plate (without dashes) filled in.
    pub fn category_url(&self, category: Category, plate: &str) -> Result<String> {
        let template = self
            .categories
            .get(&category)
            .ok_or_else(|| anyhow::anyhow!("no endpoint configured for '{category}'"))?;
        Ok(fill(template, PLATE_PLACEHOLDER, plate))
    }

    /// URL for the defects of one inspection report.
    pub fn defects_url(&self, report_number: &str) -> String {
        fill(&self.defects, REPORT_PLACEHOLDER, report_number)
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::rdw(DEFAULT_BASE_URL)
    }
}

fn fill(template: &str, placeholder: &str, value: &str) -> String {
    template.replace(placeholder, &urlencoding::encode(value))
}
