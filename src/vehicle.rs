//! The per-plate aggregate of all datasets.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::record::{Defect, Record};

/// The seven datasets looked up for every plate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Base,
    Fuel,
    Mileage,
    /// Periodic inspections (APK).
    Apk,
    Specs,
    Emissions,
    Wltp,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Base,
        Category::Fuel,
        Category::Mileage,
        Category::Apk,
        Category::Specs,
        Category::Emissions,
        Category::Wltp,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Base => "base",
            Category::Fuel => "fuel",
            Category::Mileage => "mileage",
            Category::Apk => "apk",
            Category::Specs => "specs",
            Category::Emissions => "emissions",
            Category::Wltp => "wltp",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything known about one plate.
///
/// Built once per lookup and replaced wholesale by the next one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VehicleData {
    pub base: Option<Record>,
    pub fuel: Option<Record>,
    pub mileage: Option<Record>,
    /// Inspections in source order.
    pub apk: Vec<Record>,
    /// Defects keyed by inspection report number.
    pub defects: BTreeMap<String, Vec<Defect>>,
    pub specs: Option<Record>,
    pub emissions: Option<Record>,
    pub wltp: Option<Record>,
}

impl VehicleData {
    /// The single-row record for `category`. Always `None` for [`Category::Apk`].
    pub fn record(&self, category: Category) -> Option<&Record> {
        match category {
            Category::Base => self.base.as_ref(),
            Category::Fuel => self.fuel.as_ref(),
            Category::Mileage => self.mileage.as_ref(),
            Category::Apk => None,
            Category::Specs => self.specs.as_ref(),
            Category::Emissions => self.emissions.as_ref(),
            Category::Wltp => self.wltp.as_ref(),
        }
    }

    /// Defects recorded for `inspection`, if it has a report number.
    pub fn defects_for(&self, inspection: &Record) -> &[Defect] {
        inspection
            .report_number()
            .and_then(|nr| self.defects.get(&nr))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// `true` when every category is absent or has no fields and there are
    /// no inspections. Defects are not considered.
    pub fn is_empty(&self) -> bool {
        let records_empty = Category::ALL
            .iter()
            .filter_map(|&category| self.record(category))
            .all(Record::is_empty);

        records_empty && self.apk.is_empty()
    }
}
