//! Display model for a lookup: labelled sections plus the inspection history.

use serde::Serialize;

use crate::date::{UNKNOWN, format_date};
use crate::projector::{FieldLabel, FieldRow, project_fields};
use crate::record::Record;
use crate::vehicle::{Category, VehicleData};

/// A titled group of fields taken from one category record.
pub struct SectionDef {
    pub title: &'static str,
    pub category: Category,
    pub fields: &'static [FieldLabel],
}

/// The field sections, in display order.
pub static SECTIONS: &[SectionDef] = &[
    SectionDef {
        title: "Voertuiggegevens",
        category: Category::Base,
        fields: &[
            ("kenteken", "Kenteken"),
            ("merk", "Merk"),
            ("handelsbenaming", "Model"),
            ("voertuigsoort", "Voertuigsoort"),
            ("inrichting", "Carrosserievorm"),
            ("eerste_kleur", "Kleur"),
            ("tweede_kleur", "Secundaire kleur"),
            ("aantal_deuren", "Aantal deuren"),
            ("aantal_wielen", "Aantal wielen"),
            ("aantal_cilinders", "Cilinders"),
        ],
    },
    SectionDef {
        title: "Registratie & APK",
        category: Category::Base,
        fields: &[
            ("datum_eerste_toelating", "Datum eerste toelating"),
            ("datum_tenaamstelling", "Datum tenaamstelling"),
            ("vervaldatum_apk", "APK vervaldatum"),
            ("wam_verzekerd", "WAM verzekerd"),
            ("export_indicator", "Geëxporteerd"),
            ("openstaande_terugroepactie_indicator", "Terugroepactie?"),
            ("taxi_indicator", "Taxi?"),
            ("tenaamstellen_mogelijk", "Tenaamstellen mogelijk"),
        ],
    },
    SectionDef {
        title: "Gewicht & Afmetingen",
        category: Category::Base,
        fields: &[
            ("massa_ledig_voertuig", "Leeggewicht"),
            ("massa_rijklaar", "Rijklaar gewicht"),
            ("toegestane_maximum_massa_voertuig", "Toegestane massa"),
            ("maximum_massa_samenstelling", "Max. massa samenstelling"),
            ("maximum_massa_trekken_ongeremd", "Trekken ongeremd"),
            ("maximum_trekken_massa_geremd", "Trekken geremd"),
            ("wielbasis", "Wielbasis (mm)"),
        ],
    },
    SectionDef {
        title: "Motor & Emissie",
        category: Category::Fuel,
        fields: &[
            ("brandstof_omschrijving", "Brandstof"),
            ("uitlaatemissieniveau", "Emissieniveau"),
            ("nettomaximumvermogen", "Vermogen (kW)"),
            ("toerental_geluidsniveau", "Toerental bij geluidsmeting"),
            ("geluidsniveau_stationair", "Stationair geluidsniveau (dB)"),
            ("emissiecode_omschrijving", "Emissiecode"),
        ],
    },
    SectionDef {
        title: "Carrosserie Info",
        category: Category::Specs,
        fields: &[
            ("type_carrosserie_europese_omschrijving", "Carrosserietype"),
            ("carrosserietype", "Typecode"),
        ],
    },
];

pub const INSPECTIONS_TITLE: &str = "APK Keuringen";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub title: String,
    pub rows: Vec<FieldRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectionView {
    pub rows: Vec<FieldRow>,
    /// One line per defect, e.g. `Olie lekkage (lichte gebrek)`.
    pub defects: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub sections: Vec<Section>,
    pub inspections: Vec<InspectionView>,
    /// Categories with data that no section displays.
    pub unrendered: Vec<Category>,
}

impl Report {
    /// Builds the report for a non-empty aggregate, or `None` when there is
    /// nothing to show.
    pub fn build(data: &VehicleData) -> Option<Self> {
        if data.is_empty() {
            return None;
        }

        let mut shown = Vec::new();
        let sections = SECTIONS
            .iter()
            .filter_map(|def| {
                let rows = project_fields(data.record(def.category), def.fields)?;
                shown.push(def.category);
                Some(Section {
                    title: def.title.to_string(),
                    rows,
                })
            })
            .collect();

        let unrendered = Category::ALL
            .into_iter()
            .filter(|category| !shown.contains(category))
            .filter(|&category| data.record(category).is_some_and(|r| !r.is_empty()))
            .collect();

        let inspections = data
            .apk
            .iter()
            .map(|inspection| InspectionView {
                rows: inspection_rows(inspection),
                defects: data
                    .defects_for(inspection)
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            })
            .collect();

        Some(Self {
            sections,
            inspections,
            unrendered,
        })
    }

    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.title == title)
    }
}

/// Inspection rows are always shown, with a placeholder for missing values.
fn inspection_rows(inspection: &Record) -> Vec<FieldRow> {
    let text = |field: &str| inspection.text(field).unwrap_or_default();
    vec![
        FieldRow::new("Vervaldatum", format_date(&text("vervaldatum_keuring"))),
        FieldRow::new("Resultaat", or_unknown(text("keuringsresultaat"))),
        FieldRow::new("Soort keuring", or_unknown(text("soort_keuring"))),
    ]
}

pub(crate) fn or_unknown(value: String) -> String {
    if value.is_empty() {
        UNKNOWN.to_string()
    } else {
        value
    }
}
