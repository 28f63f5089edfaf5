//! Collects all datasets for one plate into a [`VehicleData`].

use anyhow::Result;
use futures::future::try_join_all;
use tracing::{error, info, warn};

use crate::record::{Defect, Record};
use crate::services::vehicle_api::VehicleApi;
use crate::vehicle::{Category, VehicleData};

/// What a failed request does to the lookup as a whole.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Any failed request fails the whole lookup.
    #[default]
    AllOrNothing,
    /// A failed category is treated as empty; a failed defect lookup leaves
    /// no entry for that report.
    PerCategory,
}

/// Fetches every category for `plate` and the defects of every inspection.
///
/// Dashes are stripped from `plate` first. The seven category requests run
/// concurrently; defect requests start once the inspection list is known and
/// run concurrently with each other. Single-row categories keep only their
/// first row. There are no retries and no timeout beyond the transport's.
///
/// # Errors
///
/// Under [`FailurePolicy::AllOrNothing`], returns the first request error.
/// Under [`FailurePolicy::PerCategory`], never fails.
#[tracing::instrument(skip(api))]
pub async fn fetch_vehicle_data<A>(api: &A, plate: &str, policy: FailurePolicy) -> Result<VehicleData>
where
    A: VehicleApi + ?Sized,
{
    let plate = plate.replace('-', "");

    let (base, fuel, mileage, apk, specs, emissions, wltp) = tokio::try_join!(
        category_rows(api, Category::Base, &plate, policy),
        category_rows(api, Category::Fuel, &plate, policy),
        category_rows(api, Category::Mileage, &plate, policy),
        category_rows(api, Category::Apk, &plate, policy),
        category_rows(api, Category::Specs, &plate, policy),
        category_rows(api, Category::Emissions, &plate, policy),
        category_rows(api, Category::Wltp, &plate, policy),
    )?;

    let lookups = apk
        .iter()
        .filter_map(Record::report_number)
        .map(|report_number| report_defects(api, report_number, policy));
    let defects = try_join_all(lookups).await?.into_iter().flatten().collect();

    info!(inspections = apk.len(), "Vehicle data collected");

    Ok(VehicleData {
        base: first(base),
        fuel: first(fuel),
        mileage: first(mileage),
        apk,
        defects,
        specs: first(specs),
        emissions: first(emissions),
        wltp: first(wltp),
    })
}

/// Like [`fetch_vehicle_data`], but logs a failure and returns `None`.
///
/// Callers show the same "no data" message for `None` and for an empty
/// aggregate.
pub async fn lookup<A>(api: &A, plate: &str, policy: FailurePolicy) -> Option<VehicleData>
where
    A: VehicleApi + ?Sized,
{
    match fetch_vehicle_data(api, plate, policy).await {
        Ok(data) => Some(data),
        Err(e) => {
            error!(plate, error = %format!("{e:#}"), "Vehicle lookup failed");
            None
        }
    }
}

async fn category_rows<A>(
    api: &A,
    category: Category,
    plate: &str,
    policy: FailurePolicy,
) -> Result<Vec<Record>>
where
    A: VehicleApi + ?Sized,
{
    match api.category_rows(category, plate).await {
        Ok(rows) => Ok(rows),
        Err(e) if policy == FailurePolicy::PerCategory => {
            warn!(%category, error = %e, "Category fetch failed, treating as empty");
            Ok(Vec::new())
        }
        Err(e) => Err(e.context(format!("fetching {category} failed"))),
    }
}

async fn report_defects<A>(
    api: &A,
    report_number: String,
    policy: FailurePolicy,
) -> Result<Option<(String, Vec<Defect>)>>
where
    A: VehicleApi + ?Sized,
{
    match api.defects(&report_number).await {
        Ok(defects) => Ok(Some((report_number, defects))),
        Err(e) if policy == FailurePolicy::PerCategory => {
            warn!(report_number = %report_number, error = %e, "Defect fetch failed, skipping report");
            Ok(None)
        }
        Err(e) => Err(e.context(format!("fetching defects for {report_number} failed"))),
    }
}

fn first(rows: Vec<Record>) -> Option<Record> {
    rows.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeApi {
        rows: HashMap<Category, Vec<Record>>,
        defects: HashMap<String, Vec<Defect>>,
        failing: Vec<Category>,
        failing_reports: Vec<String>,
        requests: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl VehicleApi for FakeApi {
        async fn category_rows(&self, category: Category, plate: &str) -> Result<Vec<Record>> {
            self.requests.lock().unwrap().push(format!("{category}:{plate}"));
            if self.failing.contains(&category) {
                bail!("connection refused");
            }
            Ok(self.rows.get(&category).cloned().unwrap_or_default())
        }

        async fn defects(&self, report_number: &str) -> Result<Vec<Defect>> {
            self.requests.lock().unwrap().push(format!("defects:{report_number}"));
            if self.failing_reports.iter().any(|r| r == report_number) {
                bail!("connection reset");
            }
            Ok(self.defects.get(report_number).cloned().unwrap_or_default())
        }
    }

    fn leak() -> Defect {
        Defect {
            description: Some("Olie lekkage".into()),
            kind: Some("lichte gebrek".into()),
            location: None,
        }
    }

    #[tokio::test]
    async fn test_plate_dashes_stripped() {
        let api = FakeApi::default();
        fetch_vehicle_data(&api, "AB-12-CD", FailurePolicy::AllOrNothing)
            .await
            .unwrap();

        let requests = api.requests.lock().unwrap();
        assert_eq!(requests.len(), 7);
        assert!(requests.iter().all(|r| r.ends_with(":AB12CD")));
    }

    #[tokio::test]
    async fn test_first_row_only() {
        let mut api = FakeApi::default();
        api.rows.insert(
            Category::Base,
            vec![
                Record::new().with("merk", "Volkswagen"),
                Record::new().with("merk", "Audi"),
            ],
        );

        let data = fetch_vehicle_data(&api, "AB12CD", FailurePolicy::AllOrNothing)
            .await
            .unwrap();
        assert_eq!(data.base.unwrap().text("merk").as_deref(), Some("Volkswagen"));
        assert!(data.fuel.is_none());
    }

    #[tokio::test]
    async fn test_defects_keyed_by_report_number() {
        let mut api = FakeApi::default();
        api.rows.insert(
            Category::Apk,
            vec![
                Record::new()
                    .with("rapportnummer", "123")
                    .with("vervaldatum_keuring", "20250101"),
                Record::new().with("vervaldatum_keuring", "20240101"),
                Record::new().with("rapportnummer", ""),
            ],
        );
        api.defects.insert("123".into(), vec![leak()]);

        let data = fetch_vehicle_data(&api, "AB12CD", FailurePolicy::AllOrNothing)
            .await
            .unwrap();

        assert_eq!(data.apk.len(), 3);
        assert_eq!(data.defects.len(), 1);
        assert_eq!(data.defects["123"], vec![leak()]);

        let defect_requests: Vec<_> = api
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.starts_with("defects:"))
            .cloned()
            .collect();
        assert_eq!(defect_requests, vec!["defects:123"]);
    }

    #[tokio::test]
    async fn test_one_failure_fails_everything() {
        let api = FakeApi {
            failing: vec![Category::Fuel],
            ..Default::default()
        };

        let err = fetch_vehicle_data(&api, "AB12CD", FailurePolicy::AllOrNothing)
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("fuel"));
        assert!(lookup(&api, "AB12CD", FailurePolicy::AllOrNothing).await.is_none());
    }

    #[tokio::test]
    async fn test_defect_failure_fails_everything() {
        let mut api = FakeApi {
            failing_reports: vec!["123".into()],
            ..Default::default()
        };
        api.rows
            .insert(Category::Apk, vec![Record::new().with("rapportnummer", "123")]);

        assert!(
            fetch_vehicle_data(&api, "AB12CD", FailurePolicy::AllOrNothing)
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_per_category_degrades() {
        let mut api = FakeApi {
            failing: vec![Category::Fuel],
            failing_reports: vec!["1".into()],
            ..Default::default()
        };
        api.rows
            .insert(Category::Base, vec![Record::new().with("merk", "Fiat")]);
        api.rows.insert(
            Category::Apk,
            vec![
                Record::new().with("rapportnummer", "1"),
                Record::new().with("rapportnummer", "2"),
            ],
        );
        api.defects.insert("2".into(), vec![leak()]);

        let data = fetch_vehicle_data(&api, "AB12CD", FailurePolicy::PerCategory)
            .await
            .unwrap();
        assert!(data.base.is_some());
        assert!(data.fuel.is_none());
        assert_eq!(data.apk.len(), 2);
        assert!(!data.defects.contains_key("1"));
        assert_eq!(data.defects["2"].len(), 1);
    }
}
