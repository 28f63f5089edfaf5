use anyhow::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::endpoints::Endpoints;
use crate::fetch::{BasicClient, HttpClient, fetch_json};
use crate::record::{Defect, Record};
use crate::services::vehicle_api::VehicleApi;
use crate::vehicle::Category;

/// [`VehicleApi`] backed by the RDW open-data JSON endpoints.
pub struct RdwClient<C = BasicClient> {
    http: C,
    endpoints: Endpoints,
}

impl RdwClient {
    /// A client using a fresh [`BasicClient`].
    pub fn new(endpoints: Endpoints) -> Result<Self> {
        Ok(Self::with_http(BasicClient::new()?, endpoints))
    }
}

impl<C: HttpClient> RdwClient<C> {
    pub fn with_http(http: C, endpoints: Endpoints) -> Self {
        Self { http, endpoints }
    }
}

#[async_trait]
impl<C: HttpClient> VehicleApi for RdwClient<C> {
    async fn category_rows(&self, category: Category, plate: &str) -> Result<Vec<Record>> {
        let url = self.endpoints.category_url(category, plate)?;
        let body: Value = fetch_json(&self.http, &url).await?;
        let rows: Vec<Record> = rows_from(body, &url);
        debug!(%category, rows = rows.len(), "Category fetched");
        Ok(rows)
    }

    async fn defects(&self, report_number: &str) -> Result<Vec<Defect>> {
        let url = self.endpoints.defects_url(report_number);
        let body: Value = fetch_json(&self.http, &url).await?;
        let defects: Vec<Defect> = rows_from(body, &url);
        debug!(report_number, defects = defects.len(), "Defects fetched");
        Ok(defects)
    }
}

/// Decodes a list body row by row.
///
/// A body that is not a list yields no rows; rows of the wrong shape are
/// skipped. Both are logged, neither is an error.
fn rows_from<T: DeserializeOwned>(body: Value, url: &str) -> Vec<T> {
    let Value::Array(items) = body else {
        warn!(url, "Response is not a list, treating as empty");
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(row) => Some(row),
            Err(e) => {
                warn!(url, error = %e, "Skipping malformed row");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_list_body_is_empty() {
        let rows: Vec<Record> = rows_from(json!({}), "http://x");
        assert!(rows.is_empty());

        let rows: Vec<Record> = rows_from(json!({"error": true, "message": "boom"}), "http://x");
        assert!(rows.is_empty());
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let rows: Vec<Record> = rows_from(json!([1, {"merk": "Fiat"}, "x"]), "http://x");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text("merk").as_deref(), Some("Fiat"));
    }

    #[test]
    fn test_defect_rows_with_numbers() {
        let defects: Vec<Defect> =
            rows_from(json!([{"omschrijving": "Olie lekkage", "soort": 3}]), "http://x");
        assert_eq!(defects.len(), 1);
        assert_eq!(defects[0].kind.as_deref(), Some("3"));
    }
}
