//! Listing reports and the moderation queue around them.

use crate::client::{ApiClient, Auth};
use crate::error::ApiError;
use crate::models::{NewReport, Report, ReportStats, ReportStatus};
use serde_json::json;

pub struct ReportsApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn reports(&self) -> ReportsApi<'_> {
        ReportsApi { client: self }
    }
}

impl ReportsApi<'_> {
    pub async fn create(&self, report: &NewReport) -> Result<Report, ApiError> {
        self.client.post("/reports", report, Auth::Required).await
    }

    /// All reports, for the moderation dashboard.
    pub async fn all(&self) -> Result<Vec<Report>, ApiError> {
        self.client.get("/reports", Auth::Required).await
    }

    pub async fn for_product(&self, product_id: i64) -> Result<Vec<Report>, ApiError> {
        self.client
            .get(&format!("/reports/product/{product_id}"), Auth::Required)
            .await
    }

    pub async fn set_status(&self, report_id: i64, status: ReportStatus) -> Result<Report, ApiError> {
        self.client
            .put(
                &format!("/reports/{report_id}/status"),
                &json!({ "status": status }),
                Auth::Required,
            )
            .await
    }

    pub async fn delete(&self, report_id: i64) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .client
            .delete(&format!("/reports/{report_id}"), Auth::Required)
            .await?;
        Ok(())
    }

    pub async fn stats(&self) -> Result<ReportStats, ApiError> {
        self.client.get("/reports/stats", Auth::Required).await
    }
}
