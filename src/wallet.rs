//! Seller wallet: balance, operation history, stats and transfers.

use crate::client::{ApiClient, Auth};
use crate::error::ApiError;
use crate::models::{OperationKind, WalletBalance, WalletOperation, WalletStats};
use crate::query::Params;
use serde_json::{json, Value};

pub struct WalletApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn wallet(&self) -> WalletApi<'_> {
        WalletApi { client: self }
    }
}

impl WalletApi<'_> {
    pub async fn balance(&self, user_id: &str) -> Result<WalletBalance, ApiError> {
        self.client
            .get(&format!("/users/{user_id}/wallet/balance"), Auth::Required)
            .await
    }

    /// Operation history, optionally restricted to one kind.
    pub async fn operations(
        &self,
        user_id: &str,
        filter: Option<OperationKind>,
    ) -> Result<Vec<WalletOperation>, ApiError> {
        let mut p = Params::new();
        p.push_opt("type", filter.map(OperationKind::as_str));
        self.client
            .get(
                &p.append_to(&format!("/users/{user_id}/wallet/operations")),
                Auth::Required,
            )
            .await
    }

    pub async fn stats(&self, user_id: &str) -> Result<WalletStats, ApiError> {
        self.client
            .get(&format!("/users/{user_id}/wallet/stats"), Auth::Required)
            .await
    }

    /// Move funds out of the wallet to an external destination.
    pub async fn transfer(
        &self,
        user_id: &str,
        amount: f64,
        destination: &str,
    ) -> Result<(), ApiError> {
        let _: Value = self
            .client
            .post(
                &format!("/users/{user_id}/wallet/transfer"),
                &json!({ "amount": amount, "destination": destination }),
                Auth::Required,
            )
            .await?;
        Ok(())
    }

    /// Raw sales history rows; the shape is owned by the backend.
    pub async fn sales_history(&self, user_id: &str) -> Result<Vec<Value>, ApiError> {
        self.client
            .get(&format!("/users/{user_id}/sales"), Auth::Required)
            .await
    }
}
