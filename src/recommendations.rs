//! Server-computed product recommendations. The client only selects the
//! strategy and, for boosted feeds, splits out which placements were paid.

use crate::client::{ApiClient, Auth};
use crate::error::ApiError;
use crate::models::{
    BoostedRecommendations, Product, RecommendationKind, RecommendationMetrics,
};
use crate::query::Params;
use serde::Deserialize;

pub const DEFAULT_LIMIT: u32 = 10;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BoostedEnvelope {
    #[serde(default)]
    recommendations: Vec<Product>,
    #[serde(default)]
    metrics: Option<RecommendationMetrics>,
}

pub struct RecommendationsApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn recommendations(&self) -> RecommendationsApi<'_> {
        RecommendationsApi { client: self }
    }
}

impl RecommendationsApi<'_> {
    pub async fn content_based(&self, user_id: i64, limit: u32) -> Result<Vec<Product>, ApiError> {
        let mut p = Params::new();
        p.push("limit", limit);
        self.client
            .get(
                &p.append_to(&format!("/recommendations/content-based/{user_id}")),
                Auth::Required,
            )
            .await
    }

    pub async fn collaborative(&self, user_id: i64, limit: u32) -> Result<Vec<Product>, ApiError> {
        let mut p = Params::new();
        p.push("limit", limit);
        self.client
            .get(
                &p.append_to(&format!("/recommendations/collaborative/{user_id}")),
                Auth::Required,
            )
            .await
    }

    pub async fn hybrid(&self, user_id: i64, limit: u32) -> Result<Vec<Product>, ApiError> {
        let mut p = Params::new();
        p.push("limit", limit);
        self.client
            .get(
                &p.append_to(&format!("/recommendations/hybrid/{user_id}")),
                Auth::Required,
            )
            .await
    }

    /// Recommendations for the signed-in user.
    pub async fn for_me(
        &self,
        limit: u32,
        kind: RecommendationKind,
    ) -> Result<Vec<Product>, ApiError> {
        let mut p = Params::new();
        p.push("limit", limit);
        p.push("type", kind.as_str());
        self.client
            .get(&p.append_to("/recommendations/for-me"), Auth::Required)
            .await
    }

    /// Recommendations with boost metadata and feed metrics. The boosted
    /// product ids are derived here from the per-product flag.
    pub async fn boosted(&self, limit: u32) -> Result<BoostedRecommendations, ApiError> {
        let mut p = Params::new();
        p.push("limit", limit);
        p.push("includeMetrics", true);
        let envelope: BoostedEnvelope = self
            .client
            .get(&p.append_to("/recommendations/for-me"), Auth::Required)
            .await?;

        let boosted_products: Vec<i64> = envelope
            .recommendations
            .iter()
            .filter(|product| product.is_boosted.unwrap_or(false))
            .map(|product| product.id)
            .collect();

        let metrics = envelope.metrics.unwrap_or_else(|| RecommendationMetrics {
            total_recommendations: envelope.recommendations.len() as i64,
            boosted_count: boosted_products.len() as i64,
            ..Default::default()
        });

        Ok(BoostedRecommendations {
            products: envelope.recommendations,
            boosted_products,
            metrics,
        })
    }
}
