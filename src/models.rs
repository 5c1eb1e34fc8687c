//! Wire models for the Souq REST API.
//!
//! Field names follow the backend's camelCase JSON. Listing endpoints that
//! may answer with either a bare array or a paginated envelope are decoded
//! through [`MaybePaged`]; any other shape is a decoding error rather than
//! a silent guess.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// --- Pagination -------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: i64,
    pub total_pages: i64,
    #[serde(default)]
    pub current_page: i64,
    #[serde(default)]
    pub size: i64,
}

/// Either a paginated envelope or a bare array of rows.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MaybePaged<T> {
    Page(Page<T>),
    Items(Vec<T>),
}

impl<T> MaybePaged<T> {
    /// Normalize to an envelope; a bare array becomes its own single page.
    pub fn into_page(self) -> Page<T> {
        match self {
            MaybePaged::Page(page) => page,
            MaybePaged::Items(items) => Page {
                total_elements: items.len() as i64,
                total_pages: 1,
                current_page: 0,
                size: items.len() as i64,
                content: items,
            },
        }
    }
}

// --- Auth -------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub refresh_token: String,
    /// Access token lifetime in milliseconds.
    #[serde(default)]
    pub expires_in: Option<i64>,
    pub user: AuthUser,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: i64,
    pub role: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

// --- Products ---------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub price_with_fees: Option<f64>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    pub condition: String,
    #[serde(default)]
    pub shipping_info: Option<String>,
    pub status: String,
    #[serde(default)]
    pub favorite_count: i64,
    #[serde(default)]
    pub view_count: i64,
    pub created_at: String,
    pub updated_at: String,
    pub seller_id: i64,
    pub category_id: i64,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    #[serde(default)]
    pub seller: Option<UserRef>,
    #[serde(default)]
    pub images: Option<Vec<ProductImage>>,
    #[serde(default)]
    pub is_boosted: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRef {
    pub id: i64,
    pub label: String,
    pub category_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub id: i64,
    pub file_name: String,
    pub content_type: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    pub condition: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_info: Option<String>,
    pub category_id: i64,
    pub image_ids: Vec<i64>,
}

/// Partial product update; only the set fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_ids: Option<Vec<i64>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteToggle {
    pub is_favorite: bool,
    pub favorite_count: i64,
}

// --- Categories -------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub label: String,
    pub key: String,
    #[serde(default)]
    pub icon_name: Option<String>,
    #[serde(default)]
    pub badge_text: Option<String>,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub children: Option<Vec<Category>>,
    pub active: bool,
    #[serde(default)]
    pub sort_order: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub label: String,
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i64>,
}

/// One entry of a bulk reorder request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderEntry {
    pub id: i64,
    pub sort_order: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
}

// --- Users and moderation ----------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    User,
    Admin,
    Moderator,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::User => "USER",
            UserRole::Admin => "ADMIN",
            UserRole::Moderator => "MODERATOR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserStatus {
    Active,
    Suspended,
    Banned,
}

impl UserStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            UserStatus::Active => "ACTIVE",
            UserStatus::Suspended => "SUSPENDED",
            UserStatus::Banned => "BANNED",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub created_at: String,
    #[serde(default)]
    pub last_login_at: Option<String>,
    #[serde(default)]
    pub products_count: i64,
    #[serde(default)]
    pub rating: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationAction {
    Suspend,
    Ban,
    Activate,
    Promote,
    Demote,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAction {
    pub action: ModerationAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewModerator {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total: i64,
    pub active: i64,
    pub suspended: i64,
    pub banned: i64,
    #[serde(default)]
    pub by_role: HashMap<String, i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDetail {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub profile_picture_url: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
    pub created_at: String,
    #[serde(default)]
    pub followers_count: i64,
    #[serde(default)]
    pub following_count: i64,
    #[serde(default)]
    pub products_count: i64,
    #[serde(default)]
    pub is_following: bool,
    #[serde(default)]
    pub is_own_profile: bool,
}

/// Partial update of the signed-in user's profile.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

// --- Search -----------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
}

// --- Reports ----------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Reviewed,
    Resolved,
}

impl ReportStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Reviewed => "reviewed",
            ReportStatus::Resolved => "resolved",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReport {
    pub product_id: i64,
    pub user_id: i64,
    pub reasons: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: i64,
    pub product_id: i64,
    pub user_id: i64,
    pub reasons: Vec<String>,
    #[serde(default)]
    pub custom_reason: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: String,
    pub status: ReportStatus,
    #[serde(default)]
    pub product: Option<ReportedProduct>,
    #[serde(default)]
    pub reporter: Option<UserRef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportedProduct {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub seller: UserRef,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportStats {
    pub total: i64,
    pub pending: i64,
    pub reviewed: i64,
    pub resolved: i64,
    #[serde(default)]
    pub by_reason: HashMap<String, i64>,
}

// --- Recommendations ---------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecommendationKind {
    Content,
    Collaborative,
    Hybrid,
}

impl RecommendationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RecommendationKind::Content => "content",
            RecommendationKind::Collaborative => "collaborative",
            RecommendationKind::Hybrid => "hybrid",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationMetrics {
    #[serde(default)]
    pub total_recommendations: i64,
    #[serde(default)]
    pub boosted_count: i64,
    #[serde(default)]
    pub boosted_percentage: f64,
    #[serde(default)]
    pub avg_price: f64,
    #[serde(default)]
    pub avg_favorites: f64,
    #[serde(default)]
    pub unique_brands: i64,
    #[serde(default)]
    pub diversity: f64,
}

/// Recommendations plus which of them are boosted placements.
#[derive(Debug, Clone)]
pub struct BoostedRecommendations {
    pub products: Vec<Product>,
    pub boosted_products: Vec<i64>,
    pub metrics: RecommendationMetrics,
}

// --- Wallet -----------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletBalance {
    pub balance: f64,
    #[serde(default)]
    pub upcoming_amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Earning,
    Expense,
    Transfer,
}

impl OperationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::Earning => "earning",
            OperationKind::Expense => "expense",
            OperationKind::Transfer => "transfer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationStatus {
    Completed,
    Pending,
    Cancelled,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletOperation {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: OperationKind,
    pub amount: f64,
    pub description: String,
    pub date: String,
    pub status: OperationStatus,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletStats {
    pub total_earnings: f64,
    pub total_expenses: f64,
    pub total_transfers: f64,
    pub monthly_earnings: f64,
    pub monthly_expenses: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product_json() -> serde_json::Value {
        json!({
            "id": 1,
            "title": "iPhone 13 Pro",
            "description": "Lightly used",
            "price": 650.0,
            "condition": "good",
            "status": "ACTIVE",
            "favoriteCount": 3,
            "viewCount": 57,
            "createdAt": "2025-05-01T10:00:00Z",
            "updatedAt": "2025-05-02T10:00:00Z",
            "sellerId": 12,
            "categoryId": 4
        })
    }

    #[test]
    fn product_decodes_without_optional_fields() {
        let p: Product = serde_json::from_value(product_json()).unwrap();
        assert_eq!(p.id, 1);
        assert_eq!(p.favorite_count, 3);
        assert!(p.images.is_none());
        assert!(p.is_boosted.is_none());
    }

    #[test]
    fn maybe_paged_accepts_envelope_and_bare_array() {
        let envelope = json!({
            "content": [product_json()],
            "totalElements": 1,
            "totalPages": 1,
            "currentPage": 0,
            "size": 20
        });
        let page = serde_json::from_value::<MaybePaged<Product>>(envelope)
            .unwrap()
            .into_page();
        assert_eq!(page.total_elements, 1);

        let bare = json!([product_json(), product_json()]);
        let page = serde_json::from_value::<MaybePaged<Product>>(bare)
            .unwrap()
            .into_page();
        assert_eq!(page.content.len(), 2);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn maybe_paged_rejects_unexpected_shapes() {
        assert!(serde_json::from_value::<MaybePaged<Product>>(json!(42)).is_err());
        assert!(serde_json::from_value::<MaybePaged<Product>>(json!({"rows": []})).is_err());
    }

    #[test]
    fn wallet_operation_maps_type_field() {
        let op: WalletOperation = serde_json::from_value(json!({
            "id": "op-1",
            "type": "earning",
            "amount": 150.0,
            "description": "Sale",
            "date": "2025-06-01T00:00:00Z",
            "status": "completed"
        }))
        .unwrap();
        assert_eq!(op.kind, OperationKind::Earning);
        assert_eq!(op.status, OperationStatus::Completed);
    }

    #[test]
    fn moderation_enums_use_backend_casing() {
        assert_eq!(
            serde_json::to_value(UserRole::Moderator).unwrap(),
            json!("MODERATOR")
        );
        assert_eq!(
            serde_json::to_value(ModerationAction::Suspend).unwrap(),
            json!("suspend")
        );
        assert_eq!(
            serde_json::from_value::<ReportStatus>(json!("reviewed")).unwrap(),
            ReportStatus::Reviewed
        );
    }

    #[test]
    fn partial_updates_skip_unset_fields() {
        let update = ProductUpdate {
            price: Some(99.0),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({"price": 99.0}));
    }
}
