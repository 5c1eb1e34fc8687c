//! Product catalog endpoints: listing, CRUD, favorites, images.

use crate::client::{ApiClient, Auth};
use crate::error::ApiError;
use crate::models::{FavoriteToggle, NewProduct, Page, Product, ProductImage, ProductUpdate};
use crate::query::Params;
use serde_json::json;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ProductSort {
    Price,
    CreatedAt,
    FavoriteCount,
}

impl ProductSort {
    fn as_str(self) -> &'static str {
        match self {
            ProductSort::Price => "price",
            ProductSort::CreatedAt => "createdAt",
            ProductSort::FavoriteCount => "favoriteCount",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Optional listing filters; unset fields are omitted from the query.
#[derive(Clone, Debug, Default)]
pub struct ProductFilters {
    pub category_id: Option<i64>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub condition: Option<String>,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub sort_by: Option<ProductSort>,
    pub sort_order: Option<SortOrder>,
}

impl ProductFilters {
    fn to_path(&self) -> String {
        let mut p = Params::new();
        p.push_opt("categoryId", self.category_id);
        p.push_opt("minPrice", self.min_price);
        p.push_opt("maxPrice", self.max_price);
        p.push_opt("condition", self.condition.as_deref());
        p.push_opt("brand", self.brand.as_deref());
        p.push_opt("size", self.size.as_deref());
        p.push_opt("search", self.search.as_deref());
        p.push_opt("page", self.page);
        p.push_opt("size", self.page_size);
        p.push_opt("sortBy", self.sort_by.map(ProductSort::as_str));
        p.push_opt("sortOrder", self.sort_order.map(SortOrder::as_str));
        p.append_to("/products")
    }
}

pub struct ProductsApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn products(&self) -> ProductsApi<'_> {
        ProductsApi { client: self }
    }
}

impl ProductsApi<'_> {
    /// Browse the catalog. Anonymous endpoint.
    pub async fn list(&self, filters: &ProductFilters) -> Result<Page<Product>, ApiError> {
        self.client.get(&filters.to_path(), Auth::Public).await
    }

    pub async fn get(&self, id: i64) -> Result<Product, ApiError> {
        self.client.get(&format!("/products/{id}"), Auth::Public).await
    }

    pub async fn create(&self, product: &NewProduct) -> Result<Product, ApiError> {
        self.client.post("/products", product, Auth::Required).await
    }

    pub async fn update(&self, id: i64, update: &ProductUpdate) -> Result<Product, ApiError> {
        self.client
            .put(&format!("/products/{id}"), update, Auth::Required)
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .client
            .delete(&format!("/products/{id}"), Auth::Required)
            .await?;
        Ok(())
    }

    /// Add or remove the product from the signed-in user's favorites.
    pub async fn toggle_favorite(&self, id: i64) -> Result<FavoriteToggle, ApiError> {
        self.client
            .post(&format!("/products/{id}/favorite"), &json!({}), Auth::Required)
            .await
    }

    pub async fn favorites(&self) -> Result<Vec<Product>, ApiError> {
        self.client.get("/products/favorites", Auth::Required).await
    }

    pub async fn my_products(&self) -> Result<Vec<Product>, ApiError> {
        self.client.get("/products/my-products", Auth::Required).await
    }

    /// Flip a product between active and inactive.
    pub async fn toggle_status(&self, id: i64) -> Result<Product, ApiError> {
        self.client
            .post(
                &format!("/products/{id}/toggle-status"),
                &json!({}),
                Auth::Required,
            )
            .await
    }

    pub async fn images(&self, id: i64) -> Result<Vec<ProductImage>, ApiError> {
        self.client
            .get(&format!("/products/{id}/images"), Auth::Public)
            .await
    }

    pub fn image_url(&self, image_id: i64) -> String {
        self.client.config().image_url(image_id)
    }

    /// URL of the product's first image, when it has any.
    pub fn primary_image_url(&self, product: &Product) -> Option<String> {
        product
            .images
            .as_ref()?
            .first()
            .map(|img| self.image_url(img.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_build_the_expected_query() {
        let filters = ProductFilters {
            category_id: Some(4),
            max_price: Some(100.0),
            search: Some("air max".into()),
            page: Some(2),
            page_size: Some(50),
            sort_by: Some(ProductSort::Price),
            sort_order: Some(SortOrder::Desc),
            ..Default::default()
        };
        assert_eq!(
            filters.to_path(),
            "/products?categoryId=4&maxPrice=100&search=air%20max&page=2&size=50&sortBy=price&sortOrder=desc"
        );
    }

    #[test]
    fn default_filters_add_no_query() {
        assert_eq!(ProductFilters::default().to_path(), "/products");
    }
}
