//! Product search: full-text, filtered, faceted lookups and suggestions.
//! Every listing comes back as a paginated envelope.

use crate::client::{ApiClient, Auth};
use crate::error::ApiError;
use crate::models::{Page, Product, Suggestion};
use crate::query::Params;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const DEFAULT_SUGGESTION_COUNT: u32 = 5;

/// Advanced search filters; unset fields are omitted.
#[derive(Clone, Debug, Default)]
pub struct SearchFilters {
    pub query: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub category_id: Option<i64>,
    pub condition: Option<String>,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

fn paged(path: &str, page: u32, size: u32) -> String {
    let mut p = Params::new();
    p.push("page", page);
    p.push("size", size);
    p.append_to(path)
}

pub struct SearchApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn search(&self) -> SearchApi<'_> {
        SearchApi { client: self }
    }
}

impl SearchApi<'_> {
    pub async fn products(
        &self,
        query: Option<&str>,
        page: u32,
        size: u32,
    ) -> Result<Page<Product>, ApiError> {
        let mut p = Params::new();
        p.push_opt("query", query);
        p.push("page", page);
        p.push("size", size);
        self.client
            .get(&p.append_to("/search/products"), Auth::Required)
            .await
    }

    pub async fn filtered(
        &self,
        filters: &SearchFilters,
        page: u32,
        size: u32,
    ) -> Result<Page<Product>, ApiError> {
        let mut p = Params::new();
        p.push_opt("query", filters.query.as_deref());
        p.push_opt("minPrice", filters.min_price);
        p.push_opt("maxPrice", filters.max_price);
        p.push_opt("categoryId", filters.category_id);
        p.push_opt("condition", filters.condition.as_deref());
        p.push_opt("brand", filters.brand.as_deref());
        p.push_opt("size", filters.size.as_deref());
        p.push_opt("city", filters.city.as_deref());
        p.push_opt("country", filters.country.as_deref());
        p.push("page", page);
        p.push("size", size);
        self.client
            .get(&p.append_to("/search/products/filtered"), Auth::Required)
            .await
    }

    pub async fn by_category(
        &self,
        category_id: i64,
        page: u32,
        size: u32,
    ) -> Result<Page<Product>, ApiError> {
        self.client
            .get(
                &paged(&format!("/search/products/category/{category_id}"), page, size),
                Auth::Required,
            )
            .await
    }

    pub async fn by_seller(
        &self,
        seller_id: i64,
        page: u32,
        size: u32,
    ) -> Result<Page<Product>, ApiError> {
        self.client
            .get(
                &paged(&format!("/search/products/seller/{seller_id}"), page, size),
                Auth::Required,
            )
            .await
    }

    pub async fn by_city(&self, city: &str, page: u32, size: u32) -> Result<Page<Product>, ApiError> {
        self.client
            .get(
                &paged(
                    &format!("/search/products/city/{}", urlencoding::encode(city)),
                    page,
                    size,
                ),
                Auth::Required,
            )
            .await
    }

    pub async fn by_brand(
        &self,
        brand: &str,
        page: u32,
        size: u32,
    ) -> Result<Page<Product>, ApiError> {
        self.client
            .get(
                &paged(
                    &format!("/search/products/brand/{}", urlencoding::encode(brand)),
                    page,
                    size,
                ),
                Auth::Required,
            )
            .await
    }

    pub async fn by_condition(
        &self,
        condition: &str,
        page: u32,
        size: u32,
    ) -> Result<Page<Product>, ApiError> {
        self.client
            .get(
                &paged(
                    &format!("/search/products/condition/{}", urlencoding::encode(condition)),
                    page,
                    size,
                ),
                Auth::Required,
            )
            .await
    }

    pub async fn by_price_range(
        &self,
        min_price: f64,
        max_price: f64,
        page: u32,
        size: u32,
    ) -> Result<Page<Product>, ApiError> {
        let mut p = Params::new();
        p.push("minPrice", min_price);
        p.push("maxPrice", max_price);
        p.push("page", page);
        p.push("size", size);
        self.client
            .get(&p.append_to("/search/products/price-range"), Auth::Required)
            .await
    }

    pub async fn by_tag(&self, tag: &str, page: u32, size: u32) -> Result<Page<Product>, ApiError> {
        self.client
            .get(
                &paged(
                    &format!("/search/products/tags/{}", urlencoding::encode(tag)),
                    page,
                    size,
                ),
                Auth::Required,
            )
            .await
    }

    /// Autocomplete suggestions for a partial query.
    pub async fn suggestions(&self, query: &str, size: u32) -> Result<Vec<Suggestion>, ApiError> {
        let mut p = Params::new();
        p.push("query", query);
        p.push("size", size);
        self.client
            .get(&p.append_to("/search/suggestions"), Auth::Required)
            .await
    }

    pub async fn popular(&self, page: u32, size: u32) -> Result<Page<Product>, ApiError> {
        self.client
            .get(&paged("/search/products/popular", page, size), Auth::Required)
            .await
    }

    pub async fn recent(&self, page: u32, size: u32) -> Result<Page<Product>, ApiError> {
        self.client
            .get(&paged("/search/products/recent", page, size), Auth::Required)
            .await
    }
}
