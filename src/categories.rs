//! Category endpoints plus the tree helpers the admin screens rely on:
//! slug generation and depth-first flattening.

use crate::client::{ApiClient, Auth};
use crate::error::ApiError;
use crate::models::{Category, CategoryUpdate, NewCategory, ReorderEntry};
use crate::query::Params;
use serde_json::json;

pub struct CategoriesApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn categories(&self) -> CategoriesApi<'_> {
        CategoriesApi { client: self }
    }
}

impl CategoriesApi<'_> {
    pub async fn all(&self) -> Result<Vec<Category>, ApiError> {
        self.client.get("/categories", Auth::Required).await
    }

    /// Active categories as a tree.
    pub async fn tree(&self) -> Result<Vec<Category>, ApiError> {
        self.client.get("/categories/tree", Auth::Required).await
    }

    /// Full tree including inactive categories. Admin only.
    pub async fn full_tree(&self) -> Result<Vec<Category>, ApiError> {
        self.client.get("/categories/tree/all", Auth::Required).await
    }

    pub async fn roots(&self) -> Result<Vec<Category>, ApiError> {
        self.client.get("/categories/root", Auth::Required).await
    }

    pub async fn get(&self, id: i64) -> Result<Category, ApiError> {
        self.client.get(&format!("/categories/{id}"), Auth::Required).await
    }

    pub async fn get_by_key(&self, key: &str) -> Result<Category, ApiError> {
        self.client
            .get(
                &format!("/categories/key/{}", urlencoding::encode(key)),
                Auth::Required,
            )
            .await
    }

    pub async fn create(&self, category: &NewCategory) -> Result<Category, ApiError> {
        self.client.post("/categories", category, Auth::Required).await
    }

    pub async fn update(&self, id: i64, update: &CategoryUpdate) -> Result<Category, ApiError> {
        self.client
            .put(&format!("/categories/{id}"), update, Auth::Required)
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .client
            .delete(&format!("/categories/{id}"), Auth::Required)
            .await?;
        Ok(())
    }

    /// Re-parent a category; `None` moves it to the root level.
    pub async fn move_to(&self, id: i64, new_parent_id: Option<i64>) -> Result<Category, ApiError> {
        let mut p = Params::new();
        p.push_opt("newParentId", new_parent_id);
        self.client
            .put(
                &p.append_to(&format!("/categories/{id}/move")),
                &json!({}),
                Auth::Required,
            )
            .await
    }

    /// Bulk sort-order (and optionally parent) rewrite.
    pub async fn reorder(&self, entries: &[ReorderEntry]) -> Result<Vec<Category>, ApiError> {
        self.client
            .put("/categories/reorder", entries, Auth::Required)
            .await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Category>, ApiError> {
        let mut p = Params::new();
        p.push("q", query);
        self.client
            .get(&p.append_to("/categories/search"), Auth::Required)
            .await
    }

    pub async fn exists_by_key(&self, key: &str) -> Result<bool, ApiError> {
        self.client
            .get(
                &format!("/categories/exists/{}", urlencoding::encode(key)),
                Auth::Required,
            )
            .await
    }
}

/// Derive a URL-safe category key from a display label: accents folded,
/// anything but letters, digits and hyphens dropped, spaces hyphenated.
pub fn category_key(label: &str) -> String {
    let mut folded = String::with_capacity(label.len());
    for c in label.to_lowercase().chars() {
        let mapped = match c {
            'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
            'è' | 'é' | 'ê' | 'ë' => 'e',
            'ì' | 'í' | 'î' | 'ï' => 'i',
            'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
            'ù' | 'ú' | 'û' | 'ü' => 'u',
            'ý' | 'ÿ' => 'y',
            'ç' => 'c',
            other => other,
        };
        if mapped.is_ascii_alphanumeric() || mapped == ' ' || mapped == '-' {
            folded.push(mapped);
        }
    }

    let mut key = String::with_capacity(folded.len());
    let mut last_hyphen = false;
    for c in folded.trim().chars() {
        let c = if c == ' ' { '-' } else { c };
        if c == '-' {
            if !last_hyphen {
                key.push('-');
            }
            last_hyphen = true;
        } else {
            key.push(c);
            last_hyphen = false;
        }
    }
    key.trim_matches('-').to_string()
}

/// Depth-first flattening of a category tree, parents before children.
/// Each entry carries its nesting depth for indentation.
pub fn flatten_tree(roots: &[Category]) -> Vec<(usize, &Category)> {
    fn walk<'a>(cats: &'a [Category], depth: usize, out: &mut Vec<(usize, &'a Category)>) {
        for cat in cats {
            out.push((depth, cat));
            if let Some(children) = &cat.children {
                walk(children, depth + 1, out);
            }
        }
    }
    let mut out = Vec::new();
    walk(roots, 0, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat(id: i64, label: &str, children: Vec<Category>) -> Category {
        Category {
            id,
            label: label.into(),
            key: category_key(label),
            icon_name: None,
            badge_text: None,
            parent_id: None,
            children: if children.is_empty() {
                None
            } else {
                Some(children)
            },
            active: true,
            sort_order: None,
            created_at: "2025-01-01T00:00:00Z".into(),
            updated_at: "2025-01-01T00:00:00Z".into(),
        }
    }

    #[test]
    fn category_key_folds_accents_and_hyphenates() {
        assert_eq!(category_key("Vêtements Été"), "vetements-ete");
        assert_eq!(category_key("Chaussures & Sneakers"), "chaussures-sneakers");
        assert_eq!(category_key("  High  -  Tech  "), "high-tech");
        assert_eq!(category_key("Bébé!"), "bebe");
    }

    #[test]
    fn flatten_walks_depth_first_with_depths() {
        let tree = vec![
            cat(1, "Mode", vec![cat(2, "Femmes", vec![cat(3, "Robes", vec![])])]),
            cat(4, "Maison", vec![]),
        ];
        let flat = flatten_tree(&tree);
        let ids: Vec<(usize, i64)> = flat.iter().map(|(d, c)| (*d, c.id)).collect();
        assert_eq!(ids, vec![(0, 1), (1, 2), (2, 3), (0, 4)]);
    }
}
