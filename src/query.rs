//! Query-string assembly for listing endpoints.

use std::fmt::Display;

pub(crate) struct Params {
    pairs: Vec<(&'static str, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    pub fn push(&mut self, key: &'static str, value: impl Display) {
        self.pairs.push((key, value.to_string()));
    }

    pub fn push_opt<T: Display>(&mut self, key: &'static str, value: Option<T>) {
        if let Some(v) = value {
            self.push(key, v);
        }
    }

    /// Endpoint path with the collected pairs appended, values
    /// percent-encoded. No trailing `?` when there is nothing to append.
    pub fn append_to(&self, path: &str) -> String {
        if self.pairs.is_empty() {
            return path.to_string();
        }
        let qs = self
            .pairs
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{path}?{qs}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_params_leave_the_path_alone() {
        assert_eq!(Params::new().append_to("/products"), "/products");
    }

    #[test]
    fn values_are_percent_encoded() {
        let mut p = Params::new();
        p.push("query", "robe d'été");
        p.push_opt("page", Some(2));
        p.push_opt::<u32>("size", None);
        assert_eq!(
            p.append_to("/search/products"),
            "/search/products?query=robe%20d%27%C3%A9t%C3%A9&page=2"
        );
    }
}
