//! Products page

use super::{contains_ignore_case, ViewState};
use crate::gateway::{Gateway, Product};
use crate::locale::{Locale, Message};

/// Category id that disables the category filter
pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Clone, PartialEq)]
pub struct ProductFilter {
    pub search: String,
    pub category: String,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: ALL_CATEGORIES.to_string(),
        }
    }
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        contains_ignore_case(&product.name, &self.search)
            && (self.category == ALL_CATEGORIES || product.category == self.category)
    }

    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}

/// `all` followed by each distinct non-empty category, first-seen order
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut out = vec![ALL_CATEGORIES.to_string()];
    for product in products {
        if !product.category.is_empty() && !out[1..].contains(&product.category) {
            out.push(product.category.clone());
        }
    }
    out
}

pub async fn load_products(gateway: &Gateway, locale: Locale) -> ViewState<Product> {
    ViewState::from_result(gateway.products().list().await, locale, Message::NoProducts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::product_json;

    fn products() -> Vec<Product> {
        [
            ("1", "iPhone 15 Pro Max", "手机"),
            ("2", "AirPods Pro 2", "配件"),
            ("3", "iPhone 15", "手机"),
            ("4", "Gift card", ""),
        ]
        .iter()
        .map(|(id, name, cat)| serde_json::from_value(product_json(id, name, cat)).unwrap())
        .collect()
    }

    #[test]
    fn test_categories_distinct_in_first_seen_order() {
        assert_eq!(categories(&products()), vec!["all", "手机", "配件"]);
        assert_eq!(categories(&[]), vec!["all"]);
    }

    #[test]
    fn test_filter_by_name_and_category() {
        let products = products();
        let mut filter = ProductFilter {
            search: "iphone".to_string(),
            ..Default::default()
        };
        assert_eq!(filter.apply(&products).len(), 2);

        filter.search.clear();
        filter.category = "配件".to_string();
        let found = filter.apply(&products);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "AirPods Pro 2");
    }
}
