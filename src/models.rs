use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A product listing as returned to the front-end.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProductRecord {
    pub label: String,
    pub unit: String,
    pub normal_price: Option<f64>,
    pub discounted_price: Option<f64>,
    pub true_price: Option<f64>,
    pub description: String,
    pub base64_image: String,
    pub location: String,
    pub created_at: DateTime<Utc>,
}

/// Query string accepted by `GET /products`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProductQuery {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default = "default_order")]
    pub order: String,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default, rename = "priceMin")]
    pub price_min: Option<f64>,
    #[serde(default, rename = "priceMax")]
    pub price_max: Option<f64>,
    #[serde(default, rename = "daysAgo")]
    pub days_ago: Option<i64>,
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
}

fn default_order() -> String {
    "asc".to_string()
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    30
}

fn default_sort_by() -> String {
    SortField::TruePrice.as_str().to_string()
}

impl Default for ProductQuery {
    fn default() -> Self {
        ProductQuery {
            query: None,
            order: default_order(),
            page: default_page(),
            limit: default_limit(),
            price_min: None,
            price_max: None,
            days_ago: None,
            sort_by: default_sort_by(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    TruePrice,
    CreatedAt,
    Label,
}

impl SortField {
    pub const ALL: [SortField; 3] = [SortField::TruePrice, SortField::CreatedAt, SortField::Label];

    pub fn as_str(self) -> &'static str {
        match self {
            SortField::TruePrice => "true_price",
            SortField::CreatedAt => "created_at",
            SortField::Label => "label",
        }
    }

    pub fn parse(value: &str) -> Option<SortField> {
        SortField::ALL.into_iter().find(|field| field.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Only the exact keyword `desc` selects descending order.
    pub fn parse(value: &str) -> SortOrder {
        if value == "desc" {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_field_whitelist() {
        assert_eq!(SortField::parse("true_price"), Some(SortField::TruePrice));
        assert_eq!(SortField::parse("created_at"), Some(SortField::CreatedAt));
        assert_eq!(SortField::parse("label"), Some(SortField::Label));
        assert_eq!(SortField::parse("Label"), None);
        assert_eq!(SortField::parse("price"), None);
    }

    #[test]
    fn anything_but_desc_is_ascending() {
        assert_eq!(SortOrder::parse("desc"), SortOrder::Desc);
        assert_eq!(SortOrder::parse("asc"), SortOrder::Asc);
        assert_eq!(SortOrder::parse("DESC"), SortOrder::Asc);
        assert_eq!(SortOrder::parse(""), SortOrder::Asc);
    }

    #[test]
    fn query_defaults() {
        let query: ProductQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.order, "asc");
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 30);
        assert_eq!(query.sort_by, "true_price");
        assert!(query.query.is_none());
        assert!(query.price_min.is_none());
    }

    #[test]
    fn query_uses_camel_case_bounds() {
        let query: ProductQuery =
            serde_json::from_str(r#"{"priceMin": 10.0, "priceMax": 20.5, "daysAgo": 7}"#).unwrap();
        assert_eq!(query.price_min, Some(10.0));
        assert_eq!(query.price_max, Some(20.5));
        assert_eq!(query.days_ago, Some(7));
    }
}
