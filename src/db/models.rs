use chrono::{DateTime, Utc};
use diesel::prelude::*;
use thiserror::Error;

use crate::models::ProductRecord;

/// A product row exactly as the ingestion pipeline stored it.
#[derive(Queryable, Debug, Clone, Default, PartialEq)]
pub struct RawProduct {
    pub id: i32,
    pub label: Option<String>,
    pub unit: Option<String>,
    pub normal_price: Option<f64>,
    pub discounted_price: Option<f64>,
    pub true_price: Option<f64>,
    pub description: Option<String>,
    pub base64_image: Option<String>,
    pub location: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    #[error("record is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` holds invalid price {value}")]
    InvalidPrice { field: &'static str, value: f64 },
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, DecodeError> {
    value.ok_or(DecodeError::MissingField(field))
}

fn price(value: Option<f64>, field: &'static str) -> Result<Option<f64>, DecodeError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(DecodeError::InvalidPrice { field, value: v }),
        other => Ok(other),
    }
}

impl TryFrom<RawProduct> for ProductRecord {
    type Error = DecodeError;

    fn try_from(raw: RawProduct) -> Result<Self, Self::Error> {
        Ok(ProductRecord {
            label: required(raw.label, "label")?,
            unit: required(raw.unit, "unit")?,
            normal_price: price(raw.normal_price, "normal_price")?,
            discounted_price: price(raw.discounted_price, "discounted_price")?,
            true_price: price(raw.true_price, "true_price")?,
            description: required(raw.description, "description")?,
            base64_image: required(raw.base64_image, "base64_image")?,
            location: required(raw.location, "location")?,
            created_at: required(raw.created_at, "created_at")?,
        })
    }
}
