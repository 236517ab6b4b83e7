//! Translation of a `/products` request into a store-independent query.
//!
//! A [`QuerySpec`] is built once per request and never mutated afterwards.
//! Stores receive it whole and decide how to execute it.

use chrono::{DateTime, Duration, Utc};
use regex::{Regex, RegexBuilder};

use crate::errors::{AppError, Result};
use crate::models::{ProductQuery, SortField, SortOrder};

const MAX_PATTERN_SIZE: usize = 1 << 20;

/// Case-insensitive regular expression matched anywhere in `label`.
///
/// The source text is sent to the database as-is; the compiled form serves
/// in-memory matching and rejects malformed patterns up front.
#[derive(Debug, Clone)]
pub struct LabelPattern {
    source: String,
    regex: Regex,
}

impl LabelPattern {
    pub fn new(source: &str) -> Result<LabelPattern> {
        let regex = RegexBuilder::new(source)
            .case_insensitive(true)
            .size_limit(MAX_PATTERN_SIZE)
            .build()
            .map_err(|e| AppError::InvalidArgument(format!("Invalid query pattern: {}", e)))?;
        Ok(LabelPattern {
            source: source.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, label: &str) -> bool {
        self.regex.is_match(label)
    }
}

impl PartialEq for LabelPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// A single condition a record must satisfy.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    LabelMatches(LabelPattern),
    PriceAtLeast(f64),
    PriceAtMost(f64),
    CreatedSince(DateTime<Utc>),
}

/// Conjunction of predicates. Empty means every record is eligible.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub predicates: Vec<Predicate>,
}

impl ProductFilter {
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub order: SortOrder,
}

/// One page of the sorted result sequence, both values at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    page: i64,
    limit: i64,
}

impl PageWindow {
    pub fn new(page: i64, limit: i64) -> Result<PageWindow> {
        if page < 1 {
            return Err(AppError::InvalidArgument(format!(
                "Invalid page {}. Must be 1 or greater",
                page
            )));
        }
        if limit < 1 {
            return Err(AppError::InvalidArgument(format!(
                "Invalid limit {}. Must be 1 or greater",
                limit
            )));
        }
        if (page - 1).checked_mul(limit).is_none() {
            return Err(AppError::InvalidArgument(format!(
                "Page {} with limit {} is out of range",
                page, limit
            )));
        }
        Ok(PageWindow { page, limit })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    pub filter: ProductFilter,
    pub sort: SortKey,
    pub window: PageWindow,
}

impl QuerySpec {
    /// Validates `request` and builds the query it describes. `now` anchors
    /// the `daysAgo` window.
    pub fn from_request(request: &ProductQuery, now: DateTime<Utc>) -> Result<QuerySpec> {
        let field = SortField::parse(&request.sort_by).ok_or_else(|| {
            let allowed: Vec<&str> = SortField::ALL.iter().map(|f| f.as_str()).collect();
            AppError::InvalidArgument(format!(
                "Invalid sort_by field. Must be one of: [{}]",
                allowed.join(", ")
            ))
        })?;
        let sort = SortKey {
            field,
            order: SortOrder::parse(&request.order),
        };
        let window = PageWindow::new(request.page, request.limit)?;

        let mut predicates = Vec::new();
        if let Some(term) = request.query.as_deref().filter(|t| !t.is_empty()) {
            predicates.push(Predicate::LabelMatches(LabelPattern::new(term)?));
        }
        if let Some(min) = request.price_min {
            predicates.push(Predicate::PriceAtLeast(finite_price("priceMin", min)?));
        }
        if let Some(max) = request.price_max {
            predicates.push(Predicate::PriceAtMost(finite_price("priceMax", max)?));
        }
        if let Some(days) = request.days_ago {
            predicates.push(Predicate::CreatedSince(created_since(now, days)?));
        }

        Ok(QuerySpec {
            filter: ProductFilter { predicates },
            sort,
            window,
        })
    }
}

fn finite_price(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AppError::InvalidArgument(format!("{} must be a finite number", name)))
    }
}

fn created_since(now: DateTime<Utc>, days: i64) -> Result<DateTime<Utc>> {
    Duration::try_days(days)
        .and_then(|span| now.checked_sub_signed(span))
        .ok_or_else(|| AppError::InvalidArgument(format!("daysAgo {} is out of range", days)))
}
