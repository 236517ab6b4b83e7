use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::Text;
use thiserror::Error;

use crate::db::connection::PgPool;
use crate::db::models::RawProduct;
use crate::db::schema::product_records;
use crate::models::{SortField, SortOrder};
use crate::query::{Predicate, QuerySpec};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no store connection available: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Query(#[from] diesel::result::Error),
}

/// Read access to product records.
///
/// `find` applies the filter, sort and page window of `spec` in one call and
/// returns at most `spec.window.limit()` rows. Implementations block; callers
/// run them off the async executor.
pub trait ProductStore: Send + Sync {
    fn find(&self, spec: &QuerySpec) -> Result<Vec<RawProduct>, StoreError>;
}

/// `ProductStore` over the `product_records` table.
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        PgProductStore { pool }
    }
}

diesel::infix_operator!(RegexIMatch, " ~* ", backend: Pg);

/// Builds the filtered, ordered and windowed select for `spec`.
pub fn build_query(spec: &QuerySpec) -> product_records::BoxedQuery<'static, Pg> {
    use crate::db::schema::product_records::dsl::{created_at, id, label, true_price};

    let mut query = product_records::table.into_boxed();

    for predicate in &spec.filter.predicates {
        query = match predicate {
            Predicate::LabelMatches(pattern) => query.filter(RegexIMatch::new(
                label,
                pattern.as_str().to_string().into_sql::<Text>(),
            )),
            Predicate::PriceAtLeast(min) => query.filter(true_price.ge(*min)),
            Predicate::PriceAtMost(max) => query.filter(true_price.le(*max)),
            Predicate::CreatedSince(since) => query.filter(created_at.ge(*since)),
        };
    }

    // Missing values sort lowest, ties fall back to insertion order.
    query = match spec.sort.order {
        SortOrder::Asc => match spec.sort.field {
            SortField::TruePrice => query.order((true_price.asc().nulls_first(), id.asc())),
            SortField::CreatedAt => query.order((created_at.asc().nulls_first(), id.asc())),
            SortField::Label => query.order((label.asc().nulls_first(), id.asc())),
        },
        SortOrder::Desc => match spec.sort.field {
            SortField::TruePrice => query.order((true_price.desc().nulls_last(), id.desc())),
            SortField::CreatedAt => query.order((created_at.desc().nulls_last(), id.desc())),
            SortField::Label => query.order((label.desc().nulls_last(), id.desc())),
        },
    };

    query.offset(spec.window.offset()).limit(spec.window.limit())
}

impl ProductStore for PgProductStore {
    fn find(&self, spec: &QuerySpec) -> Result<Vec<RawProduct>, StoreError> {
        let conn = &mut self
            .pool
            .get()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let rows = build_query(spec).load::<RawProduct>(conn)?;
        tracing::debug!(rows = rows.len(), "Loaded product records");
        Ok(rows)
    }
}
