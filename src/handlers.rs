use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use crate::db::repository::ProductStore;
use crate::errors::{AppError, Result};
use crate::models::{ProductQuery, ProductRecord};
use crate::query::QuerySpec;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProductStore>,
    pub query_timeout: Duration,
}

impl AppState {
    pub fn new(store: Arc<dyn ProductStore>, query_timeout: Duration) -> Self {
        AppState { store, query_timeout }
    }
}

/// Runs one listing request against `store`.
///
/// Validation happens before the store is touched. The store call runs on the
/// blocking pool and is abandoned once `timeout` elapses. An empty page is
/// reported as [`AppError::NotFound`].
pub async fn fetch_products(
    store: Arc<dyn ProductStore>,
    request: &ProductQuery,
    now: DateTime<Utc>,
    timeout: Duration,
) -> Result<Vec<ProductRecord>> {
    let spec = QuerySpec::from_request(request, now)?;

    let rows = match tokio::time::timeout(timeout, web::block(move || store.find(&spec))).await {
        Err(_) => return Err(AppError::StoreTimeout(timeout)),
        Ok(Err(blocking)) => return Err(AppError::Store(blocking.to_string())),
        Ok(Ok(found)) => found?,
    };

    if rows.is_empty() {
        return Err(AppError::NotFound("No products found".to_string()));
    }

    rows.into_iter()
        .map(|row| ProductRecord::try_from(row).map_err(AppError::from))
        .collect()
}

#[instrument(
    name = "handler::get_products",
    skip(data, query),
    fields(sort_by = %query.sort_by, page = query.page, limit = query.limit)
)]
pub async fn get_products(
    data: web::Data<AppState>,
    query: web::Query<ProductQuery>,
) -> Result<HttpResponse> {
    let products =
        fetch_products(data.store.clone(), &query, Utc::now(), data.query_timeout).await?;
    info!(count = products.len(), "Returning products");
    Ok(HttpResponse::Ok().json(products))
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::InvalidArgument(err.to_string()).into())
}

/// Registers the `/products` route and its query-string error mapping.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(query_config())
        .route("/products", web::get().to(get_products));
}
