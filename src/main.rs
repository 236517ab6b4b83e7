use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{http, web, App, HttpServer};
use anyhow::Context;
use dotenv::dotenv;
use tracing_actix_web::TracingLogger;

use promo_backend::config::{ServerSettings, Settings, StoreBackend};
use promo_backend::db::connection;
use promo_backend::db::{InMemoryProductStore, PgProductStore, ProductStore};
use promo_backend::handlers::{self, AppState};
use promo_backend::{mock_data, telemetry};

fn open_store(settings: &Settings) -> anyhow::Result<Arc<dyn ProductStore>> {
    match settings.database.backend {
        StoreBackend::Postgres => {
            let pool = connection::init_pool(&settings.database)?;
            if settings.database.run_migrations {
                connection::run_migrations(&pool)?;
            }
            tracing::info!(
                pool_size = settings.database.pool_size,
                "Connected to product database"
            );
            Ok(Arc::new(PgProductStore::new(pool)))
        }
        StoreBackend::Memory => {
            tracing::warn!("Serving the built-in sample catalogue");
            Ok(Arc::new(InMemoryProductStore::new(mock_data::sample_products())))
        }
    }
}

fn cors(server: &ServerSettings) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec![http::Method::GET])
        .allow_any_header()
        .max_age(3600);

    if server.allowed_origins.is_empty() {
        cors.allow_any_origin()
    } else {
        server
            .allowed_origins
            .iter()
            .fold(cors, |cors, origin| cors.allowed_origin(origin))
    }
}

async fn start_server(settings: Settings, store: Arc<dyn ProductStore>) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState::new(store, settings.query.timeout()));
    let server = settings.server;
    let address = (server.host.clone(), server.port);

    tracing::info!("Starting HTTP server on http://{}:{}", address.0, address.1);
    HttpServer::new(move || {
        App::new()
            .wrap(cors(&server))
            .wrap(TracingLogger::default())
            .app_data(app_state.clone())
            .configure(handlers::configure)
    })
    .bind(address)?
    .run()
    .await
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let settings = Settings::load().context("Failed to load configuration")?;
    telemetry::init(settings.log.format);

    let store = open_store(&settings)?;
    start_server(settings, store).await?;

    tracing::info!("Server stopped");
    Ok(())
}
