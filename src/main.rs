mod api;
mod config;
mod database;
mod middleware;
mod models;
mod seeds;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use config::{Config, StorageBackend};
use database::{DocumentStore, MemoryStore, MongoDB};
use dotenv::dotenv;
use services::TokenService;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

async fn build_store(config: &Config) -> std::io::Result<Arc<dyn DocumentStore>> {
    match config.storage {
        StorageBackend::MongoDB => {
            let uri = config.mongodb_uri.as_deref().ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "MongoDB URI is not configured")
            })?;
            let db = MongoDB::new(uri, &config.database_name)
                .await
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

            // Startup check is not fatal: routes answer 503 until the cluster is reachable
            match db.ping().await {
                Ok(()) => {
                    log::info!("✅ Pinged your deployment. MongoDB connection OK");
                    db.ensure_indexes().await;
                }
                Err(e) => log::error!("❌ MongoDB ping failed, serving in degraded mode: {}", e),
            }

            Ok(Arc::new(db))
        }
        StorageBackend::Memory => {
            log::warn!("⚠️  Using in-memory storage; data is lost on restart");
            Ok(Arc::new(MemoryStore::with_listed_products(
                seeds::listed_products_seed::default_listed_products(),
            )))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        log::error!("❌ {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    log::info!("🚀 Starting Electro Insight...");
    log::info!("📊 Database: {} ({:?})", config.database_name, config.storage);

    let store = build_store(&config).await?;
    let store_data: web::Data<dyn DocumentStore> = web::Data::from(store);
    let tokens = web::Data::new(TokenService::new(&config.token_secret, config.production));

    let bind_address = config.bind_address();
    log::info!("🌐 Server starting on {}", bind_address);
    log::info!("📚 Swagger UI available at: http://{}/swagger-ui/", bind_address);

    let allowed_origins = config.allowed_origins.clone();

    HttpServer::new(move || {
        let cors = allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .supports_credentials()
            .max_age(3600);

        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(store_data.clone())
            .app_data(tokens.clone())
            .wrap(cors)
            .wrap(middleware::SecurityHeaders)
            .wrap(actix_web::middleware::Compress::default())
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi),
            )
            .configure(api::configure)
    })
    .bind(bind_address)?
    .run()
    .await
}
