use crate::database::DocumentStore;
use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

pub const LIVENESS_MESSAGE: &str = "Electro Insight is running on server...";

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub database: String,
    pub timestamp: i64,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses(
        (status = 200, description = "Service is up", body = String)
    )
)]
pub async fn liveness() -> impl Responder {
    LIVENESS_MESSAGE
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service and database are healthy", body = HealthResponse),
        (status = 503, description = "Database is unreachable", body = HealthResponse)
    )
)]
pub async fn health_check(store: web::Data<dyn DocumentStore>) -> impl Responder {
    let (status, database) = match store.ping().await {
        Ok(()) => ("healthy", "connected".to_string()),
        Err(e) => {
            log::warn!("⚠️  Health check: {} ping failed: {}", store.backend(), e);
            ("degraded", "unreachable".to_string())
        }
    };

    let body = HealthResponse {
        status: status.to_string(),
        service: "electro-insight".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: format!("{} ({})", database, store.backend()),
        timestamp: chrono::Utc::now().timestamp(),
    };

    if status == "healthy" {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}
