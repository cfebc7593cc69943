use crate::database::DocumentStore;
use crate::models::documents_to_json;
use crate::utils::AppError;
use actix_web::{web, HttpResponse};

#[utoipa::path(
    get,
    path = "/suggest-product",
    tag = "Products",
    responses(
        (status = 200, description = "Every listed product in the catalog")
    )
)]
pub async fn suggest_products(store: web::Data<dyn DocumentStore>) -> Result<HttpResponse, AppError> {
    log::info!("🛒 GET /suggest-product");

    let products = store.list_listed_products().await?;
    Ok(HttpResponse::Ok().json(documents_to_json(products)))
}
