pub mod auth;
pub mod health;
pub mod products;
pub mod queries;
pub mod recommendations;
pub mod swagger;

use crate::middleware::{auth::Claims, AuthMiddleware};
use crate::models::value_at;
use crate::utils::AppError;
use actix_web::web;
use mongodb::bson::{Bson, Document};

const JSON_LIMIT: usize = 256 * 1024;

/// Registers every route. Needs `web::Data<dyn DocumentStore>` and
/// `web::Data<TokenService>` as app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default()
        .limit(JSON_LIMIT)
        .error_handler(|err, _req| AppError::InvalidBody(err.to_string()).into());

    cfg.app_data(json_config)
        .route("/", web::get().to(health::liveness))
        .route("/health", web::get().to(health::health_check))
        // Session
        .route("/jwt", web::post().to(auth::issue_token))
        .route("/logout", web::get().to(auth::logout))
        // Queries: writes require a token, reads are public
        .route("/add-query", web::post().to(queries::add_query).wrap(AuthMiddleware))
        .route("/queries", web::get().to(queries::get_queries))
        .service(
            web::resource("/queries/{id}")
                .route(web::get().to(queries::get_query))
                .route(web::put().to(queries::update_query).wrap(AuthMiddleware)),
        )
        .route("/query/{email}", web::get().to(queries::get_queries_by_email))
        .route("/query-id/{id}", web::delete().to(queries::delete_query).wrap(AuthMiddleware))
        // Catalog
        .route("/suggest-product", web::get().to(products::suggest_products))
        // Recommendations
        .route(
            "/add-recommendation",
            web::post().to(recommendations::add_recommendation).wrap(AuthMiddleware),
        )
        .route("/recForMe/{email}", web::get().to(recommendations::recommendations_by_me))
        .route("/my-rec/{email}", web::get().to(recommendations::recommendations_for_me));
}

/// When the document names an owner at `field`, it must be the signed-in user.
///
/// Anything other than a plain string there (arrays, sub-documents, numbers)
/// is refused: the store would match array elements against other users.
pub(crate) fn ensure_owner(claims: &Claims, document: &Document, field: &str) -> Result<(), AppError> {
    match value_at(document, field) {
        None => Ok(()),
        Some(Bson::String(owner)) if claims.email.as_deref() == Some(owner.as_str()) => Ok(()),
        Some(owner) => {
            log::warn!(
                "🚫 {} {} does not match token email {:?}",
                field,
                owner,
                claims.email
            );
            Err(AppError::Forbidden(format!("{} does not match the signed-in user", field)))
        }
    }
}
