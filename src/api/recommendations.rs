use super::ensure_owner;
use crate::database::DocumentStore;
use crate::middleware::auth::Claims;
use crate::models::{
    document_from_body, documents_to_json, InsertOutcome, RecommendationDocument,
    RECOMMENDER_FIELD,
};
use crate::utils::AppError;
use actix_web::{web, HttpResponse};

#[utoipa::path(
    post,
    path = "/add-recommendation",
    tag = "Recommendations",
    request_body = RecommendationDocument,
    responses(
        (status = 200, description = "Recommendation stored", body = InsertOutcome),
        (status = 400, description = "Body is not a JSON object"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "`email` does not match the token")
    ),
    security(("cookie_auth" = []))
)]
pub async fn add_recommendation(
    store: web::Data<dyn DocumentStore>,
    claims: web::ReqData<Claims>,
    body: web::Json<serde_json::Value>,
) -> Result<HttpResponse, AppError> {
    let recommendation = document_from_body(body.into_inner())?;
    ensure_owner(&claims, &recommendation, RECOMMENDER_FIELD)?;

    let result = store.insert_recommendation(recommendation).await?;
    log::info!("💡 POST /add-recommendation - id: {}", result.inserted_id);

    Ok(HttpResponse::Ok().json(result))
}

#[utoipa::path(
    get,
    path = "/recForMe/{email}",
    tag = "Recommendations",
    params(("email" = String, Path, description = "Recommender email")),
    responses(
        (status = 200, description = "Recommendations written by the email", body = [RecommendationDocument])
    )
)]
pub async fn recommendations_by_me(
    store: web::Data<dyn DocumentStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let email = path.into_inner();
    log::info!("💡 GET /recForMe/{}", email);

    let recommendations = store.recommendations_by_recommender(&email).await?;
    Ok(HttpResponse::Ok().json(documents_to_json(recommendations)))
}

#[utoipa::path(
    get,
    path = "/my-rec/{email}",
    tag = "Recommendations",
    params(("email" = String, Path, description = "Email of the query owner")),
    responses(
        (status = 200, description = "Recommendations made on the owner's queries", body = [RecommendationDocument])
    )
)]
pub async fn recommendations_for_me(
    store: web::Data<dyn DocumentStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let email = path.into_inner();
    log::info!("💡 GET /my-rec/{}", email);

    let recommendations = store.recommendations_for_owner(&email).await?;
    Ok(HttpResponse::Ok().json(documents_to_json(recommendations)))
}
