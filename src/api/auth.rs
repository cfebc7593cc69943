use crate::services::TokenService;
use crate::utils::AppError;
use actix_web::{web, HttpResponse};
use serde::Serialize;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SessionResponse {
    pub success: bool,
}

/// Any JSON object; `email` identifies the user.
#[derive(Debug, serde::Deserialize, utoipa::ToSchema)]
pub struct TokenRequest {
    pub email: String,
}

#[utoipa::path(
    post,
    path = "/jwt",
    tag = "Auth",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token issued and set as the `token` cookie", body = SessionResponse),
        (status = 400, description = "Payload is not a JSON object")
    )
)]
pub async fn issue_token(
    tokens: web::Data<TokenService>,
    payload: web::Json<serde_json::Value>,
) -> Result<HttpResponse, AppError> {
    let payload = payload.into_inner();
    let email = payload.get("email").and_then(|e| e.as_str()).unwrap_or("N/A").to_string();
    log::info!("🔐 POST /jwt - email: {}", email);

    let token = tokens.issue(payload)?;

    log::info!("✅ Token issued: {}", email);
    Ok(HttpResponse::Ok()
        .cookie(tokens.session_cookie(token))
        .json(SessionResponse { success: true }))
}

#[utoipa::path(
    get,
    path = "/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Session cookie cleared", body = SessionResponse)
    )
)]
pub async fn logout(tokens: web::Data<TokenService>) -> HttpResponse {
    log::info!("👋 GET /logout");

    HttpResponse::Ok()
        .cookie(tokens.removal_cookie())
        .json(SessionResponse { success: true })
}
