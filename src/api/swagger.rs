use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Electro Insight API",
        version = "1.0.0",
        description = "Product recommendation backend.\n\n**Authentication:** `POST /jwt` sets an http-only `token` cookie. Every route that writes data requires it; reads are public."
    ),
    paths(
        // Health
        crate::api::health::liveness,
        crate::api::health::health_check,

        // Auth
        crate::api::auth::issue_token,
        crate::api::auth::logout,

        // Queries
        crate::api::queries::add_query,
        crate::api::queries::get_queries,
        crate::api::queries::get_query,
        crate::api::queries::get_queries_by_email,
        crate::api::queries::update_query,
        crate::api::queries::delete_query,

        // Products
        crate::api::products::suggest_products,

        // Recommendations
        crate::api::recommendations::add_recommendation,
        crate::api::recommendations::recommendations_by_me,
        crate::api::recommendations::recommendations_for_me,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
            crate::api::auth::SessionResponse,
            crate::api::auth::TokenRequest,
            crate::models::QueryDocument,
            crate::models::QueryOwner,
            crate::models::RecommendationDocument,
            crate::models::QueryReference,
            crate::models::InsertOutcome,
            crate::models::UpdateOutcome,
            crate::models::DeleteOutcome,
        )
    ),
    tags(
        (name = "Health", description = "Liveness and database connectivity."),
        (name = "Auth", description = "Session cookie issue and logout."),
        (name = "Queries", description = "Product advice requests."),
        (name = "Recommendations", description = "Answers to other users' queries."),
        (name = "Products", description = "Read-only product catalog."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("token"))),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/",
            "/jwt",
            "/logout",
            "/add-query",
            "/queries",
            "/queries/{id}",
            "/query/{email}",
            "/query-id/{id}",
            "/suggest-product",
            "/add-recommendation",
            "/recForMe/{email}",
            "/my-rec/{email}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
