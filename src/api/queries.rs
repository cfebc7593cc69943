use super::ensure_owner;
use crate::database::DocumentStore;
use crate::middleware::auth::Claims;
use crate::models::{
    document_from_body, document_to_json, documents_to_json, parse_object_id, DeleteOutcome,
    InsertOutcome, QueryDocument, QuerySearch, UpdateOutcome, QUERY_OWNER_FIELD,
};
use crate::utils::AppError;
use actix_web::{web, HttpResponse};

#[utoipa::path(
    post,
    path = "/add-query",
    tag = "Queries",
    request_body = QueryDocument,
    responses(
        (status = 200, description = "Query stored", body = InsertOutcome),
        (status = 400, description = "Body is not a JSON object"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "`user_info.email` does not match the token")
    ),
    security(("cookie_auth" = []))
)]
pub async fn add_query(
    store: web::Data<dyn DocumentStore>,
    claims: web::ReqData<Claims>,
    body: web::Json<serde_json::Value>,
) -> Result<HttpResponse, AppError> {
    let query = document_from_body(body.into_inner())?;
    ensure_owner(&claims, &query, QUERY_OWNER_FIELD)?;

    let result = store.insert_query(query).await?;
    log::info!("📝 POST /add-query - id: {}", result.inserted_id);

    Ok(HttpResponse::Ok().json(result))
}

#[utoipa::path(
    get,
    path = "/queries",
    tag = "Queries",
    params(QuerySearch),
    responses(
        (status = 200, description = "All queries, filtered by `search` when given", body = [QueryDocument])
    )
)]
pub async fn get_queries(
    store: web::Data<dyn DocumentStore>,
    params: web::Query<QuerySearch>,
) -> Result<HttpResponse, AppError> {
    let search = params.term();
    log::info!("📋 GET /queries - search: {}", search.unwrap_or("-"));

    let queries = store.list_queries(search).await?;
    Ok(HttpResponse::Ok().json(documents_to_json(queries)))
}

#[utoipa::path(
    get,
    path = "/queries/{id}",
    tag = "Queries",
    params(("id" = String, Path, description = "Query id (24 hex digits)")),
    responses(
        (status = 200, description = "The query", body = QueryDocument),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "No query with that id")
    )
)]
pub async fn get_query(
    store: web::Data<dyn DocumentStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let raw_id = path.into_inner();
    let id = parse_object_id(&raw_id)?;

    match store.get_query(id).await? {
        Some(query) => Ok(HttpResponse::Ok().json(document_to_json(query))),
        None => Err(AppError::NotFound(format!("query {}", raw_id))),
    }
}

#[utoipa::path(
    get,
    path = "/query/{email}",
    tag = "Queries",
    params(("email" = String, Path, description = "Owner email, exact match")),
    responses(
        (status = 200, description = "Queries owned by the email", body = [QueryDocument])
    )
)]
pub async fn get_queries_by_email(
    store: web::Data<dyn DocumentStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let email = path.into_inner();
    log::info!("📋 GET /query/{}", email);

    let queries = store.queries_by_owner(&email).await?;
    Ok(HttpResponse::Ok().json(documents_to_json(queries)))
}

#[utoipa::path(
    put,
    path = "/queries/{id}",
    tag = "Queries",
    params(("id" = String, Path, description = "Query id (24 hex digits)")),
    request_body = QueryDocument,
    responses(
        (status = 200, description = "Fields merged, or query created when the id was unknown", body = UpdateOutcome),
        (status = 400, description = "Malformed id or body"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "`user_info.email` is not the signed-in user")
    ),
    security(("cookie_auth" = []))
)]
pub async fn update_query(
    store: web::Data<dyn DocumentStore>,
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
    body: web::Json<serde_json::Value>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path.into_inner())?;
    let fields = document_from_body(body.into_inner())?;
    ensure_owner(&claims, &fields, QUERY_OWNER_FIELD)?;

    let result = store.upsert_query(id, fields).await?;
    log::info!(
        "✏️  PUT /queries/{} by {} - matched: {}, upserted: {}",
        id,
        claims.email.as_deref().unwrap_or("N/A"),
        result.matched_count,
        result.upserted_id.is_some()
    );

    Ok(HttpResponse::Ok().json(result))
}

#[utoipa::path(
    delete,
    path = "/query-id/{id}",
    tag = "Queries",
    params(("id" = String, Path, description = "Query id (24 hex digits)")),
    responses(
        (status = 200, description = "Deletion result; `deletedCount` is 0 for unknown ids", body = DeleteOutcome),
        (status = 400, description = "Malformed id"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("cookie_auth" = []))
)]
pub async fn delete_query(
    store: web::Data<dyn DocumentStore>,
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path.into_inner())?;

    let result = store.delete_query(id).await?;
    log::info!(
        "🗑️  DELETE /query-id/{} by {} - deleted: {}",
        id,
        claims.email.as_deref().unwrap_or("N/A"),
        result.deleted_count
    );

    Ok(HttpResponse::Ok().json(result))
}
