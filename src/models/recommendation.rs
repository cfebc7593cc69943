use serde::{Deserialize, Serialize};

pub const RECOMMENDATIONS_COLLECTION: &str = "recommendation";

/// Quem recomendou
pub const RECOMMENDER_FIELD: &str = "email";
/// Dono da query original
pub const QUERY_OWNER_REF_FIELD: &str = "query.query_email";

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RecommendationDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub email: Option<String>,
    pub query: Option<QueryReference>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct QueryReference {
    pub query_email: String,
}
