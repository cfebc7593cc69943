use serde::{Deserialize, Serialize};

pub const QUERIES_COLLECTION: &str = "queries";

/// Campo usado como dono da query
pub const QUERY_OWNER_FIELD: &str = "user_info.email";
pub const QUERY_PRODUCT_FIELD: &str = "product_name";

/// Pedido de recomendação de produto (documento livre no MongoDB).
/// Only the fields the service reads are described; any other field sent
/// by the client is stored as-is.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct QueryDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub product_name: Option<String>,
    pub user_info: Option<QueryOwner>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct QueryOwner {
    pub email: String,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct QuerySearch {
    /// Case-insensitive substring of `product_name`, taken literally
    /// (surrounding spaces included). Empty means no filter.
    pub search: Option<String>,
}

impl QuerySearch {
    pub fn term(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }
}
