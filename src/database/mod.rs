pub mod memory;
pub mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoDB;

use crate::models::{DeleteOutcome, InsertOutcome, UpdateOutcome};
use crate::utils::AppError;
use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Document};

/// Every operation a route handler may perform against the document store.
///
/// Each call is a single store round-trip. Handlers hold the store as
/// `web::Data<dyn DocumentStore>`, opened once at startup.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend name for logs and the health endpoint.
    fn backend(&self) -> &'static str;

    async fn ping(&self) -> Result<(), AppError>;

    async fn insert_query(&self, query: Document) -> Result<InsertOutcome, AppError>;

    /// All queries, optionally filtered by a case-insensitive substring of `product_name`.
    async fn list_queries(&self, search: Option<&str>) -> Result<Vec<Document>, AppError>;

    async fn get_query(&self, id: ObjectId) -> Result<Option<Document>, AppError>;

    /// Queries whose `user_info.email` equals `email` exactly.
    async fn queries_by_owner(&self, email: &str) -> Result<Vec<Document>, AppError>;

    /// Shallow merge of `fields` into the query at `id`, inserting it when absent.
    async fn upsert_query(&self, id: ObjectId, fields: Document) -> Result<UpdateOutcome, AppError>;

    /// Deleting an unknown id is not an error; it reports zero deletions.
    async fn delete_query(&self, id: ObjectId) -> Result<DeleteOutcome, AppError>;

    async fn list_listed_products(&self) -> Result<Vec<Document>, AppError>;

    async fn insert_recommendation(&self, recommendation: Document) -> Result<InsertOutcome, AppError>;

    /// Recommendations written by `email`.
    async fn recommendations_by_recommender(&self, email: &str) -> Result<Vec<Document>, AppError>;

    /// Recommendations made against queries owned by `email`.
    async fn recommendations_for_owner(&self, email: &str) -> Result<Vec<Document>, AppError>;
}

/// Literal, case-insensitive pattern for a search term.
pub(crate) fn search_pattern(term: &str) -> String {
    regex::escape(term)
}
