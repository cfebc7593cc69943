use super::{search_pattern, DocumentStore};
use crate::models::{
    matches_at, string_at, DeleteOutcome, InsertOutcome, UpdateOutcome, QUERY_OWNER_FIELD,
    QUERY_OWNER_REF_FIELD, QUERY_PRODUCT_FIELD, RECOMMENDER_FIELD,
};
use crate::utils::AppError;
use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Document};
use regex::RegexBuilder;
use tokio::sync::RwLock;

#[derive(Default)]
struct Collections {
    queries: Vec<Document>,
    recommendations: Vec<Document>,
    listed_products: Vec<Document>,
}

/// In-process store with the same observable behaviour as [`super::MongoDB`].
///
/// Used for local development (`STORAGE_BACKEND=memory`) and by the HTTP tests.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    /// Catalog entries are populated out-of-band; this is the out-of-band path.
    pub fn with_listed_products(products: Vec<Document>) -> Self {
        Self {
            inner: RwLock::new(Collections {
                listed_products: products.into_iter().map(with_id).collect(),
                ..Collections::default()
            }),
        }
    }
}

fn with_id(mut document: Document) -> Document {
    if !document.contains_key("_id") {
        document.insert("_id", ObjectId::new());
    }
    document
}

fn matching(documents: &[Document], path: &str, value: &str) -> Vec<Document> {
    documents
        .iter()
        .filter(|d| matches_at(d, path, value))
        .cloned()
        .collect()
}

fn position_of(documents: &[Document], id: ObjectId) -> Option<usize> {
    documents
        .iter()
        .position(|d| d.get_object_id("_id").map(|oid| oid == id).unwrap_or(false))
}

fn insert_into(collection: &mut Vec<Document>, mut document: Document) -> InsertOutcome {
    let id = ObjectId::new();
    document.insert("_id", id);
    collection.push(document);

    InsertOutcome {
        acknowledged: true,
        inserted_id: id.to_hex(),
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn insert_query(&self, query: Document) -> Result<InsertOutcome, AppError> {
        let mut inner = self.inner.write().await;
        Ok(insert_into(&mut inner.queries, query))
    }

    async fn list_queries(&self, search: Option<&str>) -> Result<Vec<Document>, AppError> {
        let inner = self.inner.read().await;

        let Some(term) = search else {
            return Ok(inner.queries.clone());
        };

        let pattern = RegexBuilder::new(&search_pattern(term))
            .case_insensitive(true)
            .build()
            .map_err(|e| AppError::InvalidBody(e.to_string()))?;

        Ok(inner
            .queries
            .iter()
            .filter(|d| {
                string_at(d, QUERY_PRODUCT_FIELD)
                    .map(|name| pattern.is_match(name))
                    .unwrap_or(false)
            })
            .cloned()
            .collect())
    }

    async fn get_query(&self, id: ObjectId) -> Result<Option<Document>, AppError> {
        let inner = self.inner.read().await;
        Ok(position_of(&inner.queries, id).map(|i| inner.queries[i].clone()))
    }

    async fn queries_by_owner(&self, email: &str) -> Result<Vec<Document>, AppError> {
        let inner = self.inner.read().await;
        Ok(matching(&inner.queries, QUERY_OWNER_FIELD, email))
    }

    async fn upsert_query(&self, id: ObjectId, fields: Document) -> Result<UpdateOutcome, AppError> {
        let mut inner = self.inner.write().await;

        match position_of(&inner.queries, id) {
            Some(index) => {
                let existing = &mut inner.queries[index];
                let mut changed = false;

                for (key, value) in fields {
                    if existing.get(&key) != Some(&value) {
                        existing.insert(key, value);
                        changed = true;
                    }
                }

                Ok(UpdateOutcome {
                    acknowledged: true,
                    matched_count: 1,
                    modified_count: u64::from(changed),
                    upserted_id: None,
                })
            }
            None => {
                let mut document = fields;
                document.insert("_id", id);
                inner.queries.push(document);

                Ok(UpdateOutcome {
                    acknowledged: true,
                    matched_count: 0,
                    modified_count: 0,
                    upserted_id: Some(id.to_hex()),
                })
            }
        }
    }

    async fn delete_query(&self, id: ObjectId) -> Result<DeleteOutcome, AppError> {
        let mut inner = self.inner.write().await;

        let deleted_count = match position_of(&inner.queries, id) {
            Some(index) => {
                inner.queries.remove(index);
                1
            }
            None => 0,
        };

        Ok(DeleteOutcome {
            acknowledged: true,
            deleted_count,
        })
    }

    async fn list_listed_products(&self) -> Result<Vec<Document>, AppError> {
        Ok(self.inner.read().await.listed_products.clone())
    }

    async fn insert_recommendation(&self, recommendation: Document) -> Result<InsertOutcome, AppError> {
        let mut inner = self.inner.write().await;
        Ok(insert_into(&mut inner.recommendations, recommendation))
    }

    async fn recommendations_by_recommender(&self, email: &str) -> Result<Vec<Document>, AppError> {
        let inner = self.inner.read().await;
        Ok(matching(&inner.recommendations, RECOMMENDER_FIELD, email))
    }

    async fn recommendations_for_owner(&self, email: &str) -> Result<Vec<Document>, AppError> {
        let inner = self.inner.read().await;
        Ok(matching(&inner.recommendations, QUERY_OWNER_REF_FIELD, email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    fn query(name: &str, email: &str) -> Document {
        doc! { "product_name": name, "user_info": { "email": email } }
    }

    #[tokio::test]
    async fn test_insert_then_get() {
        let store = MemoryStore::default();
        let outcome = store.insert_query(query("Drone X", "a@x.com")).await.unwrap();
        let id = ObjectId::parse_str(&outcome.inserted_id).unwrap();

        let found = store.get_query(id).await.unwrap().unwrap();
        assert_eq!(found.get_str("product_name").unwrap(), "Drone X");
        assert_eq!(found.get_object_id("_id").unwrap(), id);

        assert!(store.get_query(ObjectId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_owner_lookup_is_exact() {
        let store = MemoryStore::default();
        store.insert_query(query("Drone X", "a@x.com")).await.unwrap();
        store.insert_query(query("Phone", "A@x.com")).await.unwrap();
        store.insert_query(query("Laptop", "a@x.com")).await.unwrap();

        let owned = store.queries_by_owner("a@x.com").await.unwrap();
        let names: Vec<_> = owned.iter().map(|d| d.get_str("product_name").unwrap()).collect();
        assert_eq!(names, vec!["Drone X", "Laptop"]);
    }

    #[tokio::test]
    async fn test_owner_lookup_matches_array_elements() {
        let store = MemoryStore::default();
        store
            .insert_query(doc! { "product_name": "Drone X", "user_info": { "email": ["a@x.com", "b@x.com"] } })
            .await
            .unwrap();
        store
            .insert_query(doc! { "product_name": "Phone", "user_info": [{ "email": "b@x.com" }] })
            .await
            .unwrap();

        assert_eq!(store.queries_by_owner("a@x.com").await.unwrap().len(), 1);
        assert_eq!(store.queries_by_owner("b@x.com").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_search_is_literal_and_case_insensitive() {
        let store = MemoryStore::default();
        store.insert_query(query("DJI Drone X", "a@x.com")).await.unwrap();
        store.insert_query(query("Phone (2024)", "b@x.com")).await.unwrap();
        store.insert_query(doc! { "user_info": { "email": "c@x.com" } }).await.unwrap();

        assert_eq!(store.list_queries(Some("drone")).await.unwrap().len(), 1);
        assert_eq!(store.list_queries(Some("(2024)")).await.unwrap().len(), 1);
        assert_eq!(store.list_queries(Some(".*")).await.unwrap().len(), 0);
        assert_eq!(store.list_queries(None).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_upsert_merges_shallowly() {
        let store = MemoryStore::default();
        let outcome = store
            .insert_query(doc! { "product_name": "Drone X", "budget": 300, "user_info": { "email": "a@x.com", "name": "A" } })
            .await
            .unwrap();
        let id = ObjectId::parse_str(&outcome.inserted_id).unwrap();

        let updated = store
            .upsert_query(id, doc! { "budget": 450, "user_info": { "email": "a@x.com" } })
            .await
            .unwrap();
        assert_eq!(updated.matched_count, 1);
        assert_eq!(updated.modified_count, 1);
        assert_eq!(updated.upserted_id, None);

        let stored = store.get_query(id).await.unwrap().unwrap();
        assert_eq!(stored.get_str("product_name").unwrap(), "Drone X");
        assert_eq!(stored.get_i32("budget").unwrap(), 450);
        // nested objects are replaced, not merged
        assert!(stored.get_document("user_info").unwrap().get("name").is_none());

        let unchanged = store.upsert_query(id, doc! { "budget": 450 }).await.unwrap();
        assert_eq!(unchanged.modified_count, 0);
    }

    #[tokio::test]
    async fn test_upsert_inserts_unknown_id() {
        let store = MemoryStore::default();
        let id = ObjectId::new();

        let outcome = store.upsert_query(id, doc! { "product_name": "Tablet" }).await.unwrap();
        assert_eq!(outcome.matched_count, 0);
        assert_eq!(outcome.upserted_id, Some(id.to_hex()));

        let stored = store.get_query(id).await.unwrap().unwrap();
        assert_eq!(stored.get_str("product_name").unwrap(), "Tablet");
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryStore::default();
        let outcome = store.insert_query(query("Drone X", "a@x.com")).await.unwrap();
        let id = ObjectId::parse_str(&outcome.inserted_id).unwrap();

        assert_eq!(store.delete_query(id).await.unwrap().deleted_count, 1);
        assert_eq!(store.delete_query(id).await.unwrap().deleted_count, 0);
    }

    #[tokio::test]
    async fn test_recommendation_lookups() {
        let store = MemoryStore::default();
        store
            .insert_recommendation(doc! { "email": "rec@x.com", "query": { "query_email": "owner@x.com" } })
            .await
            .unwrap();
        store
            .insert_recommendation(doc! { "email": "other@x.com", "query": { "query_email": "owner@x.com" } })
            .await
            .unwrap();

        assert_eq!(store.recommendations_by_recommender("rec@x.com").await.unwrap().len(), 1);
        assert_eq!(store.recommendations_for_owner("owner@x.com").await.unwrap().len(), 2);
        assert!(store.recommendations_for_owner("rec@x.com").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_seeded_products_get_ids() {
        let store = MemoryStore::with_listed_products(vec![doc! { "name": "Headphones" }]);
        let products = store.list_listed_products().await.unwrap();

        assert_eq!(products.len(), 1);
        assert!(products[0].get_object_id("_id").is_ok());
    }
}
