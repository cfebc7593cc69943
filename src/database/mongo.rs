use super::{search_pattern, DocumentStore};
use crate::models::{
    DeleteOutcome, InsertOutcome, UpdateOutcome, LISTED_PRODUCTS_COLLECTION, QUERIES_COLLECTION,
    QUERY_OWNER_FIELD, QUERY_OWNER_REF_FIELD, QUERY_PRODUCT_FIELD, RECOMMENDATIONS_COLLECTION,
    RECOMMENDER_FIELD,
};
use crate::utils::AppError;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::{Client, Collection, Database, IndexModel};
use std::time::Duration;

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    /// Builds the client and its connection pool.
    ///
    /// The driver connects lazily, so this does not fail when the cluster is
    /// unreachable; call [`DocumentStore::ping`] to check connectivity.
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, AppError> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        // Connection pool
        client_options.app_name = Some("electro-insight".to_string());
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(2);
        client_options.max_idle_time = Some(Duration::from_secs(300));

        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        Ok(Self { client, db })
    }

    /// Creates the secondary indexes used by the lookup-by-email routes.
    /// Failures are logged and ignored.
    pub async fn ensure_indexes(&self) {
        log::info!("🔧 Creating database indexes...");

        let indexes = [
            (QUERIES_COLLECTION, QUERY_OWNER_FIELD),
            (RECOMMENDATIONS_COLLECTION, RECOMMENDER_FIELD),
            (RECOMMENDATIONS_COLLECTION, QUERY_OWNER_REF_FIELD),
        ];

        for (collection, field) in indexes {
            let model = IndexModel::builder().keys(doc! { field: 1 }).build();

            match self.collection(collection).create_index(model).await {
                Ok(_) => log::info!("   ✅ Index ready: {}({})", collection, field),
                Err(e) => log::warn!("   ⚠️  Could not create index {}({}): {}", collection, field, e),
            }
        }
    }

    pub fn collection(&self, name: &str) -> Collection<Document> {
        self.db.collection(name)
    }

    async fn find_all(&self, collection: &str, filter: Document) -> Result<Vec<Document>, AppError> {
        let cursor = self.collection(collection).find(filter).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn insert(&self, collection: &str, document: Document) -> Result<InsertOutcome, AppError> {
        let result = self.collection(collection).insert_one(document).await?;

        Ok(InsertOutcome {
            acknowledged: true,
            inserted_id: bson_id_to_string(&result.inserted_id),
        })
    }
}

fn bson_id_to_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl DocumentStore for MongoDB {
    fn backend(&self) -> &'static str {
        "mongodb"
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }

    async fn insert_query(&self, query: Document) -> Result<InsertOutcome, AppError> {
        self.insert(QUERIES_COLLECTION, query).await
    }

    async fn list_queries(&self, search: Option<&str>) -> Result<Vec<Document>, AppError> {
        let filter = match search {
            Some(term) => doc! {
                QUERY_PRODUCT_FIELD: { "$regex": search_pattern(term), "$options": "i" }
            },
            None => doc! {},
        };
        self.find_all(QUERIES_COLLECTION, filter).await
    }

    async fn get_query(&self, id: ObjectId) -> Result<Option<Document>, AppError> {
        Ok(self
            .collection(QUERIES_COLLECTION)
            .find_one(doc! { "_id": id })
            .await?)
    }

    async fn queries_by_owner(&self, email: &str) -> Result<Vec<Document>, AppError> {
        self.find_all(QUERIES_COLLECTION, doc! { QUERY_OWNER_FIELD: email })
            .await
    }

    async fn upsert_query(&self, id: ObjectId, fields: Document) -> Result<UpdateOutcome, AppError> {
        // "$set" vazio é rejeitado pelo servidor
        let update = if fields.is_empty() {
            doc! { "$setOnInsert": { "_id": id } }
        } else {
            doc! { "$set": fields }
        };

        let result = self
            .collection(QUERIES_COLLECTION)
            .update_one(doc! { "_id": id }, update)
            .upsert(true)
            .await?;

        Ok(UpdateOutcome {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_id: result.upserted_id.as_ref().map(bson_id_to_string),
        })
    }

    async fn delete_query(&self, id: ObjectId) -> Result<DeleteOutcome, AppError> {
        let result = self
            .collection(QUERIES_COLLECTION)
            .delete_one(doc! { "_id": id })
            .await?;

        Ok(DeleteOutcome {
            acknowledged: true,
            deleted_count: result.deleted_count,
        })
    }

    async fn list_listed_products(&self) -> Result<Vec<Document>, AppError> {
        self.find_all(LISTED_PRODUCTS_COLLECTION, doc! {}).await
    }

    async fn insert_recommendation(&self, recommendation: Document) -> Result<InsertOutcome, AppError> {
        self.insert(RECOMMENDATIONS_COLLECTION, recommendation).await
    }

    async fn recommendations_by_recommender(&self, email: &str) -> Result<Vec<Document>, AppError> {
        self.find_all(RECOMMENDATIONS_COLLECTION, doc! { RECOMMENDER_FIELD: email })
            .await
    }

    async fn recommendations_for_owner(&self, email: &str) -> Result<Vec<Document>, AppError> {
        self.find_all(RECOMMENDATIONS_COLLECTION, doc! { QUERY_OWNER_REF_FIELD: email })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inserted_id_rendering() {
        let oid = ObjectId::new();
        assert_eq!(bson_id_to_string(&Bson::ObjectId(oid)), oid.to_hex());
        assert_eq!(bson_id_to_string(&Bson::String("custom".into())), "custom");
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_mongodb_round_trip() {
        dotenv::dotenv().ok();
        let uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

        let store = MongoDB::new(&uri, "electroInsight_test").await.unwrap();
        store.ping().await.unwrap();

        let inserted = store
            .insert_query(doc! { "product_name": "Drone X", "user_info": { "email": "it@x.com" } })
            .await
            .unwrap();
        let id = ObjectId::parse_str(&inserted.inserted_id).unwrap();

        assert!(store.get_query(id).await.unwrap().is_some());
        assert_eq!(store.delete_query(id).await.unwrap().deleted_count, 1);
        assert_eq!(store.delete_query(id).await.unwrap().deleted_count, 0);
    }
}
