use crate::utils::AppError;
use std::env;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DATABASE: &str = "electroInsight";
const DEFAULT_ORIGINS: &[&str] = &[
    "http://localhost:5173",
    "https://electro-insight.web.app",
    "https://electro-insight.firebaseapp.com",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    MongoDB,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    /// Only set for the MongoDB backend.
    pub mongodb_uri: Option<String>,
    pub database_name: String,
    pub token_secret: String,
    pub production: bool,
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match var("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| AppError::Config(format!("invalid PORT '{}': {}", raw, e)))?,
            None => DEFAULT_PORT,
        };

        let storage = match var("STORAGE_BACKEND").as_deref() {
            None | Some("mongodb") => StorageBackend::MongoDB,
            Some("memory") => StorageBackend::Memory,
            Some(other) => {
                return Err(AppError::Config(format!(
                    "unknown STORAGE_BACKEND '{}' (expected 'mongodb' or 'memory')",
                    other
                )))
            }
        };

        let mongodb_uri = match storage {
            StorageBackend::Memory => None,
            StorageBackend::MongoDB => Some(match var("MONGODB_URI") {
                Some(uri) => uri,
                None => match (var("DB_USER"), var("DB_PASS")) {
                    (Some(user), Some(pass)) => atlas_uri(&user, &pass),
                    _ => {
                        return Err(AppError::Config(
                            "MONGODB_URI or DB_USER/DB_PASS must be set".to_string(),
                        ))
                    }
                },
            }),
        };

        let token_secret = match (var("ACCESS_TOKEN_SECRET"), storage) {
            (Some(secret), _) => secret,
            (None, StorageBackend::Memory) => {
                log::warn!("⚠️  ACCESS_TOKEN_SECRET not set, using an ephemeral secret");
                uuid::Uuid::new_v4().to_string()
            }
            (None, StorageBackend::MongoDB) => {
                return Err(AppError::Config("ACCESS_TOKEN_SECRET must be set".to_string()))
            }
        };

        let production = var("NODE_ENV")
            .or_else(|| var("APP_ENV"))
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let allowed_origins = match var("ALLOWED_ORIGINS") {
            Some(list) => list
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
            None => DEFAULT_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        Ok(Self {
            host,
            port,
            storage,
            mongodb_uri,
            database_name: var("DATABASE_NAME").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            token_secret,
            production,
            allowed_origins,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn atlas_uri(user: &str, pass: &str) -> String {
    format!(
        "mongodb+srv://{}:{}@cluster0.2evw8as.mongodb.net/?retryWrites=true&w=majority&appName=Cluster0",
        user, pass
    )
}
