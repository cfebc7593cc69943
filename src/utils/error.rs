use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use mongodb::error::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized access")]
    Unauthorized,

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("invalid identifier: {0}")]
    BadIdentifier(String),

    #[error("invalid request body: {0}")]
    InvalidBody(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("database unavailable: {0}")]
    StoreUnavailable(String),

    #[error("database error: {0}")]
    Store(String),

    #[error("token error: {0}")]
    Token(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Stable machine-readable kind, sent as the `error` field.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "unauthorized",
            AppError::Forbidden(_) => "forbidden",
            AppError::BadIdentifier(_) => "bad_identifier",
            AppError::InvalidBody(_) => "invalid_body",
            AppError::NotFound(_) => "not_found",
            AppError::StoreUnavailable(_) => "store_unavailable",
            AppError::Store(_) => "store_error",
            AppError::Token(_) => "token_error",
            AppError::Config(_) => "config_error",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::BadIdentifier(_) | AppError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Store(_) | AppError::Token(_) | AppError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "success": false,
            "error": self.kind(),
            "message": self.to_string()
        }))
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        match err.kind.as_ref() {
            ErrorKind::ServerSelection { .. } | ErrorKind::Io(_) => {
                AppError::StoreUnavailable(err.to_string())
            }
            _ => AppError::Store(err.to_string()),
        }
    }
}

impl From<mongodb::bson::ser::Error> for AppError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        AppError::InvalidBody(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        AppError::Token(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::BadIdentifier("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotFound("q".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::StoreUnavailable("down".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::Store("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_driver_io_error_is_unavailable() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let err = AppError::from(mongodb::error::Error::from(io));

        assert!(matches!(err, AppError::StoreUnavailable(_)));
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.kind(), "store_unavailable");
    }

    #[actix_web::test]
    async fn test_unauthorized_body() {
        let res = AppError::Unauthorized.error_response();
        let body = to_bytes(res.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "unauthorized");
        assert_eq!(json["message"], "unauthorized access");
    }
}
