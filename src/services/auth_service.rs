use crate::utils::AppError;
use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

pub const TOKEN_COOKIE: &str = "token";
pub const TOKEN_TTL_DAYS: i64 = 186;

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub iat: usize, // issued at
    pub exp: usize, // expiration
    pub jti: String,
    /// Any other claim the client sent when the token was issued
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Mints and checks the session token, and builds the cookie that carries it.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    secure_cookies: bool,
}

impl TokenService {
    /// `production` switches the cookie to `Secure` + `SameSite=None`
    /// so the deployed frontend can send it cross-site.
    pub fn new(secret: &str, production: bool) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            secure_cookies: production,
        }
    }

    /// Signs an arbitrary claims object, stamping `iat`, `exp` and `jti`.
    /// Client-supplied registered claims (`iat`, `exp`, `jti`, `nbf`, `aud`) are dropped.
    pub fn issue(&self, payload: Value) -> Result<String, AppError> {
        let Value::Object(mut extra) = payload else {
            return Err(AppError::InvalidBody("token payload must be a JSON object".to_string()));
        };

        for reserved in ["iat", "exp", "jti", "nbf", "aud"] {
            extra.remove(reserved);
        }

        let email = match extra.remove("email") {
            None | Some(Value::Null) => None,
            Some(Value::String(email)) => Some(email),
            Some(_) => {
                return Err(AppError::InvalidBody("'email' claim must be a string".to_string()))
            }
        };

        let now = Utc::now();
        let claims = Claims {
            email,
            iat: now.timestamp() as usize,
            exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
            extra,
        };

        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Checks signature and expiry. Every failure is reported as `Unauthorized`.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|e| {
                log::debug!("token rejected: {}", e);
                AppError::Unauthorized
            })
    }

    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        self.cookie(token, CookieDuration::days(TOKEN_TTL_DAYS))
    }

    /// Overwrites the session cookie with an already-expired empty value.
    pub fn removal_cookie(&self) -> Cookie<'static> {
        self.cookie(String::new(), CookieDuration::ZERO)
    }

    fn cookie(&self, value: String, max_age: CookieDuration) -> Cookie<'static> {
        let same_site = if self.secure_cookies {
            SameSite::None
        } else {
            SameSite::Strict
        };

        Cookie::build(TOKEN_COOKIE, value)
            .path("/")
            .http_only(true)
            .secure(self.secure_cookies)
            .same_site(same_site)
            .max_age(max_age)
            .finish()
    }
}
