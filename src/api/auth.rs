//! Caller identity
//!
//! Tokens are issued elsewhere. This module only verifies the Bearer JWT on
//! each request and exposes the caller's role, id and username to handlers.

use std::fmt;
use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest, HttpResponse, ResponseError};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::validation::ErrorResponse;

/// Authentication errors
#[derive(Debug)]
pub enum AuthError {
    /// No Authorization header
    MissingToken,

    /// Header is not "Bearer <token>"
    InvalidFormat,

    /// Signature, expiry or claim decoding failed
    InvalidToken(String),

    /// The verifier was not registered as app data
    NotConfigured,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "Missing bearer token"),
            AuthError::InvalidFormat => write!(f, "Invalid authorization header (expected 'Bearer <token>')"),
            AuthError::InvalidToken(msg) => write!(f, "Invalid token: {}", msg),
            AuthError::NotConfigured => write!(f, "Token verifier is not configured"),
        }
    }
}

impl std::error::Error for AuthError {}

impl ResponseError for AuthError {
    fn error_response(&self) -> HttpResponse {
        warn!("Authentication rejected: {}", self);
        match self {
            AuthError::NotConfigured => {
                HttpResponse::InternalServerError().json(ErrorResponse::new("Authentication unavailable"))
            }
            _ => HttpResponse::Unauthorized()
                .json(ErrorResponse::new("Unauthorized").with_message(self.to_string())),
        }
    }
}

/// Claims carried by caller tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i32,
    pub username: String,
    pub role: String,
    pub exp: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    User,
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        if value == "admin" {
            Role::Admin
        } else {
            Role::User
        }
    }
}

/// The authenticated caller of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub role: Role,
    pub user_id: i32,
    pub username: String,
}

impl CallerIdentity {
    pub fn new(role: Role, user_id: i32, username: impl Into<String>) -> Self {
        Self {
            role,
            user_id,
            username: username.into(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<Claims> for CallerIdentity {
    fn from(claims: Claims) -> Self {
        Self::new(Role::from(claims.role.as_str()), claims.user_id, claims.username)
    }
}

/// HS256 token verifier shared across workers
pub struct JwtAuth {
    key: DecodingKey,
    validation: Validation,
}

impl JwtAuth {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<CallerIdentity, AuthError> {
        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims.into())
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    /// Strip the "Bearer " prefix from an Authorization header value
    pub fn extract_token(auth_header: &str) -> Result<&str, AuthError> {
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidFormat)?
            .trim();
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        Ok(token)
    }
}

fn identify(req: &HttpRequest) -> Result<CallerIdentity, AuthError> {
    let auth = req
        .app_data::<web::Data<JwtAuth>>()
        .ok_or(AuthError::NotConfigured)?;
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidFormat)?;

    auth.validate_token(JwtAuth::extract_token(header)?)
}

impl FromRequest for CallerIdentity {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(identify(req))
    }
}

#[cfg(test)]
pub mod test_support {
    use jsonwebtoken::{encode, EncodingKey, Header};

    use super::Claims;

    pub const SECRET: &str = "test-secret-key";

    pub fn token_for(user_id: i32, username: &str, role: &str) -> String {
        let exp = (chrono::Utc::now().timestamp() + 3600) as u64;
        let claims = Claims {
            user_id,
            username: username.to_string(),
            role: role.to_string(),
            exp,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{token_for, SECRET};
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    #[test]
    fn test_valid_token_yields_identity() {
        let auth = JwtAuth::new(SECRET);
        let caller = auth.validate_token(&token_for(7, "alice", "user")).unwrap();
        assert_eq!(caller, CallerIdentity::new(Role::User, 7, "alice"));
    }

    #[test]
    fn test_admin_role_is_recognised() {
        let auth = JwtAuth::new(SECRET);
        let caller = auth.validate_token(&token_for(1, "root", "admin")).unwrap();
        assert!(caller.is_admin());
    }

    #[test]
    fn test_any_other_role_is_ordinary_user() {
        assert_eq!(Role::from("Admin"), Role::User);
        assert_eq!(Role::from("alumni"), Role::User);
        assert_eq!(Role::from(""), Role::User);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let auth = JwtAuth::new("another-secret");
        let result = auth.validate_token(&token_for(7, "alice", "user"));
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let claims = Claims {
            user_id: 7,
            username: "alice".to_string(),
            role: "user".to_string(),
            exp: (chrono::Utc::now().timestamp() - 3600) as u64,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let auth = JwtAuth::new(SECRET);
        assert!(matches!(auth.validate_token(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_extract_token() {
        assert_eq!(JwtAuth::extract_token("Bearer abc").unwrap(), "abc");
        assert!(matches!(JwtAuth::extract_token("Basic abc"), Err(AuthError::InvalidFormat)));
        assert!(matches!(JwtAuth::extract_token("Bearer "), Err(AuthError::MissingToken)));
    }
}
