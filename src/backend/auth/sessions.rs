/**
 * Session Management and JWT Tokens
 *
 * This module handles JWT token generation and validation for user sessions.
 * Tokens are HS256-signed with the configured secret and expire after the
 * configured number of hours. Clients present them either as
 * `Authorization: Bearer <token>` or as the `access_token` cookie.
 */

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::server::config::ServerConfig;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "access_token";

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// User ID
    pub sub: String,
    pub email: String,
    pub username: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

/// Signing secret and token lifetime
#[derive(Clone)]
pub struct SessionKeys {
    secret: Arc<str>,
    ttl_secs: u64,
}

impl SessionKeys {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            secret: Arc::from(secret),
            ttl_secs: ttl_hours.max(1) as u64 * 60 * 60,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(&config.jwt_secret, config.token_ttl_hours)
    }

    /// Token lifetime in seconds, also used as the cookie `Max-Age`
    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Create a JWT token for a user
    pub fn create_token(
        &self,
        user_id: Uuid,
        email: &str,
        username: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now().timestamp().max(0) as u64;

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            username: username.to_string(),
            exp: now + self.ttl_secs,
            iat: now,
        };

        let key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&Header::default(), &claims, &key)
    }

    /// Verify signature and expiry, returning the claims
    pub fn verify_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let key = DecodingKey::from_secret(self.secret.as_bytes());
        let token_data = decode::<Claims>(token, &key, &Validation::default())?;
        Ok(token_data.claims)
    }
}

/// `Set-Cookie` value carrying a session token
pub fn session_cookie(token: &str, max_age_secs: u64) -> String {
    format!(
        "{SESSION_COOKIE}={token}; HttpOnly; Path=/; SameSite=Lax; Max-Age={max_age_secs}"
    )
}

/// `Set-Cookie` value that expires the session cookie
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0")
}

/// Find the session token in a `Cookie` header value
pub fn token_from_cookie_header(header: &str) -> Option<&str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}
