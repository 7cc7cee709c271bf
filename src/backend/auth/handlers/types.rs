/**
 * Authentication Handler Types
 *
 * This module defines the request and response types used by the
 * authentication and user handlers.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::auth::users::User;
use crate::shared::SharedError;

/// Register request
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RegisterRequest {
    /// User's chosen username (3-30 chars, alphanumeric + underscore)
    pub username: String,
    /// Display name
    pub name: String,
    #[serde(default)]
    pub age: Option<i32>,
    pub email: String,
    /// User's password (will be hashed before storage)
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), SharedError> {
        validate_username(&self.username)?;
        if self.name.trim().is_empty() {
            return Err(SharedError::validation("name", "Name is required"));
        }
        validate_age(self.age)?;
        let email = self.email.trim();
        if email.len() < 3 || !email.contains('@') {
            return Err(SharedError::validation("email", "Invalid email address"));
        }
        if self.password.chars().count() < 6 {
            return Err(SharedError::validation("password", "Password must be at least 6 characters"));
        }
        Ok(())
    }
}

fn validate_username(username: &str) -> Result<(), SharedError> {
    let len = username.chars().count();
    if !(3..=30).contains(&len) {
        return Err(SharedError::validation("username", "Username must be 3-30 characters"));
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(SharedError::validation(
            "username",
            "Username may only contain letters, digits and underscores",
        ));
    }
    Ok(())
}

fn validate_age(age: Option<i32>) -> Result<(), SharedError> {
    match age {
        Some(age) if !(0..=150).contains(&age) => Err(SharedError::validation("age", "Age is out of range")),
        _ => Ok(()),
    }
}

/// Login request
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    /// User's password (will be verified against stored hash)
    pub password: String,
}

/// Body of `PUT /editUser`
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<i32>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), SharedError> {
        if let Some(username) = &self.username {
            validate_username(username)?;
        }
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(SharedError::validation("name", "Name must not be empty"));
            }
        }
        validate_age(self.age)
    }
}

/// Returned by `/login`. The same token is also set as a cookie.
#[derive(Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// User response (without sensitive data)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub age: Option<i32>,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            name: user.name,
            age: user.age,
            email: user.email,
            created_at: user.created_at,
        }
    }
}
