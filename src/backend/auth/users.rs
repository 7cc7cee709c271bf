/**
 * User Model and Database Operations
 *
 * This module handles user data and database operations. The `chats`
 * column is owned by `chat::store` and is never loaded into `User`.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, username, name, age, email, password_hash, created_at, updated_at";

/// User struct representing a user in the database
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID)
    pub id: Uuid,
    /// Username (unique, 3-30 chars, alphanumeric + underscore)
    pub username: String,
    /// Display name
    pub name: String,
    pub age: Option<i32>,
    /// User email address (unique)
    pub email: String,
    /// Hashed password (bcrypt)
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to insert a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub name: String,
    pub age: Option<i32>,
    pub email: String,
    pub password_hash: String,
}

/// Partial profile update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub name: Option<String>,
    pub age: Option<i32>,
}

/// Create a new user
///
/// A duplicate username or email surfaces as a unique-violation
/// `sqlx::Error`.
pub async fn create_user(pool: &PgPool, new_user: NewUser) -> Result<User, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let query = format!(
        r#"
        INSERT INTO users (id, username, name, age, email, password_hash, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
        RETURNING {USER_COLUMNS}
        "#
    );

    sqlx::query_as::<_, User>(&query)
        .bind(id)
        .bind(&new_user.username)
        .bind(&new_user.name)
        .bind(new_user.age)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(now)
        .fetch_one(pool)
        .await
}

/// Get user by email
pub async fn get_user_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
    sqlx::query_as::<_, User>(&query)
        .bind(email)
        .fetch_optional(pool)
        .await
}

/// Get user by username
pub async fn get_user_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, sqlx::Error> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
    sqlx::query_as::<_, User>(&query)
        .bind(username)
        .fetch_optional(pool)
        .await
}

/// Get user by ID
pub async fn get_user_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
    sqlx::query_as::<_, User>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn user_exists(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await
}

/// All users, newest first
pub async fn list_users(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
    let query = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC");
    sqlx::query_as::<_, User>(&query).fetch_all(pool).await
}

/// Apply a partial update, returning the updated user
pub async fn update_user(pool: &PgPool, id: Uuid, changes: UserChanges) -> Result<Option<User>, sqlx::Error> {
    let query = format!(
        r#"
        UPDATE users
        SET username = COALESCE($2, username),
            name = COALESCE($3, name),
            age = COALESCE($4, age),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {USER_COLUMNS}
        "#
    );

    sqlx::query_as::<_, User>(&query)
        .bind(id)
        .bind(changes.username)
        .bind(changes.name)
        .bind(changes.age)
        .fetch_optional(pool)
        .await
}

/// Delete a user; posts, comments, votes and follows cascade
///
/// Returns `false` when no such user existed.
pub async fn delete_user(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
