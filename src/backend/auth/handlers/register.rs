/**
 * Register Handler
 *
 * This module implements the user registration handler for POST /register.
 *
 * # Registration Process
 *
 * 1. Validate username, name, age, email and password
 * 2. Reject a taken username or email with 409
 * 3. Hash password using bcrypt
 * 4. Insert the user
 *
 * No session is created; the client logs in afterwards.
 */
use axum::{extract::State, response::Json};
use bcrypt::{hash, DEFAULT_COST};
use sqlx::PgPool;

use crate::backend::auth::handlers::types::RegisterRequest;
use crate::backend::auth::users::{create_user, get_user_by_email, get_user_by_username, NewUser};
use crate::backend::error::BackendError;
use crate::backend::server::state::require_pool;
use crate::shared::forum::MessageResponse;

/// Register handler
///
/// # Errors
///
/// * `400 Bad Request` - If any field fails validation
/// * `409 Conflict` - If the username or email is already registered
/// * `503 Service Unavailable` - If database is not configured
///
/// # Example Request
///
/// ```http
/// POST /register HTTP/1.1
/// Content-Type: application/json
///
/// {
///   "username": "ada_l",
///   "name": "Ada",
///   "age": 36,
///   "email": "ada@example.com",
///   "password": "analytical"
/// }
/// ```
pub async fn register(
    State(pool): State<Option<PgPool>>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<MessageResponse>, BackendError> {
    request.validate()?;
    let pool = require_pool(pool)?;

    let username = request.username.trim().to_string();
    let email = request.email.trim().to_lowercase();
    tracing::info!("Register request for: {}", username);

    if get_user_by_username(&pool, &username).await?.is_some() {
        tracing::warn!("Username already taken: {}", username);
        return Err(BackendError::conflict("Username already exists"));
    }
    if get_user_by_email(&pool, &email).await?.is_some() {
        tracing::warn!("Email already registered: {}", email);
        return Err(BackendError::conflict("Email already exists"));
    }

    let password_hash = hash(&request.password, DEFAULT_COST).map_err(|e| {
        tracing::error!("Failed to hash password: {:?}", e);
        BackendError::internal("Failed to create user")
    })?;

    let user = create_user(
        &pool,
        NewUser {
            username,
            name: request.name.trim().to_string(),
            age: request.age,
            email,
            password_hash,
        },
    )
    .await?;

    tracing::info!("User registered: {} ({})", user.username, user.id);
    Ok(Json(MessageResponse::new("User registered successfully")))
}
