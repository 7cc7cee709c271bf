//! Authentication Module
//!
//! This module handles user registration, login, and session management.
//!
//! # Architecture
//!
//! - **`users`** - User data model and database operations
//! - **`sessions`** - JWT token generation and validation, session cookie
//! - **`handlers`** - HTTP handlers for authentication endpoints
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── users.rs        - User model and database operations
//! ├── sessions.rs     - JWT token management
//! └── handlers/       - HTTP handlers
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Register**: username, name, age, email, password → user created
//! 2. **Login**: email and password verified → JWT returned and set as the `access_token` cookie
//! 3. **Protected routes**: token read from `Authorization: Bearer` or the cookie
//! 4. **Logout**: cookie expired
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt before storage
//! - Tokens expire after `TOKEN_TTL_HOURS` (default 3)
//! - Invalid credentials return 401 without saying which part was wrong

/// User data model and database operations
pub mod users;

/// JWT token generation and validation
pub mod sessions;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use handlers::types::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};
pub use handlers::{check_auth, get_user_by_cookie, login, logout, register};
pub use sessions::{Claims, SessionKeys};
