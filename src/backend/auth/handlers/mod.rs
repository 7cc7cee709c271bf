//! Authentication Handlers Module
//!
//! This module contains the HTTP handlers for authentication endpoints.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs      - Module exports and documentation
//! ├── types.rs    - Request and response types
//! ├── register.rs - User registration handler
//! ├── login.rs    - Login and logout handlers
//! └── me.rs       - Current user handlers
//! ```
//!
//! # Handlers
//!
//! - **`register`** - POST /register
//! - **`login`** - POST /login
//! - **`logout`** - POST /logout
//! - **`check_auth`** - GET /check-auth
//! - **`get_user_by_cookie`** - GET /getUserByCookie

/// Request and response types
pub mod types;

/// Register handler
pub mod register;

/// Login and logout handlers
pub mod login;

/// Current user handlers
pub mod me;

pub use types::{AuthResponse, LoginRequest, RegisterRequest, UpdateUserRequest, UserResponse};

pub use register::register;
pub use login::{login, logout};
pub use me::{check_auth, get_user_by_cookie};
