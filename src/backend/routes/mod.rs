//! Routes Module
//!
//! Router assembly for the backend.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router, layers, static files, fallback
//! ├── chat_routes.rs  - Socket and chat history routes
//! └── api_routes.rs   - REST routes
//! ```
//!
//! # Dependencies
//!
//! - `backend::server::state` - Application state
//! - `backend::realtime` - Socket endpoint
//! - `backend::middleware` - Authentication

/// Main router creation
pub mod router;

/// Chat-related routes
pub mod chat_routes;

/// REST endpoints
pub mod api_routes;

pub use router::create_router;
