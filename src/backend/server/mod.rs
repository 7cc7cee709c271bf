//! Server Module
//!
//! This module contains the code that initializes and configures the Axum
//! HTTP server.
//!
//! # Architecture
//!
//! - **`config`** - Environment configuration and database loading
//! - **`state`** - Application state structure and `FromRef` implementations
//! - **`init`** - Server initialization and app creation
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── config.rs       - ServerConfig, database loading
//! ├── state.rs        - AppState and FromRef implementations
//! └── init.rs         - Server initialization and app creation
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Configuration Loading**: `ServerConfig::from_env()`
//! 2. **Database**: optional pool plus migrations
//! 3. **State Creation**: directory, relay, lifecycle handler, session keys
//! 4. **Router Creation**: routes and middleware
//!
//! # Example
//!
//! ```rust,no_run
//! use agora::backend::server::{config::ServerConfig, create_app};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! let (app, state) = create_app(&config).await;
//! let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
//! axum::serve(listener, app).await?;
//! state.directory.clear();
//! # Ok(())
//! # }
//! ```

/// Server configuration loading
pub mod config;

/// Application state management
pub mod state;

/// Server initialization
pub mod init;

pub use config::{ConfigError, ServerConfig};
pub use init::create_app;
pub use state::AppState;
