//! Souqly client - Rust client for the Souq marketplace REST API.
//!
//! The crate is built around one piece: [`ApiClient`], an authenticated
//! JSON-over-HTTP client that attaches the session's bearer token and
//! recovers exactly once from token expiry (one refresh, one retry).
//! Everything else is a thin typed wrapper over backend endpoints:
//! products, categories, search, users, subscriptions, recommendations,
//! reports and wallet.
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use souqly_client::{ApiClient, ApiConfig, SqliteTokenStore};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = ApiConfig::from_env()?;
//! let store = Arc::new(SqliteTokenStore::open(&config.token_db));
//! let client = ApiClient::new(config, store)?;
//!
//! client.login("seller@example.com", "secret").await?;
//! let favorites = client.products().favorites().await?;
//! # Ok(())
//! # }
//! ```

// Core: configuration, errors, session storage, the HTTP client
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod session;

// Query-string assembly shared by the listing endpoints
mod query;

// Typed endpoint wrappers
pub mod categories;
pub mod products;
pub mod recommendations;
pub mod reports;
pub mod search;
pub mod subscriptions;
pub mod users;
pub mod wallet;

// Re-export commonly used types
pub use client::{ApiClient, Auth};
pub use config::{ApiArgs, ApiConfig, Environment};
pub use error::ApiError;
pub use session::{MemoryTokenStore, Session, SqliteTokenStore, TokenStore};
