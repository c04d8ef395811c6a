//! Axum HTTP API server for the Braderie marketplace.
//!
//! This crate provides:
//! - Offer listing with filter/sort/pagination, offer detail, offer publish
//! - Bearer-token credential checking against stored users
//! - Request logging, request IDs, and CORS

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
