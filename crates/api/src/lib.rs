//! HTTP API layer for cinelog.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: catalog, watchlist, discussion, and dashboard routers
//! - **Extractors**: authenticated-user extraction from request extensions
//! - **Middleware**: session-cookie authentication
//! - **Response**: the `{success, message?, ...}` JSON envelope
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
