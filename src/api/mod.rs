//! HTTP API layer.
//!
//! - [`server`] - axum router and endpoint handlers
//! - [`types`] - request/response types for the frontend
//! - [`logs`] - broadcast log channel streamed over SSE

pub mod logs;
pub mod server;
pub mod types;
