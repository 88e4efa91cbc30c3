//! Authentication module: token lifecycle and the request pipeline.
//!
//! - `service`: login, refresh, logout, and `authenticate` (the per-request
//!   pipeline)
//! - `controller`: thin HTTP handlers over the service
//! - `model`: request/response DTOs
//! - `router`: axum route wiring

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
