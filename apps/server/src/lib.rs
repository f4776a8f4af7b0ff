//! JSON API server for Materia.
//!
//! The binary lives in `main.rs`; the router is exposed here so integration
//! tests can drive it in-process with `tower::ServiceExt::oneshot`.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
