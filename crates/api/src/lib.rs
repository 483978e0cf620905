//! Portal da Lembrança API server library.
//!
//! Exposes config, state, error handling, auth and routes so the binary
//! and the integration tests share one router.

pub mod access;
pub mod auth;
pub mod background;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod payments;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
