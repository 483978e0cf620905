//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the account behind a JWT Bearer token.
//! - [`auth::OptionalAuthUser`] -- same, but anonymous requests pass.
//! - [`rbac::RequireAdmin`] -- requires the `admin` role.
//! - [`rbac::RequireFuneralHome`] -- requires `funeral_home` or `admin`.

pub mod auth;
pub mod rbac;
