//! Domain logic for the memorial platform.
//!
//! Everything here is free of I/O so it can be shared by the repository
//! layer, the HTTP server and tests alike.

pub mod cache;
pub mod error;
pub mod hashing;
pub mod invitation;
pub mod payment;
pub mod qr;
pub mod roles;
pub mod sitemap;
pub mod slug;
pub mod status;
pub mod types;
pub mod validation;
