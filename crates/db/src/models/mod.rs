//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A create DTO for inserts
//! - An update DTO (all `Option` fields) for patches

pub mod admin_user;
pub mod dedication;
pub mod descendant;
pub mod family_user;
pub mod funeral_home;
pub mod lead;
pub mod memorial;
pub mod order;
pub mod payment;
pub mod photo;
pub mod session;
pub mod stats;
