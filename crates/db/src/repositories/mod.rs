//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod admin_user_repo;
pub mod dedication_repo;
pub mod descendant_repo;
pub mod family_user_repo;
pub mod funeral_home_repo;
pub mod lead_repo;
pub mod memorial_repo;
pub mod order_repo;
pub mod payment_repo;
pub mod photo_repo;
pub mod session_repo;
pub mod stats_repo;

pub use admin_user_repo::AdminUserRepo;
pub use dedication_repo::DedicationRepo;
pub use descendant_repo::DescendantRepo;
pub use family_user_repo::FamilyUserRepo;
pub use funeral_home_repo::FuneralHomeRepo;
pub use lead_repo::LeadRepo;
pub use memorial_repo::MemorialRepo;
pub use order_repo::OrderRepo;
pub use payment_repo::PaymentRepo;
pub use photo_repo::PhotoRepo;
pub use session_repo::SessionRepo;
pub use stats_repo::StatsRepo;
