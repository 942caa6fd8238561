//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod community_repo;
pub mod event_repo;
pub mod notification_repo;
pub mod registration_repo;
pub mod reservation_repo;
pub mod user_repo;

pub use community_repo::CommunityRepo;
pub use event_repo::EventRepo;
pub use notification_repo::NotificationRepo;
pub use registration_repo::RegistrationRepo;
pub use reservation_repo::ReservationRepo;
pub use user_repo::UserRepo;
