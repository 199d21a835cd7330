//! Repositories wrapping sea-orm queries per entity.

mod application;
mod certification;
mod facility;
mod license;
mod nurse_profile;
mod shift;
mod user;

pub use application::ApplicationRepository;
pub use certification::CertificationRepository;
pub use facility::FacilityRepository;
pub use license::LicenseRepository;
pub use nurse_profile::NurseProfileRepository;
pub use shift::{ShiftFilter, ShiftRepository};
pub use user::UserRepository;
