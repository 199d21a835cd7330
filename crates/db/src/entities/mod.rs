//! Database entities.

pub mod application;
pub mod certification;
pub mod facility;
pub mod license;
pub mod nurse_profile;
pub mod shift;
pub mod user;

pub use application::Entity as Application;
pub use certification::Entity as Certification;
pub use facility::Entity as Facility;
pub use license::Entity as License;
pub use nurse_profile::Entity as NurseProfile;
pub use shift::Entity as Shift;
pub use user::Entity as User;
