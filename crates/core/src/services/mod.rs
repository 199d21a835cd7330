//! Business logic services.

#![allow(missing_docs)]

pub mod application;
pub mod auth;
pub mod facility;
pub mod nurse;
pub mod shift;
pub mod token;
pub mod work_history;

pub use application::{ApplicationService, ApplicationWithShift};
pub use auth::{AuthService, AuthSession};
pub use facility::{FacilityService, FacilitySession};
pub use nurse::{NurseProfileDetails, NurseService};
pub use shift::{Applicant, ShiftListing, ShiftService};
pub use token::{Claims, Principal, PrincipalKind, TokenKind, TokenPair, TokenService};
pub use work_history::{EarningsSummary, WorkEntry, WorkHistoryService};
