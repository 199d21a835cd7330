//! Core business logic for nurseshift.

pub mod formatting;
pub mod numeric;
pub mod services;

pub use services::*;
