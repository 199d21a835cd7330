//! Typed client for the nurseshift API.
//!
//! [`ApiClient`] attaches the stored bearer token to every request and
//! transparently refreshes it once when the server answers 401. Sessions live
//! in a [`SessionStore`]: [`MemorySessionStore`] for the life of the process,
//! or [`FileSessionStore`] persisted as JSON between runs.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use nurseshift_client::{ApiClient, FileSessionStore, ShiftFilter};
//!
//! async fn example() -> nurseshift_client::ClientResult<()> {
//!     let store = Arc::new(FileSessionStore::new("session.json"));
//!     let client = ApiClient::new("http://localhost:3000/api", store)?;
//!     client.login("nurse@example.com", "password123").await?;
//!     let shifts = client.shifts(&ShiftFilter { urgent_only: true, ..Default::default() }).await?;
//!     println!("{} urgent shifts", shifts.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod models;
pub mod session;

pub use client::ApiClient;
pub use error::{ClientError, ClientResult};
pub use models::*;
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionKind, SessionStore};
