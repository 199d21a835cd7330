//! ID generation utilities.

use ulid::Ulid;

/// ID generator for entities.
///
/// Every row in the marketplace (users, facilities, shifts, applications, ...)
/// is keyed by a lowercase ULID string.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new ULID-based ID.
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }
}
