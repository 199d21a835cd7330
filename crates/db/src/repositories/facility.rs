//! Facility repository.

use std::sync::Arc;

use crate::{
    db_error,
    entities::{Facility, facility},
};
use nurseshift_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

/// Facility repository for database operations.
#[derive(Clone)]
pub struct FacilityRepository {
    db: Arc<DatabaseConnection>,
}

impl FacilityRepository {
    /// Create a new facility repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a facility by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<facility::Model>> {
        Facility::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Get a facility by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<facility::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Facility: {id}")))
    }

    /// Find a facility by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<facility::Model>> {
        Facility::find()
            .filter(facility::Column::Email.eq(email.to_lowercase()))
            .one(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Find facilities by IDs.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<facility::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Facility::find()
            .filter(facility::Column::Id.is_in(ids.iter().cloned()))
            .all(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Create a new facility.
    pub async fn create(&self, model: facility::ActiveModel) -> AppResult<facility::Model> {
        model.insert(self.db.as_ref()).await.map_err(db_error)
    }
}
