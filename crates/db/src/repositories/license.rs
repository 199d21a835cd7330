//! License repository.

use std::sync::Arc;

use crate::{
    db_error,
    entities::{License, license},
};
use nurseshift_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};

/// License repository for database operations.
#[derive(Clone)]
pub struct LicenseRepository {
    db: Arc<DatabaseConnection>,
}

impl LicenseRepository {
    /// Create a new license repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a license that belongs to the given nurse.
    ///
    /// A license owned by someone else is reported as not found.
    pub async fn get_owned(&self, id: &str, nurse_id: &str) -> AppResult<license::Model> {
        License::find_by_id(id)
            .filter(license::Column::NurseId.eq(nurse_id))
            .one(self.db.as_ref())
            .await
            .map_err(db_error)?
            .ok_or_else(|| AppError::NotFound("License not found".to_string()))
    }

    /// List a nurse's licenses, soonest expiry first.
    pub async fn find_by_nurse_id(&self, nurse_id: &str) -> AppResult<Vec<license::Model>> {
        License::find()
            .filter(license::Column::NurseId.eq(nurse_id))
            .order_by_asc(license::Column::ExpiryDate)
            .all(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Create a new license.
    pub async fn create(&self, model: license::ActiveModel) -> AppResult<license::Model> {
        Self::create_with(self.db.as_ref(), model).await
    }

    /// Create a new license on an arbitrary connection or transaction.
    pub async fn create_with<C: ConnectionTrait>(
        conn: &C,
        model: license::ActiveModel,
    ) -> AppResult<license::Model> {
        model.insert(conn).await.map_err(db_error)
    }

    /// Update a license.
    pub async fn update(&self, model: license::ActiveModel) -> AppResult<license::Model> {
        model.update(self.db.as_ref()).await.map_err(db_error)
    }

    /// Delete a license by ID.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        License::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(db_error)?;
        Ok(())
    }
}
