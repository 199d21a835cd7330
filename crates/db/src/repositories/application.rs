//! Application repository.

use std::sync::Arc;

use crate::{
    db_error,
    entities::{
        Application,
        application::{self, ApplicationStatus},
    },
};
use nurseshift_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, prelude::DateTimeWithTimeZone, sea_query::Expr,
};

/// Application repository for database operations.
#[derive(Clone)]
pub struct ApplicationRepository {
    db: Arc<DatabaseConnection>,
}

impl ApplicationRepository {
    /// Create a new application repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an application by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<application::Model>> {
        Self::find_by_id_with(self.db.as_ref(), id).await
    }

    /// Find an application by ID on an arbitrary connection or transaction.
    pub async fn find_by_id_with<C: ConnectionTrait>(
        conn: &C,
        id: &str,
    ) -> AppResult<Option<application::Model>> {
        Application::find_by_id(id)
            .one(conn)
            .await
            .map_err(db_error)
    }

    /// Get an application by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<application::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Application not found".to_string()))
    }

    /// Find the nurse's pending or approved application for a shift, if any.
    pub async fn find_active(
        &self,
        nurse_id: &str,
        shift_id: &str,
    ) -> AppResult<Option<application::Model>> {
        Application::find()
            .filter(application::Column::NurseId.eq(nurse_id))
            .filter(application::Column::ShiftId.eq(shift_id))
            .filter(application::Column::Status.is_in(ApplicationStatus::blocking()))
            .one(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// List a nurse's applications, newest first.
    pub async fn find_by_nurse(&self, nurse_id: &str) -> AppResult<Vec<application::Model>> {
        Application::find()
            .filter(application::Column::NurseId.eq(nurse_id))
            .order_by_desc(application::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// List a nurse's applications in one status.
    pub async fn find_by_nurse_and_status(
        &self,
        nurse_id: &str,
        status: ApplicationStatus,
    ) -> AppResult<Vec<application::Model>> {
        Application::find()
            .filter(application::Column::NurseId.eq(nurse_id))
            .filter(application::Column::Status.eq(status))
            .all(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// List applications for a shift, oldest first.
    pub async fn find_by_shift(&self, shift_id: &str) -> AppResult<Vec<application::Model>> {
        Application::find()
            .filter(application::Column::ShiftId.eq(shift_id))
            .order_by_asc(application::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Create a new application.
    ///
    /// A concurrent duplicate trips the partial unique index and surfaces
    /// as `Conflict`.
    pub async fn create(&self, model: application::ActiveModel) -> AppResult<application::Model> {
        model.insert(self.db.as_ref()).await.map_err(db_error)
    }

    /// Update an application.
    pub async fn update(&self, model: application::ActiveModel) -> AppResult<application::Model> {
        Self::update_with(self.db.as_ref(), model).await
    }

    /// Update an application on an arbitrary connection or transaction.
    pub async fn update_with<C: ConnectionTrait>(
        conn: &C,
        model: application::ActiveModel,
    ) -> AppResult<application::Model> {
        model.update(conn).await.map_err(db_error)
    }

    /// Move an application from `from` to `to`.
    ///
    /// The status is compared in the `UPDATE` itself, so only one of several
    /// concurrent transitions out of the same status wins. Returns `false`
    /// when the row was no longer in `from`.
    pub async fn transition(
        &self,
        id: &str,
        from: ApplicationStatus,
        to: ApplicationStatus,
    ) -> AppResult<bool> {
        Self::transition_with(self.db.as_ref(), id, from, to).await
    }

    /// [`Self::transition`] on an arbitrary connection or transaction.
    pub async fn transition_with<C: ConnectionTrait>(
        conn: &C,
        id: &str,
        from: ApplicationStatus,
        to: ApplicationStatus,
    ) -> AppResult<bool> {
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        let result = Application::update_many()
            .col_expr(application::Column::Status, Expr::value(to))
            .col_expr(application::Column::UpdatedAt, Expr::value(now))
            .filter(application::Column::Id.eq(id))
            .filter(application::Column::Status.eq(from))
            .exec(conn)
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected == 1)
    }
}
