//! Nurse profile repository.

use std::sync::Arc;

use crate::{
    db_error,
    entities::{NurseProfile, nurse_profile},
};
use nurseshift_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
};

/// Nurse profile repository for database operations.
#[derive(Clone)]
pub struct NurseProfileRepository {
    db: Arc<DatabaseConnection>,
}

impl NurseProfileRepository {
    /// Create a new nurse profile repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a profile by its own ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<nurse_profile::Model>> {
        NurseProfile::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Get a profile by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<nurse_profile::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("NurseProfile: {id}")))
    }

    /// Find the profile owned by a user.
    pub async fn find_by_user_id(&self, user_id: &str) -> AppResult<Option<nurse_profile::Model>> {
        NurseProfile::find()
            .filter(nurse_profile::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Get the profile owned by a user, returning an error if not found.
    pub async fn get_by_user_id(&self, user_id: &str) -> AppResult<nurse_profile::Model> {
        self.find_by_user_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Nurse profile not found".to_string()))
    }

    /// Find profiles by IDs.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<nurse_profile::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        NurseProfile::find()
            .filter(nurse_profile::Column::Id.is_in(ids.iter().cloned()))
            .all(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Create a new profile.
    pub async fn create(
        &self,
        model: nurse_profile::ActiveModel,
    ) -> AppResult<nurse_profile::Model> {
        Self::create_with(self.db.as_ref(), model).await
    }

    /// Create a new profile on an arbitrary connection or transaction.
    pub async fn create_with<C: ConnectionTrait>(
        conn: &C,
        model: nurse_profile::ActiveModel,
    ) -> AppResult<nurse_profile::Model> {
        model.insert(conn).await.map_err(db_error)
    }

    /// Update a profile.
    pub async fn update(
        &self,
        model: nurse_profile::ActiveModel,
    ) -> AppResult<nurse_profile::Model> {
        model.update(self.db.as_ref()).await.map_err(db_error)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_profile(id: &str, user_id: &str) -> nurse_profile::Model {
        nurse_profile::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            specialty: "ICU".to_string(),
            years_experience: 5,
            preferred_shift_type: None,
            preferred_distance: 25,
            min_hourly_rate: 60.0,
            max_hourly_rate: 95.0,
            bio: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_user_id() {
        let profile = create_test_profile("np1", "user1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[profile]])
                .into_connection(),
        );

        let repo = NurseProfileRepository::new(db);
        let found = repo.find_by_user_id("user1").await.unwrap().unwrap();

        assert_eq!(found.id, "np1");
        assert_eq!(found.specialty, "ICU");
    }

    #[tokio::test]
    async fn test_get_by_user_id_missing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<nurse_profile::Model>::new()])
                .into_connection(),
        );

        let repo = NurseProfileRepository::new(db);
        let result = repo.get_by_user_id("user1").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
