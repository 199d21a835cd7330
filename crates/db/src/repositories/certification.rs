//! Certification repository.

use std::sync::Arc;

use crate::{
    db_error,
    entities::{Certification, certification},
};
use nurseshift_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};

/// Certification repository for database operations.
#[derive(Clone)]
pub struct CertificationRepository {
    db: Arc<DatabaseConnection>,
}

impl CertificationRepository {
    /// Create a new certification repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a certification that belongs to the given nurse.
    pub async fn get_owned(&self, id: &str, nurse_id: &str) -> AppResult<certification::Model> {
        Certification::find_by_id(id)
            .filter(certification::Column::NurseId.eq(nurse_id))
            .one(self.db.as_ref())
            .await
            .map_err(db_error)?
            .ok_or_else(|| AppError::NotFound("Certification not found".to_string()))
    }

    /// List a nurse's certifications, soonest expiry first.
    pub async fn find_by_nurse_id(&self, nurse_id: &str) -> AppResult<Vec<certification::Model>> {
        Certification::find()
            .filter(certification::Column::NurseId.eq(nurse_id))
            .order_by_asc(certification::Column::ExpiryDate)
            .all(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Create a new certification.
    pub async fn create(
        &self,
        model: certification::ActiveModel,
    ) -> AppResult<certification::Model> {
        Self::create_with(self.db.as_ref(), model).await
    }

    /// Create a new certification on an arbitrary connection or transaction.
    pub async fn create_with<C: ConnectionTrait>(
        conn: &C,
        model: certification::ActiveModel,
    ) -> AppResult<certification::Model> {
        model.insert(conn).await.map_err(db_error)
    }

    /// Update a certification.
    pub async fn update(
        &self,
        model: certification::ActiveModel,
    ) -> AppResult<certification::Model> {
        model.update(self.db.as_ref()).await.map_err(db_error)
    }

    /// Delete a certification by ID.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Certification::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(db_error)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::certification::CredentialStatus;
    use chrono::{NaiveDate, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_find_by_nurse_id() {
        let cert = certification::Model {
            id: "cert1".to_string(),
            nurse_id: "np1".to_string(),
            certification_name: "BLS".to_string(),
            issuing_organization: "American Heart Association".to_string(),
            certification_number: None,
            issue_date: None,
            expiry_date: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
            status: CredentialStatus::Active,
            is_verified: true,
            document_url: None,
            created_at: Utc::now().into(),
            updated_at: None,
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[cert]])
                .into_connection(),
        );

        let repo = CertificationRepository::new(db);
        let certs = repo.find_by_nurse_id("np1").await.unwrap();

        assert_eq!(certs.len(), 1);
        assert_eq!(certs[0].certification_name, "BLS");
    }

    #[tokio::test]
    async fn test_get_owned_missing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<certification::Model>::new()])
                .into_connection(),
        );

        let repo = CertificationRepository::new(db);
        let result = repo.get_owned("cert1", "np1").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
