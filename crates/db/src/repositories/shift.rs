//! Shift repository.

use std::sync::Arc;

use crate::{
    db_error,
    entities::{
        Shift,
        shift::{self, ShiftStatus, ShiftType},
    },
};
use nurseshift_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, prelude::DateTimeWithTimeZone, sea_query::Expr,
};

/// Filters for the open-shift listing.
#[derive(Debug, Clone, Default)]
pub struct ShiftFilter {
    /// Exact specialty match.
    pub specialty: Option<String>,
    /// Exact shift type match.
    pub shift_type: Option<ShiftType>,
    /// Minimum hourly rate, inclusive.
    pub min_rate: Option<f64>,
    /// Only shifts flagged for urgent fill.
    pub urgent_only: bool,
    /// Only shifts posted by this facility.
    pub facility_id: Option<String>,
    /// Page size.
    pub limit: u64,
    /// Rows to skip.
    pub offset: u64,
}

/// Shift repository for database operations.
#[derive(Clone)]
pub struct ShiftRepository {
    db: Arc<DatabaseConnection>,
}

impl ShiftRepository {
    /// Create a new shift repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a shift by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<shift::Model>> {
        Self::find_by_id_with(self.db.as_ref(), id).await
    }

    /// Find a shift by ID on an arbitrary connection or transaction.
    pub async fn find_by_id_with<C: ConnectionTrait>(
        conn: &C,
        id: &str,
    ) -> AppResult<Option<shift::Model>> {
        Shift::find_by_id(id).one(conn).await.map_err(db_error)
    }

    /// Get a shift by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<shift::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Shift not found".to_string()))
    }

    /// Find shifts by IDs.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<shift::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Shift::find()
            .filter(shift::Column::Id.is_in(ids.iter().cloned()))
            .all(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// List open shifts matching the filter, urgent first then soonest first.
    pub async fn list_open(&self, filter: &ShiftFilter) -> AppResult<Vec<shift::Model>> {
        let mut condition = Condition::all().add(shift::Column::Status.eq(ShiftStatus::Open));

        if let Some(ref specialty) = filter.specialty {
            condition = condition.add(shift::Column::Specialty.eq(specialty.as_str()));
        }
        if let Some(shift_type) = filter.shift_type {
            condition = condition.add(shift::Column::ShiftType.eq(shift_type));
        }
        if let Some(min_rate) = filter.min_rate {
            condition = condition.add(shift::Column::HourlyRate.gte(min_rate));
        }
        if filter.urgent_only {
            condition = condition.add(shift::Column::UrgentFill.eq(true));
        }
        if let Some(ref facility_id) = filter.facility_id {
            condition = condition.add(shift::Column::FacilityId.eq(facility_id.as_str()));
        }

        Shift::find()
            .filter(condition)
            .order_by_desc(shift::Column::UrgentFill)
            .order_by_asc(shift::Column::StartTime)
            .limit(filter.limit)
            .offset(filter.offset)
            .all(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// List every shift a facility has posted, newest start first.
    pub async fn find_by_facility(&self, facility_id: &str) -> AppResult<Vec<shift::Model>> {
        Shift::find()
            .filter(shift::Column::FacilityId.eq(facility_id))
            .order_by_desc(shift::Column::StartTime)
            .all(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Create a new shift.
    pub async fn create(&self, model: shift::ActiveModel) -> AppResult<shift::Model> {
        model.insert(self.db.as_ref()).await.map_err(db_error)
    }

    /// Update a shift.
    pub async fn update(&self, model: shift::ActiveModel) -> AppResult<shift::Model> {
        Self::update_with(self.db.as_ref(), model).await
    }

    /// Update a shift on an arbitrary connection or transaction.
    pub async fn update_with<C: ConnectionTrait>(
        conn: &C,
        model: shift::ActiveModel,
    ) -> AppResult<shift::Model> {
        model.update(conn).await.map_err(db_error)
    }

    /// Move a shift from `from` to `to` if it is still in `from`.
    ///
    /// Returns `false` when another request changed the status first.
    pub async fn transition_with<C: ConnectionTrait>(
        conn: &C,
        id: &str,
        from: ShiftStatus,
        to: ShiftStatus,
    ) -> AppResult<bool> {
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        let result = Shift::update_many()
            .col_expr(shift::Column::Status, Expr::value(to))
            .col_expr(shift::Column::UpdatedAt, Expr::value(now))
            .filter(shift::Column::Id.eq(id))
            .filter(shift::Column::Status.eq(from))
            .exec(conn)
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected == 1)
    }

    /// Delete a shift by ID.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Shift::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(db_error)?;
        Ok(())
    }
}
