//! Application lifecycle.
//!
//! `pending` moves to exactly one of `approved`, `rejected` or `withdrawn`
//! and never leaves it. Approval assigns the shift in the same transaction.

use std::{collections::HashMap, sync::Arc};

use chrono_tz::Tz;
use nurseshift_common::{AppError, AppResult};
use nurseshift_db::{
    db_error,
    entities::{
        application::{self, ApplicationStatus},
        shift::{self, ShiftStatus},
    },
    repositories::{ApplicationRepository, NurseProfileRepository, ShiftRepository},
};
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use super::{shift::ensure_shift_manager, token::Principal};
use crate::formatting::ShiftDisplay;

/// An application with the shift it targets.
#[derive(Debug, Clone)]
pub struct ApplicationWithShift {
    pub application: application::Model,
    pub shift: Option<shift::Model>,
    pub display: Option<ShiftDisplay>,
}

/// Application service for business logic.
#[derive(Clone)]
pub struct ApplicationService {
    db: Arc<DatabaseConnection>,
    application_repo: ApplicationRepository,
    shift_repo: ShiftRepository,
    profile_repo: NurseProfileRepository,
    timezone: Tz,
}

impl ApplicationService {
    /// Create a new application service.
    #[must_use]
    pub const fn new(
        db: Arc<DatabaseConnection>,
        application_repo: ApplicationRepository,
        shift_repo: ShiftRepository,
        profile_repo: NurseProfileRepository,
        timezone: Tz,
    ) -> Self {
        Self {
            db,
            application_repo,
            shift_repo,
            profile_repo,
            timezone,
        }
    }

    /// Nurse profile ID of the calling user, if they have one.
    async fn caller_profile_id(&self, principal: &Principal) -> AppResult<Option<String>> {
        match principal.user_id() {
            Some(user_id) => Ok(self
                .profile_repo
                .find_by_user_id(user_id)
                .await?
                .map(|p| p.id)),
            None => Ok(None),
        }
    }

    fn attach(
        &self,
        application: application::Model,
        shift: Option<shift::Model>,
    ) -> ApplicationWithShift {
        let display = shift.as_ref().map(|s| {
            ShiftDisplay::compute(&s.start_time, &s.end_time, s.hourly_rate, self.timezone)
        });
        ApplicationWithShift {
            application,
            shift,
            display,
        }
    }

    /// One application, visible to its nurse, the shift's facility and admins.
    pub async fn get(&self, principal: &Principal, id: &str) -> AppResult<ApplicationWithShift> {
        let application = self.application_repo.get_by_id(id).await?;
        let shift = self.shift_repo.get_by_id(&application.shift_id).await?;

        let is_owner = self.caller_profile_id(principal).await?.as_deref()
            == Some(application.nurse_id.as_str());
        if !is_owner && ensure_shift_manager(principal, &shift).is_err() {
            return Err(AppError::Forbidden("Access denied".to_string()));
        }

        Ok(self.attach(application, Some(shift)))
    }

    /// The calling nurse's applications, newest first.
    pub async fn list_mine(&self, principal: &Principal) -> AppResult<Vec<ApplicationWithShift>> {
        if principal.user_id().is_none() {
            return Err(AppError::Forbidden("Only nurses have applications".to_string()));
        }
        let Some(nurse_id) = self.caller_profile_id(principal).await? else {
            return Ok(vec![]);
        };

        let applications = self.application_repo.find_by_nurse(&nurse_id).await?;
        let shift_ids: Vec<String> = applications.iter().map(|a| a.shift_id.clone()).collect();
        let shifts: HashMap<String, shift::Model> = self
            .shift_repo
            .find_by_ids(&shift_ids)
            .await?
            .into_iter()
            .map(|s| (s.id.clone(), s))
            .collect();

        Ok(applications
            .into_iter()
            .map(|a| {
                let shift = shifts.get(&a.shift_id).cloned();
                self.attach(a, shift)
            })
            .collect())
    }

    /// Move an application to a new status.
    pub async fn update_status(
        &self,
        principal: &Principal,
        id: &str,
        status: &str,
    ) -> AppResult<application::Model> {
        let target: ApplicationStatus = status.parse()?;
        if target == ApplicationStatus::Pending {
            return Err(AppError::BadRequest(
                "Cannot move an application back to pending".to_string(),
            ));
        }

        let application = self.application_repo.get_by_id(id).await?;
        let shift = self.shift_repo.get_by_id(&application.shift_id).await?;

        match target {
            ApplicationStatus::Withdrawn => {
                let is_owner = self.caller_profile_id(principal).await?.as_deref()
                    == Some(application.nurse_id.as_str());
                if !is_owner {
                    return Err(AppError::Forbidden(
                        "Only the applicant can withdraw an application".to_string(),
                    ));
                }
            }
            _ => ensure_shift_manager(principal, &shift)?,
        }

        if !application.status.can_transition_to(target) {
            return Err(AppError::BadRequest(format!(
                "Cannot change application from {} to {}",
                application.status, target
            )));
        }

        if target == ApplicationStatus::Approved {
            return self.approve(application, shift).await;
        }

        let moved = self
            .application_repo
            .transition(&application.id, ApplicationStatus::Pending, target)
            .await?;
        if !moved {
            return Err(status_changed());
        }
        let updated = self.application_repo.get_by_id(&application.id).await?;

        tracing::info!(application_id = %updated.id, status = %target, "Application status changed");
        Ok(updated)
    }

    async fn approve(
        &self,
        application: application::Model,
        shift: shift::Model,
    ) -> AppResult<application::Model> {
        if shift.status != ShiftStatus::Open {
            return Err(AppError::Conflict(format!(
                "Shift is {} and cannot be assigned",
                shift.status
            )));
        }

        let txn = self.db.begin().await.map_err(db_error)?;
        match Self::approve_in(&txn, &application.id, &shift.id).await {
            Ok(updated) => {
                txn.commit().await.map_err(db_error)?;
                tracing::info!(
                    application_id = %updated.id,
                    shift_id = %updated.shift_id,
                    "Application approved and shift assigned"
                );
                Ok(updated)
            }
            Err(err) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!(error = %rollback_err, "Failed to roll back approval");
                }
                Err(err)
            }
        }
    }

    /// Both updates compare the current status, so a concurrent withdrawal or
    /// a competing approval for the same shift makes this one fail with 409.
    async fn approve_in(
        txn: &DatabaseTransaction,
        application_id: &str,
        shift_id: &str,
    ) -> AppResult<application::Model> {
        let approved = ApplicationRepository::transition_with(
            txn,
            application_id,
            ApplicationStatus::Pending,
            ApplicationStatus::Approved,
        )
        .await?;
        if !approved {
            return Err(status_changed());
        }

        let assigned = ShiftRepository::transition_with(
            txn,
            shift_id,
            ShiftStatus::Open,
            ShiftStatus::Assigned,
        )
        .await?;
        if !assigned {
            return Err(AppError::Conflict("Shift is no longer open".to_string()));
        }

        ApplicationRepository::find_by_id_with(txn, application_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Application not found".to_string()))
    }
}

fn status_changed() -> AppError {
    AppError::Conflict("Application status was changed by another request".to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::shift::tests::{profile_model, shift_model};
    use chrono::Utc;
    use nurseshift_db::entities::user::UserRole;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn application_model(status: ApplicationStatus) -> application::Model {
        application::Model {
            id: "a1".to_string(),
            shift_id: "s1".to_string(),
            nurse_id: "np1".to_string(),
            status,
            special_notes: None,
            availability_confirmed: true,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn nurse(id: &str) -> Principal {
        Principal::User {
            id: id.to_string(),
            role: UserRole::Nurse,
        }
    }

    fn facility(id: &str) -> Principal {
        Principal::Facility { id: id.to_string() }
    }

    /// `txn_db` serves the approval transaction; the other mocks serve reads.
    fn service(
        txn_db: MockDatabase,
        applications: MockDatabase,
        shifts: MockDatabase,
        profiles: MockDatabase,
    ) -> ApplicationService {
        ApplicationService::new(
            Arc::new(txn_db.into_connection()),
            ApplicationRepository::new(Arc::new(applications.into_connection())),
            ShiftRepository::new(Arc::new(shifts.into_connection())),
            NurseProfileRepository::new(Arc::new(profiles.into_connection())),
            Tz::UTC,
        )
    }

    fn mock() -> MockDatabase {
        MockDatabase::new(DatabaseBackend::Postgres)
    }

    fn rows(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    /// Runs an approval by facility `f1` and returns its outcome with the
    /// transaction log of the approval connection.
    async fn approve_with(txn_db: MockDatabase) -> (AppResult<application::Model>, String) {
        let txn_conn = Arc::new(txn_db.into_connection());
        let service = ApplicationService::new(
            Arc::clone(&txn_conn),
            ApplicationRepository::new(Arc::new(
                mock()
                    .append_query_results([[application_model(ApplicationStatus::Pending)]])
                    .into_connection(),
            )),
            ShiftRepository::new(Arc::new(
                mock()
                    .append_query_results([[shift_model("s1", "f1", ShiftStatus::Open)]])
                    .into_connection(),
            )),
            NurseProfileRepository::new(Arc::new(mock().into_connection())),
            Tz::UTC,
        );

        let result = service.update_status(&facility("f1"), "a1", "approved").await;
        drop(service);
        let conn = Arc::try_unwrap(txn_conn).ok().unwrap();
        (result, format!("{:?}", conn.into_transaction_log()))
    }

    #[tokio::test]
    async fn test_unknown_status_is_rejected() {
        let service = service(mock(), mock(), mock(), mock());
        let result = service.update_status(&facility("f1"), "a1", "accepted").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_back_to_pending_is_rejected() {
        let service = service(mock(), mock(), mock(), mock());
        let result = service.update_status(&facility("f1"), "a1", "pending").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_withdraw_approved_application_is_bad_request() {
        let service = service(
            mock(),
            mock().append_query_results([[application_model(ApplicationStatus::Approved)]]),
            mock().append_query_results([[shift_model("s1", "f1", ShiftStatus::Assigned)]]),
            mock().append_query_results([[profile_model("np1", "u1")]]),
        );

        match service.update_status(&nurse("u1"), "a1", "withdrawn").await {
            Err(AppError::BadRequest(msg)) => {
                assert_eq!(msg, "Cannot change application from approved to withdrawn");
            }
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_withdraw_by_other_nurse_is_forbidden() {
        let service = service(
            mock(),
            mock().append_query_results([[application_model(ApplicationStatus::Pending)]]),
            mock().append_query_results([[shift_model("s1", "f1", ShiftStatus::Open)]]),
            mock().append_query_results([[profile_model("np2", "u2")]]),
        );

        let result = service.update_status(&nurse("u2"), "a1", "withdrawn").await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_withdraw_pending_application() {
        let service = service(
            mock(),
            mock()
                .append_query_results([[application_model(ApplicationStatus::Pending)]])
                .append_exec_results([rows(1)])
                .append_query_results([[application_model(ApplicationStatus::Withdrawn)]]),
            mock().append_query_results([[shift_model("s1", "f1", ShiftStatus::Open)]]),
            mock().append_query_results([[profile_model("np1", "u1")]]),
        );

        let updated = service
            .update_status(&nurse("u1"), "a1", "withdrawn")
            .await
            .unwrap();
        assert_eq!(updated.status, ApplicationStatus::Withdrawn);
    }

    #[tokio::test]
    async fn test_nurse_cannot_approve() {
        let service = service(
            mock(),
            mock().append_query_results([[application_model(ApplicationStatus::Pending)]]),
            mock().append_query_results([[shift_model("s1", "f1", ShiftStatus::Open)]]),
            mock(),
        );

        let result = service.update_status(&nurse("u1"), "a1", "approved").await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_other_facility_cannot_reject() {
        let service = service(
            mock(),
            mock().append_query_results([[application_model(ApplicationStatus::Pending)]]),
            mock().append_query_results([[shift_model("s1", "f1", ShiftStatus::Open)]]),
            mock(),
        );

        let result = service.update_status(&facility("f2"), "a1", "rejected").await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_approve_requires_open_shift() {
        let service = service(
            mock(),
            mock().append_query_results([[application_model(ApplicationStatus::Pending)]]),
            mock().append_query_results([[shift_model("s1", "f1", ShiftStatus::Assigned)]]),
            mock(),
        );

        let result = service.update_status(&facility("f1"), "a1", "approved").await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_approve_assigns_shift_in_one_transaction() {
        let (result, log) = approve_with(
            mock()
                .append_exec_results([rows(1), rows(1)])
                .append_query_results([[application_model(ApplicationStatus::Approved)]]),
        )
        .await;

        assert_eq!(result.unwrap().status, ApplicationStatus::Approved);
        assert!(log.contains("BEGIN"));
        assert!(log.contains(r#"UPDATE \"shifts\" SET \"status\" = $1"#));
        assert!(log.contains(r#"AND \"shifts\".\"status\" = $4"#));
        assert!(log.contains("assigned"));
        assert!(log.contains("COMMIT"));
        assert!(!log.contains("ROLLBACK"));
    }

    #[tokio::test]
    async fn test_approve_loses_race_for_shift() {
        // Another approval assigned the shift after it was read as open.
        let (result, log) = approve_with(mock().append_exec_results([rows(1), rows(0)])).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert!(log.contains("ROLLBACK"));
        assert!(!log.contains("COMMIT"));
    }

    #[tokio::test]
    async fn test_approve_after_concurrent_withdrawal_conflicts() {
        let (result, log) = approve_with(mock().append_exec_results([rows(0)])).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert!(log.contains(r#"AND \"applications\".\"status\" = $4"#));
        assert!(!log.contains(r#"UPDATE \"shifts\""#));
        assert!(log.contains("ROLLBACK"));
    }

    #[tokio::test]
    async fn test_withdraw_after_concurrent_decision_conflicts() {
        let service = service(
            mock(),
            mock()
                .append_query_results([[application_model(ApplicationStatus::Pending)]])
                .append_exec_results([rows(0)]),
            mock().append_query_results([[shift_model("s1", "f1", ShiftStatus::Open)]]),
            mock().append_query_results([[profile_model("np1", "u1")]]),
        );

        let result = service.update_status(&nurse("u1"), "a1", "withdrawn").await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_admin_can_reject() {
        let admin = Principal::User {
            id: "admin".to_string(),
            role: UserRole::Admin,
        };
        let service = service(
            mock(),
            mock()
                .append_query_results([[application_model(ApplicationStatus::Pending)]])
                .append_exec_results([rows(1)])
                .append_query_results([[application_model(ApplicationStatus::Rejected)]]),
            mock().append_query_results([[shift_model("s1", "f1", ShiftStatus::Open)]]),
            mock(),
        );

        let updated = service.update_status(&admin, "a1", "rejected").await.unwrap();
        assert_eq!(updated.status, ApplicationStatus::Rejected);
    }

    #[tokio::test]
    async fn test_get_by_owning_nurse_attaches_shift() {
        let service = service(
            mock(),
            mock().append_query_results([[application_model(ApplicationStatus::Pending)]]),
            mock().append_query_results([[shift_model("s1", "f1", ShiftStatus::Open)]]),
            mock().append_query_results([[profile_model("np1", "u1")]]),
        );

        let found = service.get(&nurse("u1"), "a1").await.unwrap();
        assert_eq!(found.shift.unwrap().id, "s1");
        assert!(found.display.is_some());
    }

    #[tokio::test]
    async fn test_get_by_unrelated_facility_is_forbidden() {
        let service = service(
            mock(),
            mock().append_query_results([[application_model(ApplicationStatus::Pending)]]),
            mock().append_query_results([[shift_model("s1", "f1", ShiftStatus::Open)]]),
            mock(),
        );

        let result = service.get(&facility("f2"), "a1").await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_list_mine_joins_shifts() {
        let service = service(
            mock(),
            mock().append_query_results([vec![application_model(ApplicationStatus::Pending)]]),
            mock().append_query_results([vec![shift_model("s1", "f1", ShiftStatus::Open)]]),
            mock().append_query_results([[profile_model("np1", "u1")]]),
        );

        let mine = service.list_mine(&nurse("u1")).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].application.id, "a1");
        assert!(mine[0].shift.is_some());
    }

    #[tokio::test]
    async fn test_list_mine_without_profile_is_empty() {
        let service = service(
            mock(),
            mock(),
            mock(),
            mock().append_query_results([Vec::<nurseshift_db::entities::nurse_profile::Model>::new()]),
        );

        assert!(service.list_mine(&nurse("u1")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_mine_for_facility_is_forbidden() {
        let service = service(mock(), mock(), mock(), mock());
        let result = service.list_mine(&facility("f1")).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_terminal_state_cannot_be_approved() {
        let service = service(
            mock(),
            mock().append_query_results([[application_model(ApplicationStatus::Rejected)]]),
            mock().append_query_results([[shift_model("s1", "f1", ShiftStatus::Open)]]),
            mock(),
        );

        let result = service.update_status(&facility("f1"), "a1", "approved").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
