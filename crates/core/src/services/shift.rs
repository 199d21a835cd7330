//! Shift posting, browsing and applying.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use nurseshift_common::{AppError, AppResult, IdGenerator};
use nurseshift_db::{
    entities::{
        application::{self, ApplicationStatus},
        nurse_profile,
        shift::{self, ShiftStatus, ShiftType},
        user::UserRole,
    },
    repositories::{
        ApplicationRepository, FacilityRepository, NurseProfileRepository, ShiftFilter,
        ShiftRepository, UserRepository,
    },
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use super::token::Principal;
use crate::{formatting::ShiftDisplay, numeric::NumericInput};

/// Default page size for the shift listing.
pub const DEFAULT_PAGE_SIZE: u64 = 20;
/// Largest accepted page size.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Query parameters for the open-shift listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftQuery {
    pub specialty: Option<String>,
    pub shift_type: Option<ShiftType>,
    pub min_rate: Option<f64>,
    pub urgent_only: Option<bool>,
    pub facility_id: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl ShiftQuery {
    fn into_filter(self) -> AppResult<ShiftFilter> {
        if let Some(min_rate) = self.min_rate {
            if !min_rate.is_finite() || min_rate < 0.0 {
                return Err(AppError::Validation("minRate must not be negative".to_string()));
            }
        }

        Ok(ShiftFilter {
            specialty: self.specialty.filter(|s| !s.trim().is_empty()),
            shift_type: self.shift_type,
            min_rate: self.min_rate,
            urgent_only: self.urgent_only.unwrap_or(false),
            facility_id: self.facility_id.filter(|s| !s.trim().is_empty()),
            limit: self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
            offset: self.offset.unwrap_or(0),
        })
    }
}

/// New shift request.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateShiftInput {
    #[validate(length(min = 1, max = 128))]
    pub unit: String,

    pub shift_type: ShiftType,

    pub start_time: DateTime<Utc>,

    pub end_time: DateTime<Utc>,

    pub hourly_rate: NumericInput,

    #[serde(default)]
    pub requirements: Vec<String>,

    #[validate(length(min = 1, max = 128))]
    pub specialty: String,

    #[serde(default)]
    pub urgent_fill: bool,

    #[validate(length(max = 4096))]
    pub description: Option<String>,
}

/// Partial shift edit.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShiftInput {
    #[validate(length(min = 1, max = 128))]
    pub unit: Option<String>,

    pub shift_type: Option<ShiftType>,

    pub start_time: Option<DateTime<Utc>>,

    pub end_time: Option<DateTime<Utc>>,

    pub hourly_rate: Option<NumericInput>,

    pub requirements: Option<Vec<String>>,

    #[validate(length(min = 1, max = 128))]
    pub specialty: Option<String>,

    pub urgent_fill: Option<bool>,

    #[validate(length(max = 4096))]
    pub description: Option<String>,
}

/// Application request body.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApplyInput {
    #[validate(length(max = 2048))]
    pub special_notes: Option<String>,

    #[serde(default)]
    pub availability_confirmed: bool,
}

/// A shift with its display fields and posting facility's name.
#[derive(Debug, Clone)]
pub struct ShiftListing {
    pub shift: shift::Model,
    pub facility_name: Option<String>,
    pub display: ShiftDisplay,
}

/// An application as seen by the facility reviewing it.
#[derive(Debug, Clone)]
pub struct Applicant {
    pub application: application::Model,
    pub nurse_name: Option<String>,
    pub specialty: Option<String>,
    pub years_experience: Option<i32>,
}

fn check_window(start: &DateTime<Utc>, end: &DateTime<Utc>) -> AppResult<()> {
    if end <= start {
        return Err(AppError::Validation(
            "endTime must be after startTime".to_string(),
        ));
    }
    Ok(())
}

/// Owning facility or an admin.
pub(crate) fn ensure_shift_manager(principal: &Principal, shift: &shift::Model) -> AppResult<()> {
    if principal.is_admin() || principal.facility_id() == Some(shift.facility_id.as_str()) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Only the facility that posted this shift can do that".to_string(),
        ))
    }
}

/// Shift service for business logic.
#[derive(Clone)]
pub struct ShiftService {
    shift_repo: ShiftRepository,
    facility_repo: FacilityRepository,
    application_repo: ApplicationRepository,
    profile_repo: NurseProfileRepository,
    user_repo: UserRepository,
    timezone: Tz,
    id_gen: IdGenerator,
}

impl ShiftService {
    /// Create a new shift service.
    #[must_use]
    pub const fn new(
        shift_repo: ShiftRepository,
        facility_repo: FacilityRepository,
        application_repo: ApplicationRepository,
        profile_repo: NurseProfileRepository,
        user_repo: UserRepository,
        timezone: Tz,
    ) -> Self {
        Self {
            shift_repo,
            facility_repo,
            application_repo,
            profile_repo,
            user_repo,
            timezone,
            id_gen: IdGenerator::new(),
        }
    }

    async fn with_listings(&self, shifts: Vec<shift::Model>) -> AppResult<Vec<ShiftListing>> {
        let mut facility_ids: Vec<String> = shifts.iter().map(|s| s.facility_id.clone()).collect();
        facility_ids.sort_unstable();
        facility_ids.dedup();

        let names: HashMap<String, String> = self
            .facility_repo
            .find_by_ids(&facility_ids)
            .await?
            .into_iter()
            .map(|f| (f.id, f.name))
            .collect();

        Ok(shifts
            .into_iter()
            .map(|shift| {
                let display = ShiftDisplay::compute(
                    &shift.start_time,
                    &shift.end_time,
                    shift.hourly_rate,
                    self.timezone,
                );
                ShiftListing {
                    facility_name: names.get(&shift.facility_id).cloned(),
                    shift,
                    display,
                }
            })
            .collect())
    }

    /// Browse open shifts.
    pub async fn list_open(&self, query: ShiftQuery) -> AppResult<Vec<ShiftListing>> {
        let filter = query.into_filter()?;
        let shifts = self.shift_repo.list_open(&filter).await?;
        self.with_listings(shifts).await
    }

    /// One shift with display fields.
    pub async fn get(&self, id: &str) -> AppResult<ShiftListing> {
        let shift = self.shift_repo.get_by_id(id).await?;
        let mut listings = self.with_listings(vec![shift]).await?;
        listings
            .pop()
            .ok_or_else(|| AppError::NotFound("Shift not found".to_string()))
    }

    /// Every shift of a facility, any status.
    pub async fn list_for_facility(
        &self,
        principal: &Principal,
        facility_id: &str,
    ) -> AppResult<Vec<ShiftListing>> {
        if !principal.is_admin() && principal.facility_id() != Some(facility_id) {
            return Err(AppError::Forbidden("Access denied".to_string()));
        }
        let shifts = self.shift_repo.find_by_facility(facility_id).await?;
        self.with_listings(shifts).await
    }

    /// Post a new shift as a facility.
    pub async fn create(
        &self,
        principal: &Principal,
        input: CreateShiftInput,
    ) -> AppResult<shift::Model> {
        let Some(facility_id) = principal.facility_id() else {
            return Err(AppError::Forbidden("Only facilities can post shifts".to_string()));
        };
        input.validate()?;
        check_window(&input.start_time, &input.end_time)?;
        let hourly_rate = input.hourly_rate.positive_f64("hourlyRate")?;

        let facility = self.facility_repo.get_by_id(facility_id).await?;

        let model = shift::ActiveModel {
            id: Set(self.id_gen.generate()),
            facility_id: Set(facility.id.clone()),
            unit: Set(input.unit),
            shift_type: Set(input.shift_type),
            start_time: Set(input.start_time.into()),
            end_time: Set(input.end_time.into()),
            hourly_rate: Set(hourly_rate),
            status: Set(ShiftStatus::Open),
            requirements: Set(serde_json::json!(input.requirements)),
            specialty: Set(input.specialty),
            urgent_fill: Set(input.urgent_fill),
            facility_rating: Set(facility.rating),
            description: Set(input.description),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let shift = self.shift_repo.create(model).await?;
        tracing::info!(shift_id = %shift.id, facility_id = %facility.id, "Posted shift");
        Ok(shift)
    }

    /// Edit a shift. Only the posting facility may do this.
    pub async fn update(
        &self,
        principal: &Principal,
        id: &str,
        input: UpdateShiftInput,
    ) -> AppResult<shift::Model> {
        input.validate()?;
        let shift = self.shift_repo.get_by_id(id).await?;
        if principal.facility_id() != Some(shift.facility_id.as_str()) {
            return Err(AppError::Forbidden(
                "Only the facility that posted this shift can edit it".to_string(),
            ));
        }

        let start = input
            .start_time
            .unwrap_or_else(|| shift.start_time.with_timezone(&Utc));
        let end = input
            .end_time
            .unwrap_or_else(|| shift.end_time.with_timezone(&Utc));
        check_window(&start, &end)?;
        let hourly_rate = input
            .hourly_rate
            .map(|rate| rate.positive_f64("hourlyRate"))
            .transpose()?;

        let mut active: shift::ActiveModel = shift.into();
        if let Some(unit) = input.unit {
            active.unit = Set(unit);
        }
        if let Some(shift_type) = input.shift_type {
            active.shift_type = Set(shift_type);
        }
        if input.start_time.is_some() {
            active.start_time = Set(start.into());
        }
        if input.end_time.is_some() {
            active.end_time = Set(end.into());
        }
        if let Some(rate) = hourly_rate {
            active.hourly_rate = Set(rate);
        }
        if let Some(requirements) = input.requirements {
            active.requirements = Set(serde_json::json!(requirements));
        }
        if let Some(specialty) = input.specialty {
            active.specialty = Set(specialty);
        }
        if let Some(urgent) = input.urgent_fill {
            active.urgent_fill = Set(urgent);
        }
        if input.description.is_some() {
            active.description = Set(input.description);
        }
        active.updated_at = Set(Some(Utc::now().into()));

        self.shift_repo.update(active).await
    }

    /// Delete a shift and, by cascade, its applications.
    pub async fn delete(&self, principal: &Principal, id: &str) -> AppResult<()> {
        let shift = self.shift_repo.get_by_id(id).await?;
        ensure_shift_manager(principal, &shift)?;
        self.shift_repo.delete(&shift.id).await?;
        tracing::info!(shift_id = %id, "Deleted shift");
        Ok(())
    }

    /// Set a shift's status from its wire name.
    pub async fn update_status(
        &self,
        principal: &Principal,
        id: &str,
        status: &str,
    ) -> AppResult<shift::Model> {
        let status: ShiftStatus = status.parse()?;
        let shift = self.shift_repo.get_by_id(id).await?;
        ensure_shift_manager(principal, &shift)?;

        let mut active: shift::ActiveModel = shift.into();
        active.status = Set(status);
        active.updated_at = Set(Some(Utc::now().into()));
        self.shift_repo.update(active).await
    }

    /// Apply to a shift as a nurse.
    pub async fn apply(
        &self,
        principal: &Principal,
        shift_id: &str,
        input: ApplyInput,
    ) -> AppResult<application::Model> {
        let user_id = match principal {
            Principal::User {
                id,
                role: UserRole::Nurse,
            } => id.as_str(),
            _ => return Err(AppError::Forbidden("Only nurses can apply to shifts".to_string())),
        };
        input.validate()?;

        let profile = self
            .profile_repo
            .find_by_user_id(user_id)
            .await?
            .ok_or_else(|| {
                AppError::BadRequest("Create a nurse profile before applying".to_string())
            })?;

        let shift = self.shift_repo.get_by_id(shift_id).await?;
        if shift.status != ShiftStatus::Open {
            return Err(AppError::BadRequest("Shift is not open".to_string()));
        }

        if self
            .application_repo
            .find_active(&profile.id, &shift.id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Already applied to this shift".to_string()));
        }

        let model = application::ActiveModel {
            id: Set(self.id_gen.generate()),
            shift_id: Set(shift.id.clone()),
            nurse_id: Set(profile.id.clone()),
            status: Set(ApplicationStatus::Pending),
            special_notes: Set(input.special_notes),
            availability_confirmed: Set(input.availability_confirmed),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let application = self.application_repo.create(model).await.map_err(|e| match e {
            AppError::Conflict(_) => AppError::Conflict("Already applied to this shift".to_string()),
            other => other,
        })?;
        tracing::info!(
            application_id = %application.id,
            shift_id = %shift.id,
            nurse_id = %profile.id,
            "Nurse applied to shift"
        );
        Ok(application)
    }

    /// Applications for a shift, with applicant details.
    pub async fn applications(
        &self,
        principal: &Principal,
        shift_id: &str,
    ) -> AppResult<Vec<Applicant>> {
        let shift = self.shift_repo.get_by_id(shift_id).await?;
        ensure_shift_manager(principal, &shift)?;

        let applications = self.application_repo.find_by_shift(&shift.id).await?;
        let nurse_ids: Vec<String> = applications.iter().map(|a| a.nurse_id.clone()).collect();
        let profiles: HashMap<String, nurse_profile::Model> = self
            .profile_repo
            .find_by_ids(&nurse_ids)
            .await?
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();

        let user_ids: Vec<String> = profiles.values().map(|p| p.user_id.clone()).collect();
        let names: HashMap<String, String> = self
            .user_repo
            .find_by_ids(&user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id.clone(), u.full_name()))
            .collect();

        Ok(applications
            .into_iter()
            .map(|application| {
                let profile = profiles.get(&application.nurse_id);
                Applicant {
                    nurse_name: profile.and_then(|p| names.get(&p.user_id).cloned()),
                    specialty: profile.map(|p| p.specialty.clone()),
                    years_experience: profile.map(|p| p.years_experience),
                    application,
                }
            })
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use nurseshift_db::entities::facility;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    pub(crate) fn shift_model(id: &str, facility_id: &str, status: ShiftStatus) -> shift::Model {
        let start = Utc.with_ymd_and_hms(2030, 1, 15, 7, 0, 0).unwrap();
        shift::Model {
            id: id.to_string(),
            facility_id: facility_id.to_string(),
            unit: "ICU".to_string(),
            shift_type: ShiftType::Day,
            start_time: start.into(),
            end_time: (start + Duration::hours(12)).into(),
            hourly_rate: 95.5,
            status,
            requirements: serde_json::json!(["BLS"]),
            specialty: "ICU".to_string(),
            urgent_fill: false,
            facility_rating: None,
            description: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    pub(crate) fn profile_model(id: &str, user_id: &str) -> nurse_profile::Model {
        nurse_profile::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            specialty: "ICU".to_string(),
            years_experience: 4,
            preferred_shift_type: None,
            preferred_distance: 10,
            min_hourly_rate: 50.0,
            max_hourly_rate: 100.0,
            bio: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn facility_model(id: &str) -> facility::Model {
        facility::Model {
            id: id.to_string(),
            name: "General".to_string(),
            email: "staff@general.example".to_string(),
            password_hash: "x".to_string(),
            address: "1 Main".to_string(),
            city: "Town".to_string(),
            state: "CA".to_string(),
            zip_code: "90001".to_string(),
            phone: "555".to_string(),
            contact_name: None,
            facility_type: None,
            rating: Some(4.2),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn application_model(id: &str, status: ApplicationStatus) -> application::Model {
        application::Model {
            id: id.to_string(),
            shift_id: "s1".to_string(),
            nurse_id: "np1".to_string(),
            status,
            special_notes: None,
            availability_confirmed: true,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    struct Mocks {
        shifts: MockDatabase,
        facilities: MockDatabase,
        applications: MockDatabase,
        profiles: MockDatabase,
    }

    impl Default for Mocks {
        fn default() -> Self {
            Self {
                shifts: MockDatabase::new(DatabaseBackend::Postgres),
                facilities: MockDatabase::new(DatabaseBackend::Postgres),
                applications: MockDatabase::new(DatabaseBackend::Postgres),
                profiles: MockDatabase::new(DatabaseBackend::Postgres),
            }
        }
    }

    fn service(mocks: Mocks) -> ShiftService {
        ShiftService::new(
            ShiftRepository::new(Arc::new(mocks.shifts.into_connection())),
            FacilityRepository::new(Arc::new(mocks.facilities.into_connection())),
            ApplicationRepository::new(Arc::new(mocks.applications.into_connection())),
            NurseProfileRepository::new(Arc::new(mocks.profiles.into_connection())),
            UserRepository::new(Arc::new(
                MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
            )),
            Tz::UTC,
        )
    }

    fn nurse() -> Principal {
        Principal::User {
            id: "u1".to_string(),
            role: UserRole::Nurse,
        }
    }

    fn facility_principal(id: &str) -> Principal {
        Principal::Facility { id: id.to_string() }
    }

    fn create_input() -> CreateShiftInput {
        let start = Utc.with_ymd_and_hms(2030, 1, 15, 7, 0, 0).unwrap();
        CreateShiftInput {
            unit: "ICU".to_string(),
            shift_type: ShiftType::Day,
            start_time: start,
            end_time: start + Duration::hours(12),
            hourly_rate: "95.50".into(),
            requirements: vec!["BLS".to_string()],
            specialty: "ICU".to_string(),
            urgent_fill: false,
            description: None,
        }
    }

    #[test]
    fn test_query_limit_is_clamped() {
        let filter = ShiftQuery {
            limit: Some(1000),
            ..Default::default()
        }
        .into_filter()
        .unwrap();
        assert_eq!(filter.limit, MAX_PAGE_SIZE);

        let filter = ShiftQuery::default().into_filter().unwrap();
        assert_eq!(filter.limit, DEFAULT_PAGE_SIZE);
        assert!(!filter.urgent_only);
    }

    #[test]
    fn test_query_rejects_negative_rate() {
        let query = ShiftQuery {
            min_rate: Some(-5.0),
            ..Default::default()
        };
        assert!(query.into_filter().is_err());
    }

    #[tokio::test]
    async fn test_list_open_attaches_display_fields() {
        let service = service(Mocks {
            shifts: MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[shift_model("s1", "f1", ShiftStatus::Open)]]),
            facilities: MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[facility_model("f1")]]),
            ..Default::default()
        });

        let listings = service.list_open(ShiftQuery::default()).await.unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].facility_name.as_deref(), Some("General"));
        assert_eq!(listings[0].display.shift_length_hours, 12);
        assert_eq!(listings[0].display.earnings, 1146.0);
        assert_eq!(listings[0].display.time_range, "7:00 AM - 7:00 PM");
    }

    #[tokio::test]
    async fn test_create_requires_facility_principal() {
        let service = service(Mocks::default());
        let result = service.create(&nurse(), create_input()).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_inverted_window() {
        let service = service(Mocks::default());
        let mut input = create_input();
        input.end_time = input.start_time - Duration::hours(1);

        let result = service.create(&facility_principal("f1"), input).await;
        assert!(matches!(result, Err(AppError::Validation(msg)) if msg.contains("endTime")));
    }

    #[tokio::test]
    async fn test_create_rejects_zero_rate() {
        let service = service(Mocks::default());
        let mut input = create_input();
        input.hourly_rate = "0".into();

        let result = service.create(&facility_principal("f1"), input).await;
        assert!(matches!(result, Err(AppError::Validation(msg)) if msg.contains("hourlyRate")));
    }

    #[tokio::test]
    async fn test_create_copies_facility_rating() {
        let mut created = shift_model("s1", "f1", ShiftStatus::Open);
        created.facility_rating = Some(4.2);
        let service = service(Mocks {
            shifts: MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[created]]),
            facilities: MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[facility_model("f1")]]),
            ..Default::default()
        });

        let shift = service
            .create(&facility_principal("f1"), create_input())
            .await
            .unwrap();
        assert_eq!(shift.facility_rating, Some(4.2));
        assert_eq!(shift.status, ShiftStatus::Open);
    }

    #[tokio::test]
    async fn test_update_by_other_facility_is_forbidden() {
        let service = service(Mocks {
            shifts: MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[shift_model("s1", "f1", ShiftStatus::Open)]]),
            ..Default::default()
        });

        let result = service
            .update(&facility_principal("f2"), "s1", UpdateShiftInput::default())
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_update_status_rejects_unknown_value() {
        let service = service(Mocks::default());
        let result = service
            .update_status(&facility_principal("f1"), "s1", "filled")
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_apply_to_closed_shift() {
        let service = service(Mocks {
            profiles: MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[profile_model("np1", "u1")]]),
            shifts: MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[shift_model("s1", "f1", ShiftStatus::Assigned)]]),
            ..Default::default()
        });

        let result = service.apply(&nurse(), "s1", ApplyInput::default()).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_apply_twice_is_conflict() {
        let service = service(Mocks {
            profiles: MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[profile_model("np1", "u1")]]),
            shifts: MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[shift_model("s1", "f1", ShiftStatus::Open)]]),
            applications: MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[
                application_model("a1", ApplicationStatus::Pending),
            ]]),
            ..Default::default()
        });

        let result = service.apply(&nurse(), "s1", ApplyInput::default()).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_apply_creates_pending_application() {
        let service = service(Mocks {
            profiles: MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[profile_model("np1", "u1")]]),
            shifts: MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[shift_model("s1", "f1", ShiftStatus::Open)]]),
            applications: MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<application::Model>::new()])
                .append_query_results([[application_model("a1", ApplicationStatus::Pending)]]),
            ..Default::default()
        });

        let application = service
            .apply(&nurse(), "s1", ApplyInput::default())
            .await
            .unwrap();
        assert_eq!(application.status, ApplicationStatus::Pending);
    }

    #[tokio::test]
    async fn test_facility_cannot_apply() {
        let service = service(Mocks::default());
        let result = service
            .apply(&facility_principal("f1"), "s1", ApplyInput::default())
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_applications_require_owner() {
        let service = service(Mocks {
            shifts: MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[shift_model("s1", "f1", ShiftStatus::Open)]]),
            ..Default::default()
        });

        let result = service.applications(&facility_principal("f2"), "s1").await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
