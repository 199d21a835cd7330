//! Nurse profile, license and certification service.

use chrono::{NaiveDate, Utc};
use nurseshift_common::{AppError, AppResult, IdGenerator};
use nurseshift_db::{
    entities::{
        certification, license,
        license::CredentialStatus,
        nurse_profile,
        shift::ShiftType,
        user::UserRole,
    },
    repositories::{
        CertificationRepository, LicenseRepository, NurseProfileRepository, UserRepository,
    },
};
use sea_orm::{DatabaseTransaction, Set};
use serde::Deserialize;

use super::token::Principal;
use crate::numeric::NumericInput;

/// Nurse profile fields as submitted by a client.
///
/// Every field is optional on the wire so a missing one surfaces as a
/// validation error naming the field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NurseProfileDraft {
    pub specialty: Option<String>,
    pub years_experience: Option<NumericInput>,
    pub preferred_shift_type: Option<ShiftType>,
    pub preferred_distance: Option<NumericInput>,
    pub min_hourly_rate: Option<NumericInput>,
    pub max_hourly_rate: Option<NumericInput>,
    pub bio: Option<String>,
}

/// License fields as submitted by a client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseDraft {
    pub license_type: Option<String>,
    pub license_number: Option<String>,
    pub issuing_state: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    pub status: Option<CredentialStatus>,
    pub is_verified: Option<bool>,
    pub document_url: Option<String>,
}

/// Certification fields as submitted by a client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificationDraft {
    pub certification_name: Option<String>,
    pub issuing_organization: Option<String>,
    pub certification_number: Option<String>,
    pub issue_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub status: Option<CredentialStatus>,
    pub is_verified: Option<bool>,
    pub document_url: Option<String>,
}

/// Profile together with its credentials.
#[derive(Debug, Clone)]
pub struct NurseProfileDetails {
    pub profile: nurse_profile::Model,
    pub licenses: Vec<license::Model>,
    pub certifications: Vec<certification::Model>,
}

fn required<T>(value: Option<T>, field: &str) -> AppResult<T> {
    value.ok_or_else(|| AppError::Validation(format!("{field} is required")))
}

fn required_text(value: Option<String>, field: &str) -> AppResult<String> {
    let text = required(value, field)?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

fn non_blank(value: Option<String>, field: &str) -> AppResult<Option<String>> {
    value.map(|v| required_text(Some(v), field)).transpose()
}

fn check_rate_range(min: f64, max: f64) -> AppResult<()> {
    if min > max {
        return Err(AppError::Validation(
            "minHourlyRate must not exceed maxHourlyRate".to_string(),
        ));
    }
    Ok(())
}

impl NurseProfileDraft {
    /// Turn a draft into a complete profile row, rejecting missing or
    /// malformed fields.
    pub fn into_active_model(
        self,
        id: String,
        user_id: &str,
    ) -> AppResult<nurse_profile::ActiveModel> {
        let specialty = required_text(self.specialty, "specialty")?;
        let years_experience =
            required(self.years_experience, "yearsExperience")?.non_negative_i32("yearsExperience")?;
        let preferred_distance = required(self.preferred_distance, "preferredDistance")?
            .non_negative_i32("preferredDistance")?;
        let min_hourly_rate =
            required(self.min_hourly_rate, "minHourlyRate")?.non_negative_f64("minHourlyRate")?;
        let max_hourly_rate =
            required(self.max_hourly_rate, "maxHourlyRate")?.non_negative_f64("maxHourlyRate")?;
        check_rate_range(min_hourly_rate, max_hourly_rate)?;

        Ok(nurse_profile::ActiveModel {
            id: Set(id),
            user_id: Set(user_id.to_string()),
            specialty: Set(specialty),
            years_experience: Set(years_experience),
            preferred_shift_type: Set(self.preferred_shift_type),
            preferred_distance: Set(preferred_distance),
            min_hourly_rate: Set(min_hourly_rate),
            max_hourly_rate: Set(max_hourly_rate),
            bio: Set(self.bio),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        })
    }

    /// Apply the fields present in the draft to an existing profile.
    fn apply_to(self, current: nurse_profile::Model) -> AppResult<nurse_profile::ActiveModel> {
        let min = match self.min_hourly_rate {
            Some(v) => v.non_negative_f64("minHourlyRate")?,
            None => current.min_hourly_rate,
        };
        let max = match self.max_hourly_rate {
            Some(v) => v.non_negative_f64("maxHourlyRate")?,
            None => current.max_hourly_rate,
        };
        check_rate_range(min, max)?;

        let specialty = non_blank(self.specialty, "specialty")?;
        let years = self
            .years_experience
            .map(|v| v.non_negative_i32("yearsExperience"))
            .transpose()?;
        let distance = self
            .preferred_distance
            .map(|v| v.non_negative_i32("preferredDistance"))
            .transpose()?;

        let mut active: nurse_profile::ActiveModel = current.into();
        if let Some(specialty) = specialty {
            active.specialty = Set(specialty);
        }
        if let Some(years) = years {
            active.years_experience = Set(years);
        }
        if let Some(distance) = distance {
            active.preferred_distance = Set(distance);
        }
        if let Some(shift_type) = self.preferred_shift_type {
            active.preferred_shift_type = Set(Some(shift_type));
        }
        if self.bio.is_some() {
            active.bio = Set(self.bio);
        }
        active.min_hourly_rate = Set(min);
        active.max_hourly_rate = Set(max);
        active.updated_at = Set(Some(Utc::now().into()));
        Ok(active)
    }
}

impl LicenseDraft {
    /// Build a license row for a nurse, checking required fields.
    pub fn into_active_model(self, id: String, nurse_id: &str) -> AppResult<license::ActiveModel> {
        Ok(license::ActiveModel {
            id: Set(id),
            nurse_id: Set(nurse_id.to_string()),
            license_type: Set(required_text(self.license_type, "licenseType")?),
            license_number: Set(required_text(self.license_number, "licenseNumber")?),
            issuing_state: Set(required_text(self.issuing_state, "issuingState")?),
            expiry_date: Set(required(self.expiry_date, "expiryDate")?),
            status: Set(self.status.unwrap_or(CredentialStatus::Active)),
            is_verified: Set(false),
            document_url: Set(self.document_url),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        })
    }

    fn apply_to(self, current: license::Model) -> AppResult<license::ActiveModel> {
        let license_type = non_blank(self.license_type, "licenseType")?;
        let license_number = non_blank(self.license_number, "licenseNumber")?;
        let issuing_state = non_blank(self.issuing_state, "issuingState")?;

        let mut active: license::ActiveModel = current.into();
        if let Some(v) = license_type {
            active.license_type = Set(v);
        }
        if let Some(v) = license_number {
            active.license_number = Set(v);
        }
        if let Some(v) = issuing_state {
            active.issuing_state = Set(v);
        }
        if let Some(v) = self.expiry_date {
            active.expiry_date = Set(v);
        }
        if let Some(v) = self.status {
            active.status = Set(v);
        }
        if let Some(v) = self.is_verified {
            active.is_verified = Set(v);
        }
        if self.document_url.is_some() {
            active.document_url = Set(self.document_url);
        }
        active.updated_at = Set(Some(Utc::now().into()));
        Ok(active)
    }
}

impl CertificationDraft {
    /// Build a certification row for a nurse, checking required fields.
    pub fn into_active_model(
        self,
        id: String,
        nurse_id: &str,
    ) -> AppResult<certification::ActiveModel> {
        Ok(certification::ActiveModel {
            id: Set(id),
            nurse_id: Set(nurse_id.to_string()),
            certification_name: Set(required_text(self.certification_name, "certificationName")?),
            issuing_organization: Set(required_text(
                self.issuing_organization,
                "issuingOrganization",
            )?),
            certification_number: Set(self.certification_number),
            issue_date: Set(self.issue_date),
            expiry_date: Set(required(self.expiry_date, "expiryDate")?),
            status: Set(self.status.unwrap_or(CredentialStatus::Active)),
            is_verified: Set(false),
            document_url: Set(self.document_url),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        })
    }

    fn apply_to(self, current: certification::Model) -> AppResult<certification::ActiveModel> {
        let name = non_blank(self.certification_name, "certificationName")?;
        let organization = non_blank(self.issuing_organization, "issuingOrganization")?;

        let mut active: certification::ActiveModel = current.into();
        if let Some(v) = name {
            active.certification_name = Set(v);
        }
        if let Some(v) = organization {
            active.issuing_organization = Set(v);
        }
        if self.certification_number.is_some() {
            active.certification_number = Set(self.certification_number);
        }
        if self.issue_date.is_some() {
            active.issue_date = Set(self.issue_date);
        }
        if let Some(v) = self.expiry_date {
            active.expiry_date = Set(v);
        }
        if let Some(v) = self.status {
            active.status = Set(v);
        }
        if let Some(v) = self.is_verified {
            active.is_verified = Set(v);
        }
        if self.document_url.is_some() {
            active.document_url = Set(self.document_url);
        }
        active.updated_at = Set(Some(Utc::now().into()));
        Ok(active)
    }
}

/// Only admins may flip verification flags.
fn ensure_verification_allowed(principal: &Principal, is_verified: Option<bool>) -> AppResult<()> {
    if is_verified.is_some() && !principal.is_admin() {
        return Err(AppError::Forbidden(
            "Only administrators can verify credentials".to_string(),
        ));
    }
    Ok(())
}

/// Insert a nurse profile with its licenses and certifications inside an
/// open transaction.
///
/// The caller owns the transaction and decides between commit and rollback.
pub(crate) async fn insert_nurse_records(
    txn: &DatabaseTransaction,
    id_gen: &IdGenerator,
    user_id: &str,
    draft: NurseProfileDraft,
    licenses: Vec<LicenseDraft>,
    certifications: Vec<CertificationDraft>,
) -> AppResult<nurse_profile::Model> {
    let profile_model = draft.into_active_model(id_gen.generate(), user_id)?;
    let profile = NurseProfileRepository::create_with(txn, profile_model).await?;

    for (index, draft) in licenses.into_iter().enumerate() {
        let model = draft
            .into_active_model(id_gen.generate(), &profile.id)
            .map_err(|e| prefix_error(e, &format!("licenses[{index}]")))?;
        LicenseRepository::create_with(txn, model).await?;
    }

    for (index, draft) in certifications.into_iter().enumerate() {
        let model = draft
            .into_active_model(id_gen.generate(), &profile.id)
            .map_err(|e| prefix_error(e, &format!("certifications[{index}]")))?;
        CertificationRepository::create_with(txn, model).await?;
    }

    Ok(profile)
}

fn prefix_error(err: AppError, prefix: &str) -> AppError {
    match err {
        AppError::Validation(msg) => AppError::Validation(format!("{prefix}.{msg}")),
        other => other,
    }
}

/// Nurse profile service for business logic.
#[derive(Clone)]
pub struct NurseService {
    user_repo: UserRepository,
    profile_repo: NurseProfileRepository,
    license_repo: LicenseRepository,
    certification_repo: CertificationRepository,
    id_gen: IdGenerator,
}

impl NurseService {
    /// Create a new nurse service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        profile_repo: NurseProfileRepository,
        license_repo: LicenseRepository,
        certification_repo: CertificationRepository,
    ) -> Self {
        Self {
            user_repo,
            profile_repo,
            license_repo,
            certification_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Profile of a user with licenses and certifications.
    pub async fn get_profile(&self, user_id: &str) -> AppResult<NurseProfileDetails> {
        let profile = self.profile_repo.get_by_user_id(user_id).await?;
        let licenses = self.license_repo.find_by_nurse_id(&profile.id).await?;
        let certifications = self.certification_repo.find_by_nurse_id(&profile.id).await?;

        Ok(NurseProfileDetails {
            profile,
            licenses,
            certifications,
        })
    }

    /// Profile ID for a user, if they have one.
    pub async fn profile_id_for_user(&self, user_id: &str) -> AppResult<Option<String>> {
        Ok(self
            .profile_repo
            .find_by_user_id(user_id)
            .await?
            .map(|p| p.id))
    }

    /// Create a profile for an existing nurse account.
    pub async fn create_profile(
        &self,
        principal: &Principal,
        user_id: &str,
        draft: NurseProfileDraft,
    ) -> AppResult<nurse_profile::Model> {
        principal.ensure_self_or_admin(user_id)?;

        let user = self.user_repo.get_by_id(user_id).await?;
        if user.role != UserRole::Nurse {
            return Err(AppError::BadRequest("User is not a nurse".to_string()));
        }
        if self.profile_repo.find_by_user_id(user_id).await?.is_some() {
            return Err(AppError::Conflict("Nurse profile already exists".to_string()));
        }

        let model = draft.into_active_model(self.id_gen.generate(), user_id)?;
        let profile = self.profile_repo.create(model).await?;
        tracing::info!(user_id = %user_id, profile_id = %profile.id, "Created nurse profile");
        Ok(profile)
    }

    /// Partially update a profile.
    pub async fn update_profile(
        &self,
        principal: &Principal,
        user_id: &str,
        draft: NurseProfileDraft,
    ) -> AppResult<nurse_profile::Model> {
        principal.ensure_self_or_admin(user_id)?;
        let current = self.profile_repo.get_by_user_id(user_id).await?;
        let active = draft.apply_to(current)?;
        self.profile_repo.update(active).await
    }

    async fn owned_profile(
        &self,
        principal: &Principal,
        user_id: &str,
    ) -> AppResult<nurse_profile::Model> {
        principal.ensure_self_or_admin(user_id)?;
        self.profile_repo.get_by_user_id(user_id).await
    }

    /// Add a license to a nurse's profile.
    pub async fn add_license(
        &self,
        principal: &Principal,
        user_id: &str,
        draft: LicenseDraft,
    ) -> AppResult<license::Model> {
        ensure_verification_allowed(principal, draft.is_verified)?;
        let profile = self.owned_profile(principal, user_id).await?;
        let verified = draft.is_verified.unwrap_or(false);
        let mut model = draft.into_active_model(self.id_gen.generate(), &profile.id)?;
        model.is_verified = Set(verified);
        self.license_repo.create(model).await
    }

    /// Update one of a nurse's licenses.
    pub async fn update_license(
        &self,
        principal: &Principal,
        user_id: &str,
        license_id: &str,
        draft: LicenseDraft,
    ) -> AppResult<license::Model> {
        ensure_verification_allowed(principal, draft.is_verified)?;
        let profile = self.owned_profile(principal, user_id).await?;
        let current = self.license_repo.get_owned(license_id, &profile.id).await?;
        self.license_repo.update(draft.apply_to(current)?).await
    }

    /// Delete one of a nurse's licenses.
    pub async fn delete_license(
        &self,
        principal: &Principal,
        user_id: &str,
        license_id: &str,
    ) -> AppResult<()> {
        let profile = self.owned_profile(principal, user_id).await?;
        let license = self.license_repo.get_owned(license_id, &profile.id).await?;
        self.license_repo.delete(&license.id).await
    }

    /// Add a certification to a nurse's profile.
    pub async fn add_certification(
        &self,
        principal: &Principal,
        user_id: &str,
        draft: CertificationDraft,
    ) -> AppResult<certification::Model> {
        ensure_verification_allowed(principal, draft.is_verified)?;
        let profile = self.owned_profile(principal, user_id).await?;
        let verified = draft.is_verified.unwrap_or(false);
        let mut model = draft.into_active_model(self.id_gen.generate(), &profile.id)?;
        model.is_verified = Set(verified);
        self.certification_repo.create(model).await
    }

    /// Update one of a nurse's certifications.
    pub async fn update_certification(
        &self,
        principal: &Principal,
        user_id: &str,
        certification_id: &str,
        draft: CertificationDraft,
    ) -> AppResult<certification::Model> {
        ensure_verification_allowed(principal, draft.is_verified)?;
        let profile = self.owned_profile(principal, user_id).await?;
        let current = self
            .certification_repo
            .get_owned(certification_id, &profile.id)
            .await?;
        self.certification_repo.update(draft.apply_to(current)?).await
    }

    /// Delete one of a nurse's certifications.
    pub async fn delete_certification(
        &self,
        principal: &Principal,
        user_id: &str,
        certification_id: &str,
    ) -> AppResult<()> {
        let profile = self.owned_profile(principal, user_id).await?;
        let certification = self
            .certification_repo
            .get_owned(certification_id, &profile.id)
            .await?;
        self.certification_repo.delete(&certification.id).await
    }
}
