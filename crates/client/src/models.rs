//! Request and response bodies of the nurseshift API.

#![allow(missing_docs)]

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==================== Enums ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Nurse,
    Facility,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftType {
    Day,
    Evening,
    Night,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftStatus {
    Open,
    Assigned,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
    Withdrawn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialStatus {
    Active,
    Inactive,
    Expired,
}

// ==================== Accounts ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: Role,
    pub created_at: String,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
    pub id: String,
    pub name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub phone: String,
    pub contact_name: Option<String>,
    pub facility_type: Option<String>,
    pub rating: Option<f64>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
    pub refresh_token: String,
    pub nurse_profile_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityAuthResponse {
    pub facility: Facility,
    pub token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user: User,
    pub nurse_profile_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nurse_profile: Option<NurseProfileInput>,
    pub licenses: Vec<LicenseInput>,
    pub certifications: Vec<CertificationInput>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityRegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

// ==================== Nurse profiles ====================

/// Profile fields; omitted fields are left unchanged on update.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NurseProfileInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years_experience: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_shift_type: Option<ShiftType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_distance: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_hourly_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_hourly_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuing_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CredentialStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificationInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certification_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuing_organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certification_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CredentialStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NurseProfile {
    pub id: String,
    pub user_id: String,
    pub specialty: String,
    pub years_experience: i32,
    pub preferred_shift_type: Option<ShiftType>,
    pub preferred_distance: i32,
    pub min_hourly_rate: f64,
    pub max_hourly_rate: f64,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct License {
    pub id: String,
    pub nurse_id: String,
    pub license_type: String,
    pub license_number: String,
    pub issuing_state: String,
    pub expiry_date: NaiveDate,
    pub status: CredentialStatus,
    pub is_verified: bool,
    pub document_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    pub id: String,
    pub nurse_id: String,
    pub certification_name: String,
    pub issuing_organization: String,
    pub certification_number: Option<String>,
    pub issue_date: Option<NaiveDate>,
    pub expiry_date: NaiveDate,
    pub status: CredentialStatus,
    pub is_verified: bool,
    pub document_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NurseProfileDetails {
    #[serde(flatten)]
    pub profile: NurseProfile,
    pub licenses: Vec<License>,
    pub certifications: Vec<Certification>,
}

// ==================== Shifts ====================

/// Display fields computed by the server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftDisplay {
    pub shift_length_hours: i64,
    pub earnings: f64,
    pub date: String,
    pub time_range: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: String,
    pub facility_id: String,
    pub facility_name: Option<String>,
    pub unit: String,
    pub shift_type: ShiftType,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub hourly_rate: f64,
    pub status: ShiftStatus,
    pub requirements: Vec<String>,
    pub specialty: String,
    pub urgent_fill: bool,
    pub facility_rating: Option<f64>,
    pub description: Option<String>,
    pub display: Option<ShiftDisplay>,
}

/// Filters for the open-shift listing.
#[derive(Debug, Clone, Default)]
pub struct ShiftFilter {
    pub specialty: Option<String>,
    pub shift_type: Option<ShiftType>,
    pub min_rate: Option<f64>,
    pub urgent_only: bool,
    pub facility_id: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl ShiftFilter {
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(specialty) = &self.specialty {
            pairs.push(("specialty", specialty.clone()));
        }
        if let Some(shift_type) = self.shift_type {
            let value = match shift_type {
                ShiftType::Day => "day",
                ShiftType::Evening => "evening",
                ShiftType::Night => "night",
            };
            pairs.push(("shiftType", value.to_string()));
        }
        if let Some(min_rate) = self.min_rate {
            pairs.push(("minRate", min_rate.to_string()));
        }
        if self.urgent_only {
            pairs.push(("urgentOnly", "true".to_string()));
        }
        if let Some(facility_id) = &self.facility_id {
            pairs.push(("facilityId", facility_id.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewShift {
    pub unit: String,
    pub shift_type: ShiftType,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub hourly_rate: f64,
    pub requirements: Vec<String>,
    pub specialty: String,
    pub urgent_fill: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift_type: Option<ShiftType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgent_fill: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_notes: Option<String>,
    pub availability_confirmed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct StatusRequest<'a> {
    pub status: &'a str,
}

// ==================== Applications ====================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub shift_id: String,
    pub nurse_id: String,
    pub status: ApplicationStatus,
    pub special_notes: Option<String>,
    pub availability_confirmed: bool,
    pub created_at: String,
    pub shift: Option<Shift>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Applicant {
    #[serde(flatten)]
    pub application: Application,
    pub nurse_name: Option<String>,
    pub specialty: Option<String>,
    pub years_experience: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Earnings {
    pub total_earnings: f64,
    pub total_hours: i64,
    pub completed_shifts: usize,
    pub projected_earnings: f64,
    pub upcoming_shifts: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Health {
    pub status: String,
    pub database: String,
    pub version: String,
}
