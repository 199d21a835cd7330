//! API response types.
//!
//! Entity models serialize with their column names; these types give every
//! response body the camelCase shape clients expect and drop password hashes.

use axum::{Json, http::StatusCode};
use chrono::NaiveDate;
use nurseshift_core::{
    Applicant, ApplicationWithShift, EarningsSummary, NurseProfileDetails, ShiftListing,
    WorkEntry, formatting::ShiftDisplay,
};
use nurseshift_db::entities::{
    application::{self, ApplicationStatus},
    certification, facility,
    license::{self, CredentialStatus},
    nurse_profile,
    shift::{self, ShiftStatus, ShiftType},
    user::{self, UserRole},
};
use serde::Serialize;

/// 201 with a JSON body.
pub fn created<T: Serialize>(body: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(body))
}

/// User account response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            phone: u.phone,
            role: u.role,
            created_at: u.created_at.to_rfc3339(),
            updated_at: u.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Facility response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityResponse {
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

impl From<facility::Model> for FacilityResponse {
    fn from(f: facility::Model) -> Self {
        Self {
            id: f.id,
            name: f.name,
            email: f.email,
            address: f.address,
            city: f.city,
            state: f.state,
            zip_code: f.zip_code,
            phone: f.phone,
            contact_name: f.contact_name,
            facility_type: f.facility_type,
            rating: f.rating,
            created_at: f.created_at.to_rfc3339(),
            updated_at: f.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Nurse profile response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NurseProfileResponse {
    pub id: String,
    pub user_id: String,
    pub specialty: String,
    pub years_experience: i32,
    pub preferred_shift_type: Option<ShiftType>,
    pub preferred_distance: i32,
    pub min_hourly_rate: f64,
    pub max_hourly_rate: f64,
    pub bio: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<nurse_profile::Model> for NurseProfileResponse {
    fn from(p: nurse_profile::Model) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            specialty: p.specialty,
            years_experience: p.years_experience,
            preferred_shift_type: p.preferred_shift_type,
            preferred_distance: p.preferred_distance,
            min_hourly_rate: p.min_hourly_rate,
            max_hourly_rate: p.max_hourly_rate,
            bio: p.bio,
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// License response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseResponse {
    pub id: String,
    pub nurse_id: String,
    pub license_type: String,
    pub license_number: String,
    pub issuing_state: String,
    pub expiry_date: NaiveDate,
    pub status: CredentialStatus,
    pub is_verified: bool,
    pub document_url: Option<String>,
    pub created_at: String,
}

impl From<license::Model> for LicenseResponse {
    fn from(l: license::Model) -> Self {
        Self {
            id: l.id,
            nurse_id: l.nurse_id,
            license_type: l.license_type,
            license_number: l.license_number,
            issuing_state: l.issuing_state,
            expiry_date: l.expiry_date,
            status: l.status,
            is_verified: l.is_verified,
            document_url: l.document_url,
            created_at: l.created_at.to_rfc3339(),
        }
    }
}

/// Certification response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificationResponse {
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
    pub created_at: String,
}

impl From<certification::Model> for CertificationResponse {
    fn from(c: certification::Model) -> Self {
        Self {
            id: c.id,
            nurse_id: c.nurse_id,
            certification_name: c.certification_name,
            issuing_organization: c.issuing_organization,
            certification_number: c.certification_number,
            issue_date: c.issue_date,
            expiry_date: c.expiry_date,
            status: c.status,
            is_verified: c.is_verified,
            document_url: c.document_url,
            created_at: c.created_at.to_rfc3339(),
        }
    }
}

/// Profile with its licenses and certifications.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NurseProfileDetailsResponse {
    #[serde(flatten)]
    pub profile: NurseProfileResponse,
    pub licenses: Vec<LicenseResponse>,
    pub certifications: Vec<CertificationResponse>,
}

impl From<NurseProfileDetails> for NurseProfileDetailsResponse {
    fn from(d: NurseProfileDetails) -> Self {
        Self {
            profile: d.profile.into(),
            licenses: d.licenses.into_iter().map(Into::into).collect(),
            certifications: d.certifications.into_iter().map(Into::into).collect(),
        }
    }
}

/// Shift response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftResponse {
    pub id: String,
    pub facility_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility_name: Option<String>,
    pub unit: String,
    pub shift_type: ShiftType,
    pub start_time: String,
    pub end_time: String,
    pub hourly_rate: f64,
    pub status: ShiftStatus,
    pub requirements: Vec<String>,
    pub specialty: String,
    pub urgent_fill: bool,
    pub facility_rating: Option<f64>,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<ShiftDisplay>,
}

impl From<shift::Model> for ShiftResponse {
    fn from(s: shift::Model) -> Self {
        let requirements = s.requirement_list();
        Self {
            id: s.id,
            facility_id: s.facility_id,
            facility_name: None,
            unit: s.unit,
            shift_type: s.shift_type,
            start_time: s.start_time.to_rfc3339(),
            end_time: s.end_time.to_rfc3339(),
            hourly_rate: s.hourly_rate,
            status: s.status,
            requirements,
            specialty: s.specialty,
            urgent_fill: s.urgent_fill,
            facility_rating: s.facility_rating,
            description: s.description,
            created_at: s.created_at.to_rfc3339(),
            updated_at: s.updated_at.map(|t| t.to_rfc3339()),
            display: None,
        }
    }
}

impl From<ShiftListing> for ShiftResponse {
    fn from(listing: ShiftListing) -> Self {
        let mut response = Self::from(listing.shift);
        response.facility_name = listing.facility_name;
        response.display = Some(listing.display);
        response
    }
}

/// Application response, optionally with its shift.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationResponse {
    pub id: String,
    pub shift_id: String,
    pub nurse_id: String,
    pub status: ApplicationStatus,
    pub special_notes: Option<String>,
    pub availability_confirmed: bool,
    pub created_at: String,
    pub updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift: Option<ShiftResponse>,
}

impl From<application::Model> for ApplicationResponse {
    fn from(a: application::Model) -> Self {
        Self {
            id: a.id,
            shift_id: a.shift_id,
            nurse_id: a.nurse_id,
            status: a.status,
            special_notes: a.special_notes,
            availability_confirmed: a.availability_confirmed,
            created_at: a.created_at.to_rfc3339(),
            updated_at: a.updated_at.map(|t| t.to_rfc3339()),
            shift: None,
        }
    }
}

fn shift_with_display(shift: shift::Model, display: Option<ShiftDisplay>) -> ShiftResponse {
    let mut response = ShiftResponse::from(shift);
    response.display = display;
    response
}

impl From<ApplicationWithShift> for ApplicationResponse {
    fn from(a: ApplicationWithShift) -> Self {
        let mut response = Self::from(a.application);
        response.shift = a.shift.map(|s| shift_with_display(s, a.display));
        response
    }
}

impl From<WorkEntry> for ApplicationResponse {
    fn from(entry: WorkEntry) -> Self {
        let mut response = Self::from(entry.application);
        response.shift = Some(shift_with_display(entry.shift, Some(entry.display)));
        response
    }
}

/// Application as seen by the facility reviewing it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantResponse {
    #[serde(flatten)]
    pub application: ApplicationResponse,
    pub nurse_name: Option<String>,
    pub specialty: Option<String>,
    pub years_experience: Option<i32>,
}

impl From<Applicant> for ApplicantResponse {
    fn from(a: Applicant) -> Self {
        Self {
            application: a.application.into(),
            nurse_name: a.nurse_name,
            specialty: a.specialty,
            years_experience: a.years_experience,
        }
    }
}

/// Earnings summary response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsResponse {
    pub total_earnings: f64,
    pub total_hours: i64,
    pub completed_shifts: usize,
    pub projected_earnings: f64,
    pub upcoming_shifts: usize,
}

impl From<EarningsSummary> for EarningsResponse {
    fn from(s: EarningsSummary) -> Self {
        Self {
            total_earnings: s.total_earnings,
            total_hours: s.total_hours,
            completed_shifts: s.completed_shifts,
            projected_earnings: s.projected_earnings,
            upcoming_shifts: s.upcoming_shifts,
        }
    }
}
