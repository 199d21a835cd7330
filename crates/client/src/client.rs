//! HTTP client for the nurseshift API.
//!
//! Every request carries the stored access token. A 401 on anything other
//! than the login and refresh endpoints triggers one refresh and one replay;
//! see [`ApiClient::execute`].

use std::{sync::Arc, time::Duration};

use reqwest::{Client, Method, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::{
    error::{ClientError, ClientResult},
    models::{
        Applicant, Application, ApplyRequest, AuthResponse, Certification, CertificationInput,
        Earnings, Facility, FacilityAuthResponse, FacilityRegisterRequest, Health, License,
        LicenseInput, LoginRequest, MeResponse, NewShift, NurseProfile, NurseProfileDetails,
        NurseProfileInput, RegisterRequest, Shift, ShiftFilter, ShiftUpdate, StatusRequest,
        TokenResponse, UpdateAccountRequest, User,
    },
    session::{Session, SessionKind, SessionStore},
};

/// One outgoing call, kept so it can be replayed after a refresh.
struct Call<'a> {
    method: Method,
    path: &'a str,
    query: Vec<(&'static str, String)>,
    body: Option<Value>,
}

impl<'a> Call<'a> {
    const fn new(method: Method, path: &'a str) -> Self {
        Self {
            method,
            path,
            query: Vec::new(),
            body: None,
        }
    }

    fn json<B: Serialize>(mut self, body: &B) -> ClientResult<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    fn query(mut self, pairs: Vec<(&'static str, String)>) -> Self {
        self.query = pairs;
        self
    }

    /// Login and refresh calls never trigger a refresh themselves.
    fn is_auth_endpoint(&self) -> bool {
        self.path.ends_with("/login") || self.path.ends_with("/refresh-token")
    }
}

/// Typed client for the nurseshift API.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
}

impl ApiClient {
    /// Create a client for an API root such as `http://localhost:3000/api`.
    pub fn new(base_url: &str, session: Arc<dyn SessionStore>) -> ClientResult<Self> {
        let parsed = Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                parsed.scheme()
            )));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("nurseshift-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    /// The session store backing this client.
    #[must_use]
    pub fn session_store(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    // ==================== Transport ====================

    async fn dispatch(&self, call: &Call<'_>) -> ClientResult<Response> {
        let url = format!("{}{}", self.base_url, call.path);
        let mut request = self.http.request(call.method.clone(), &url);

        if !call.query.is_empty() {
            request = request.query(&call.query);
        }
        if let Some(body) = &call.body {
            request = request.json(body);
        }
        if let Some(session) = self.session.load().await? {
            request = request.bearer_auth(&session.token);
        }

        debug!(method = %call.method, path = %call.path, "Sending API request");
        Ok(request.send().await?)
    }

    /// Send a call, refreshing the access token once on 401.
    ///
    /// Without a stored refresh token the session is cleared and the original
    /// 401 returned. A failed refresh clears the session and returns the
    /// refresh error. The replayed request is never refreshed again.
    async fn execute(&self, call: Call<'_>) -> ClientResult<Response> {
        let response = self.dispatch(&call).await?;
        if response.status() != StatusCode::UNAUTHORIZED || call.is_auth_endpoint() {
            return Self::ensure_success(response).await;
        }

        let original = ClientError::from_response(response).await;
        let session = self.session.load().await?;
        let Some((mut session, refresh_token)) = session.and_then(|s| {
            let token = s.refresh_token.clone()?;
            Some((s, token))
        }) else {
            debug!(path = %call.path, "No refresh token; clearing session");
            self.session.clear().await?;
            return Err(original);
        };

        match self.refresh_with(session.kind, &refresh_token).await {
            Ok(token) => {
                session.token = token;
                self.session.save(&session).await?;
            }
            Err(e) => {
                warn!(error = %e, "Token refresh failed; clearing session");
                self.session.clear().await?;
                return Err(e);
            }
        }

        let replay = self.dispatch(&call).await?;
        Self::ensure_success(replay).await
    }

    async fn ensure_success(response: Response) -> ClientResult<Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(ClientError::from_response(response).await)
        }
    }

    async fn refresh_with(&self, kind: SessionKind, refresh_token: &str) -> ClientResult<String> {
        let path = match kind {
            SessionKind::User => "/auth/refresh-token",
            SessionKind::Facility => "/facility-auth/refresh-token",
        };
        let call = Call::new(Method::POST, path)
            .json(&serde_json::json!({ "refreshToken": refresh_token }))?;
        let response = Self::ensure_success(self.dispatch(&call).await?).await?;
        Ok(response.json::<TokenResponse>().await?.token)
    }

    async fn fetch<T: DeserializeOwned>(&self, call: Call<'_>) -> ClientResult<T> {
        Ok(self.execute(call).await?.json().await?)
    }

    async fn fetch_empty(&self, call: Call<'_>) -> ClientResult<()> {
        self.execute(call).await?;
        Ok(())
    }

    async fn store_session(
        &self,
        kind: SessionKind,
        token: String,
        refresh_token: String,
        account: &impl Serialize,
    ) -> ClientResult<()> {
        self.session
            .save(&Session {
                kind,
                token,
                refresh_token: Some(refresh_token),
                account: Some(serde_json::to_value(account)?),
            })
            .await
    }

    // ==================== Accounts ====================

    /// Register and store the returned session.
    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<AuthResponse> {
        let call = Call::new(Method::POST, "/auth/register").json(request)?;
        let auth: AuthResponse = self.fetch(call).await?;
        self.store_session(
            SessionKind::User,
            auth.token.clone(),
            auth.refresh_token.clone(),
            &auth.user,
        )
        .await?;
        Ok(auth)
    }

    /// Log in and store the returned session.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<AuthResponse> {
        let call = Call::new(Method::POST, "/auth/login").json(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })?;
        let auth: AuthResponse = self.fetch(call).await?;
        self.store_session(
            SessionKind::User,
            auth.token.clone(),
            auth.refresh_token.clone(),
            &auth.user,
        )
        .await?;
        Ok(auth)
    }

    /// Register a facility and store the returned session.
    pub async fn register_facility(
        &self,
        request: &FacilityRegisterRequest,
    ) -> ClientResult<FacilityAuthResponse> {
        let call = Call::new(Method::POST, "/facility-auth/register").json(request)?;
        let auth: FacilityAuthResponse = self.fetch(call).await?;
        self.store_session(
            SessionKind::Facility,
            auth.token.clone(),
            auth.refresh_token.clone(),
            &auth.facility,
        )
        .await?;
        Ok(auth)
    }

    /// Log in as a facility and store the returned session.
    pub async fn login_facility(
        &self,
        email: &str,
        password: &str,
    ) -> ClientResult<FacilityAuthResponse> {
        let call = Call::new(Method::POST, "/facility-auth/login").json(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })?;
        let auth: FacilityAuthResponse = self.fetch(call).await?;
        self.store_session(
            SessionKind::Facility,
            auth.token.clone(),
            auth.refresh_token.clone(),
            &auth.facility,
        )
        .await?;
        Ok(auth)
    }

    /// Forget the stored session.
    pub async fn logout(&self) -> ClientResult<()> {
        self.session.clear().await
    }

    /// Current user and nurse profile id.
    pub async fn me(&self) -> ClientResult<MeResponse> {
        self.fetch(Call::new(Method::GET, "/auth/me")).await
    }

    /// Edit the current user's name and phone.
    pub async fn update_me(&self, request: &UpdateAccountRequest) -> ClientResult<User> {
        self.fetch(Call::new(Method::PUT, "/auth/me").json(request)?)
            .await
    }

    /// Current facility.
    pub async fn facility_me(&self) -> ClientResult<Facility> {
        self.fetch(Call::new(Method::GET, "/facility-auth/me")).await
    }

    /// Server and database health.
    pub async fn health(&self) -> ClientResult<Health> {
        self.fetch(Call::new(Method::GET, "/health")).await
    }

    // ==================== Nurse profiles ====================

    /// A nurse's profile with licenses and certifications.
    pub async fn nurse_profile(&self, user_id: &str) -> ClientResult<NurseProfileDetails> {
        let path = format!("/nurses/{user_id}/profile");
        self.fetch(Call::new(Method::GET, &path)).await
    }

    /// Create the profile of a nurse registered without one.
    pub async fn create_nurse_profile(
        &self,
        user_id: &str,
        input: &NurseProfileInput,
    ) -> ClientResult<NurseProfile> {
        let path = format!("/nurses/{user_id}/profile");
        self.fetch(Call::new(Method::POST, &path).json(input)?)
            .await
    }

    /// Partially update a nurse profile.
    pub async fn update_nurse_profile(
        &self,
        user_id: &str,
        input: &NurseProfileInput,
    ) -> ClientResult<NurseProfile> {
        let path = format!("/nurses/{user_id}/profile");
        self.fetch(Call::new(Method::PUT, &path).json(input)?).await
    }

    /// Add a license to a nurse profile.
    pub async fn add_license(&self, user_id: &str, input: &LicenseInput) -> ClientResult<License> {
        let path = format!("/nurses/{user_id}/licenses");
        self.fetch(Call::new(Method::POST, &path).json(input)?)
            .await
    }

    /// Edit one of a nurse's licenses.
    pub async fn update_license(
        &self,
        user_id: &str,
        license_id: &str,
        input: &LicenseInput,
    ) -> ClientResult<License> {
        let path = format!("/nurses/{user_id}/licenses/{license_id}");
        self.fetch(Call::new(Method::PUT, &path).json(input)?).await
    }

    /// Remove one of a nurse's licenses.
    pub async fn delete_license(&self, user_id: &str, license_id: &str) -> ClientResult<()> {
        let path = format!("/nurses/{user_id}/licenses/{license_id}");
        self.fetch_empty(Call::new(Method::DELETE, &path)).await
    }

    /// Add a certification to a nurse profile.
    pub async fn add_certification(
        &self,
        user_id: &str,
        input: &CertificationInput,
    ) -> ClientResult<Certification> {
        let path = format!("/nurses/{user_id}/certifications");
        self.fetch(Call::new(Method::POST, &path).json(input)?)
            .await
    }

    /// Edit one of a nurse's certifications.
    pub async fn update_certification(
        &self,
        user_id: &str,
        certification_id: &str,
        input: &CertificationInput,
    ) -> ClientResult<Certification> {
        let path = format!("/nurses/{user_id}/certifications/{certification_id}");
        self.fetch(Call::new(Method::PUT, &path).json(input)?).await
    }

    /// Remove one of a nurse's certifications.
    pub async fn delete_certification(
        &self,
        user_id: &str,
        certification_id: &str,
    ) -> ClientResult<()> {
        let path = format!("/nurses/{user_id}/certifications/{certification_id}");
        self.fetch_empty(Call::new(Method::DELETE, &path)).await
    }

    // ==================== Shifts ====================

    /// Open shifts matching `filter`.
    pub async fn shifts(&self, filter: &ShiftFilter) -> ClientResult<Vec<Shift>> {
        let call = Call::new(Method::GET, "/shifts").query(filter.query_pairs());
        self.fetch(call).await
    }

    /// One shift by id.
    pub async fn shift(&self, id: &str) -> ClientResult<Shift> {
        let path = format!("/shifts/{id}");
        self.fetch(Call::new(Method::GET, &path)).await
    }

    /// Every shift a facility has posted.
    pub async fn facility_shifts(&self, facility_id: &str) -> ClientResult<Vec<Shift>> {
        let path = format!("/shifts/facility/{facility_id}");
        self.fetch(Call::new(Method::GET, &path)).await
    }

    /// Post a shift as the logged-in facility.
    pub async fn create_shift(&self, shift: &NewShift) -> ClientResult<Shift> {
        self.fetch(Call::new(Method::POST, "/shifts").json(shift)?)
            .await
    }

    /// Edit a shift the logged-in facility owns.
    pub async fn update_shift(&self, id: &str, update: &ShiftUpdate) -> ClientResult<Shift> {
        let path = format!("/shifts/edit/{id}");
        self.fetch(Call::new(Method::PUT, &path).json(update)?).await
    }

    /// Delete a shift.
    pub async fn delete_shift(&self, id: &str) -> ClientResult<()> {
        let path = format!("/shifts/{id}");
        self.fetch_empty(Call::new(Method::DELETE, &path)).await
    }

    /// Change a shift's status, e.g. to `cancelled`.
    pub async fn set_shift_status(&self, id: &str, status: &str) -> ClientResult<Shift> {
        let path = format!("/shifts/{id}/status");
        self.fetch(Call::new(Method::PATCH, &path).json(&StatusRequest { status })?)
            .await
    }

    /// Apply to a shift as the logged-in nurse.
    pub async fn apply(&self, shift_id: &str, request: &ApplyRequest) -> ClientResult<Application> {
        let path = format!("/shifts/{shift_id}/apply");
        self.fetch(Call::new(Method::POST, &path).json(request)?)
            .await
    }

    /// Applications received for a shift, with applicant details.
    pub async fn shift_applicants(&self, shift_id: &str) -> ClientResult<Vec<Applicant>> {
        let path = format!("/shifts/{shift_id}/applications");
        self.fetch(Call::new(Method::GET, &path)).await
    }

    // ==================== Applications ====================

    /// The logged-in nurse's applications, newest first.
    pub async fn my_applications(&self) -> ClientResult<Vec<Application>> {
        self.fetch(Call::new(Method::GET, "/applications")).await
    }

    /// One application by id.
    pub async fn application(&self, id: &str) -> ClientResult<Application> {
        let path = format!("/applications/{id}");
        self.fetch(Call::new(Method::GET, &path)).await
    }

    /// Approve, reject or withdraw an application.
    pub async fn set_application_status(
        &self,
        id: &str,
        status: &str,
    ) -> ClientResult<Application> {
        let path = format!("/applications/{id}");
        self.fetch(Call::new(Method::PATCH, &path).json(&StatusRequest { status })?)
            .await
    }

    /// Withdraw a pending application.
    pub async fn withdraw_application(&self, id: &str) -> ClientResult<Application> {
        self.set_application_status(id, "withdrawn").await
    }

    // ==================== Work history ====================

    /// Approved shifts that have not started yet.
    pub async fn upcoming_shifts(&self, user_id: &str) -> ClientResult<Vec<Application>> {
        let path = format!("/users/{user_id}/shifts/upcoming");
        self.fetch(Call::new(Method::GET, &path)).await
    }

    /// Approved shifts that are over.
    pub async fn completed_shifts(&self, user_id: &str) -> ClientResult<Vec<Application>> {
        let path = format!("/users/{user_id}/shifts/completed");
        self.fetch(Call::new(Method::GET, &path)).await
    }

    /// Earned and projected totals for a nurse.
    pub async fn earnings(&self, user_id: &str) -> ClientResult<Earnings> {
        let path = format!("/users/{user_id}/earnings");
        self.fetch(Call::new(Method::GET, &path)).await
    }
}
