//! Upcoming and completed work, and earnings, for a nurse.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use nurseshift_common::AppResult;
use nurseshift_db::{
    entities::{
        application::{self, ApplicationStatus},
        shift::{self, ShiftStatus},
    },
    repositories::{ApplicationRepository, NurseProfileRepository, ShiftRepository},
};

use super::token::Principal;
use crate::formatting::{ShiftDisplay, earnings, round_cents, shift_length_hours};

/// An approved application with its shift.
#[derive(Debug, Clone)]
pub struct WorkEntry {
    pub application: application::Model,
    pub shift: shift::Model,
    pub display: ShiftDisplay,
}

/// Earnings totals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EarningsSummary {
    pub total_earnings: f64,
    pub total_hours: i64,
    pub completed_shifts: usize,
    pub projected_earnings: f64,
    pub upcoming_shifts: usize,
}

fn is_upcoming(shift: &shift::Model, now: DateTime<Utc>) -> bool {
    shift.start_time > now
        && shift.status != ShiftStatus::Cancelled
        && shift.status != ShiftStatus::Completed
}

fn is_completed(shift: &shift::Model, now: DateTime<Utc>) -> bool {
    shift.status == ShiftStatus::Completed
        || (shift.end_time <= now && shift.status != ShiftStatus::Cancelled)
}

fn total(entries: &[WorkEntry]) -> (f64, i64) {
    entries.iter().fold((0.0, 0), |(money, hours), e| {
        let h = shift_length_hours(&e.shift.start_time, &e.shift.end_time);
        (money + earnings(h as f64, e.shift.hourly_rate), hours + h)
    })
}

/// Work history service.
#[derive(Clone)]
pub struct WorkHistoryService {
    application_repo: ApplicationRepository,
    shift_repo: ShiftRepository,
    profile_repo: NurseProfileRepository,
    timezone: Tz,
}

impl WorkHistoryService {
    /// Create a new work history service.
    #[must_use]
    pub const fn new(
        application_repo: ApplicationRepository,
        shift_repo: ShiftRepository,
        profile_repo: NurseProfileRepository,
        timezone: Tz,
    ) -> Self {
        Self {
            application_repo,
            shift_repo,
            profile_repo,
            timezone,
        }
    }

    async fn approved_work(&self, user_id: &str) -> AppResult<Vec<WorkEntry>> {
        let Some(profile) = self.profile_repo.find_by_user_id(user_id).await? else {
            return Ok(vec![]);
        };

        let applications = self
            .application_repo
            .find_by_nurse_and_status(&profile.id, ApplicationStatus::Approved)
            .await?;
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
            .filter_map(|application| {
                let shift = shifts.get(&application.shift_id)?.clone();
                let display = ShiftDisplay::compute(
                    &shift.start_time,
                    &shift.end_time,
                    shift.hourly_rate,
                    self.timezone,
                );
                Some(WorkEntry {
                    application,
                    shift,
                    display,
                })
            })
            .collect())
    }

    fn split(entries: Vec<WorkEntry>, now: DateTime<Utc>) -> (Vec<WorkEntry>, Vec<WorkEntry>) {
        let mut upcoming: Vec<WorkEntry> = Vec::new();
        let mut completed: Vec<WorkEntry> = Vec::new();
        for entry in entries {
            if is_completed(&entry.shift, now) {
                completed.push(entry);
            } else if is_upcoming(&entry.shift, now) {
                upcoming.push(entry);
            }
        }
        upcoming.sort_by_key(|e| e.shift.start_time);
        completed.sort_by_key(|e| std::cmp::Reverse(e.shift.start_time));
        (upcoming, completed)
    }

    /// Approved shifts that have not started, soonest first.
    pub async fn upcoming(
        &self,
        principal: &Principal,
        user_id: &str,
    ) -> AppResult<Vec<WorkEntry>> {
        principal.ensure_self_or_admin(user_id)?;
        let entries = self.approved_work(user_id).await?;
        Ok(Self::split(entries, Utc::now()).0)
    }

    /// Approved shifts that are completed or have ended, most recent first.
    pub async fn completed(
        &self,
        principal: &Principal,
        user_id: &str,
    ) -> AppResult<Vec<WorkEntry>> {
        principal.ensure_self_or_admin(user_id)?;
        let entries = self.approved_work(user_id).await?;
        Ok(Self::split(entries, Utc::now()).1)
    }

    /// Earned and projected totals.
    pub async fn earnings(
        &self,
        principal: &Principal,
        user_id: &str,
    ) -> AppResult<EarningsSummary> {
        principal.ensure_self_or_admin(user_id)?;
        let entries = self.approved_work(user_id).await?;
        let (upcoming, completed) = Self::split(entries, Utc::now());

        let (total_earnings, total_hours) = total(&completed);
        let (projected_earnings, _) = total(&upcoming);

        Ok(EarningsSummary {
            total_earnings: round_cents(total_earnings),
            total_hours,
            completed_shifts: completed.len(),
            projected_earnings: round_cents(projected_earnings),
            upcoming_shifts: upcoming.len(),
        })
    }
}
