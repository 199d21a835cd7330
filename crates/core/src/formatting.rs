//! Display helpers for shifts and earnings.
//!
//! Everything here is recomputed from stored timestamps and rates on every
//! read. Nothing is persisted.

use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;
use serde::Serialize;

/// Shift length in whole hours, rounded half away from zero.
#[must_use]
pub fn shift_length_hours<A: TimeZone, B: TimeZone>(start: &DateTime<A>, end: &DateTime<B>) -> i64 {
    let seconds = end.timestamp() - start.timestamp();
    (seconds as f64 / 3600.0).round() as i64
}

/// `hours * rate`, rounded to cents.
#[must_use]
pub fn earnings(hours: f64, rate: f64) -> f64 {
    round_cents(hours * rate)
}

/// Round a money amount to two decimal places.
#[must_use]
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Clock time such as `7:00 AM`.
#[must_use]
pub fn format_time<T: TimeZone>(ts: &DateTime<T>, tz: Tz) -> String {
    ts.with_timezone(&tz).format("%-I:%M %p").to_string()
}

/// Calendar date such as `Mon, Jan 15, 2024`.
#[must_use]
pub fn format_date<T: TimeZone>(ts: &DateTime<T>, tz: Tz) -> String {
    ts.with_timezone(&tz).format("%a, %b %-d, %Y").to_string()
}

/// `7:00 AM - 7:00 PM`.
#[must_use]
pub fn format_time_range<A: TimeZone, B: TimeZone>(
    start: &DateTime<A>,
    end: &DateTime<B>,
    tz: Tz,
) -> String {
    format!("{} - {}", format_time(start, tz), format_time(end, tz))
}

/// Derived display fields attached to shift payloads.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftDisplay {
    pub shift_length_hours: i64,
    pub earnings: f64,
    pub date: String,
    pub time_range: String,
}

impl ShiftDisplay {
    /// Compute display fields for a shift window and rate.
    #[must_use]
    pub fn compute<A: TimeZone, B: TimeZone>(
        start: &DateTime<A>,
        end: &DateTime<B>,
        hourly_rate: f64,
        tz: Tz,
    ) -> Self {
        let hours = shift_length_hours(start, end);
        Self {
            shift_length_hours: hours,
            earnings: earnings(hours as f64, hourly_rate),
            date: format_date(start, tz),
            time_range: format_time_range(start, end, tz),
        }
    }
}
