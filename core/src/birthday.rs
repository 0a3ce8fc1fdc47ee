// Nearest upcoming birthday across the contact vault

use crate::store::contacts::Contact;
use chrono::{DateTime, Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingBirthday {
    pub contact: Contact,
    /// Whole days from today; 0 means the birthday is today
    pub days_until: i64,
}

/// Parse a stored date of birth. Accepts `YYYY-MM-DD` and full RFC 3339 timestamps.
pub fn parse_dob(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Month/day of `dob` placed in `year`. A Feb 29 birthday falls on Mar 1 in
/// common years.
fn anniversary_in(dob: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, dob.month(), dob.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
}

/// The first anniversary of `dob` on or after `today`.
pub fn next_occurrence(dob: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
    let this_year = anniversary_in(dob, today.year())?;
    if this_year >= today {
        Some(this_year)
    } else {
        anniversary_in(dob, today.year() + 1)
    }
}

/// Days from `today` until the next birthday of `dob`.
pub fn days_until(dob: NaiveDate, today: NaiveDate) -> Option<i64> {
    next_occurrence(dob, today).map(|next| (next - today).num_days())
}

/// The contact whose birthday comes soonest, with the day count.
///
/// Contacts without a usable `dob` are skipped. The first contact wins a tie.
pub fn next_birthday(contacts: &[Contact], today: NaiveDate) -> Option<UpcomingBirthday> {
    let mut nearest: Option<(&Contact, i64)> = None;

    for contact in contacts {
        let Some(dob) = contact.dob.as_deref().and_then(parse_dob) else {
            continue;
        };
        let Some(days) = days_until(dob, today) else {
            continue;
        };
        if nearest.map_or(true, |(_, best)| days < best) {
            nearest = Some((contact, days));
        }
    }

    nearest.map(|(contact, days_until)| UpcomingBirthday {
        contact: contact.clone(),
        days_until,
    })
}
