use serde::{Deserialize, Serialize};
use time::{format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime, UtcOffset};
use uuid::Uuid;

use super::progress::{self, BabySize, Milestone, Tip};
use super::repo::PregnancyRecord;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePregnancyRequest {
    #[serde(default)]
    pub start_date: Option<String>,
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp (reduced to its UTC date).
pub fn parse_start_date(raw: &str) -> Option<Date> {
    let raw = raw.trim();
    if let Ok(d) = Date::parse(raw, format_description!("[year]-[month]-[day]")) {
        return Some(d);
    }
    OffsetDateTime::parse(raw, &Rfc3339)
        .ok()
        .map(|dt| dt.to_offset(UtcOffset::UTC).date())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PregnancyResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(with = "iso_date")]
    pub start_date: Date,
    #[serde(with = "iso_date")]
    pub due_date: Date,
    pub current_week: u8,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl PregnancyResponse {
    pub fn from_record(r: PregnancyRecord, today: Date) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            start_date: r.start_date,
            due_date: progress::due_date(r.start_date),
            current_week: progress::current_week(r.start_date, today),
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    pub current_week: u8,
    pub total_weeks: u8,
    pub progress_percent: u8,
    #[serde(with = "iso_date")]
    pub due_date: Date,
    pub days_until_due: i64,
    pub baby_size: &'static BabySize,
    pub milestone: Option<&'static Milestone>,
    pub tips: Vec<&'static Tip>,
}

impl ProgressResponse {
    pub fn for_start(start: Date, today: Date) -> Self {
        let week = progress::current_week(start, today);
        Self {
            current_week: week,
            total_weeks: progress::FULL_TERM_WEEKS,
            progress_percent: progress::progress_percent(week),
            due_date: progress::due_date(start),
            days_until_due: progress::days_until_due(start, today),
            baby_size: progress::baby_size(week),
            milestone: progress::milestone(week),
            tips: progress::tips(week),
        }
    }
}
