use crate::notify::Notice;
use crate::timer::Phase;
use serde::{Deserialize, Serialize};

/// Focus totals for one calendar day, stored as
/// `{"sessions": .., "focusTime": .., "xp": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyStats {
    pub sessions: u64,
    /// Minutes.
    pub focus_time: u64,
    pub xp: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub phase: Phase,
    pub duration_minutes: u32,
    pub remaining_seconds: u32,
    pub display: String,
    pub progress_percent: f64,
    pub skill_id: Option<String>,
    pub notes: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodayStatsResponse {
    pub date: String,
    pub sessions: u64,
    pub focus_time: u64,
    pub xp: u64,
}

#[derive(Debug, Deserialize)]
pub struct DurationRequest {
    pub minutes: i64,
}

#[derive(Debug, Deserialize)]
pub struct SelectionRequest {
    #[serde(default)]
    pub skill_id: Option<String>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Deserialize)]
pub struct NewsletterRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct NotificationsResponse {
    pub notices: Vec<Notice>,
}

#[derive(Debug, Serialize)]
pub struct DailyPoint {
    pub date: String,
    pub sessions: u64,
    pub focus_time: u64,
    pub xp: u64,
}

#[derive(Debug, Serialize)]
pub struct WeeklyPoint {
    pub week: String,
    pub start_date: String,
    pub end_date: String,
    pub sessions: u64,
    pub focus_time: u64,
    pub xp: u64,
}

#[derive(Debug, Serialize)]
pub struct WeeklyAveragePoint {
    pub week: String,
    pub days_counted: u8,
    pub avg_sessions: f64,
    pub avg_focus_time: f64,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub last_7_days: Vec<DailyPoint>,
    pub weekly_totals: Vec<WeeklyPoint>,
    pub weekly_averages: Vec<WeeklyAveragePoint>,
}
