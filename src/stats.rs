use crate::errors::StoreError;
use crate::models::{DailyPoint, DailyStats, HistoryResponse, WeeklyAveragePoint, WeeklyPoint};
use crate::storage::KeyValueStore;
use chrono::{Datelike, Duration, Local, NaiveDate};
use std::{collections::BTreeMap, sync::Arc};
use tracing::warn;

const KEY_PREFIX: &str = "pomodoroStats_";
const WEEK_COUNT: usize = 8;

/// XP awarded per focused minute.
pub const XP_PER_MINUTE: u64 = 2;

/// Typed access to the per-day focus totals in a [`KeyValueStore`].
#[derive(Clone)]
pub struct StatsStore {
    store: Arc<dyn KeyValueStore>,
}

impl StatsStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Totals for `date`; zeros if nothing has been recorded yet.
    pub async fn load(&self, date: NaiveDate) -> DailyStats {
        let key = stats_key(date);
        let Some(raw) = self.store.get(&key).await else {
            return DailyStats::default();
        };
        match serde_json::from_str(&raw) {
            Ok(stats) => stats,
            Err(err) => {
                warn!(%key, "ignoring unreadable stats entry: {err}");
                DailyStats::default()
            }
        }
    }

    pub async fn save(&self, date: NaiveDate, stats: &DailyStats) -> Result<(), StoreError> {
        let payload = serde_json::to_string(stats)?;
        self.store.put(&stats_key(date), payload).await
    }

    /// Adds one finished session of `minutes` to the totals for `date`.
    pub async fn record_session(
        &self,
        date: NaiveDate,
        minutes: u32,
    ) -> Result<DailyStats, StoreError> {
        let minutes = u64::from(minutes);
        let mut stats = self.load(date).await;
        stats.sessions = stats.sessions.saturating_add(1);
        stats.focus_time = stats.focus_time.saturating_add(minutes);
        stats.xp = stats.xp.saturating_add(minutes * XP_PER_MINUTE);
        self.save(date, &stats).await?;
        Ok(stats)
    }

    pub async fn history(&self, today: NaiveDate) -> HistoryResponse {
        let first = week_start(today) - Duration::weeks(WEEK_COUNT as i64 - 1);
        let mut days = BTreeMap::new();
        for date in first.iter_days().take_while(|date| *date <= today) {
            days.insert(date, self.load(date).await);
        }
        build_history_at(today, &days)
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn stats_key(date: NaiveDate) -> String {
    format!("{KEY_PREFIX}{}", date.format("%Y-%m-%d"))
}

pub fn build_history_at(today: NaiveDate, days: &BTreeMap<NaiveDate, DailyStats>) -> HistoryResponse {
    let day = |date: NaiveDate| days.get(&date).copied().unwrap_or_default();

    let mut last_7_days = Vec::with_capacity(7);
    for offset in (0..7).rev() {
        let date = today - Duration::days(offset);
        let stats = day(date);
        last_7_days.push(DailyPoint {
            date: date.to_string(),
            sessions: stats.sessions,
            focus_time: stats.focus_time,
            xp: stats.xp,
        });
    }

    let current_week_start = week_start(today);
    let mut weekly_totals = Vec::with_capacity(WEEK_COUNT);
    let mut weekly_averages = Vec::with_capacity(WEEK_COUNT);

    for offset in (0..WEEK_COUNT).rev() {
        let start = current_week_start - Duration::weeks(offset as i64);
        let end = start + Duration::days(6);

        let mut total = DailyStats::default();
        for day_offset in 0..7 {
            let stats = day(start + Duration::days(day_offset));
            total.sessions = total.sessions.saturating_add(stats.sessions);
            total.focus_time = total.focus_time.saturating_add(stats.focus_time);
            total.xp = total.xp.saturating_add(stats.xp);
        }

        let days_counted = if today < start {
            0
        } else if today > end {
            7
        } else {
            (today - start).num_days() as u8 + 1
        };
        let denom = if days_counted == 0 { 1.0 } else { f64::from(days_counted) };

        weekly_totals.push(WeeklyPoint {
            week: week_label(start),
            start_date: start.to_string(),
            end_date: end.to_string(),
            sessions: total.sessions,
            focus_time: total.focus_time,
            xp: total.xp,
        });
        weekly_averages.push(WeeklyAveragePoint {
            week: week_label(start),
            days_counted,
            avg_sessions: total.sessions as f64 / denom,
            avg_focus_time: total.focus_time as f64 / denom,
        });
    }

    HistoryResponse {
        last_7_days,
        weekly_totals,
        weekly_averages,
    }
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

fn week_label(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}
