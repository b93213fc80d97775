use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Whole days since the Unix epoch (UTC)
pub fn day_key(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis().div_euclid(MS_PER_DAY)
}

/// Format a duration as "1h 5m", "5m" or "42s"
pub fn format_duration(ms: i64) -> String {
    let ms = ms.max(0);
    let hours = ms / 3_600_000;
    let minutes = (ms / 60_000) % 60;

    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m", minutes)
    } else {
        format!("{}s", ms / 1000)
    }
}

/// Daily reading goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingGoal {
    pub enabled: bool,
    pub minutes: u32,
}

impl Default for ReadingGoal {
    fn default() -> Self {
        Self {
            enabled: false,
            minutes: 30,
        }
    }
}

/// Reading time statistics and streak
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadingStats {
    /// Day key → milliseconds read
    pub daily_ms: BTreeMap<i64, i64>,
    pub total_ms: i64,
    pub streak: u32,
    pub last_read_day: Option<i64>,
    #[serde(skip)]
    session_start: Option<DateTime<Utc>>,
}

impl ReadingStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a session; no-op while one is already running
    pub fn start_session(&mut self, now: DateTime<Utc>) {
        if self.session_start.is_none() {
            self.session_start = Some(now);
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.session_start.is_some()
    }

    /// Close the running session and book its time on `now`'s day
    ///
    /// Returns the booked duration, or `None` when no session was running.
    pub fn end_session(&mut self, now: DateTime<Utc>) -> Option<i64> {
        let started_at = self.session_start.take()?;
        let duration_ms = (now - started_at).num_milliseconds().max(0);
        let today = day_key(now);

        *self.daily_ms.entry(today).or_insert(0) += duration_ms;
        self.total_ms += duration_ms;
        self.update_streak(today);

        debug!(duration_ms, streak = self.streak, "Reading session ended");

        Some(duration_ms)
    }

    fn update_streak(&mut self, today: i64) {
        self.streak = match self.last_read_day {
            Some(day) if day == today => self.streak.max(1),
            Some(day) if day == today - 1 => self.streak + 1,
            _ => 1,
        };
        self.last_read_day = Some(today);
    }

    /// Duration of the running session (0 when idle)
    pub fn current_session(&self, now: DateTime<Utc>) -> i64 {
        self.session_start
            .map(|started_at| (now - started_at).num_milliseconds().max(0))
            .unwrap_or(0)
    }

    pub fn daily_reading_time(&self, day: i64) -> i64 {
        self.daily_ms.get(&day).copied().unwrap_or(0)
    }

    pub fn reset_day(&mut self, day: i64) {
        self.daily_ms.remove(&day);
    }

    pub fn is_goal_reached(&self, goal: &ReadingGoal, now: DateTime<Utc>) -> bool {
        if !goal.enabled {
            return false;
        }
        self.daily_reading_time(day_key(now)) >= i64::from(goal.minutes) * 60_000
    }

    pub fn formatted_daily_time(&self, now: DateTime<Utc>) -> String {
        format_duration(self.daily_reading_time(day_key(now)))
    }
}
