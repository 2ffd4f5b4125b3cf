//! Practice reports.
//!
//! Summarises recorded sessions over a period: total time, session counts,
//! which presets were used, and the current daily streak.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::storage::{SessionStorage, StoredSession};
use crate::core::{format_seconds, render_progress_bar};
use crate::error::BreatheError;

/// Report time period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    /// Today only
    Today,
    /// Last 7 days including today
    Week,
    /// Last 30 days including today
    Month,
    /// Everything recorded
    AllTime,
}

impl ReportPeriod {
    /// Parse a period name. Unknown names fall back to `Week`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "today" | "t" | "d" | "day" => Self::Today,
            "month" | "m" | "30d" => Self::Month,
            "all" | "alltime" | "all-time" => Self::AllTime,
            _ => Self::Week,
        }
    }

    /// `[start, end)` covering the period, for a given "today".
    #[must_use]
    pub fn date_range(&self, today: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        let start_of = |date: NaiveDate| date.and_time(NaiveTime::MIN).and_utc();
        let end = start_of(today + Duration::days(1));

        let start = match self {
            Self::Today => start_of(today),
            Self::Week => start_of(today - Duration::days(6)),
            Self::Month => start_of(today - Duration::days(29)),
            Self::AllTime => DateTime::<Utc>::UNIX_EPOCH,
        };
        (start, end)
    }

    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Week => "This Week",
            Self::Month => "This Month",
            Self::AllTime => "All Time",
        }
    }
}

/// Practice time per preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetPractice {
    pub preset_id: String,
    pub seconds: u64,
    pub sessions: u64,
}

/// Practice time per day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPractice {
    pub date: NaiveDate,
    pub seconds: u64,
    pub sessions: u64,
}

/// Breathing practice report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PracticeReport {
    /// Report period name
    pub period: String,
    /// Total recorded time in seconds
    pub total_seconds: u64,
    /// Total recorded time in whole minutes
    pub total_minutes: u64,
    /// Number of recorded sessions
    pub session_count: u64,
    /// Sessions that ran to their limit (or were open-ended)
    pub completed_sessions: u64,
    /// Average session length in seconds
    pub average_session_seconds: f64,
    /// Longest session in seconds
    pub longest_session_seconds: u64,
    /// Time by preset, most practised first
    pub by_preset: Vec<PresetPractice>,
    /// Daily breakdown, most recent first
    pub daily: Vec<DailyPractice>,
    /// Consecutive days with practice, ending today or yesterday
    pub streak_days: u64,
}

impl PracticeReport {
    /// Generate a report for `period` from stored sessions.
    ///
    /// # Errors
    ///
    /// Returns an error if the sessions cannot be read.
    pub fn generate(
        storage: &SessionStorage,
        period: ReportPeriod,
        today: NaiveDate,
    ) -> Result<Self, BreatheError> {
        let (start, end) = period.date_range(today);
        let sessions = storage.get_range(start, end)?;

        // The streak can reach back past the report period.
        let streak_days = if period == ReportPeriod::AllTime {
            calculate_streak(&sessions, today)
        } else {
            let (all_start, _) = ReportPeriod::AllTime.date_range(today);
            calculate_streak(&storage.get_range(all_start, end)?, today)
        };

        let mut report = Self::from_sessions(period, &sessions, today);
        report.streak_days = streak_days;
        Ok(report)
    }

    /// Build a report from sessions already loaded.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_sessions(period: ReportPeriod, sessions: &[StoredSession], today: NaiveDate) -> Self {
        let total_seconds: u64 = sessions.iter().map(|s| s.record.duration_seconds).sum();
        let session_count = sessions.len() as u64;
        let completed_sessions = sessions.iter().filter(|s| s.record.completed).count() as u64;

        let average_session_seconds = if session_count > 0 {
            total_seconds as f64 / session_count as f64
        } else {
            0.0
        };

        let longest_session_seconds = sessions
            .iter()
            .map(|s| s.record.duration_seconds)
            .max()
            .unwrap_or(0);

        let mut preset_map: HashMap<&str, (u64, u64)> = HashMap::new();
        for session in sessions {
            let entry = preset_map.entry(session.record.preset_id.as_str()).or_default();
            entry.0 += session.record.duration_seconds;
            entry.1 += 1;
        }
        let mut by_preset: Vec<PresetPractice> = preset_map
            .into_iter()
            .map(|(preset_id, (seconds, sessions))| PresetPractice {
                preset_id: preset_id.to_string(),
                seconds,
                sessions,
            })
            .collect();
        by_preset.sort_by(|a, b| b.seconds.cmp(&a.seconds).then_with(|| a.preset_id.cmp(&b.preset_id)));

        let mut daily_map: HashMap<NaiveDate, (u64, u64)> = HashMap::new();
        for session in sessions {
            let entry = daily_map.entry(session.record.started_at.date_naive()).or_default();
            entry.0 += session.record.duration_seconds;
            entry.1 += 1;
        }
        let mut daily: Vec<DailyPractice> = daily_map
            .into_iter()
            .map(|(date, (seconds, sessions))| DailyPractice {
                date,
                seconds,
                sessions,
            })
            .collect();
        daily.sort_by(|a, b| b.date.cmp(&a.date));

        Self {
            period: period.display_name().to_string(),
            total_seconds,
            total_minutes: total_seconds / 60,
            session_count,
            completed_sessions,
            average_session_seconds,
            longest_session_seconds,
            by_preset,
            daily,
            streak_days: calculate_streak(sessions, today),
        }
    }

    /// Format the report for display.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn format(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Practice Report: {}", self.period));
        lines.push("═".repeat(50));
        lines.push(String::new());

        lines.push("Summary".to_string());
        lines.push("─".repeat(40));
        lines.push(format!("  Total practice:      {}", format_seconds(self.total_seconds)));
        lines.push(format!("  Sessions:            {}", self.session_count));
        lines.push(format!("  Completed sessions:  {}", self.completed_sessions));
        lines.push(format!(
            "  Average session:     {}",
            format_seconds(self.average_session_seconds.round() as u64)
        ));
        lines.push(format!(
            "  Longest session:     {}",
            format_seconds(self.longest_session_seconds)
        ));
        lines.push(format!("  Current streak:      {} days", self.streak_days));

        if !self.by_preset.is_empty() {
            lines.push(String::new());
            lines.push("By Preset".to_string());
            lines.push("─".repeat(40));
            let max = self.by_preset.iter().map(|p| p.seconds).max().unwrap_or(1).max(1);
            for preset in &self.by_preset {
                lines.push(format!(
                    "  {:<18} {:>6}s {} ({} sessions)",
                    preset.preset_id,
                    preset.seconds,
                    render_progress_bar(preset.seconds as f64 / max as f64, 12),
                    preset.sessions
                ));
            }
        }

        if !self.daily.is_empty() {
            lines.push(String::new());
            lines.push("Recent Days".to_string());
            lines.push("─".repeat(40));
            for day in self.daily.iter().take(7) {
                lines.push(format!(
                    "  {} {:>4}m ({} sessions)",
                    day.date,
                    day.seconds / 60,
                    day.sessions
                ));
            }
        }

        lines.join("\n")
    }
}

/// Consecutive days with at least one session, counted back from today
/// (or from yesterday if nothing has been recorded today yet).
fn calculate_streak(sessions: &[StoredSession], today: NaiveDate) -> u64 {
    let dates: BTreeSet<NaiveDate> = sessions
        .iter()
        .map(|s| s.record.started_at.date_naive())
        .collect();

    let mut check = today;
    if !dates.contains(&check) {
        check = today - Duration::days(1);
    }

    let mut streak = 0;
    while dates.contains(&check) {
        streak += 1;
        check -= Duration::days(1);
    }
    streak
}
