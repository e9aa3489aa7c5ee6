//! Figures shown on the dashboard and progress pages, derived from a user's progress records.

use chrono::{DateTime, Duration, Utc};

use crate::model::entity::Progress;

pub const HOURS_PER_LECTURE: f64 = 0.5;

pub fn completed_lecture_count(records: &[Progress]) -> usize {
    records.iter().map(|p| p.completed_lectures.len()).sum()
}

/// Mean completion percentage, `0` with no records.
pub fn average_progress(records: &[Progress]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    records.iter().map(|p| p.progress_percentage).sum::<f64>() / records.len() as f64
}

pub fn completed_course_count(records: &[Progress]) -> usize {
    records.iter().filter(|p| p.is_complete()).count()
}

pub fn hours_learned(records: &[Progress]) -> f64 {
    completed_lecture_count(records) as f64 * HOURS_PER_LECTURE
}

/// Any course touched within the 24 hours before `now`.
pub fn recently_active(records: &[Progress], now: DateTime<Utc>) -> bool {
    let since = now - Duration::hours(24);
    records
        .iter()
        .any(|p| p.last_accessed >= since && p.last_accessed <= now)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearningStreak {
    Active,
    Inactive,
}

impl std::fmt::Display for LearningStreak {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Inactive => write!(f, "inactive"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub total_courses: usize,
    pub completed_lectures: usize,
    pub hours_learned: u64,
    pub average_progress: u32,
    pub completed_courses: usize,
    pub streak: LearningStreak,
}

impl DashboardStats {
    pub fn from_records(records: &[Progress], now: DateTime<Utc>) -> Self {
        Self {
            total_courses: records.len(),
            completed_lectures: completed_lecture_count(records),
            hours_learned: hours_learned(records).floor() as u64,
            average_progress: average_progress(records).round() as u32,
            completed_courses: completed_course_count(records),
            streak: if recently_active(records, now) {
                LearningStreak::Active
            } else {
                LearningStreak::Inactive
            },
        }
    }
}

/// Summary row of the progress page.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressOverview {
    pub total_courses: usize,
    pub completed_courses: usize,
    pub completed_lectures: usize,
    pub hours_learned: f64,
}

impl ProgressOverview {
    pub fn from_records(records: &[Progress]) -> Self {
        Self {
            total_courses: records.len(),
            completed_courses: completed_course_count(records),
            completed_lectures: completed_lecture_count(records),
            hours_learned: hours_learned(records),
        }
    }
}
