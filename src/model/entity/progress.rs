use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{
    ResourceType, ResourceTyped,
    entity::{Course, Lecture, Module, Reference},
};

/// One record per (user, course).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    pub course_id: Reference,
    #[serde(default)]
    pub completed_lectures: Vec<String>,
    #[serde(default)]
    pub current_lecture: Option<String>,
    #[serde(default)]
    pub progress_percentage: f64,
    pub last_accessed: DateTime<Utc>,
}

impl ResourceTyped for Progress {
    fn get_resource_type() -> ResourceType {
        ResourceType::Progress
    }
}

impl Progress {
    pub fn is_complete(&self) -> bool {
        self.progress_percentage == 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    #[serde(default)]
    pub total_lectures: u32,
    #[serde(default)]
    pub completed_lectures: u32,
    #[serde(default)]
    pub progress_percentage: f64,
    #[serde(default)]
    pub current_lecture: Option<String>,
    #[serde(default)]
    pub last_accessed: Option<DateTime<Utc>>,
}

/// Composite learning-view payload of `GET /course/with-progress/:id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseWithProgress {
    pub course: Course,
    #[serde(default)]
    pub modules: Vec<Module>,
    #[serde(default)]
    pub lectures: Vec<Lecture>,
    #[serde(default)]
    pub progress: Option<ProgressSummary>,
}

impl CourseWithProgress {
    pub fn current_lecture_id(&self) -> Option<&str> {
        self.progress
            .as_ref()
            .and_then(|p| p.current_lecture.as_deref())
    }
}

/// Payload of `POST /progress/lecture-completed`. Only the id of the next
/// lecture is read; the rest of the document may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionOutcome {
    #[serde(default)]
    pub next_lecture: Option<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<ProgressSnapshot>,
}

impl CompletionOutcome {
    pub fn next_lecture_id(&self) -> Option<&str> {
        self.next_lecture.as_ref().map(Reference::id)
    }
}

/// Progress as echoed back by a mutation; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    #[serde(default)]
    pub completed_lectures: Vec<String>,
    #[serde(default)]
    pub current_lecture: Option<String>,
    #[serde(default)]
    pub progress_percentage: Option<f64>,
}

/// Answer of the lecture access check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LectureAccess {
    #[serde(default, alias = "canAccess")]
    pub has_access: bool,
    #[serde(default, alias = "reason")]
    pub lock_reason: Option<String>,
}
