use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{
    Attachment, ResourceType, ResourceTyped,
    entity::{Asset, Reference},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lecture {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub video_url: String,
    #[serde(default)]
    pub pdf_notes: Vec<Asset>,
    pub module_id: Reference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<Reference>,
    #[serde(default)]
    pub order: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    // only present in learning-view responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_locked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_current: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock_reason: Option<String>,
}

impl ResourceTyped for Lecture {
    fn get_resource_type() -> ResourceType {
        ResourceType::Lecture
    }
}

impl Lecture {
    pub fn new(id: &str, title: &str, module_id: &str, order: i32) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            slug: crate::utils::generate_slug(title),
            video_url: String::new(),
            pdf_notes: Vec::new(),
            module_id: Reference::from(module_id),
            course_id: None,
            order,
            created_at: None,
            is_locked: None,
            is_completed: None,
            is_current: None,
            lock_reason: None,
        }
    }

    pub fn with_flags(mut self, locked: bool, completed: bool) -> Self {
        self.is_locked = Some(locked);
        self.is_completed = Some(completed);
        self
    }

    pub fn locked(&self) -> bool {
        self.is_locked.unwrap_or(false)
    }

    pub fn completed(&self) -> bool {
        self.is_completed.unwrap_or(false)
    }

    pub fn embed_url(&self) -> Option<String> {
        if self.video_url.is_empty() {
            return None;
        }
        Some(crate::utils::youtube_embed_url(&self.video_url))
    }
}

/// `GET /lecture/:id` answers either with the lecture or with `{ lecture }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LecturePayload {
    Wrapped { lecture: Lecture },
    Bare(Lecture),
}

impl LecturePayload {
    pub fn into_lecture(self) -> Lecture {
        match self {
            Self::Wrapped { lecture } => lecture,
            Self::Bare(lecture) => lecture,
        }
    }
}

/// Fields of the create/edit lecture form.
#[derive(Debug, Clone, Default)]
pub struct LectureForm {
    pub title: String,
    pub video_url: String,
    /// Required on create, ignored on update.
    pub module_id: Option<String>,
    pub course_id: Option<String>,
    pub pdf_notes: Vec<Attachment>,
}
