use serde::{Deserialize, Deserializer, Serialize};

mod user;
pub use user::{Role, User};

mod course;
pub use course::{Asset, Course, CourseForm};

mod module;
pub use module::{Module, ModuleCreate, ModuleUpdate};

mod lecture;
pub use lecture::{Lecture, LectureForm, LecturePayload};

mod progress;
pub use progress::{
    CompletionOutcome, CourseWithProgress, LectureAccess, Progress, ProgressSnapshot, ProgressSummary,
};

/// A foreign key the server sends either as a bare id or as a populated document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reference {
    Id(String),
    Populated {
        #[serde(rename = "_id")]
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        slug: Option<String>,
    },
}

impl Reference {
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Populated { id, .. } => id,
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Id(_) => None,
            Self::Populated { title, .. } => title.as_deref(),
        }
    }

    pub fn slug(&self) -> Option<&str> {
        match self {
            Self::Id(_) => None,
            Self::Populated { slug, .. } => slug.as_deref(),
        }
    }
}

impl From<&str> for Reference {
    fn from(value: &str) -> Self {
        Self::Id(value.to_string())
    }
}

/// Accepts `"49.99"` as well as `49.99`.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}
