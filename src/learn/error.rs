use thiserror::Error;

use crate::api::ApiError;

pub const DEFAULT_LOCK_REASON: &str = "This lecture is locked";

#[derive(Debug, Error)]
pub enum LearnError {
    #[error("{reason}")]
    Locked { lecture_id: String, reason: String },
    #[error("lecture {lecture_id} is not part of this course")]
    UnknownLecture { lecture_id: String },
    #[error("no lecture is selected")]
    NoCurrentLecture,
    #[error("no course is loaded")]
    NotLoaded,
    #[error(transparent)]
    Api(#[from] ApiError),
}

pub type LearnResult<T> = std::result::Result<T, LearnError>;

impl LearnError {
    pub fn locked(lecture_id: &str, reason: Option<&str>) -> Self {
        Self::Locked {
            lecture_id: lecture_id.to_string(),
            reason: reason.unwrap_or(DEFAULT_LOCK_REASON).to_string(),
        }
    }

    pub fn unknown(lecture_id: &str) -> Self {
        Self::UnknownLecture {
            lecture_id: lecture_id.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api(e) if e.is_unauthorized())
    }
}
