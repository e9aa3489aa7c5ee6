use serde::{Deserialize, Serialize};

use crate::model::envelope::Meta;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    User,
    Course,
    Module,
    Lecture,
    Progress,
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Course => write!(f, "course"),
            Self::Module => write!(f, "module"),
            Self::Lecture => write!(f, "lecture"),
            Self::Progress => write!(f, "progress"),
        }
    }
}

pub trait ResourceTyped {
    fn get_resource_type() -> ResourceType;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: Option<Meta>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, meta: Option<Meta>) -> Self {
        Self { items, meta }
    }

    /// Total reported by the server, or the item count when no pagination was returned.
    pub fn total(&self) -> u64 {
        self.meta
            .as_ref()
            .map(|m| m.total)
            .unwrap_or(self.items.len() as u64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Listing parameters, sent as query string.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
}

impl PaginationParams {
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_search<S: Into<String>>(mut self, term: S) -> Self {
        self.search_term = Some(term.into());
        self
    }

    pub fn with_sort<S: Into<String>>(mut self, by: S, order: SortOrder) -> Self {
        self.sort_by = Some(by.into());
        self.sort_order = Some(order);
        self
    }
}

/// Scope for lecture listings.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LectureFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_id: Option<String>,
}

impl LectureFilter {
    pub fn course<S: Into<String>>(id: S) -> Self {
        Self {
            course_id: Some(id.into()),
            module_id: None,
        }
    }

    pub fn module<S: Into<String>>(course_id: S, module_id: S) -> Self {
        Self {
            course_id: Some(course_id.into()),
            module_id: Some(module_id.into()),
        }
    }
}
