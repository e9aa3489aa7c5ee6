use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Attachment, ResourceType, ResourceTyped};

/// Uploaded file as stored by the media host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub public_id: String,
    pub secure_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "super::string_or_number")]
    pub price: String,
    #[serde(default)]
    pub thumbnail: Vec<Asset>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ResourceTyped for Course {
    fn get_resource_type() -> ResourceType {
        ResourceType::Course
    }
}

impl Course {
    pub fn new(id: &str, title: &str, price: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            slug: crate::utils::generate_slug(title),
            description: String::new(),
            price: price.to_string(),
            thumbnail: Vec::new(),
            created_by: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn thumbnail_url(&self) -> Option<&str> {
        self.thumbnail.first().map(|a| a.secure_url.as_str())
    }
}

/// Fields of the create/edit course form.
#[derive(Debug, Clone, Default)]
pub struct CourseForm {
    pub title: String,
    pub description: String,
    pub price: String,
    pub thumbnail: Option<Attachment>,
}
