use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::user::require;

/// Publication state of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum CourseStatus {
    Active,
    #[default]
    Draft,
    Pending,
}

impl CourseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CourseStatus::Active => "active",
            CourseStatus::Draft => "draft",
            CourseStatus::Pending => "pending",
        }
    }
}

impl FromStr for CourseStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(CourseStatus::Active),
            "draft" => Ok(CourseStatus::Draft),
            "pending" => Ok(CourseStatus::Pending),
            other => Err(CoreError::InvalidCourseStatus(other.to_string())),
        }
    }
}

impl fmt::Display for CourseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct Material {
    pub id: String,
    pub name: String,
    pub data_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct CourseModule {
    pub id: String,
    pub title: String,
    pub description: String,
    pub videos: Vec<Video>,
    pub materials: Vec<Material>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    pub status: CourseStatus,
    #[serde(default)]
    pub modules: Vec<CourseModule>,
    pub enrolled_students: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    /// Videos in module order.
    pub fn videos(&self) -> impl Iterator<Item = &Video> {
        self.modules.iter().flat_map(|m| m.videos.iter())
    }

    pub fn total_videos(&self) -> usize {
        self.modules.iter().map(|m| m.videos.len()).sum()
    }

    pub fn has_video(&self, video_id: &str) -> bool {
        self.videos().any(|v| v.id == video_id)
    }

    /// Case-insensitive substring match over title and description.
    /// A blank query matches every course; otherwise surrounding whitespace
    /// is part of the needle.
    pub fn matches_query(&self, query: &str) -> bool {
        if query.trim().is_empty() {
            return true;
        }
        let needle = query.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
    }
}

/// Course fields supplied on creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub status: CourseStatus,
    #[serde(default)]
    pub modules: Vec<CourseModule>,
}

impl NewCourse {
    pub fn validate(&self) -> Result<(), CoreError> {
        require("title", &self.title)?;
        require("description", &self.description)?;
        Ok(())
    }
}

/// Partial course update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct CourseUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CourseStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modules: Option<Vec<CourseModule>>,
}

impl CourseUpdate {
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(title) = &self.title {
            require("title", title)?;
        }
        if let Some(description) = &self.description {
            require("description", description)?;
        }
        Ok(())
    }
}

/// Listing filter for `GET /courses`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CourseStatus>,
}

impl CourseFilter {
    pub fn is_empty(&self) -> bool {
        self.q.as_deref().is_none_or(|q| q.trim().is_empty()) && self.status.is_none()
    }

    pub fn matches(&self, course: &Course) -> bool {
        if let Some(status) = self.status {
            if course.status != status {
                return false;
            }
        }
        self.q.as_deref().is_none_or(|q| course.matches_query(q))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn video(id: &str) -> Video {
        Video {
            id: id.into(),
            title: format!("Video {id}"),
            ..Default::default()
        }
    }

    pub fn module(id: &str, videos: &[&str]) -> CourseModule {
        CourseModule {
            id: id.into(),
            title: format!("Module {id}"),
            videos: videos.iter().map(|v| video(v)).collect(),
            ..Default::default()
        }
    }

    pub fn course(title: &str, modules: Vec<CourseModule>) -> Course {
        let now = Utc::now();
        Course {
            id: Uuid::new_v4(),
            title: title.into(),
            description: "An introduction".into(),
            thumbnail: None,
            status: CourseStatus::Active,
            modules,
            enrolled_students: 0,
            created_at: now,
            updated_at: now,
        }
    }
}
