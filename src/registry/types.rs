//! Data transfer shapes for projects, repositories and tags
//!
//! These only exist to be decoded from (or, for [`ProjectRequest`], encoded
//! into) JSON bodies. Fields the server omits fall back to their defaults.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Payload for creating or updating a project.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectRequest {
    #[serde(rename = "project_name")]
    pub name: String,
    /// Deprecated by the server, kept for replication-created projects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public: Option<i32>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl ProjectRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Project {
    pub project_id: i64,
    pub owner_id: i64,
    pub name: String,
    pub creation_time: Option<DateTime<Utc>>,
    pub update_time: Option<DateTime<Utc>>,
    pub deleted: bool,
    pub owner_name: String,
    pub togglable: bool,
    #[serde(rename = "current_user_role_id")]
    pub role: i64,
    pub repo_count: i64,
    pub chart_count: u64,
    pub metadata: HashMap<String, String>,
}

impl Project {
    pub fn is_public(&self) -> bool {
        self.metadata.get("public").is_some_and(|v| v == "true")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Repository {
    pub id: i64,
    pub name: String,
    pub project_id: i64,
    pub description: String,
    pub pull_count: i64,
    pub star_count: i64,
    pub tags_count: i64,
    pub creation_time: Option<DateTime<Utc>>,
    pub update_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Tag {
    pub name: String,
    pub size: i64,
    pub digest: String,
    pub author: String,
    pub created: Option<DateTime<Utc>>,
}
