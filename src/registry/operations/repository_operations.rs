//! Repository and tag operations
//!
//! Repository names include their project (`demo/app`) and are placed in the
//! path as-is, so the `/` stays a path separator.

use crate::error::Result;
use crate::registry::client::HarborClient;
use crate::registry::request::RequestDescriptor;
use crate::registry::types::{Repository, Tag};

pub const REPOSITORY_API_PATH: &str = "api/repositories";

#[derive(Clone, Copy)]
pub struct RepositoryOperations<'a> {
    client: &'a HarborClient,
}

impl<'a> RepositoryOperations<'a> {
    pub fn new(client: &'a HarborClient) -> Self {
        Self { client }
    }

    /// Repositories belonging to a project
    pub async fn list(&self, project_id: i64) -> Result<Vec<Repository>> {
        let path = format!("{}?project_id={}", REPOSITORY_API_PATH, project_id);
        let repos: Option<Vec<Repository>> = self.client.call_json(RequestDescriptor::get(path)).await?;
        Ok(repos.unwrap_or_default())
    }

    pub async fn delete(&self, name: &str) -> Result<()> {
        let path = format!("{}/{}", REPOSITORY_API_PATH, name.trim_matches('/'));
        self.client.call(RequestDescriptor::delete(path)).await
    }

    pub async fn list_tags(&self, name: &str) -> Result<Vec<Tag>> {
        let path = format!("{}/{}/tags", REPOSITORY_API_PATH, name.trim_matches('/'));
        let tags: Option<Vec<Tag>> = self.client.call_json(RequestDescriptor::get(path)).await?;
        Ok(tags.unwrap_or_default())
    }

    pub async fn delete_tag(&self, name: &str, tag: &str) -> Result<()> {
        let path = format!(
            "{}/{}/tags/{}",
            REPOSITORY_API_PATH,
            name.trim_matches('/'),
            tag
        );
        self.client.call(RequestDescriptor::delete(path)).await
    }
}
