//! Project operations
//!
//! - Create (POST api/projects)
//! - Existence check by name (HEAD api/projects?project_name=)
//! - Get, update and delete by id (api/projects/{id})
//! - List filtered by name (GET api/projects?name=)

use crate::error::Result;
use crate::registry::client::HarborClient;
use crate::registry::request::{RequestDescriptor, encode_query_value};
use crate::registry::types::{Project, ProjectRequest};

pub const PROJECT_API_PATH: &str = "api/projects";

#[derive(Clone, Copy)]
pub struct ProjectOperations<'a> {
    client: &'a HarborClient,
}

impl<'a> ProjectOperations<'a> {
    pub fn new(client: &'a HarborClient) -> Self {
        Self { client }
    }

    pub async fn create(&self, project: &ProjectRequest) -> Result<()> {
        let descriptor = RequestDescriptor::post(PROJECT_API_PATH).with_json(project)?;
        self.client.call(descriptor).await
    }

    /// Succeeds when a project with this name exists; a missing project is `Server { status: 404 }`.
    pub async fn check(&self, name: &str) -> Result<()> {
        let path = format!("{}?project_name={}", PROJECT_API_PATH, encode_query_value(name));
        self.client.call(RequestDescriptor::head(path)).await
    }

    /// Like [`check`](Self::check) but maps 404 to `false`.
    pub async fn exists(&self, name: &str) -> Result<bool> {
        match self.check(name).await {
            Ok(()) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    }

    pub async fn get(&self, id: i64) -> Result<Project> {
        let path = format!("{}/{}", PROJECT_API_PATH, id);
        self.client.call_json(RequestDescriptor::get(path)).await
    }

    pub async fn update(&self, id: i64, project: &ProjectRequest) -> Result<()> {
        let path = format!("{}/{}", PROJECT_API_PATH, id);
        let descriptor = RequestDescriptor::put(path).with_json(project)?;
        self.client.call(descriptor).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let path = format!("{}/{}", PROJECT_API_PATH, id);
        self.client.call(RequestDescriptor::delete(path)).await
    }

    /// Projects whose name contains `name`; an empty filter lists everything visible.
    pub async fn list(&self, name: &str) -> Result<Vec<Project>> {
        let path = format!("{}?name={}", PROJECT_API_PATH, encode_query_value(name));
        let projects: Option<Vec<Project>> = self.client.call_json(RequestDescriptor::get(path)).await?;
        Ok(projects.unwrap_or_default())
    }

    /// Looks a project up by exact name.
    pub async fn find(&self, name: &str) -> Result<Option<Project>> {
        let projects = self.list(name).await?;
        Ok(projects.into_iter().find(|p| p.name == name))
    }
}
