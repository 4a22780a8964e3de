//! Runner: turns parsed arguments into client calls and prints the results

use crate::cli::args::{Args, Command, ProjectCommand, RepoCommand, TagCommand};
use crate::config::{ClientConfig, ConfigError};
use crate::error::{ApiError, AuthError, ConstructionError};
use crate::logging::Logger;
use crate::registry::{HarborClient, HarborClientBuilder, Project, ProjectRequest, Repository, Tag};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Construction(#[from] ConstructionError),
    #[error("login failed: {0}")]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

pub struct Runner {
    args: Args,
    output: Logger,
}

impl Runner {
    pub fn new(args: Args) -> Self {
        let output = if args.quiet {
            Logger::new_quiet()
        } else {
            Logger::new(args.verbose)
        };

        Self { args, output }
    }

    pub fn logger(&self) -> &Logger {
        &self.output
    }

    pub async fn run(&self) -> Result<(), CliError> {
        let config = self.args.client_config(|key| std::env::var(key).ok())?;
        self.run_with_config(&config).await
    }

    pub async fn run_with_config(&self, config: &ClientConfig) -> Result<(), CliError> {
        self.output
            .verbose(&format!("Harbor: {} (user {})", config.base_url, config.auth.username));

        let client = self.create_client(config)?;
        self.execute(&client).await?;

        self.output.detail(&format!(
            "Completed in {}",
            self.output.format_duration(self.output.elapsed())
        ));
        Ok(())
    }

    fn create_client(&self, config: &ClientConfig) -> Result<HarborClient, CliError> {
        let client = HarborClientBuilder::from_config(config)
            .with_logger(self.output.clone())
            .build()?;
        Ok(client)
    }

    async fn execute(&self, client: &HarborClient) -> Result<(), CliError> {
        match &self.args.command {
            Command::Login => {
                client.login().await?;
            }
            Command::Project { action } => self.run_project(client, action).await?,
            Command::Repo { action } => self.run_repo(client, action).await?,
            Command::Tag { action } => self.run_tag(client, action).await?,
        }
        Ok(())
    }

    async fn run_project(&self, client: &HarborClient, action: &ProjectCommand) -> Result<(), CliError> {
        let projects = client.projects();
        match action {
            ProjectCommand::List { name } => {
                let list = projects.list(name).await?;
                self.render_list(&list, |p: &Project| {
                    format!("{:>5}  {:<30} repos={} owner={}", p.project_id, p.name, p.repo_count, p.owner_name)
                })?;
            }
            ProjectCommand::Get { id } => {
                let project = projects.get(*id).await?;
                self.render_project(&project)?;
            }
            ProjectCommand::Check { name } => {
                let exists = projects.exists(name).await?;
                if self.args.json {
                    println!("{}", serde_json::json!({ "name": name, "exists": exists }));
                } else if exists {
                    println!("project '{}' exists", name);
                } else {
                    println!("project '{}' does not exist", name);
                }
            }
            ProjectCommand::Create { name, public, metadata } => {
                projects.create(&project_request(name, *public, metadata)).await?;
                self.output.success(&format!("Project '{}' created", name));
            }
            ProjectCommand::Update { id, name, public, metadata } => {
                projects.update(*id, &project_request(name, *public, metadata)).await?;
                self.output.success(&format!("Project {} updated", id));
            }
            ProjectCommand::Delete { id } => {
                projects.delete(*id).await?;
                self.output.success(&format!("Project {} deleted", id));
            }
        }
        Ok(())
    }

    async fn run_repo(&self, client: &HarborClient, action: &RepoCommand) -> Result<(), CliError> {
        let repositories = client.repositories();
        match action {
            RepoCommand::List { project_id } => {
                let list = repositories.list(*project_id).await?;
                self.render_list(&list, |r: &Repository| {
                    format!("{:>5}  {:<40} tags={} pulls={}", r.id, r.name, r.tags_count, r.pull_count)
                })?;
            }
            RepoCommand::Delete { name } => {
                repositories.delete(name).await?;
                self.output.success(&format!("Repository '{}' deleted", name));
            }
        }
        Ok(())
    }

    async fn run_tag(&self, client: &HarborClient, action: &TagCommand) -> Result<(), CliError> {
        let repositories = client.repositories();
        match action {
            TagCommand::List { repository } => {
                let tags = repositories.list_tags(repository).await?;
                self.render_list(&tags, |t: &Tag| {
                    format!(
                        "{:<20} {:>10}  {}",
                        t.name,
                        self.output.format_size(t.size.max(0) as u64),
                        t.digest
                    )
                })?;
            }
            TagCommand::Delete { repository, tag } => {
                repositories.delete_tag(repository, tag).await?;
                self.output
                    .success(&format!("Tag '{}:{}' deleted", repository, tag));
            }
        }
        Ok(())
    }

    fn render_list<T, F>(&self, items: &[T], line: F) -> Result<(), CliError>
    where
        T: Serialize,
        F: Fn(&T) -> String,
    {
        if self.args.json {
            println!("{}", serde_json::to_string_pretty(items)?);
            return Ok(());
        }
        if items.is_empty() {
            self.output.info("(No items to display)");
        }
        for item in items {
            println!("{}", line(item));
        }
        Ok(())
    }

    fn render_project(&self, project: &Project) -> Result<(), CliError> {
        if self.args.json {
            println!("{}", serde_json::to_string_pretty(project)?);
            return Ok(());
        }
        let created = project
            .creation_time
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "-".to_string());
        let items = [
            ("id", project.project_id.to_string()),
            ("name", project.name.clone()),
            ("owner", project.owner_name.clone()),
            ("public", project.is_public().to_string()),
            ("repositories", project.repo_count.to_string()),
            ("created", created),
        ];
        for (key, value) in items {
            println!("{:<13} {}", format!("{}:", key), value);
        }
        Ok(())
    }
}

fn project_request(name: &str, public: bool, metadata: &[(String, String)]) -> ProjectRequest {
    let mut request = ProjectRequest::new(name);
    if public {
        request = request.with_metadata("public", "true");
    }
    for (key, value) in metadata {
        request = request.with_metadata(key.as_str(), value.as_str());
    }
    request
}
