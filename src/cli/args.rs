//! Command-line argument parsing

use crate::config::{
    ClientConfig, ConfigError, ENV_PASSWORD, ENV_SKIP_TLS, ENV_TIMEOUT, ENV_URL, ENV_USERNAME,
};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "harbor-client")]
#[command(about = "Manage Harbor projects, repositories and tags")]
#[command(version)]
pub struct Args {
    /// Harbor base URL
    #[arg(
        long = "url",
        short = 'H',
        global = true,
        help = "Harbor base URL, e.g. https://harbor.example.com:5443 (env: HARBOR_URL)"
    )]
    pub url: Option<String>,

    #[arg(
        long = "username",
        short = 'u',
        global = true,
        help = "Username for Harbor login (env: HARBOR_USERNAME)"
    )]
    pub username: Option<String>,

    #[arg(
        long = "password",
        short = 'p',
        global = true,
        help = "Password for Harbor login (env: HARBOR_PASSWORD)"
    )]
    pub password: Option<String>,

    #[arg(
        long = "skip-tls",
        short = 'k',
        global = true,
        help = "Skip TLS certificate verification"
    )]
    pub skip_tls: bool,

    #[arg(
        long = "timeout",
        short = 't',
        global = true,
        help = "Request timeout in seconds"
    )]
    pub timeout: Option<u64>,

    #[arg(long = "verbose", short = 'v', global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(
        long = "quiet",
        short = 'q',
        global = true,
        conflicts_with = "verbose",
        help = "Only print results and errors"
    )]
    pub quiet: bool,

    #[arg(long = "json", global = true, help = "Print results as JSON")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Log in and report whether the credentials are accepted
    Login,
    /// Project administration
    Project {
        #[command(subcommand)]
        action: ProjectCommand,
    },
    /// Repository administration
    Repo {
        #[command(subcommand)]
        action: RepoCommand,
    },
    /// Tag administration
    Tag {
        #[command(subcommand)]
        action: TagCommand,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ProjectCommand {
    /// List projects, optionally filtered by name
    List {
        #[arg(long, default_value = "")]
        name: String,
    },
    /// Show one project
    Get { id: i64 },
    /// Check whether a project name is taken
    Check { name: String },
    /// Create a project
    Create {
        name: String,
        #[arg(long, help = "Make the project public")]
        public: bool,
        #[arg(long = "meta", value_parser = parse_key_val, help = "Extra metadata as key=value")]
        metadata: Vec<(String, String)>,
    },
    /// Update project metadata
    Update {
        id: i64,
        name: String,
        #[arg(long, help = "Make the project public")]
        public: bool,
        #[arg(long = "meta", value_parser = parse_key_val, help = "Extra metadata as key=value")]
        metadata: Vec<(String, String)>,
    },
    /// Delete a project
    Delete { id: i64 },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum RepoCommand {
    /// List repositories of a project
    List { project_id: i64 },
    /// Delete a repository, e.g. `library/nginx`
    Delete { name: String },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum TagCommand {
    /// List tags of a repository
    List { repository: String },
    /// Delete one tag
    Delete { repository: String, tag: String },
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", s))?;
    if key.is_empty() {
        return Err(format!("empty key in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

impl Args {
    /// Builds the client configuration; flags win over environment variables.
    pub fn client_config<F>(&self, lookup: F) -> Result<ClientConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = ClientConfig::from_lookup(|key| self.flag_value(key).or_else(|| lookup(key)))?;
        config.validate()?;
        Ok(config)
    }

    fn flag_value(&self, key: &str) -> Option<String> {
        match key {
            ENV_URL => self.url.clone(),
            ENV_USERNAME => self.username.clone(),
            ENV_PASSWORD => self.password.clone(),
            ENV_SKIP_TLS if self.skip_tls => Some("true".to_string()),
            ENV_TIMEOUT => self.timeout.map(|t| t.to_string()),
            _ => None,
        }
    }
}
