//! Harbor Client Library
//!
//! Session-aware async client for the Harbor registry management API. Every
//! call goes through [`HarborClient`], which logs in on first use, probes the
//! session before each later call and logs in again once if the server has
//! dropped it.
//!
//! ```no_run
//! use harbor_client::{AuthConfig, HarborClient, ProjectRequest};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HarborClient::new("https://harbor.example.com", AuthConfig::new("admin", "secret"))?;
//! client.login().await?;
//! client.projects().create(&ProjectRequest::new("demo")).await?;
//! for repo in client.repositories().list(7).await? {
//!     println!("{} ({} tags)", repo.name, repo.tags_count);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod registry;

pub use config::{AuthConfig, ClientConfig};
pub use error::{ApiError, AuthError, ConstructionError, RequestConstructionError, Result, TransportError};
pub use logging::Logger;
pub use registry::{HarborClient, Method, Project, ProjectRequest, RequestDescriptor, Repository, Tag};
