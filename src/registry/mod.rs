//! Harbor registry client
//!
//! This module provides session handling and the generic call pipeline for
//! the Harbor management API, plus the project, repository and tag
//! operations built on top of it.

pub mod auth;
pub mod client;
pub mod operations;
pub mod request;
pub mod session;
pub mod transport;
pub mod types;

pub use crate::config::AuthConfig;
pub use auth::{Authenticator, ProbeOutcome};
pub use client::{HarborClient, HarborClientBuilder};
pub use operations::{ProjectOperations, RepositoryOperations};
pub use request::{Method, RequestBody, RequestDescriptor};
pub use session::{AuthScheme, SessionSnapshot, SessionState, SessionToken};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
pub use types::{Project, ProjectRequest, Repository, Tag};
