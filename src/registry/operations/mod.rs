//! Resource operations built on the generic call surface
//!
//! Each operation maps to exactly one `HarborClient` call: a verb, a path
//! under `api/` and an optional JSON body.

pub mod project_operations;
pub mod repository_operations;

pub use project_operations::{PROJECT_API_PATH, ProjectOperations};
pub use repository_operations::{REPOSITORY_API_PATH, RepositoryOperations};
