mod json_store;

pub use json_store::JsonFileCatalog;

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use super::domain::JobRequirement;

/// Storage abstraction for job requirements keyed by role name.
pub trait CatalogRepository: Send + Sync {
    /// Inserts or replaces the entry for `requirement.role`.
    fn upsert(&self, requirement: JobRequirement) -> Result<(), CatalogError>;
    fn fetch(&self, role: &str) -> Result<Option<JobRequirement>, CatalogError>;
    /// Role names in ascending order.
    fn roles(&self) -> Result<Vec<String>, CatalogError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("{field} must not be empty")]
    Validation { field: &'static str },
    #[error("role '{0}' is not in the job catalog")]
    NotFound(String),
    #[error("job catalog at {path} could not be accessed: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("job catalog at {path} is malformed: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("job catalog unavailable: {0}")]
    Unavailable(String),
}

/// Validating facade over a catalog repository.
pub struct JobCatalog<R> {
    repository: Arc<R>,
}

impl<R> Clone for JobCatalog<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R> JobCatalog<R>
where
    R: CatalogRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Adds or overwrites a role. Blank role or description is rejected before
    /// the store is touched; blank instructions are stored as absent.
    pub fn add_job_details(
        &self,
        role: &str,
        description: &str,
        instructions: Option<&str>,
    ) -> Result<JobRequirement, CatalogError> {
        let role = role.trim();
        if role.is_empty() {
            return Err(CatalogError::Validation { field: "job role" });
        }
        if description.trim().is_empty() {
            return Err(CatalogError::Validation {
                field: "job description",
            });
        }

        let requirement = JobRequirement {
            role: role.to_string(),
            description: description.to_string(),
            instructions: instructions
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string),
        };

        self.repository.upsert(requirement.clone())?;
        info!(role = %requirement.role, "job details saved");
        Ok(requirement)
    }

    pub fn list_roles(&self) -> Result<Vec<String>, CatalogError> {
        self.repository.roles()
    }

    pub fn get_requirement(&self, role: &str) -> Result<JobRequirement, CatalogError> {
        self.repository
            .fetch(role)?
            .ok_or_else(|| CatalogError::NotFound(role.to_string()))
    }
}
