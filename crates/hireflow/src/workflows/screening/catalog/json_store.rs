use std::collections::BTreeMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use super::{CatalogError, CatalogRepository};
use crate::workflows::screening::domain::JobRequirement;

/// On-disk shape: `{ "<role>": { "job_description": "...", "additional_instructions": "..." } }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredRequirement {
    job_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    additional_instructions: Option<String>,
}

/// Flat JSON file holding every role. The whole file is rewritten on each
/// upsert; readers are served from memory.
#[derive(Debug)]
pub struct JsonFileCatalog {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, StoredRequirement>>,
}

impl JsonFileCatalog {
    /// Loads the store at `path`. A missing file is an empty catalog.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let path = path.into();
        let entries = match fs::read(&path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => BTreeMap::new(),
            Ok(bytes) => {
                serde_json::from_slice(&bytes).map_err(|source| CatalogError::Format {
                    path: path.clone(),
                    source,
                })?
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(CatalogError::Io { path, source }),
        };

        debug!(path = %path.display(), roles = entries.len(), "job catalog loaded");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, StoredRequirement>) -> Result<(), CatalogError> {
        let io_error = |source| CatalogError::Io {
            path: self.path.clone(),
            source,
        };

        let parent = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(io_error)?;

        let file = NamedTempFile::new_in(&parent).map_err(io_error)?;
        {
            let mut writer = BufWriter::new(file.as_file());
            serde_json::to_writer_pretty(&mut writer, entries).map_err(|source| {
                CatalogError::Format {
                    path: self.path.clone(),
                    source,
                }
            })?;
            writer.write_all(b"\n").map_err(io_error)?;
            writer.flush().map_err(io_error)?;
        }
        file.persist(&self.path)
            .map_err(|err| io_error(err.error))?;
        Ok(())
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, StoredRequirement>>, CatalogError> {
        self.entries
            .lock()
            .map_err(|_| CatalogError::Unavailable("catalog lock poisoned".to_string()))
    }
}

impl CatalogRepository for JsonFileCatalog {
    fn upsert(&self, requirement: JobRequirement) -> Result<(), CatalogError> {
        let mut guard = self.lock()?;
        let mut next = guard.clone();
        next.insert(
            requirement.role,
            StoredRequirement {
                job_description: requirement.description,
                additional_instructions: requirement.instructions,
            },
        );
        self.persist(&next)?;
        *guard = next;
        Ok(())
    }

    fn fetch(&self, role: &str) -> Result<Option<JobRequirement>, CatalogError> {
        let guard = self.lock()?;
        Ok(guard.get(role).map(|stored| JobRequirement {
            role: role.to_string(),
            description: stored.job_description.clone(),
            instructions: stored
                .additional_instructions
                .clone()
                .filter(|value| !value.trim().is_empty()),
        }))
    }

    fn roles(&self) -> Result<Vec<String>, CatalogError> {
        let guard = self.lock()?;
        Ok(guard.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn requirement(role: &str, description: &str) -> JobRequirement {
        JobRequirement {
            role: role.to_string(),
            description: description.to_string(),
            instructions: None,
        }
    }

    #[test]
    fn missing_file_opens_empty() {
        let dir = TempDir::new().expect("temp dir");
        let catalog = JsonFileCatalog::open(dir.path().join("jobs.json")).expect("opens");
        assert!(catalog.roles().expect("roles").is_empty());
    }

    #[test]
    fn reads_legacy_shape_with_blank_instructions() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("jobs.json");
        fs::write(
            &path,
            r#"{"AI Engineer": {"job_description": "Build models", "additional_instructions": ""}}"#,
        )
        .expect("write fixture");

        let catalog = JsonFileCatalog::open(&path).expect("opens");
        let stored = catalog
            .fetch("AI Engineer")
            .expect("fetch")
            .expect("role present");
        assert_eq!(stored.description, "Build models");
        assert_eq!(stored.instructions, None);
    }

    #[test]
    fn malformed_file_is_reported() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("jobs.json");
        fs::write(&path, "{ not json").expect("write fixture");

        match JsonFileCatalog::open(&path) {
            Err(CatalogError::Format { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected format error, got {other:?}"),
        }
    }

    #[test]
    fn upsert_rewrites_file_and_survives_reopen() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("nested").join("jobs.json");
        let catalog = JsonFileCatalog::open(&path).expect("opens");

        catalog
            .upsert(requirement("Backend Engineer", "Rust services"))
            .expect("first write");
        catalog
            .upsert(requirement("Backend Engineer", "Rust and SQL services"))
            .expect("overwrite");
        catalog
            .upsert(requirement("Analyst", "Dashboards"))
            .expect("second role");

        let reopened = JsonFileCatalog::open(&path).expect("reopens");
        assert_eq!(
            reopened.roles().expect("roles"),
            vec!["Analyst".to_string(), "Backend Engineer".to_string()]
        );
        let backend = reopened
            .fetch("Backend Engineer")
            .expect("fetch")
            .expect("present");
        assert_eq!(backend.description, "Rust and SQL services");

        let raw: serde_json::Value =
            serde_json::from_slice(&fs::read(&path).expect("read back")).expect("json");
        assert_eq!(
            raw["Analyst"]["job_description"],
            serde_json::Value::String("Dashboards".to_string())
        );
        assert!(raw["Analyst"].get("additional_instructions").is_none());
    }
}
