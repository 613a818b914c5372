//! Discovery of profiles and other components in the local source tree.

use crate::metadata::MetadataType;
use crate::profile::{Profile, PROFILE_FILE_SUFFIX};
use crate::utils::{resolve_project_path, to_project_relative};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tokio::fs;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse profile at {path}: {source}")]
    ParseError {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A profile file found in the project, or the file a new profile will be
/// written to. `path` is project-relative and may be empty when the profile
/// has no local source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalProfile {
    pub name: String,
    pub path: String,
}

impl LocalProfile {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn has_path(&self) -> bool {
        !self.path.is_empty()
    }
}

/// List every profile file under the given source roots.
///
/// Roots are relative to `project_root`; missing roots are skipped. The
/// result is ordered by path.
pub fn list_local_profiles(project_root: &Path, roots: &[String]) -> Vec<LocalProfile> {
    let mut profiles = Vec::new();
    let mut seen = HashSet::new();

    for root in roots {
        let root_path = resolve_project_path(project_root, root);
        if !root_path.exists() {
            warn!(root = %root, "Source folder does not exist, skipping");
            continue;
        }

        for entry in WalkDir::new(&root_path)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let file_name = entry.file_name().to_string_lossy();
            let Some(name) = file_name.strip_suffix(PROFILE_FILE_SUFFIX) else {
                continue;
            };
            if name.is_empty() {
                continue;
            }

            let path = to_project_relative(project_root, entry.path());
            if seen.insert(path.clone()) {
                profiles.push(LocalProfile::new(name, path));
            }
        }
    }

    profiles.sort_by(|a, b| a.path.cmp(&b.path));
    debug!(count = profiles.len(), "Found local profiles");
    profiles
}

/// Names of every component of `metadata_type` under the given roots.
pub fn list_local_components(
    project_root: &Path,
    roots: &[String],
    metadata_type: MetadataType,
) -> HashSet<String> {
    let mut names = HashSet::new();

    for root in roots {
        let root_path = resolve_project_path(project_root, root);
        if !root_path.exists() {
            continue;
        }

        for entry in WalkDir::new(&root_path)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let file_name = entry.file_name().to_string_lossy();
            if let Some(name) = metadata_type.component_name(&file_name) {
                names.insert(name.to_string());
            }
        }
    }

    names
}

/// Read the profile stored at `path`, if the file exists.
pub async fn read_local_profile(path: &Path) -> Result<Option<Profile>, ScanError> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let profile = serde_json::from_str(&content).map_err(|source| ScanError::ParseError {
        path: path.display().to_string(),
        source,
    })?;
    Ok(Some(profile))
}

/// Remove a file if it exists. Returns whether a file was removed.
pub async fn delete_if_exists(path: &Path) -> Result<bool, ScanError> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}
