use super::{MetadataTransport, TransportError};
use crate::metadata::MetadataType;
use crate::profile::Profile;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Component names that are safe to turn into a single file name
static COMPONENT_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^/\\\x00]+$").expect("valid component name regex"));

const SNAPSHOT_EXTENSION: &str = "json";

/// Reads an org snapshot laid out as `<root>/<type dir>/<Name>.json`.
#[derive(Debug, Clone)]
pub struct SnapshotTransport {
    root: PathBuf,
}

impl SnapshotTransport {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn component_path(&self, name: &str, metadata_type: MetadataType) -> Option<PathBuf> {
        if !is_valid_component_name(name) {
            return None;
        }
        Some(
            self.root
                .join(metadata_type.directory_name())
                .join(format!("{}.{}", name, SNAPSHOT_EXTENSION)),
        )
    }
}

fn is_valid_component_name(name: &str) -> bool {
    name != "." && name != ".." && COMPONENT_NAME.is_match(name)
}

#[async_trait]
impl MetadataTransport for SnapshotTransport {
    async fn list_names(&self, metadata_type: MetadataType) -> Result<Vec<String>, TransportError> {
        let dir = self.root.join(metadata_type.directory_name());
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        let mut entries = fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(SNAPSHOT_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }

        names.sort();
        debug!(metadata_type = %metadata_type, count = names.len(), "Listed snapshot components");
        Ok(names)
    }

    async fn fetch_profiles(&self, names: &[String]) -> Result<Vec<Profile>, TransportError> {
        let mut profiles = Vec::with_capacity(names.len());

        for name in names {
            let Some(path) = self.component_path(name, MetadataType::Profile) else {
                warn!(name = %name, "Skipping profile with an invalid name");
                continue;
            };
            if !path.exists() {
                debug!(name = %name, "Profile not present in snapshot");
                continue;
            }

            let content = fs::read_to_string(&path).await?;
            let mut profile: Profile =
                serde_json::from_str(&content).map_err(|source| TransportError::Malformed {
                    metadata_type: MetadataType::Profile,
                    name: name.clone(),
                    source,
                })?;
            if profile.full_name.is_empty() {
                profile.full_name = name.clone();
            }
            profiles.push(profile);
        }

        Ok(profiles)
    }

    async fn exists(&self, name: &str, metadata_type: MetadataType) -> Result<bool, TransportError> {
        Ok(self
            .component_path(name, metadata_type)
            .map(|p| p.is_file())
            .unwrap_or(false))
    }
}
