use crate::metadata::MetadataType;
use crate::profile::ProfileCollection;
use crate::utils::{DEFAULT_PACKAGE_DIR, PROJECT_FILE};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tokio::fs;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Batch size must be at least 1")]
    InvalidBatchSize,
}

/// A package directory declared by the project
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PackageDirectory {
    pub path: String,
    #[serde(default)]
    pub default: bool,
}

/// A cross-reference rule: entries of `collection` must name an existing
/// component of `target_type`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceRule {
    pub collection: ProfileCollection,
    pub target_type: MetadataType,
}

impl ReferenceRule {
    pub const fn new(collection: ProfileCollection, target_type: MetadataType) -> Self {
        Self {
            collection,
            target_type,
        }
    }
}

/// Rules applied when a project does not configure its own
pub const DEFAULT_REFERENCE_RULES: [ReferenceRule; 1] = [ReferenceRule::new(
    ProfileCollection::TabVisibilities,
    MetadataType::CustomTab,
)];

/// Every rule the reconciler knows how to apply
pub const KNOWN_REFERENCE_RULES: [ReferenceRule; 4] = [
    ReferenceRule::new(ProfileCollection::TabVisibilities, MetadataType::CustomTab),
    ReferenceRule::new(ProfileCollection::ClassAccesses, MetadataType::ApexClass),
    ReferenceRule::new(ProfileCollection::PageAccesses, MetadataType::ApexPage),
    ReferenceRule::new(
        ProfileCollection::ApplicationVisibilities,
        MetadataType::CustomApplication,
    ),
];

/// Default number of profiles fetched per remote call
fn default_batch_size() -> usize {
    10
}

fn default_reference_rules() -> Vec<ReferenceRule> {
    DEFAULT_REFERENCE_RULES.to_vec()
}

/// Profile sync settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SyncSettings {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_reference_rules")]
    pub reference_rules: Vec<ReferenceRule>,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            reference_rules: default_reference_rules(),
        }
    }
}

impl SyncSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize);
        }
        Ok(())
    }
}

/// Project configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    #[serde(default)]
    pub package_directories: Vec<PackageDirectory>,
    #[serde(default)]
    pub profile_sync: SyncSettings,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            package_directories: vec![PackageDirectory {
                path: DEFAULT_PACKAGE_DIR.to_string(),
                default: true,
            }],
            profile_sync: SyncSettings::default(),
        }
    }
}

impl ProjectConfig {
    /// Paths of every declared package directory
    pub fn package_paths(&self) -> Vec<String> {
        if self.package_directories.is_empty() {
            return vec![DEFAULT_PACKAGE_DIR.to_string()];
        }
        self.package_directories
            .iter()
            .map(|d| d.path.clone())
            .collect()
    }

    /// The directory new profiles are created in
    pub fn default_package_path(&self) -> String {
        self.package_directories
            .iter()
            .find(|d| d.default)
            .or_else(|| self.package_directories.first())
            .map(|d| d.path.clone())
            .unwrap_or_else(|| DEFAULT_PACKAGE_DIR.to_string())
    }
}

/// Read the project configuration file
pub async fn read_config(project_path: &Path) -> Result<Option<ProjectConfig>, ConfigError> {
    let config_path = project_path.join(PROJECT_FILE);

    let content = match fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let config: ProjectConfig = serde_json::from_str(&content)?;
    config.profile_sync.validate()?;
    Ok(Some(config))
}
