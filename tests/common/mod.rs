#![allow(dead_code)]

use async_trait::async_trait;
use profile_sync::{MetadataTransport, MetadataType, Profile, TransportError};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use tempfile::TempDir;

/// Create a temporary directory for testing
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Write a file below `root`, creating parent directories
pub fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().expect("file has a parent")).expect("create dirs");
    std::fs::write(path, content).expect("write file");
}

/// Read a JSON file below `root`
pub fn read_json(root: &Path, relative: &str) -> Value {
    let content = std::fs::read_to_string(root.join(relative)).expect("read file");
    serde_json::from_str(&content).expect("parse json")
}

/// Declare a single default package directory
pub fn init_project(root: &Path, package_dir: &str) {
    write_file(
        root,
        "sfdx-project.json",
        &format!(
            r#"{{"packageDirectories":[{{"path":"{}","default":true}}]}}"#,
            package_dir
        ),
    );
}

/// In-memory org
#[derive(Default)]
pub struct MockOrg {
    pub profiles: HashMap<String, Value>,
    pub components: HashMap<MetadataType, Vec<String>>,
    /// Any fetch containing this name fails
    pub fail_on: Option<String>,
    pub fetches: Mutex<Vec<Vec<String>>>,
}

impl MockOrg {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(mut self, name: &str, body: Value) -> Self {
        self.profiles.insert(name.to_string(), body);
        self
    }

    pub fn with_component(mut self, metadata_type: MetadataType, name: &str) -> Self {
        self.components
            .entry(metadata_type)
            .or_default()
            .push(name.to_string());
        self
    }

    pub fn failing_on(mut self, name: &str) -> Self {
        self.fail_on = Some(name.to_string());
        self
    }

    pub fn fetches(&self) -> Vec<Vec<String>> {
        self.fetches.lock().unwrap().clone()
    }
}

#[async_trait]
impl MetadataTransport for MockOrg {
    async fn list_names(&self, metadata_type: MetadataType) -> Result<Vec<String>, TransportError> {
        Ok(match metadata_type {
            MetadataType::Profile => {
                let mut names: Vec<String> = self.profiles.keys().cloned().collect();
                names.sort();
                names
            }
            other => self.components.get(&other).cloned().unwrap_or_default(),
        })
    }

    async fn fetch_profiles(&self, names: &[String]) -> Result<Vec<Profile>, TransportError> {
        self.fetches.lock().unwrap().push(names.to_vec());

        if let Some(fail_on) = &self.fail_on {
            if names.contains(fail_on) {
                return Err(TransportError::RequestFailed(format!(
                    "retrieve of {} timed out",
                    fail_on
                )));
            }
        }

        let mut profiles = Vec::new();
        for name in names.iter().rev() {
            if let Some(body) = self.profiles.get(name) {
                let mut profile: Profile =
                    serde_json::from_value(body.clone()).expect("valid profile fixture");
                profile.full_name = name.clone();
                profiles.push(profile);
            }
        }
        Ok(profiles)
    }
}
