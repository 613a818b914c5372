use crate::metadata::MetadataType;
use crate::scanner::list_local_components;
use crate::transport::{MetadataTransport, TransportError};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::debug;

/// Prefix of platform tabs, which exist in every org
const STANDARD_TAB_PREFIX: &str = "standard-";

/// Answers whether a referenced component exists in the project or the org.
///
/// Local components are indexed once per type on first use; remote answers
/// are remembered for the lifetime of the oracle.
pub struct ExistenceOracle<'a> {
    project_root: &'a Path,
    roots: Vec<String>,
    transport: &'a dyn MetadataTransport,
    local: HashMap<MetadataType, HashSet<String>>,
    remote: HashMap<(MetadataType, String), bool>,
}

impl<'a> ExistenceOracle<'a> {
    pub fn new(
        project_root: &'a Path,
        roots: Vec<String>,
        transport: &'a dyn MetadataTransport,
    ) -> Self {
        Self {
            project_root,
            roots,
            transport,
            local: HashMap::new(),
            remote: HashMap::new(),
        }
    }

    /// Check the project tree first, then the org.
    pub async fn exists(
        &mut self,
        name: &str,
        metadata_type: MetadataType,
    ) -> Result<bool, TransportError> {
        if metadata_type == MetadataType::CustomTab && name.starts_with(STANDARD_TAB_PREFIX) {
            return Ok(true);
        }

        if self.exists_locally(name, metadata_type) {
            return Ok(true);
        }

        let key = (metadata_type, name.to_string());
        if let Some(found) = self.remote.get(&key) {
            return Ok(*found);
        }

        let found = self.transport.exists(name, metadata_type).await?;
        debug!(name = %name, metadata_type = %metadata_type, found, "Checked org for component");
        self.remote.insert(key, found);
        Ok(found)
    }

    fn exists_locally(&mut self, name: &str, metadata_type: MetadataType) -> bool {
        let project_root = self.project_root;
        let roots = &self.roots;
        self.local
            .entry(metadata_type)
            .or_insert_with(|| list_local_components(project_root, roots, metadata_type))
            .contains(name)
    }
}
