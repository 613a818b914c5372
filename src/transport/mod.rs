//! Access to the remote org's metadata.
//!
//! The sync core only talks to the remote side through [`MetadataTransport`].
//! [`SnapshotTransport`] serves a directory snapshot of an org and is what
//! the command-line tool uses.

mod snapshot;

pub use snapshot::SnapshotTransport;

use crate::metadata::MetadataType;
use crate::profile::Profile;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Malformed {metadata_type} '{name}': {source}")]
    Malformed {
        metadata_type: MetadataType,
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Remote request failed: {0}")]
    RequestFailed(String),
}

/// Remote metadata operations the sync depends on.
#[async_trait]
pub trait MetadataTransport: Send + Sync {
    /// Names of every component of `metadata_type` in the org.
    async fn list_names(&self, metadata_type: MetadataType) -> Result<Vec<String>, TransportError>;

    /// Full content for the named profiles. Unknown names are left out and
    /// the order of the result is unspecified.
    async fn fetch_profiles(&self, names: &[String]) -> Result<Vec<Profile>, TransportError>;

    /// Whether a component exists in the org.
    async fn exists(&self, name: &str, metadata_type: MetadataType) -> Result<bool, TransportError> {
        Ok(self
            .list_names(metadata_type)
            .await?
            .iter()
            .any(|n| n == name))
    }
}
