pub mod config;
pub mod metadata;
pub mod profile;
pub mod progress;
pub mod reconciliation;
pub mod scanner;
pub mod transport;
pub mod utils;

// Re-export commonly used types
pub use config::{ConfigError, PackageDirectory, ProjectConfig, ReferenceRule, SyncSettings};
pub use metadata::MetadataType;
pub use profile::{merge_profile, Profile, ProfileCollection};
pub use progress::{LogProgress, NoProgress, ProgressReporter};
pub use reconciliation::{
    classify_profiles, reconcile_references, write_profile, ExistenceOracle, ProfileSync,
    RetrievalPlan, SyncError, SyncReport, SyncStatus, WriteOutcome,
};
pub use scanner::{list_local_profiles, LocalProfile, ScanError};
pub use transport::{MetadataTransport, SnapshotTransport, TransportError};
