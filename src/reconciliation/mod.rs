//! Profile reconciliation against a remote org.
//!
//! A sync runs in a fixed order:
//! 1. Classify local and remote profiles into added, updated and deleted
//! 2. Drop added profiles unless new profiles are being fetched
//! 3. Retrieve the remaining profiles in sorted, fixed-size batches
//! 4. Prune references to components that no longer exist
//! 5. Merge each fetched profile onto every local file carrying its name
//! 6. Optionally delete files of profiles the org no longer has

mod batch;
mod oracle;
mod references;
mod status;
mod sync;
mod writer;

pub use batch::{fetch_batch, RetrievalPlan, DEFAULT_BATCH_SIZE};
pub use oracle::ExistenceOracle;
pub use references::reconcile_references;
pub use status::{classify_profiles, new_profile_path, SyncStatus};
pub use sync::{ProfileSync, SyncError, SyncReport};
pub use writer::{write_profile, WriteError, WriteOutcome};
