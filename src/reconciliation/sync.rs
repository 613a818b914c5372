use super::batch::{fetch_batch, RetrievalPlan};
use super::oracle::ExistenceOracle;
use super::references::reconcile_references;
use super::status::{classify_profiles, SyncStatus};
use super::writer::{write_profile, WriteError, WriteOutcome};
use crate::config::{read_config, ConfigError, ProjectConfig, ReferenceRule};
use crate::metadata::MetadataType;
use crate::progress::{LogProgress, ProgressReporter};
use crate::scanner::{delete_if_exists, list_local_profiles, LocalProfile, ScanError};
use crate::transport::{MetadataTransport, TransportError};
use crate::utils::resolve_project_path;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Transport error: {0}")]
    TransportError(#[from] TransportError),

    #[error("Write error: {0}")]
    WriteError(#[from] WriteError),

    #[error("Scan error: {0}")]
    ScanError(#[from] ScanError),

    #[error("Config error: {0}")]
    ConfigError(#[from] ConfigError),
}

/// Status of a sync together with the files it touched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub status: SyncStatus,
    pub written: Vec<String>,
    pub unchanged: Vec<String>,
    pub removed: Vec<String>,
}

/// Classification before any trimming, plus the mode it was computed in
struct Classification {
    status: SyncStatus,
    fetch_new: bool,
}

/// Reconciles the profiles of one project against a remote org.
pub struct ProfileSync {
    project_root: PathBuf,
    config: ProjectConfig,
    transport: Arc<dyn MetadataTransport>,
    progress: Box<dyn ProgressReporter>,
}

impl ProfileSync {
    pub fn new(
        project_root: impl Into<PathBuf>,
        config: ProjectConfig,
        transport: Arc<dyn MetadataTransport>,
    ) -> Self {
        Self {
            project_root: project_root.into(),
            config,
            transport,
            progress: Box::new(LogProgress::default()),
        }
    }

    /// Create a sync for the project at `project_root`, reading its
    /// configuration or falling back to defaults.
    pub async fn open(
        project_root: impl Into<PathBuf>,
        transport: Arc<dyn MetadataTransport>,
    ) -> Result<Self, SyncError> {
        let project_root = project_root.into();
        let config = read_config(&project_root).await?.unwrap_or_default();
        Ok(Self::new(project_root, config, transport))
    }

    pub fn with_progress(mut self, progress: Box<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// Replace the configured cross-reference rules
    pub fn with_reference_rules(mut self, rules: Vec<ReferenceRule>) -> Self {
        self.config.profile_sync.reference_rules = rules;
        self
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Compute what a sync would do without touching any file.
    pub async fn status(
        &self,
        source_folders: &[String],
        profiles_to_sync: &[String],
    ) -> Result<SyncStatus, SyncError> {
        let classification = self.classify(source_folders, profiles_to_sync).await?;
        Ok(trim_added(classification).0)
    }

    /// Sync profiles and return their status.
    ///
    /// With no source folders every package directory is scanned and
    /// profiles that only exist in the org are created locally. With source
    /// folders only profiles found there are refreshed. When
    /// `delete_orphans` is set, files of profiles missing from the org are
    /// removed afterwards.
    pub async fn sync(
        &mut self,
        source_folders: &[String],
        profiles_to_sync: &[String],
        delete_orphans: bool,
    ) -> Result<SyncStatus, SyncError> {
        Ok(self
            .sync_detailed(source_folders, profiles_to_sync, delete_orphans)
            .await?
            .status)
    }

    /// Like [`ProfileSync::sync`], also reporting which files were touched.
    pub async fn sync_detailed(
        &mut self,
        source_folders: &[String],
        profiles_to_sync: &[String],
        delete_orphans: bool,
    ) -> Result<SyncReport, SyncError> {
        info!("Retrieving profiles");
        if !profiles_to_sync.is_empty() {
            debug!(profiles = ?profiles_to_sync, "Requested profiles");
        }

        let classification = self.classify(source_folders, profiles_to_sync).await?;
        let (status, to_retrieve) = trim_added(classification);

        let mut report = SyncReport::default();
        let plan = RetrievalPlan::new(&to_retrieve, self.config.profile_sync.batch_size);
        info!(count = plan.total(), "Number of profiles to retrieve");

        if plan.is_empty() {
            info!("No profiles found to retrieve");
        } else {
            self.progress.start(plan.total());
            let result = self.retrieve(&plan, source_folders, &mut report).await;
            self.progress.stop();
            result?;
        }

        if delete_orphans {
            for profile in &status.deleted {
                if !profile.has_path() {
                    continue;
                }
                let path = resolve_project_path(&self.project_root, &profile.path);
                if delete_if_exists(&path).await? {
                    info!(path = %profile.path, "Removed profile missing from org");
                    report.removed.push(profile.path.clone());
                }
            }
        }

        report.status = status;
        Ok(report)
    }

    async fn classify(
        &self,
        source_folders: &[String],
        profiles_to_sync: &[String],
    ) -> Result<Classification, SyncError> {
        let fetch_new = source_folders.is_empty();
        debug!(folders = ?source_folders, fetch_new, "Source folders");

        let roots = if fetch_new {
            self.config.package_paths()
        } else {
            source_folders.to_vec()
        };
        let local = list_local_profiles(&self.project_root, &roots);

        let requested: HashSet<String> = if !fetch_new && profiles_to_sync.is_empty() {
            local.iter().map(|p| p.name.clone()).collect()
        } else {
            profiles_to_sync.iter().cloned().collect()
        };

        let remote = self.transport.list_names(MetadataType::Profile).await?;
        let status = classify_profiles(
            &local,
            &remote,
            &requested,
            &self.config.default_package_path(),
        );
        debug!(
            added = status.added.len(),
            updated = status.updated.len(),
            deleted = status.deleted.len(),
            "Classified profiles"
        );

        Ok(Classification { status, fetch_new })
    }

    async fn retrieve(
        &mut self,
        plan: &RetrievalPlan,
        source_folders: &[String],
        report: &mut SyncReport,
    ) -> Result<(), SyncError> {
        let mut roots = self.config.package_paths();
        for folder in source_folders {
            if !roots.contains(folder) {
                roots.push(folder.clone());
            }
        }
        let rules = self.config.profile_sync.reference_rules.clone();
        let mut oracle = ExistenceOracle::new(&self.project_root, roots, self.transport.as_ref());

        for batch in plan.batches() {
            let profiles = fetch_batch(self.transport.as_ref(), batch).await?;

            for mut profile in profiles {
                reconcile_references(&mut profile, &rules, &mut oracle).await?;

                let targets = plan.targets(&profile.full_name);
                if targets.is_empty() {
                    debug!(name = %profile.full_name, "Fetched profile was not requested");
                }
                for target in targets {
                    if target.is_empty() {
                        debug!(name = %profile.full_name, "File path not found, skipping");
                        continue;
                    }
                    let path = resolve_project_path(&self.project_root, target);
                    match write_profile(&profile, &path).await? {
                        WriteOutcome::Written => report.written.push(target.clone()),
                        WriteOutcome::Unchanged => report.unchanged.push(target.clone()),
                    }
                }
            }

            self.progress.increment(batch.len());
        }

        Ok(())
    }
}

/// Drop added profiles unless new profiles are being fetched, and return
/// the final status with the records to retrieve.
fn trim_added(classification: Classification) -> (SyncStatus, Vec<LocalProfile>) {
    let Classification { mut status, fetch_new } = classification;

    let to_retrieve = if fetch_new {
        status
            .added
            .iter()
            .chain(status.updated.iter())
            .cloned()
            .collect()
    } else {
        status.added.clear();
        status.updated.clone()
    };

    (status, to_retrieve)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classification(fetch_new: bool) -> Classification {
        Classification {
            status: SyncStatus {
                added: vec![LocalProfile::new("Sales", "p/Sales.profile-meta.json")],
                updated: vec![LocalProfile::new("Admin", "p/Admin.profile-meta.json")],
                deleted: Vec::new(),
            },
            fetch_new,
        }
    }

    #[test]
    fn test_trim_added_keeps_new_profiles_when_fetching() {
        let (status, to_retrieve) = trim_added(classification(true));
        assert_eq!(status.added.len(), 1);
        let names: Vec<_> = to_retrieve.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Sales", "Admin"]);
    }

    #[test]
    fn test_trim_added_clears_new_profiles_for_source_folders() {
        let (status, to_retrieve) = trim_added(classification(false));
        assert!(status.added.is_empty());
        let names: Vec<_> = to_retrieve.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Admin"]);
    }
}
