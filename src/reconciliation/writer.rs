use crate::profile::{merge_profile, Profile};
use crate::scanner::{read_local_profile, ScanError};
use crate::utils::{compute_file_hash, compute_hash};
use std::path::Path;
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to read local profile: {0}")]
    ScanError(#[from] ScanError),
}

/// What happened to a profile file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    Unchanged,
}

/// Overlay `remote` onto the profile stored at `target` and save the result.
///
/// A missing file is created along with its parent directories. The file is
/// left untouched when the merged output matches what is already there.
pub async fn write_profile(remote: &Profile, target: &Path) -> Result<WriteOutcome, WriteError> {
    let local = read_local_profile(target).await?.unwrap_or_default();

    let mut merged = merge_profile(local, remote);
    // The file name carries the profile name
    merged.full_name.clear();

    let mut content = serde_json::to_string_pretty(&merged)?;
    content.push('\n');

    if compute_file_hash(target).await? == Some(compute_hash(&content)) {
        debug!(path = %target.display(), "Profile unchanged");
        return Ok(WriteOutcome::Unchanged);
    }

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).await?;
    }

    // Write atomically using temp file + rename
    let temp_path = target.with_extension("json.tmp");
    fs::write(&temp_path, &content).await?;
    if let Err(e) = fs::rename(&temp_path, target).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(e.into());
    }

    info!(path = %target.display(), "Wrote profile");
    Ok(WriteOutcome::Written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::TabVisibility;
    use serde_json::Value;
    use tempfile::TempDir;

    fn remote_admin() -> Profile {
        Profile {
            full_name: "Admin".to_string(),
            tab_visibilities: vec![TabVisibility {
                tab: "Invoice__c".to_string(),
                visibility: "DefaultOn".to_string(),
            }],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_write_creates_missing_file() {
        let temp = TempDir::new().unwrap();
        let target = temp
            .path()
            .join("force-app/main/default/profiles/Admin.profile-meta.json");

        let outcome = write_profile(&remote_admin(), &target).await.unwrap();

        assert_eq!(outcome, WriteOutcome::Written);
        let written: Value =
            serde_json::from_str(&fs::read_to_string(&target).await.unwrap()).unwrap();
        assert_eq!(written["tabVisibilities"][0]["tab"], "Invoice__c");
        assert!(written.get("fullName").is_none());
    }

    #[tokio::test]
    async fn test_write_keeps_local_metadata_but_not_local_entries() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("Admin.profile-meta.json");
        fs::write(
            &target,
            r#"{
                "description": "Kept",
                "loginHours": {"mondayStart": 480},
                "userPermissions": {"name": "ApiEnabled", "enabled": true}
            }"#,
        )
        .await
        .unwrap();

        write_profile(&remote_admin(), &target).await.unwrap();

        let written: Profile =
            serde_json::from_str(&fs::read_to_string(&target).await.unwrap()).unwrap();
        assert_eq!(written.description.as_deref(), Some("Kept"));
        assert!(written.extra.contains_key("loginHours"));
        assert!(written.user_permissions.is_empty());
        assert_eq!(written.tab_visibilities.len(), 1);
    }

    #[tokio::test]
    async fn test_second_write_is_unchanged() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("Admin.profile-meta.json");

        assert_eq!(
            write_profile(&remote_admin(), &target).await.unwrap(),
            WriteOutcome::Written
        );
        assert_eq!(
            write_profile(&remote_admin(), &target).await.unwrap(),
            WriteOutcome::Unchanged
        );
        assert!(!temp.path().join("Admin.profile-meta.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_malformed_local_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("Admin.profile-meta.json");
        fs::write(&target, "not json").await.unwrap();

        let result = write_profile(&remote_admin(), &target).await;
        assert!(matches!(result, Err(WriteError::ScanError(_))));
    }
}
