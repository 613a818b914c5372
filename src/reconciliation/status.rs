use crate::profile::profile_file_name;
use crate::scanner::LocalProfile;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Where each profile stands relative to the remote org.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStatus {
    /// Only in the org. Paths point at the file the profile will be created in.
    pub added: Vec<LocalProfile>,
    /// Present locally and in the org.
    pub updated: Vec<LocalProfile>,
    /// Only present locally.
    pub deleted: Vec<LocalProfile>,
}

impl SyncStatus {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.deleted.is_empty()
    }
}

/// Path a profile that only exists remotely is created at
pub fn new_profile_path(package_dir: &str, name: &str) -> String {
    format!(
        "{}/main/default/profiles/{}",
        package_dir.trim_end_matches('/'),
        profile_file_name(name)
    )
}

/// Partition local and remote profiles into added, updated and deleted.
///
/// A non-empty `requested` restricts every set to those names. Local records
/// keep their paths; one record is produced per local file, so a name backed
/// by several files appears several times.
pub fn classify_profiles(
    local: &[LocalProfile],
    remote_names: &[String],
    requested: &HashSet<String>,
    new_profile_dir: &str,
) -> SyncStatus {
    let in_scope = |name: &str| requested.is_empty() || requested.contains(name);
    let remote: HashSet<&str> = remote_names.iter().map(String::as_str).collect();
    let local_names: HashSet<&str> = local.iter().map(|p| p.name.as_str()).collect();

    let mut status = SyncStatus::default();

    for profile in local.iter().filter(|p| in_scope(&p.name)) {
        if remote.contains(profile.name.as_str()) {
            status.updated.push(profile.clone());
        } else {
            status.deleted.push(profile.clone());
        }
    }

    let remote_only: BTreeSet<&str> = remote
        .iter()
        .copied()
        .filter(|name| in_scope(name) && !local_names.contains(name))
        .collect();
    for name in remote_only {
        status
            .added
            .push(LocalProfile::new(name, new_profile_path(new_profile_dir, name)));
    }

    status
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(records: &[LocalProfile]) -> Vec<&str> {
        records.iter().map(|p| p.name.as_str()).collect()
    }

    fn remote(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_classify_set_algebra_without_request() {
        let local = vec![
            LocalProfile::new("Admin", "force-app/Admin.profile-meta.json"),
            LocalProfile::new("Legacy", "force-app/Legacy.profile-meta.json"),
        ];

        let status = classify_profiles(
            &local,
            &remote(&["Admin", "Sales"]),
            &HashSet::new(),
            "force-app",
        );

        assert_eq!(names(&status.added), vec!["Sales"]);
        assert_eq!(names(&status.updated), vec!["Admin"]);
        assert_eq!(names(&status.deleted), vec!["Legacy"]);
    }

    #[test]
    fn test_classify_added_gets_default_path() {
        let status = classify_profiles(&[], &remote(&["Sales"]), &HashSet::new(), "force-app/");

        assert_eq!(
            status.added,
            vec![LocalProfile::new(
                "Sales",
                "force-app/main/default/profiles/Sales.profile-meta.json"
            )]
        );
    }

    #[test]
    fn test_classify_keeps_every_path_of_a_name() {
        let local = vec![
            LocalProfile::new("Admin", "core/Admin.profile-meta.json"),
            LocalProfile::new("Admin", "sales/Admin.profile-meta.json"),
        ];

        let status = classify_profiles(&local, &remote(&["Admin"]), &HashSet::new(), "core");

        assert_eq!(status.updated, local);
        assert!(status.added.is_empty());
        assert!(status.deleted.is_empty());
    }

    #[test]
    fn test_classify_restricts_to_requested_names() {
        let local = vec![
            LocalProfile::new("Admin", "p/Admin.profile-meta.json"),
            LocalProfile::new("Legacy", "p/Legacy.profile-meta.json"),
        ];
        let requested = HashSet::from(["Admin".to_string(), "Sales".to_string()]);

        let status = classify_profiles(
            &local,
            &remote(&["Admin", "Sales", "Support"]),
            &requested,
            "p",
        );

        assert_eq!(names(&status.added), vec!["Sales"]);
        assert_eq!(names(&status.updated), vec!["Admin"]);
        assert!(status.deleted.is_empty());
    }

    #[test]
    fn test_classify_duplicate_remote_names() {
        let status = classify_profiles(
            &[],
            &remote(&["Sales", "Sales"]),
            &HashSet::new(),
            "force-app",
        );
        assert_eq!(names(&status.added), vec!["Sales"]);
    }

    #[test]
    fn test_classify_sets_are_disjoint_by_name() {
        let local: Vec<_> = ["A", "B", "C", "D"]
            .iter()
            .map(|n| LocalProfile::new(*n, format!("src/{}.profile-meta.json", n)))
            .collect();
        let remote_names = remote(&["C", "D", "E", "F"]);

        let status = classify_profiles(&local, &remote_names, &HashSet::new(), "src");

        let added: HashSet<_> = names(&status.added).into_iter().collect();
        let updated: HashSet<_> = names(&status.updated).into_iter().collect();
        let deleted: HashSet<_> = names(&status.deleted).into_iter().collect();
        assert_eq!(added, HashSet::from(["E", "F"]));
        assert_eq!(updated, HashSet::from(["C", "D"]));
        assert_eq!(deleted, HashSet::from(["A", "B"]));
    }
}
