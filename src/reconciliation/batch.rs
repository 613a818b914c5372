use crate::profile::Profile;
use crate::scanner::LocalProfile;
use crate::transport::{MetadataTransport, TransportError};
use crate::utils::locale_cmp;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Number of profiles requested per remote call unless configured otherwise
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// The profiles to retrieve, split into batches, and the local paths each
/// fetched profile is written to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetrievalPlan {
    batches: Vec<Vec<String>>,
    targets: BTreeMap<String, Vec<String>>,
}

impl RetrievalPlan {
    /// Deduplicate names, sort them and cut them into batches of `batch_size`.
    pub fn new(records: &[LocalProfile], batch_size: usize) -> Self {
        let mut targets: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for record in records {
            let paths = targets.entry(record.name.clone()).or_default();
            if !paths.contains(&record.path) {
                paths.push(record.path.clone());
            }
        }

        let mut names: Vec<String> = targets.keys().cloned().collect();
        names.sort_by(|a, b| locale_cmp(a, b));

        let batches = names
            .chunks(batch_size.max(1))
            .map(|chunk| chunk.to_vec())
            .collect();

        Self { batches, targets }
    }

    pub fn batches(&self) -> &[Vec<String>] {
        &self.batches
    }

    /// Local paths for a profile name, in discovery order
    pub fn targets(&self, name: &str) -> &[String] {
        self.targets.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct profiles to retrieve
    pub fn total(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Fetch one batch of profiles. Duplicate names in the response are dropped.
pub async fn fetch_batch(
    transport: &dyn MetadataTransport,
    names: &[String],
) -> Result<Vec<Profile>, TransportError> {
    let fetched = transport.fetch_profiles(names).await?;
    let received = fetched.len();

    let mut seen = HashSet::new();
    let profiles: Vec<Profile> = fetched
        .into_iter()
        .filter(|p| seen.insert(p.full_name.clone()))
        .collect();

    debug!(
        requested = names.len(),
        received,
        unique = profiles.len(),
        "Fetched profile batch"
    );
    Ok(profiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::MetadataType;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn records(names: &[&str]) -> Vec<LocalProfile> {
        names
            .iter()
            .map(|n| LocalProfile::new(*n, format!("src/{}.profile-meta.json", n)))
            .collect()
    }

    #[test]
    fn test_batch_count_is_ceiling() {
        let names: Vec<String> = (0..23).map(|i| format!("Profile{:02}", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();

        let plan = RetrievalPlan::new(&records(&refs), 10);

        assert_eq!(plan.batches().len(), 3);
        assert_eq!(plan.batches()[0].len(), 10);
        assert_eq!(plan.batches()[1].len(), 10);
        assert_eq!(plan.batches()[2].len(), 3);
        assert_eq!(plan.total(), 23);
    }

    #[test]
    fn test_batches_are_sorted_and_deduplicated() {
        let mut input = records(&["sales", "Admin", "Marketing", "Admin", "analyst"]);
        input.push(LocalProfile::new("Admin", "other/Admin.profile-meta.json"));

        let plan = RetrievalPlan::new(&input, 2);

        assert_eq!(
            plan.batches(),
            &[
                vec!["Admin".to_string(), "analyst".to_string()],
                vec!["Marketing".to_string(), "sales".to_string()],
            ]
        );
        assert_eq!(
            plan.targets("Admin"),
            &[
                "src/Admin.profile-meta.json".to_string(),
                "other/Admin.profile-meta.json".to_string()
            ]
        );
    }

    #[test]
    fn test_empty_plan() {
        let plan = RetrievalPlan::new(&[], 10);
        assert!(plan.is_empty());
        assert!(plan.batches().is_empty());
        assert!(plan.targets("Admin").is_empty());
    }

    #[test]
    fn test_zero_batch_size_is_treated_as_one() {
        let plan = RetrievalPlan::new(&records(&["A", "B"]), 0);
        assert_eq!(plan.batches().len(), 2);
    }

    struct EchoTransport {
        calls: Mutex<Vec<Vec<String>>>,
    }

    #[async_trait]
    impl MetadataTransport for EchoTransport {
        async fn list_names(&self, _t: MetadataType) -> Result<Vec<String>, TransportError> {
            Ok(Vec::new())
        }

        async fn fetch_profiles(&self, names: &[String]) -> Result<Vec<Profile>, TransportError> {
            self.calls.lock().unwrap().push(names.to_vec());
            // Reversed with a duplicate, as an unordered remote might answer
            let mut profiles: Vec<Profile> = names
                .iter()
                .rev()
                .map(|n| Profile {
                    full_name: n.clone(),
                    ..Default::default()
                })
                .collect();
            if let Some(first) = profiles.first().cloned() {
                profiles.push(first);
            }
            Ok(profiles)
        }
    }

    #[tokio::test]
    async fn test_fetch_batch_drops_duplicate_names() {
        let transport = EchoTransport {
            calls: Mutex::new(Vec::new()),
        };
        let names = vec!["Admin".to_string(), "Sales".to_string()];

        let profiles = fetch_batch(&transport, &names).await.unwrap();

        let fetched: Vec<_> = profiles.iter().map(|p| p.full_name.as_str()).collect();
        assert_eq!(fetched, vec!["Sales", "Admin"]);
        assert_eq!(transport.calls.lock().unwrap().as_slice(), &[names]);
    }
}
