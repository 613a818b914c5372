use super::oracle::ExistenceOracle;
use crate::config::ReferenceRule;
use crate::profile::Profile;
use crate::transport::TransportError;
use tracing::debug;

/// Drop cross-references whose target exists neither locally nor in the org.
///
/// Each rule names a profile collection and the component type its entries
/// point at. Surviving entries keep their order. Returns the number of
/// entries removed.
pub async fn reconcile_references(
    profile: &mut Profile,
    rules: &[ReferenceRule],
    oracle: &mut ExistenceOracle<'_>,
) -> Result<usize, TransportError> {
    let mut removed = 0;

    for rule in rules {
        let targets = profile.collection_keys(rule.collection);
        if targets.is_empty() {
            continue;
        }

        let mut keep = Vec::with_capacity(targets.len());
        for target in &targets {
            keep.push(oracle.exists(target, rule.target_type).await?);
        }

        let kept = keep.iter().filter(|k| **k).count();
        debug!(
            profile = %profile.full_name,
            collection = %rule.collection,
            before = targets.len(),
            after = kept,
            "Reconciled references"
        );

        profile.retain_entries(rule.collection, &keep);
        removed += targets.len() - kept;
    }

    Ok(removed)
}
