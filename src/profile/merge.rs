use super::types::{Keyed, Profile};
use std::collections::BTreeMap;

/// Overlay a fetched profile onto its local representation.
///
/// Sub-collections are taken from `remote` alone, one entry per key, sorted
/// by key. Scalar fields the remote leaves unset and unknown fields are
/// carried over from `local`.
pub fn merge_profile(local: Profile, remote: &Profile) -> Profile {
    let mut extra = local.extra;
    for (key, value) in &remote.extra {
        extra.insert(key.clone(), value.clone());
    }

    Profile {
        full_name: if remote.full_name.is_empty() {
            local.full_name
        } else {
            remote.full_name.clone()
        },
        custom: remote.custom.or(local.custom),
        description: remote.description.clone().or(local.description),
        user_license: remote.user_license.clone().or(local.user_license),
        application_visibilities: keyed_entries(&remote.application_visibilities),
        class_accesses: keyed_entries(&remote.class_accesses),
        field_permissions: keyed_entries(&remote.field_permissions),
        object_permissions: keyed_entries(&remote.object_permissions),
        page_accesses: keyed_entries(&remote.page_accesses),
        record_type_visibilities: keyed_entries(&remote.record_type_visibilities),
        tab_visibilities: keyed_entries(&remote.tab_visibilities),
        user_permissions: keyed_entries(&remote.user_permissions),
        extra,
    }
}

/// One entry per key, last one wins, in key order
fn keyed_entries<T: Keyed + Clone>(items: &[T]) -> Vec<T> {
    let by_key: BTreeMap<&str, &T> = items.iter().map(|item| (item.key(), item)).collect();
    by_key.into_values().cloned().collect()
}
