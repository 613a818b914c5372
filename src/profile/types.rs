use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Sub-items that carry their own identity inside a profile collection.
pub trait Keyed {
    fn key(&self) -> &str;
}

/// A profile as stored on disk and as returned by the remote org.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Present on fetched profiles; local files are named after the profile instead.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_license: Option<String>,
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub application_visibilities: Vec<ApplicationVisibility>,
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub class_accesses: Vec<ClassAccess>,
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub field_permissions: Vec<FieldPermission>,
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub object_permissions: Vec<ObjectPermission>,
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub page_accesses: Vec<PageAccess>,
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub record_type_visibilities: Vec<RecordTypeVisibility>,
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub tab_visibilities: Vec<TabVisibility>,
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub user_permissions: Vec<UserPermission>,
    /// Fields outside the modelled schema, kept verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationVisibility {
    pub application: String,
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassAccess {
    pub apex_class: String,
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPermission {
    pub field: String,
    #[serde(default)]
    pub editable: bool,
    #[serde(default)]
    pub readable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectPermission {
    pub object: String,
    #[serde(default)]
    pub allow_create: bool,
    #[serde(default)]
    pub allow_delete: bool,
    #[serde(default)]
    pub allow_edit: bool,
    #[serde(default)]
    pub allow_read: bool,
    #[serde(default)]
    pub modify_all_records: bool,
    #[serde(default)]
    pub view_all_records: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageAccess {
    pub apex_page: String,
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordTypeVisibility {
    pub record_type: String,
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_account_default: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabVisibility {
    pub tab: String,
    pub visibility: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPermission {
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
}

impl Keyed for ApplicationVisibility {
    fn key(&self) -> &str {
        &self.application
    }
}

impl Keyed for ClassAccess {
    fn key(&self) -> &str {
        &self.apex_class
    }
}

impl Keyed for FieldPermission {
    fn key(&self) -> &str {
        &self.field
    }
}

impl Keyed for ObjectPermission {
    fn key(&self) -> &str {
        &self.object
    }
}

impl Keyed for PageAccess {
    fn key(&self) -> &str {
        &self.apex_page
    }
}

impl Keyed for RecordTypeVisibility {
    fn key(&self) -> &str {
        &self.record_type
    }
}

impl Keyed for TabVisibility {
    fn key(&self) -> &str {
        &self.tab
    }
}

impl Keyed for UserPermission {
    fn key(&self) -> &str {
        &self.name
    }
}

/// Names of the keyed sub-collections of a [`Profile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProfileCollection {
    ApplicationVisibilities,
    ClassAccesses,
    FieldPermissions,
    ObjectPermissions,
    PageAccesses,
    RecordTypeVisibilities,
    TabVisibilities,
    UserPermissions,
}

impl ProfileCollection {
    /// Field name as it appears in the serialized profile
    pub fn field_name(&self) -> &'static str {
        match self {
            ProfileCollection::ApplicationVisibilities => "applicationVisibilities",
            ProfileCollection::ClassAccesses => "classAccesses",
            ProfileCollection::FieldPermissions => "fieldPermissions",
            ProfileCollection::ObjectPermissions => "objectPermissions",
            ProfileCollection::PageAccesses => "pageAccesses",
            ProfileCollection::RecordTypeVisibilities => "recordTypeVisibilities",
            ProfileCollection::TabVisibilities => "tabVisibilities",
            ProfileCollection::UserPermissions => "userPermissions",
        }
    }
}

impl fmt::Display for ProfileCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

impl FromStr for ProfileCollection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const ALL: [ProfileCollection; 8] = [
            ProfileCollection::ApplicationVisibilities,
            ProfileCollection::ClassAccesses,
            ProfileCollection::FieldPermissions,
            ProfileCollection::ObjectPermissions,
            ProfileCollection::PageAccesses,
            ProfileCollection::RecordTypeVisibilities,
            ProfileCollection::TabVisibilities,
            ProfileCollection::UserPermissions,
        ];
        ALL.into_iter()
            .find(|c| c.field_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown profile collection '{}'", s))
    }
}

impl Profile {
    /// Identity keys of the entries in `collection`, in stored order.
    pub fn collection_keys(&self, collection: ProfileCollection) -> Vec<String> {
        fn keys<T: Keyed>(items: &[T]) -> Vec<String> {
            items.iter().map(|i| i.key().to_string()).collect()
        }

        match collection {
            ProfileCollection::ApplicationVisibilities => keys(&self.application_visibilities),
            ProfileCollection::ClassAccesses => keys(&self.class_accesses),
            ProfileCollection::FieldPermissions => keys(&self.field_permissions),
            ProfileCollection::ObjectPermissions => keys(&self.object_permissions),
            ProfileCollection::PageAccesses => keys(&self.page_accesses),
            ProfileCollection::RecordTypeVisibilities => keys(&self.record_type_visibilities),
            ProfileCollection::TabVisibilities => keys(&self.tab_visibilities),
            ProfileCollection::UserPermissions => keys(&self.user_permissions),
        }
    }

    /// Keep the entries of `collection` whose position is `true` in `keep`.
    ///
    /// `keep` must be as long as the collection; entries past its end are kept.
    pub fn retain_entries(&mut self, collection: ProfileCollection, keep: &[bool]) {
        fn retain<T>(items: &mut Vec<T>, keep: &[bool]) {
            let mut idx = 0;
            items.retain(|_| {
                let kept = keep.get(idx).copied().unwrap_or(true);
                idx += 1;
                kept
            });
        }

        match collection {
            ProfileCollection::ApplicationVisibilities => {
                retain(&mut self.application_visibilities, keep)
            }
            ProfileCollection::ClassAccesses => retain(&mut self.class_accesses, keep),
            ProfileCollection::FieldPermissions => retain(&mut self.field_permissions, keep),
            ProfileCollection::ObjectPermissions => retain(&mut self.object_permissions, keep),
            ProfileCollection::PageAccesses => retain(&mut self.page_accesses, keep),
            ProfileCollection::RecordTypeVisibilities => {
                retain(&mut self.record_type_visibilities, keep)
            }
            ProfileCollection::TabVisibilities => retain(&mut self.tab_visibilities, keep),
            ProfileCollection::UserPermissions => retain(&mut self.user_permissions, keep),
        }
    }
}

/// Accepts either a single object or a list of objects for a collection field.
///
/// The remote API unwraps one-element lists, so a profile with a single tab
/// visibility arrives as an object. `null` becomes an empty list.
fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        Many(Vec<T>),
        One(T),
    }

    Ok(match Option::<OneOrMany<T>>::deserialize(deserializer)? {
        Some(OneOrMany::Many(items)) => items,
        Some(OneOrMany::One(item)) => vec![item],
        None => Vec::new(),
    })
}
