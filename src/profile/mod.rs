mod merge;
mod types;

pub use merge::merge_profile;
pub use types::{
    ApplicationVisibility, ClassAccess, FieldPermission, Keyed, ObjectPermission, PageAccess,
    Profile, ProfileCollection, RecordTypeVisibility, TabVisibility, UserPermission,
};

/// File name suffix of profile source files
pub const PROFILE_FILE_SUFFIX: &str = ".profile-meta.json";

/// Source file name for a profile
pub fn profile_file_name(name: &str) -> String {
    format!("{}{}", name, PROFILE_FILE_SUFFIX)
}
